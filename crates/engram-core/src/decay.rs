//! Decay & reinforcement engine.
//!
//! Applies tier-aware exponential decay to memory salience, reinforces
//! salience on retrieval with diminishing returns, and propagates a portion
//! of a reinforcement along waypoint edges to neighbouring memories.

use serde::{Deserialize, Serialize};

/// Decay tier a memory falls into based on recency and prior value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Hot,
    Warm,
    Cold,
}

const HOT_RECENCY_DAYS: f64 = 6.0;
const HOT_SALIENCE: f64 = 0.7;
const WARM_SALIENCE: f64 = 0.4;
const HIGH_VALUE_COACTIVATIONS: u64 = 5;

const DECAY_RATE_HOT: f64 = 0.005;
const DECAY_RATE_WARM: f64 = 0.02;
const DECAY_RATE_COLD: f64 = 0.05;

pub const REINFORCE_BOOST: f64 = 0.15;
pub const MIN_SALIENCE: f64 = 0.0;
pub const MAX_SALIENCE: f64 = 1.0;
pub const DIRTY_THRESHOLD: f64 = 0.001;

const PROPAGATION_GAMMA: f64 = 0.1;
const PROPAGATION_TIME_DECAY: f64 = 0.02;

/// Pick the decay tier for a memory given its recency and prior engagement.
pub fn pick_tier(days_since: f64, salience: f64, coactivations: u64) -> Tier {
    let is_recent = days_since < HOT_RECENCY_DAYS;
    let is_high_value = coactivations > HIGH_VALUE_COACTIVATIONS || salience > HOT_SALIENCE;

    if is_recent && is_high_value {
        Tier::Hot
    } else if is_recent || salience > WARM_SALIENCE {
        Tier::Warm
    } else {
        Tier::Cold
    }
}

/// Default decay rate for a tier, overridden by a sector-specific lambda
/// when one is supplied.
pub fn tier_decay_rate(tier: Tier) -> f64 {
    match tier {
        Tier::Hot => DECAY_RATE_HOT,
        Tier::Warm => DECAY_RATE_WARM,
        Tier::Cold => DECAY_RATE_COLD,
    }
}

/// Apply salience-resistant exponential decay.
///
/// `new = clamp(salience * exp(-lambda * days / (salience + 0.1)), 0, 1)`.
pub fn calculate_decay(salience: f64, decay_lambda: f64, days: f64) -> f64 {
    let decayed = salience * (-decay_lambda * days / (salience + 0.1)).exp();
    decayed.clamp(MIN_SALIENCE, MAX_SALIENCE)
}

/// Whether a decay update is significant enough to persist.
pub fn is_dirty(old: f64, new: f64) -> bool {
    (new - old).abs() > DIRTY_THRESHOLD
}

/// Diminishing-returns reinforcement: `salience + boost * (1 - salience)`,
/// clamped to `[0, 1]`.
pub fn reinforce(salience: f64, boost: f64) -> f64 {
    (salience + boost * (1.0 - salience)).clamp(MIN_SALIENCE, MAX_SALIENCE)
}

/// Reinforcement propagated from a source memory to a neighbour along a
/// waypoint of the given weight. Returns 0 if the computed boost would be
/// negative (target already at or above source salience).
///
/// `boost = max(0, gamma * (sal_source - sal_target) * exp(-0.02 * days) * weight)`
pub fn propagated_boost(source_salience: f64, target_salience: f64, edge_weight: f64, days_since_target_access: f64) -> f64 {
    let decay_factor = (-PROPAGATION_TIME_DECAY * days_since_target_access).exp();
    let raw = PROPAGATION_GAMMA * (source_salience - target_salience) * decay_factor * edge_weight;
    raw.max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_selection_matches_spec_rules() {
        assert_eq!(pick_tier(2.0, 0.8, 1), Tier::Hot);
        assert_eq!(pick_tier(2.0, 0.1, 0), Tier::Warm);
        assert_eq!(pick_tier(10.0, 0.5, 0), Tier::Warm);
        assert_eq!(pick_tier(10.0, 0.1, 0), Tier::Cold);
    }

    #[test]
    fn reinforcement_diminishing_returns_matches_scenario() {
        let mut s = 0.5;
        s = reinforce(s, 0.15);
        assert!((s - 0.575).abs() < 1e-9);
        for _ in 0..9 {
            s = reinforce(s, 0.15);
        }
        assert!((s - 0.912).abs() < 0.001);
        assert!(s < 1.0);
    }

    #[test]
    fn reinforcement_never_decreases() {
        for start in [0.0, 0.3, 0.9, 1.0] {
            assert!(reinforce(start, 0.15) >= start);
        }
    }

    #[test]
    fn decay_never_increases() {
        for salience in [0.1, 0.5, 0.9] {
            assert!(calculate_decay(salience, 0.02, 10.0) <= salience);
        }
    }

    #[test]
    fn decay_monotonic_in_days() {
        let a = calculate_decay(0.8, 0.02, 5.0);
        let b = calculate_decay(0.8, 0.02, 10.0);
        assert!(b < a);
    }

    #[test]
    fn propagated_boost_is_zero_when_target_already_ahead() {
        assert_eq!(propagated_boost(0.3, 0.8, 0.5, 1.0), 0.0);
    }

    #[test]
    fn propagated_boost_positive_when_source_ahead() {
        let boost = propagated_boost(0.9, 0.2, 0.8, 0.0);
        assert!(boost > 0.0);
    }
}
