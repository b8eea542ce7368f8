use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::sector::Sector;

/// A stored memory: the unit of recall.
///
/// Mutated only by retrieval (`last_seen_at`, `coactivations`, `salience`),
/// by decay (`salience`), or by explicit reinforcement. `primary_sector` is
/// always one of the five cognitive sectors and `salience` always lies in
/// `[0, 1]`.
#[non_exhaustive]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Memory {
    pub id: String,
    pub content: String,
    pub tenant_id: String,
    pub tags: HashSet<String>,
    pub metadata: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub primary_sector: Sector,
    pub additional_sectors: Vec<Sector>,
    pub sector_confidence: f64,
    pub salience: f64,
    pub decay_lambda: f64,
    pub last_seen_at: i64,
    pub coactivations: u64,
}

impl Memory {
    pub fn matches_tags(&self, tags: &[String]) -> bool {
        tags.iter().all(|t| self.tags.contains(t))
    }
}

/// Aggregate statistics over a memory core's stored memories, facts, and
/// waypoints.
#[non_exhaustive]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryStats {
    pub total_memories: usize,
    pub by_sector: std::collections::HashMap<String, usize>,
    pub by_tenant: std::collections::HashMap<String, usize>,
    pub temporal: crate::temporal::TemporalStats,
    pub waypoints: crate::waypoint::WaypointStats,
    pub data_dir: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_matching_requires_all_requested_tags() {
        let memory = Memory {
            id: "1".into(),
            content: "x".into(),
            tenant_id: "t".into(),
            tags: HashSet::from(["a".to_string(), "b".to_string()]),
            metadata: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            primary_sector: Sector::Semantic,
            additional_sectors: Vec::new(),
            sector_confidence: 0.2,
            salience: 1.0,
            decay_lambda: 0.005,
            last_seen_at: 0,
            coactivations: 0,
        };
        assert!(memory.matches_tags(&["a".to_string()]));
        assert!(memory.matches_tags(&[]));
        assert!(!memory.matches_tags(&["c".to_string()]));
    }
}
