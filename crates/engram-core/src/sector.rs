//! Cognitive sector classifier.
//!
//! Labels memory content with one of five cognitive sectors based on
//! case-insensitive regex pattern matches. The chosen sector governs decay
//! rate ([`crate::decay`]) and the cross-sector penalty applied during
//! search ranking.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// The five cognitive categories a memory can be classified into.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Sector {
    Episodic,
    Semantic,
    Procedural,
    Emotional,
    Reflective,
}

impl Sector {
    pub const ALL: [Sector; 5] = [
        Sector::Episodic,
        Sector::Semantic,
        Sector::Procedural,
        Sector::Emotional,
        Sector::Reflective,
    ];
}

impl std::fmt::Display for Sector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sector::Episodic => write!(f, "episodic"),
            Sector::Semantic => write!(f, "semantic"),
            Sector::Procedural => write!(f, "procedural"),
            Sector::Emotional => write!(f, "emotional"),
            Sector::Reflective => write!(f, "reflective"),
        }
    }
}

impl std::str::FromStr for Sector {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "episodic" => Ok(Sector::Episodic),
            "semantic" => Ok(Sector::Semantic),
            "procedural" => Ok(Sector::Procedural),
            "emotional" => Ok(Sector::Emotional),
            "reflective" => Ok(Sector::Reflective),
            _ => Err(format!("unknown sector: {s}")),
        }
    }
}

/// Static configuration for a sector: search weight, decay rate, and the
/// pattern families used to detect it in free text.
struct SectorConfig {
    weight: f64,
    decay_lambda: f64,
    patterns: &'static [&'static str],
}

fn config(sector: Sector) -> &'static SectorConfig {
    static EPISODIC: SectorConfig = SectorConfig {
        weight: 1.2,
        decay_lambda: 0.015,
        patterns: &[
            r"(?i)\b(today|yesterday|tomorrow|last\s+week|next\s+week)\b",
            r"(?i)\b(remember\s+when|recall|that\s+time)\b",
            r"(?i)\b(went|saw|met|felt|heard|visited|attended)\b",
            r"(?i)\b(at\s+\d{1,2}:\d{2}|on\s+(monday|tuesday|wednesday|thursday|friday|saturday|sunday))\b",
            r"(?i)\b(event|moment|experience|incident|happened|occurred)\b",
        ],
    };
    static SEMANTIC: SectorConfig = SectorConfig {
        weight: 1.0,
        decay_lambda: 0.005,
        patterns: &[
            r"(?i)\b(is\s+a|represents|means|defined\s+as|refers\s+to)\b",
            r"(?i)\b(concept|theory|principle|law|rule|definition)\b",
            r"(?i)\b(fact|statistic|data|evidence|information)\b",
            r"(?i)\b(history|science|geography|math|physics|chemistry)\b",
            r"(?i)\b(know|understand|learn|study)\b",
        ],
    };
    static PROCEDURAL: SectorConfig = SectorConfig {
        weight: 1.1,
        decay_lambda: 0.008,
        patterns: &[
            r"(?i)\b(how\s+to|step\s+by\s+step|guide|tutorial|instructions)\b",
            r"(?i)\b(first|second|third|then|next|finally|lastly)\b",
            r"(?i)\b(install|run|execute|compile|build|deploy|configure)\b",
            r"(?i)\b(click|press|type|enter|select|choose|drag)\b",
            r"(?i)\b(method|function|class|algorithm|procedure|process)\b",
        ],
    };
    static EMOTIONAL: SectorConfig = SectorConfig {
        weight: 1.3,
        decay_lambda: 0.02,
        patterns: &[
            r"(?i)\b(feel|feeling|emotions?|mood)\b",
            r"(?i)\b(happy|sad|angry|excited|scared|anxious|nervous)\b",
            r"(?i)\b(love|hate|like|dislike|enjoy|prefer)\b",
            r"(?i)\b(amazing|terrible|awesome|awful|wonderful|horrible)\b",
            r"(?i)\b(frustrated|confused|overwhelmed|relieved|grateful)\b",
            r"(?i)\b(wow|omg|yay|ugh|oh\s+no)\b",
            r"[!]{2,}",
        ],
    };
    static REFLECTIVE: SectorConfig = SectorConfig {
        weight: 0.8,
        decay_lambda: 0.001,
        patterns: &[
            r"(?i)\b(realize|realization|insight|epiphany|discovered)\b",
            r"(?i)\b(think|thought|ponder|contemplate|reflect)\b",
            r"(?i)\b(understand|grasp|comprehend|see\s+now)\b",
            r"(?i)\b(pattern|trend|connection|link|relationship)\b",
            r"(?i)\b(lesson|moral|takeaway|conclusion|summary)\b",
            r"(?i)\b(feedback|review|analysis|evaluation|assessment)\b",
            r"(?i)\b(improve|grow|change|adapt|evolve)\b",
        ],
    };

    match sector {
        Sector::Episodic => &EPISODIC,
        Sector::Semantic => &SEMANTIC,
        Sector::Procedural => &PROCEDURAL,
        Sector::Emotional => &EMOTIONAL,
        Sector::Reflective => &REFLECTIVE,
    }
}

/// Compiled patterns for every sector, built once per process.
static COMPILED_PATTERNS: LazyLock<HashMap<Sector, Vec<Regex>>> = LazyLock::new(|| {
    Sector::ALL
        .iter()
        .map(|&sector| {
            let patterns = config(sector)
                .patterns
                .iter()
                .map(|p| Regex::new(p).expect("sector pattern is a valid regex"))
                .collect();
            (sector, patterns)
        })
        .collect()
});

/// Asymmetric cross-sector penalty matrix: `penalty(query_sector, memory_sector)`.
/// Missing off-diagonal entries default to 0.3; the diagonal is always 1.0.
static SECTOR_RELATIONSHIPS: LazyLock<HashMap<Sector, HashMap<Sector, f64>>> = LazyLock::new(|| {
    use Sector::*;
    HashMap::from([
        (
            Semantic,
            HashMap::from([(Procedural, 0.8), (Episodic, 0.6), (Reflective, 0.7), (Emotional, 0.4)]),
        ),
        (
            Procedural,
            HashMap::from([(Semantic, 0.8), (Episodic, 0.6), (Reflective, 0.6), (Emotional, 0.3)]),
        ),
        (
            Episodic,
            HashMap::from([(Reflective, 0.8), (Semantic, 0.6), (Procedural, 0.6), (Emotional, 0.7)]),
        ),
        (
            Reflective,
            HashMap::from([(Episodic, 0.8), (Semantic, 0.7), (Procedural, 0.6), (Emotional, 0.6)]),
        ),
        (
            Emotional,
            HashMap::from([(Episodic, 0.7), (Reflective, 0.6), (Semantic, 0.4), (Procedural, 0.3)]),
        ),
    ])
});

/// Result of classifying a piece of content into cognitive sectors.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub primary: Sector,
    pub additional: Vec<Sector>,
    pub confidence: f64,
}

/// Classify `content` into a primary sector plus any secondary sectors.
///
/// `sector_override` corresponds to an explicit `sector` field in caller
/// metadata; when present it short-circuits pattern matching and is
/// returned with confidence 1.0.
pub fn classify(content: &str, sector_override: Option<Sector>) -> Classification {
    if let Some(sector) = sector_override {
        return Classification {
            primary: sector,
            additional: Vec::new(),
            confidence: 1.0,
        };
    }

    let lowered = content.to_lowercase();
    let mut scores: Vec<(Sector, f64)> = Sector::ALL
        .iter()
        .map(|&sector| {
            let weight = config(sector).weight;
            let count: usize = COMPILED_PATTERNS[&sector]
                .iter()
                .map(|re| re.find_iter(&lowered).count())
                .sum();
            (sector, count as f64 * weight)
        })
        .collect();

    // Stable descending sort by score; ties keep declaration order, matching
    // the behaviour of a stable sort over a dict's insertion order.
    scores.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    let (mut primary, primary_score) = scores[0];
    let second_score = scores.get(1).map(|&(_, s)| s).unwrap_or(0.0);

    let threshold = (1.0_f64).max(primary_score * 0.3);
    let additional: Vec<Sector> = scores[1..]
        .iter()
        .filter(|&&(_, score)| score > 0.0 && score >= threshold)
        .map(|&(sector, _)| sector)
        .collect();

    let confidence = if primary_score > 0.0 {
        (primary_score / (primary_score + second_score + 1.0)).min(1.0)
    } else {
        0.2
    };

    if primary_score == 0.0 {
        primary = Sector::Semantic;
    }

    Classification {
        primary,
        additional,
        confidence,
    }
}

/// Decay rate (per day) associated with a sector.
pub fn decay_lambda(sector: Sector) -> f64 {
    config(sector).decay_lambda
}

/// Cross-sector penalty applied when a query of `query_sector` matches a
/// memory of `memory_sector`. Identity on the diagonal, 0.3 default
/// otherwise.
pub fn sector_penalty(query_sector: Sector, memory_sector: Sector) -> f64 {
    if query_sector == memory_sector {
        return 1.0;
    }
    SECTOR_RELATIONSHIPS
        .get(&query_sector)
        .and_then(|row| row.get(&memory_sector))
        .copied()
        .unwrap_or(0.3)
}
