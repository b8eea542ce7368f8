//! Temporal knowledge graph.
//!
//! Stores `(subject, predicate, object)` facts with validity windows,
//! supports point-in-time queries, and automatically closes the previously
//! open fact for a `(subject, predicate)` pair when an earlier-starting fact
//! is superseded.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::TemporalError;

pub const MIN_CONFIDENCE: f64 = 0.1;
pub const MAX_CONFIDENCE: f64 = 1.0;
const DAY_MS: f64 = 86_400_000.0;

/// A single temporal fact.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fact {
    pub id: String,
    pub subject: String,
    pub predicate: String,
    pub object: String,
    pub valid_from: i64,
    pub valid_to: Option<i64>,
    pub confidence: f64,
    pub last_updated: i64,
    pub metadata: Option<serde_json::Value>,
}

impl Fact {
    pub fn is_open(&self) -> bool {
        self.valid_to.is_none()
    }
}

/// Accept an ms-epoch integer, an ISO-8601 string (optionally with a
/// trailing `Z`), or default to `now` when absent.
pub fn parse_time(value: Option<&str>, now_ms: i64) -> Result<i64, TemporalError> {
    let Some(raw) = value else { return Ok(now_ms) };
    if let Ok(ms) = raw.parse::<i64>() {
        return Ok(ms);
    }
    let normalized = raw.replace('Z', "+00:00");
    DateTime::parse_from_rfc3339(&normalized)
        .map(|dt| dt.timestamp_millis())
        .map_err(|_| TemporalError::InvalidTimestamp(raw.to_string()))
}

/// Flat map `id -> Fact`. Persisted as `temporal_facts.json`.
#[derive(Debug, Default)]
pub struct TemporalGraph {
    facts: HashMap<String, Fact>,
    path: Option<PathBuf>,
}

impl TemporalGraph {
    pub fn new() -> Self {
        Self {
            facts: HashMap::new(),
            path: None,
        }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, TemporalError> {
        let path = path.as_ref().to_path_buf();
        let facts = if path.exists() && std::fs::metadata(&path)?.len() > 0 {
            let raw = std::fs::read_to_string(&path)?;
            serde_json::from_str(&raw)?
        } else {
            HashMap::new()
        };
        Ok(Self {
            facts,
            path: Some(path),
        })
    }

    fn save(&self) -> Result<(), TemporalError> {
        let Some(path) = &self.path else { return Ok(()) };
        let json = serde_json::to_string_pretty(&self.facts)?;
        crate::storage::write_file_hardened(path, &json)?;
        Ok(())
    }

    /// Insert a new fact, closing any existing open fact for the same
    /// `(subject, predicate)` whose `valid_from` is strictly earlier than
    /// the new fact's. Facts that start later are left untouched — this is
    /// an append-only historical record, not a rewrite.
    #[allow(clippy::too_many_arguments)]
    pub fn insert(
        &mut self,
        subject: &str,
        predicate: &str,
        object: &str,
        valid_from: i64,
        confidence: f64,
        metadata: Option<serde_json::Value>,
        now_ms: i64,
    ) -> Result<String, TemporalError> {
        for fact in self.facts.values_mut() {
            if fact.subject == subject
                && fact.predicate == predicate
                && fact.is_open()
                && fact.valid_from < valid_from
            {
                fact.valid_to = Some(valid_from - 1);
                fact.last_updated = now_ms;
            }
        }

        let id = Uuid::new_v4().to_string();
        let fact = Fact {
            id: id.clone(),
            subject: subject.to_string(),
            predicate: predicate.to_string(),
            object: object.to_string(),
            valid_from,
            valid_to: None,
            confidence: confidence.clamp(MIN_CONFIDENCE, MAX_CONFIDENCE),
            last_updated: now_ms,
            metadata,
        };
        self.facts.insert(id.clone(), fact);
        self.save()?;
        Ok(id)
    }

    /// Facts valid at `at`, matching any supplied selectors, with
    /// confidence at or above `min_confidence`.
    pub fn query_at_time(
        &self,
        subject: Option<&str>,
        predicate: Option<&str>,
        object: Option<&str>,
        at: i64,
        min_confidence: f64,
    ) -> Vec<Fact> {
        self.facts
            .values()
            .filter(|f| f.valid_from <= at)
            .filter(|f| f.valid_to.is_none_or(|vt| vt > at))
            .filter(|f| f.confidence >= min_confidence)
            .filter(|f| subject.is_none_or(|s| f.subject == s))
            .filter(|f| predicate.is_none_or(|p| f.predicate == p))
            .filter(|f| object.is_none_or(|o| f.object == o))
            .cloned()
            .collect()
    }

    /// All facts for `subject` (optionally filtered by `predicate`),
    /// ascending by `valid_from`.
    pub fn timeline(&self, subject: &str, predicate: Option<&str>) -> Vec<Fact> {
        let mut out: Vec<Fact> = self
            .facts
            .values()
            .filter(|f| f.subject == subject)
            .filter(|f| predicate.is_none_or(|p| f.predicate == p))
            .cloned()
            .collect();
        out.sort_by_key(|f| f.valid_from);
        out
    }

    /// Close `id`'s validity window at `valid_to` if the fact exists.
    pub fn invalidate(&mut self, id: &str, valid_to: i64) -> Result<bool, TemporalError> {
        let Some(fact) = self.facts.get_mut(id) else {
            return Ok(false);
        };
        fact.valid_to = Some(valid_to);
        self.save()?;
        Ok(true)
    }

    /// Decay confidence on every open fact: `max(0.1, conf * (1 - rate*days))`.
    /// Facts already closed, or already at the floor, are left untouched.
    /// Returns the number of facts whose confidence changed.
    pub fn apply_confidence_decay(&mut self, rate: f64, now_ms: i64) -> Result<usize, TemporalError> {
        let mut changed = 0usize;
        for fact in self.facts.values_mut() {
            if fact.valid_to.is_some() || fact.confidence <= MIN_CONFIDENCE {
                continue;
            }
            let days = (now_ms - fact.valid_from) as f64 / DAY_MS;
            let new_confidence = (fact.confidence * (1.0 - rate * days)).max(MIN_CONFIDENCE);
            if new_confidence != fact.confidence {
                fact.confidence = new_confidence;
                fact.last_updated = now_ms;
                changed += 1;
            }
        }
        if changed > 0 {
            self.save()?;
        }
        Ok(changed)
    }

    pub fn get(&self, id: &str) -> Option<&Fact> {
        self.facts.get(id)
    }

    pub fn stats(&self) -> TemporalStats {
        let open = self.facts.values().filter(|f| f.is_open()).count();
        TemporalStats {
            total_facts: self.facts.len(),
            open_facts: open,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemporalStats {
    pub total_facts: usize,
    pub open_facts: usize,
}
