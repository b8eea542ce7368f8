use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::decay;
use crate::embedding::{EmbeddingBackend, build_chunk, parse_chunk_id};
use crate::error::{MemoryError, Result};
use crate::sector::{self, Sector};
use crate::storage;
use crate::temporal::{Fact, TemporalGraph};
use crate::waypoint::{self, WaypointGraph};

use super::record::{Memory, MemoryStats};

const DAY_MS: f64 = 86_400_000.0;
const LIST_HORIZON_DAYS: f64 = 30.0;
const REINFORCE_BOOST_DEFAULT: f64 = decay::REINFORCE_BOOST;
const MEMORY_META_FILE: &str = "memory_meta.json";
const WAYPOINTS_FILE: &str = "waypoints.json";
const TEMPORAL_FACTS_FILE: &str = "temporal_facts.json";

/// Arguments to [`MemoryCore::store`].
#[derive(Debug, Clone, Default)]
pub struct StoreInput {
    pub content: String,
    pub tenant_id: String,
    pub tags: HashSet<String>,
    pub metadata: Option<serde_json::Value>,
    pub sector_override: Option<Sector>,
}

/// The four-field public summary `store` returns, per the operation surface.
#[derive(Debug, Clone)]
pub struct StoreResult {
    pub id: String,
    pub primary_sector: Sector,
    pub confidence: f64,
    pub created_at: DateTime<Utc>,
}

/// A ranked search result, optionally reached via waypoint expansion rather
/// than a direct embedding hit.
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub memory: Memory,
    pub score: f64,
    pub expanded_via: Option<Vec<String>>,
}

/// Owns one scope's memories, waypoint graph, temporal graph, and embedding
/// backend. Each scope (project/user) is a distinct `MemoryCore` rooted at a
/// distinct data directory.
pub struct MemoryCore {
    data_dir: PathBuf,
    memories: HashMap<String, Memory>,
    waypoints: WaypointGraph,
    temporal: TemporalGraph,
    embedding: Box<dyn EmbeddingBackend>,
}

impl MemoryCore {
    pub fn open(data_dir: impl AsRef<Path>, embedding: Box<dyn EmbeddingBackend>) -> Result<Self> {
        let data_dir = data_dir.as_ref().to_path_buf();
        storage::ensure_dir_hardened(&data_dir)?;

        let memories: HashMap<String, Memory> = storage::load_json(&data_dir.join(MEMORY_META_FILE))?;
        let waypoints = WaypointGraph::load(data_dir.join(WAYPOINTS_FILE))?;
        let temporal = TemporalGraph::load(data_dir.join(TEMPORAL_FACTS_FILE))?;

        let mut core = Self {
            data_dir,
            memories,
            waypoints,
            temporal,
            embedding,
        };
        core.rebuild_index();
        Ok(core)
    }

    fn meta_path(&self) -> PathBuf {
        self.data_dir.join(MEMORY_META_FILE)
    }

    fn persist_memories(&self) -> Result<()> {
        storage::save_json(&self.meta_path(), &self.memories)?;
        Ok(())
    }

    /// Rebuild the embedding index from every currently-stored memory. A
    /// no-op when there are no memories yet (the original build-once
    /// backend has nothing to index). Backend failures are soft: logged and
    /// swallowed, per the `BackendUnavailable` policy — the store itself
    /// still succeeds with persisted metadata.
    fn rebuild_index(&mut self) {
        if self.memories.is_empty() {
            return;
        }
        let chunks: Vec<String> = self
            .memories
            .values()
            .map(|m| build_chunk(&m.id, &m.primary_sector.to_string(), &m.content, &tags_vec(&m.tags)))
            .collect();
        if let Err(e) = self.embedding.rebuild(&chunks) {
            tracing::warn!("embedding backend unavailable, skipping index rebuild: {e}");
        }
    }

    pub fn store(&mut self, input: StoreInput) -> Result<StoreResult> {
        let classification = sector::classify(&input.content, input.sector_override);
        let now = Utc::now();
        let now_ms = now.timestamp_millis();
        let id = Uuid::new_v4().to_string();

        let memory = Memory {
            id: id.clone(),
            content: input.content.clone(),
            tenant_id: input.tenant_id,
            tags: input.tags,
            metadata: input.metadata,
            created_at: now,
            updated_at: now,
            primary_sector: classification.primary,
            additional_sectors: classification.additional.clone(),
            sector_confidence: classification.confidence,
            salience: 1.0,
            decay_lambda: sector::decay_lambda(classification.primary),
            last_seen_at: now_ms,
            coactivations: 0,
        };

        self.memories.insert(id.clone(), memory);
        self.persist_memories()?;
        self.rebuild_index();
        self.link_near_neighbours(&id, &input.content, now_ms)?;

        Ok(StoreResult {
            id,
            primary_sector: classification.primary,
            confidence: classification.confidence,
            created_at: now,
        })
    }

    /// Enumerate the top-5 currently-indexed memories most similar to
    /// `content` and create a bidirectional waypoint to each whose
    /// position-derived similarity (`1 - 0.1*rank`) clears the threshold.
    fn link_near_neighbours(&mut self, new_id: &str, content: &str, now_ms: i64) -> Result<()> {
        let hits = match self.embedding.search(content, 5) {
            Ok(hits) => hits,
            Err(e) => {
                tracing::warn!("embedding backend unavailable, skipping waypoint linking: {e}");
                return Ok(());
            }
        };
        for (rank, hit) in hits.iter().enumerate() {
            let Some(candidate_id) = parse_chunk_id(&hit.chunk) else {
                continue;
            };
            if candidate_id == new_id || !self.memories.contains_key(candidate_id) {
                continue;
            }
            let similarity = 1.0 - 0.1 * rank as f64;
            if similarity >= waypoint::SIMILARITY_THRESHOLD {
                self.waypoints
                    .create(new_id, candidate_id, None, true, now_ms)?;
            }
        }
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    pub fn search(
        &mut self,
        query: &str,
        tenant_id: &str,
        limit: usize,
        tags: &[String],
        sector_filter: Option<Sector>,
        expand_waypoints: bool,
    ) -> Result<Vec<SearchHit>> {
        let query_sector = sector::classify(query, None).primary;

        let raw_hits = match self.embedding.search(query, limit * 3) {
            Ok(hits) => hits,
            Err(e) => {
                tracing::warn!("embedding backend unavailable, returning empty search results: {e}");
                return Ok(Vec::new());
            }
        };

        let mut seen: HashSet<String> = HashSet::new();
        let mut results: Vec<SearchHit> = Vec::new();
        let mut seeds: Vec<String> = Vec::new();

        for (rank, hit) in raw_hits.iter().enumerate() {
            let Some(id) = parse_chunk_id(&hit.chunk) else {
                continue;
            };
            let Some(memory) = self.memories.get(id) else {
                continue;
            };
            if memory.tenant_id != tenant_id {
                continue;
            }
            if let Some(sector) = sector_filter {
                if memory.primary_sector != sector {
                    continue;
                }
            }
            if !memory.matches_tags(tags) {
                continue;
            }

            if seeds.len() < 5 {
                seeds.push(id.to_string());
            }

            let base = 1.0 - 0.05 * rank as f64;
            let penalty = sector::sector_penalty(query_sector, memory.primary_sector);
            let final_score = base * penalty * (0.5 + 0.5 * memory.salience);

            seen.insert(id.to_string());
            results.push(SearchHit {
                memory: memory.clone(),
                score: final_score,
                expanded_via: None,
            });
        }

        if expand_waypoints {
            let expansions = self.waypoints.expand(&seeds, limit, 0.1);
            for expansion in expansions {
                if seen.contains(&expansion.id) {
                    continue;
                }
                let Some(memory) = self.memories.get(&expansion.id) else {
                    continue;
                };
                if memory.tenant_id != tenant_id {
                    continue;
                }
                if let Some(sector) = sector_filter {
                    if memory.primary_sector != sector {
                        continue;
                    }
                }
                seen.insert(expansion.id.clone());
                results.push(SearchHit {
                    memory: memory.clone(),
                    score: expansion.weight * 0.5,
                    expanded_via: Some(expansion.path),
                });
            }
        }

        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        results.truncate(limit);

        let now_ms = Utc::now().timestamp_millis();
        for hit in &results {
            self.reinforce_memory_internal(&hit.memory.id, REINFORCE_BOOST_DEFAULT, now_ms)?;
            if let Some(path) = &hit.expanded_via {
                self.waypoints.reinforce(path, now_ms)?;
            }
            self.propagate_to_neighbours(&hit.memory.id, now_ms);
        }
        self.persist_memories()?;

        Ok(results)
    }

    /// Propagate a share of `id`'s freshly reinforced salience to its direct
    /// waypoint neighbours, per the decay engine's propagated-reinforcement
    /// formula. Neighbours that are already at or above `id`'s salience
    /// receive no boost. Does not touch `last_seen_at`/`coactivations` —
    /// this is a passive side-effect of the source's retrieval, not a
    /// retrieval of the neighbour itself.
    fn propagate_to_neighbours(&mut self, id: &str, now_ms: i64) {
        let Some(source_salience) = self.memories.get(id).map(|m| m.salience) else {
            return;
        };
        for neighbour in self.waypoints.neighbours(id) {
            let Some(target) = self.memories.get_mut(&neighbour.id) else {
                continue;
            };
            let days_since = (now_ms - target.last_seen_at) as f64 / DAY_MS;
            let boost = decay::propagated_boost(source_salience, target.salience, neighbour.weight, days_since);
            if boost > 0.0 {
                target.salience = (target.salience + boost).min(decay::MAX_SALIENCE);
            }
        }
    }

    pub fn get(&self, id: &str, tenant_id: &str) -> Option<Memory> {
        self.memories
            .get(id)
            .filter(|m| m.tenant_id == tenant_id)
            .cloned()
    }

    pub fn delete(&mut self, id: &str, tenant_id: &str) -> Result<bool> {
        let should_remove = self.memories.get(id).is_some_and(|m| m.tenant_id == tenant_id);
        if !should_remove {
            return Ok(false);
        }
        self.memories.remove(id);
        self.waypoints.remove_memory(id)?;
        self.persist_memories()?;
        self.rebuild_index();
        Ok(true)
    }

    pub fn delete_all(&mut self, tenant_id: &str) -> Result<usize> {
        let ids: Vec<String> = self
            .memories
            .iter()
            .filter(|(_, m)| m.tenant_id == tenant_id)
            .map(|(id, _)| id.clone())
            .collect();
        for id in &ids {
            self.memories.remove(id);
            self.waypoints.remove_memory(id)?;
        }
        if !ids.is_empty() {
            self.persist_memories()?;
            self.rebuild_index();
        }
        Ok(ids.len())
    }

    pub fn list(
        &self,
        tenant_id: &str,
        tags: &[String],
        sector_filter: Option<Sector>,
        limit: usize,
        offset: usize,
    ) -> Vec<Memory> {
        let now_ms = Utc::now().timestamp_millis() as f64;
        let mut matching: Vec<&Memory> = self
            .memories
            .values()
            .filter(|m| m.tenant_id == tenant_id)
            .filter(|m| m.matches_tags(tags))
            .filter(|m| sector_filter.is_none_or(|s| m.primary_sector == s))
            .collect();

        matching.sort_by(|a, b| {
            let key = |m: &&Memory| m.salience * (1.0 - (now_ms - m.last_seen_at as f64) / (DAY_MS * LIST_HORIZON_DAYS));
            key(b).partial_cmp(&key(a)).unwrap_or(std::cmp::Ordering::Equal)
        });

        matching
            .into_iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect()
    }

    pub fn store_fact(
        &mut self,
        subject: &str,
        predicate: &str,
        object: &str,
        valid_from: Option<&str>,
        confidence: f64,
        metadata: Option<serde_json::Value>,
    ) -> Result<String> {
        let now_ms = Utc::now().timestamp_millis();
        let valid_from = crate::temporal::parse_time(valid_from, now_ms)
            .map_err(|e| MemoryError::InvalidArgument(e.to_string()))?;
        Ok(self
            .temporal
            .insert(subject, predicate, object, valid_from, confidence, metadata, now_ms)?)
    }

    pub fn query_facts(
        &self,
        subject: Option<&str>,
        predicate: Option<&str>,
        object: Option<&str>,
        at: Option<&str>,
    ) -> Result<Vec<Fact>> {
        let now_ms = Utc::now().timestamp_millis();
        let at = crate::temporal::parse_time(at, now_ms).map_err(|e| MemoryError::InvalidArgument(e.to_string()))?;
        Ok(self.temporal.query_at_time(subject, predicate, object, at, crate::temporal::MIN_CONFIDENCE))
    }

    pub fn get_timeline(&self, subject: &str, predicate: Option<&str>) -> Vec<Fact> {
        self.temporal.timeline(subject, predicate)
    }

    fn reinforce_memory_internal(&mut self, id: &str, boost: f64, now_ms: i64) -> Result<Option<f64>> {
        let Some(memory) = self.memories.get_mut(id) else {
            return Ok(None);
        };
        memory.salience = decay::reinforce(memory.salience, boost);
        memory.last_seen_at = now_ms;
        memory.coactivations += 1;
        Ok(Some(memory.salience))
    }

    pub fn reinforce(&mut self, id: &str, boost: f64) -> Result<Option<f64>> {
        if !(0.01..=0.5).contains(&boost) {
            return Err(MemoryError::InvalidArgument(format!(
                "boost {boost} outside [0.01, 0.5]"
            )));
        }
        let now_ms = Utc::now().timestamp_millis();
        let result = self.reinforce_memory_internal(id, boost, now_ms)?;
        if result.is_some() {
            self.persist_memories()?;
        }
        Ok(result)
    }

    /// Apply decay to every memory's salience, decay temporal fact
    /// confidence, and prune weak waypoints. Returns the count of memories
    /// whose salience changed by more than the dirty threshold.
    pub fn apply_decay(&mut self) -> Result<usize> {
        let now = Utc::now();
        let now_ms = now.timestamp_millis();
        let mut changed = 0usize;

        for memory in self.memories.values_mut() {
            let days_since = (now_ms - memory.last_seen_at) as f64 / DAY_MS;
            let new_salience = decay::calculate_decay(memory.salience, memory.decay_lambda, days_since);
            if decay::is_dirty(memory.salience, new_salience) {
                memory.salience = new_salience;
                changed += 1;
            }
        }

        self.temporal.apply_confidence_decay(0.01, now_ms)?;
        self.waypoints.prune_weak_edges(waypoint::MIN_WEIGHT)?;

        if changed > 0 {
            self.persist_memories()?;
        }

        Ok(changed)
    }

    pub fn stats(&self) -> MemoryStats {
        let mut by_sector: HashMap<String, usize> = HashMap::new();
        let mut by_tenant: HashMap<String, usize> = HashMap::new();
        for memory in self.memories.values() {
            *by_sector.entry(memory.primary_sector.to_string()).or_insert(0) += 1;
            *by_tenant.entry(memory.tenant_id.clone()).or_insert(0) += 1;
        }
        MemoryStats {
            total_memories: self.memories.len(),
            by_sector,
            by_tenant,
            temporal: self.temporal.stats(),
            waypoints: self.waypoints.stats(),
            data_dir: self.data_dir.display().to_string(),
        }
    }
}

fn tags_vec(tags: &HashSet<String>) -> Vec<String> {
    let mut v: Vec<String> = tags.iter().cloned().collect();
    v.sort();
    v
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::LocalHashEmbedding;

    fn core(dir: &Path) -> MemoryCore {
        MemoryCore::open(dir, Box::new(LocalHashEmbedding::new())).unwrap()
    }

    fn input(content: &str) -> StoreInput {
        StoreInput {
            content: content.to_string(),
            tenant_id: "default".to_string(),
            tags: HashSet::new(),
            metadata: None,
            sector_override: None,
        }
    }

    #[test]
    fn store_then_get_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let mut c = core(dir.path());
        let result = c.store(input("I feel so happy today!")).unwrap();
        assert_eq!(result.primary_sector, Sector::Emotional);

        let fetched = c.get(&result.id, "default").unwrap();
        assert_eq!(fetched.content, "I feel so happy today!");
        assert_eq!(fetched.salience, 1.0);
    }

    #[test]
    fn get_is_tenant_scoped() {
        let dir = tempfile::tempdir().unwrap();
        let mut c = core(dir.path());
        let result = c.store(input("a fact about rust")).unwrap();
        assert!(c.get(&result.id, "someone-else").is_none());
    }

    #[test]
    fn delete_cascades_to_waypoints() {
        let dir = tempfile::tempdir().unwrap();
        let mut c = core(dir.path());
        let a = c.store(input("the quick brown fox jumps")).unwrap();
        let b = c.store(input("the quick brown fox jumps again")).unwrap();
        c.waypoints.create(&a.id, &b.id, Some(0.8), true, 0).unwrap();

        assert!(c.delete(&a.id, "default").unwrap());
        assert!(c.waypoints.neighbours(&b.id).iter().all(|n| n.id != a.id));
    }

    #[test]
    fn delete_returns_false_for_unknown_id() {
        let dir = tempfile::tempdir().unwrap();
        let mut c = core(dir.path());
        assert!(!c.delete("missing", "default").unwrap());
    }

    #[test]
    fn reinforce_rejects_out_of_range_boost() {
        let dir = tempfile::tempdir().unwrap();
        let mut c = core(dir.path());
        let r = c.store(input("hello")).unwrap();
        assert!(c.reinforce(&r.id, 0.9).is_err());
    }

    #[test]
    fn apply_decay_returns_zero_when_nothing_changes_yet() {
        let dir = tempfile::tempdir().unwrap();
        let mut c = core(dir.path());
        c.store(input("just stored, salience is 1.0 and fresh")).unwrap();
        let changed = c.apply_decay().unwrap();
        assert_eq!(changed, 0);
    }

    #[test]
    fn list_sorts_by_salience_weighted_recency() {
        let dir = tempfile::tempdir().unwrap();
        let mut c = core(dir.path());
        c.store(input("first memory")).unwrap();
        c.store(input("second memory")).unwrap();
        let listed = c.list("default", &[], None, 10, 0);
        assert_eq!(listed.len(), 2);
    }

    #[test]
    fn search_propagates_reinforcement_to_waypoint_neighbours() {
        let dir = tempfile::tempdir().unwrap();
        let mut c = core(dir.path());
        let a = c.store(input("the quick brown fox jumps over the lazy dog")).unwrap();
        let b = c.store(input("an unrelated memory about cooking pasta")).unwrap();

        // drain b's salience so it sits well below a's, then link them.
        c.memories.get_mut(&b.id).unwrap().salience = 0.1;
        c.waypoints.create(&a.id, &b.id, Some(0.9), true, 0).unwrap();

        c.search("the quick brown fox jumps over the lazy dog", "default", 10, &[], None, false)
            .unwrap();

        let b_after = c.get(&b.id, "default").unwrap();
        assert!(b_after.salience > 0.1, "neighbour should receive propagated boost");
    }

    #[test]
    fn temporal_operations_delegate_correctly() {
        let dir = tempfile::tempdir().unwrap();
        let mut c = core(dir.path());
        c.store_fact("Alice", "works_at", "Google", None, 1.0, None).unwrap();
        let facts = c.query_facts(Some("Alice"), None, None, None).unwrap();
        assert_eq!(facts.len(), 1);
        assert_eq!(facts[0].object, "Google");
        let timeline = c.get_timeline("Alice", None);
        assert_eq!(timeline.len(), 1);
    }
}
