use std::collections::HashMap;
use std::path::Path;

use crate::embedding::EmbeddingBackend;
use crate::error::Result;
use crate::memory::{Memory, MemoryCore, MemoryStats, StoreInput, StoreResult};
use crate::sector::Sector;
use crate::temporal::Fact;

use super::classifier::{ScopeClassifier, CONFIDENCE_THRESHOLD};
use super::Scope;
use super::ScopeSelector;

const PROJECT_BOOST: f64 = 1.2;
const DEDUP_THRESHOLD: f64 = 0.9;
const FETCH_OVERSAMPLE: f64 = 1.5;

/// A search hit tagged with the scope it was found in.
#[derive(Debug, Clone)]
pub struct ScopedSearchHit {
    pub scope: Scope,
    pub memory: Memory,
    pub score: f64,
    pub expanded_via: Option<Vec<String>>,
}

/// Per-scope counts, the shape `apply_decay` and `delete_all` return.
#[derive(Debug, Clone, Copy, Default, serde::Serialize)]
pub struct DecayCounts {
    pub project: usize,
    pub user: usize,
}

/// Composes a project-scoped and a user-scoped [`MemoryCore`] behind one
/// entry point, routing unscoped `store` calls with [`ScopeClassifier`] and
/// merging unscoped reads across both.
pub struct ScopeRouter {
    project: MemoryCore,
    user: MemoryCore,
    classifier: ScopeClassifier,
    classifier_embedding: Box<dyn EmbeddingBackend>,
}

impl ScopeRouter {
    /// `make_embedding` is called three times: once for each memory core's
    /// own index, once for the scope classifier's exemplar encoding. Each
    /// call must produce an independent backend instance.
    pub fn open(
        project_dir: impl AsRef<Path>,
        user_dir: impl AsRef<Path>,
        make_embedding: impl Fn() -> Box<dyn EmbeddingBackend>,
    ) -> Result<Self> {
        let project = MemoryCore::open(project_dir, make_embedding())?;
        let user = MemoryCore::open(user_dir, make_embedding())?;
        let classifier_embedding = make_embedding();
        let classifier = ScopeClassifier::new(classifier_embedding.as_ref())?;
        Ok(Self {
            project,
            user,
            classifier,
            classifier_embedding,
        })
    }

    fn core_mut(&mut self, scope: Scope) -> &mut MemoryCore {
        match scope {
            Scope::Project => &mut self.project,
            Scope::User => &mut self.user,
        }
    }

    fn core(&self, scope: Scope) -> &MemoryCore {
        match scope {
            Scope::Project => &self.project,
            Scope::User => &self.user,
        }
    }

    /// Resolve an explicit scope, or classify `content` and route to
    /// `user` when the classifier's confidence doesn't clear the threshold.
    fn resolve_scope(&self, content: &str, selector: ScopeSelector) -> Result<Scope> {
        match selector {
            ScopeSelector::Project => Ok(Scope::Project),
            ScopeSelector::User => Ok(Scope::User),
            ScopeSelector::Auto => {
                let classification = self.classifier.classify(content, self.classifier_embedding.as_ref())?;
                if classification.confidence >= CONFIDENCE_THRESHOLD {
                    Ok(classification.winner)
                } else {
                    Ok(Scope::User)
                }
            }
        }
    }

    pub fn store(&mut self, input: StoreInput, selector: ScopeSelector) -> Result<(Scope, StoreResult)> {
        let scope = self.resolve_scope(&input.content, selector)?;
        let result = self.core_mut(scope).store(input)?;
        Ok((scope, result))
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
    ) -> Result<Vec<ScopedSearchHit>> {
        let fetch_limit = ((limit as f64) * FETCH_OVERSAMPLE).ceil() as usize;

        let project_hits = self
            .project
            .search(query, tenant_id, fetch_limit, tags, sector_filter, expand_waypoints)?;
        let user_hits = self
            .user
            .search(query, tenant_id, fetch_limit, tags, sector_filter, expand_waypoints)?;

        let mut combined: Vec<ScopedSearchHit> = Vec::with_capacity(project_hits.len() + user_hits.len());
        combined.extend(project_hits.into_iter().map(|hit| ScopedSearchHit {
            scope: Scope::Project,
            score: hit.score * PROJECT_BOOST,
            memory: hit.memory,
            expanded_via: hit.expanded_via,
        }));
        combined.extend(user_hits.into_iter().map(|hit| ScopedSearchHit {
            scope: Scope::User,
            score: hit.score,
            memory: hit.memory,
            expanded_via: hit.expanded_via,
        }));

        let mut deduped = self.deduplicate(combined)?;
        deduped.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        deduped.truncate(limit);
        Ok(deduped)
    }

    /// Greedy de-duplication in input order: a hit is dropped if its content
    /// is too similar (cosine ≥ 0.9) to a hit already kept. If the shared
    /// embedding backend is unavailable, de-duplication is skipped rather
    /// than failing the whole search.
    fn deduplicate(&self, hits: Vec<ScopedSearchHit>) -> Result<Vec<ScopedSearchHit>> {
        if hits.len() < 2 {
            return Ok(hits);
        }
        let contents: Vec<String> = hits.iter().map(|h| h.memory.content.clone()).collect();
        let vectors = match self.classifier_embedding.encode(&contents) {
            Ok(vectors) => vectors,
            Err(_) => return Ok(hits),
        };

        let mut kept = Vec::with_capacity(hits.len());
        let mut kept_vectors: Vec<Vec<f32>> = Vec::with_capacity(hits.len());
        for (hit, vector) in hits.into_iter().zip(vectors.into_iter()) {
            let is_duplicate = kept_vectors.iter().any(|kv| cosine(kv, &vector) as f64 >= DEDUP_THRESHOLD);
            if !is_duplicate {
                kept_vectors.push(vector);
                kept.push(hit);
            }
        }
        Ok(kept)
    }

    pub fn get(&self, id: &str, tenant_id: &str, scope: Option<Scope>) -> Option<(Scope, Memory)> {
        match scope {
            Some(scope) => self.core(scope).get(id, tenant_id).map(|m| (scope, m)),
            None => self
                .project
                .get(id, tenant_id)
                .map(|m| (Scope::Project, m))
                .or_else(|| self.user.get(id, tenant_id).map(|m| (Scope::User, m))),
        }
    }

    pub fn delete(&mut self, id: &str, tenant_id: &str, scope: Option<Scope>) -> Result<bool> {
        match scope {
            Some(scope) => self.core_mut(scope).delete(id, tenant_id),
            None => {
                if self.project.delete(id, tenant_id)? {
                    return Ok(true);
                }
                self.user.delete(id, tenant_id)
            }
        }
    }

    pub fn delete_all(&mut self, tenant_id: &str) -> Result<DecayCounts> {
        Ok(DecayCounts {
            project: self.project.delete_all(tenant_id)?,
            user: self.user.delete_all(tenant_id)?,
        })
    }

    pub fn list(
        &self,
        tenant_id: &str,
        tags: &[String],
        sector_filter: Option<Sector>,
        limit: usize,
        offset: usize,
        scope: Option<Scope>,
    ) -> Vec<(Scope, Memory)> {
        match scope {
            Some(scope) => self
                .core(scope)
                .list(tenant_id, tags, sector_filter, limit, offset)
                .into_iter()
                .map(|m| (scope, m))
                .collect(),
            None => {
                let mut merged: Vec<(Scope, Memory)> = self
                    .project
                    .list(tenant_id, tags, sector_filter, usize::MAX, 0)
                    .into_iter()
                    .map(|m| (Scope::Project, m))
                    .chain(
                        self.user
                            .list(tenant_id, tags, sector_filter, usize::MAX, 0)
                            .into_iter()
                            .map(|m| (Scope::User, m)),
                    )
                    .collect();
                let now_ms = chrono::Utc::now().timestamp_millis() as f64;
                merged.sort_by(|a, b| {
                    let key = |m: &Memory| m.salience * (1.0 - (now_ms - m.last_seen_at as f64) / (86_400_000.0 * 30.0));
                    key(&b.1).partial_cmp(&key(&a.1)).unwrap_or(std::cmp::Ordering::Equal)
                });
                merged.into_iter().skip(offset).take(limit).collect()
            }
        }
    }

    /// `store_fact` defaults to the project scope when unspecified — facts
    /// are typically project knowledge, unlike free-text memories.
    #[allow(clippy::too_many_arguments)]
    pub fn store_fact(
        &mut self,
        subject: &str,
        predicate: &str,
        object: &str,
        valid_from: Option<&str>,
        confidence: f64,
        metadata: Option<serde_json::Value>,
        scope: Scope,
    ) -> Result<String> {
        self.core_mut(scope)
            .store_fact(subject, predicate, object, valid_from, confidence, metadata)
    }

    pub fn query_facts(
        &self,
        subject: Option<&str>,
        predicate: Option<&str>,
        object: Option<&str>,
        at: Option<&str>,
        scope: Option<Scope>,
    ) -> Result<Vec<Fact>> {
        match scope {
            Some(scope) => self.core(scope).query_facts(subject, predicate, object, at),
            None => {
                let mut facts = self.project.query_facts(subject, predicate, object, at)?;
                facts.extend(self.user.query_facts(subject, predicate, object, at)?);
                Ok(facts)
            }
        }
    }

    pub fn get_timeline(&self, subject: &str, predicate: Option<&str>, scope: Option<Scope>) -> Vec<Fact> {
        match scope {
            Some(scope) => self.core(scope).get_timeline(subject, predicate),
            None => {
                let mut timeline = self.project.get_timeline(subject, predicate);
                timeline.extend(self.user.get_timeline(subject, predicate));
                timeline.sort_by_key(|f| f.valid_from);
                timeline
            }
        }
    }

    pub fn reinforce(&mut self, id: &str, boost: f64, scope: Option<Scope>) -> Result<Option<f64>> {
        match scope {
            Some(scope) => self.core_mut(scope).reinforce(id, boost),
            None => match self.project.reinforce(id, boost)? {
                Some(salience) => Ok(Some(salience)),
                None => self.user.reinforce(id, boost),
            },
        }
    }

    pub fn apply_decay(&mut self) -> Result<DecayCounts> {
        Ok(DecayCounts {
            project: self.project.apply_decay()?,
            user: self.user.apply_decay()?,
        })
    }

    pub fn stats(&self) -> HashMap<String, MemoryStats> {
        let mut stats = HashMap::new();
        stats.insert("project".to_string(), self.project.stats());
        stats.insert("user".to_string(), self.user.stats());
        stats
    }
}

fn cosine(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}
