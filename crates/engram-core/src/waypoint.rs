//! Waypoint association graph.
//!
//! A directed, weighted graph over memory IDs. Edges represent learned
//! associations between memories and are strengthened by co-retrieval;
//! [`WaypointGraph::expand`] performs breadth-first search expansion used to
//! surface memories related to a query's direct hits but not directly
//! matched by the embedding backend.

use std::collections::{HashMap, HashSet, VecDeque};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::WaypointError;

pub const SIMILARITY_THRESHOLD: f64 = 0.75;
pub const INITIAL_WEIGHT: f64 = 0.5;
pub const REINFORCE_BOOST: f64 = 0.05;
pub const MAX_WEIGHT: f64 = 1.0;
pub const MIN_WEIGHT: f64 = 0.05;

const HOP_ATTENUATION: f64 = 0.8;

/// A single directed edge's persisted state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    pub weight: f64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// A neighbour of a memory, as returned by [`WaypointGraph::neighbours`].
#[derive(Debug, Clone, PartialEq)]
pub struct Neighbour {
    pub id: String,
    pub weight: f64,
}

/// A node reached during [`WaypointGraph::expand`], with the accumulated
/// weight along the path that reached it.
#[derive(Debug, Clone, PartialEq)]
pub struct Expanded {
    pub id: String,
    pub weight: f64,
    pub path: Vec<String>,
}

/// Statistics about the current shape of the graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaypointStats {
    pub total_nodes: usize,
    pub total_edges: usize,
    pub average_weight: f64,
}

/// `edges[src][dst] -> Edge`. Persisted as `waypoints.json`.
#[derive(Debug, Default)]
pub struct WaypointGraph {
    edges: HashMap<String, HashMap<String, Edge>>,
    path: Option<PathBuf>,
}

impl WaypointGraph {
    /// Create an in-memory graph with no backing file.
    pub fn new() -> Self {
        Self {
            edges: HashMap::new(),
            path: None,
        }
    }

    /// Load a graph from `path`, or start empty if the file is absent/empty.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, WaypointError> {
        let path = path.as_ref().to_path_buf();
        let edges = if path.exists() && std::fs::metadata(&path)?.len() > 0 {
            let raw = std::fs::read_to_string(&path)?;
            serde_json::from_str(&raw)?
        } else {
            HashMap::new()
        };
        Ok(Self {
            edges,
            path: Some(path),
        })
    }

    fn save(&self) -> Result<(), WaypointError> {
        let Some(path) = &self.path else { return Ok(()) };
        let json = serde_json::to_string_pretty(&self.edges)?;
        crate::storage::write_file_hardened(path, &json)?;
        Ok(())
    }

    /// Create a waypoint between two memories. Rejects self-edges. Writes a
    /// reverse edge too unless `bidirectional` is false. Overwrites any
    /// existing edge between the same pair.
    pub fn create(
        &mut self,
        src: &str,
        dst: &str,
        weight: Option<f64>,
        bidirectional: bool,
        now_ms: i64,
    ) -> Result<(), WaypointError> {
        if src == dst {
            return Ok(());
        }
        let weight = weight.unwrap_or(INITIAL_WEIGHT);
        let edge = Edge {
            weight,
            created_at: now_ms,
            updated_at: now_ms,
        };
        self.edges
            .entry(src.to_string())
            .or_default()
            .insert(dst.to_string(), edge.clone());
        if bidirectional {
            self.edges
                .entry(dst.to_string())
                .or_default()
                .insert(src.to_string(), edge);
        }
        self.save()
    }

    /// Neighbours of `id`, sorted by weight descending.
    pub fn neighbours(&self, id: &str) -> Vec<Neighbour> {
        let Some(dsts) = self.edges.get(id) else {
            return Vec::new();
        };
        let mut out: Vec<Neighbour> = dsts
            .iter()
            .map(|(dst, edge)| Neighbour {
                id: dst.clone(),
                weight: edge.weight,
            })
            .collect();
        out.sort_by(|a, b| b.weight.partial_cmp(&a.weight).unwrap_or(std::cmp::Ordering::Equal));
        out
    }

    /// Breadth-first expansion from `seeds`. Weight decays by `0.8` per hop
    /// (`parent_weight * edge_weight * 0.8`); a child is dropped if its
    /// weight falls below `min_weight` or it has already been visited
    /// (including being one of the seeds). Stops once `max_expansion`
    /// children have been emitted. Output is sorted by weight descending.
    pub fn expand(&self, seeds: &[String], max_expansion: usize, min_weight: f64) -> Vec<Expanded> {
        let mut visited: HashSet<String> = seeds.iter().cloned().collect();
        let mut queue: VecDeque<Expanded> = seeds
            .iter()
            .map(|id| Expanded {
                id: id.clone(),
                weight: 1.0,
                path: vec![id.clone()],
            })
            .collect();

        let mut expanded = Vec::new();
        let mut count = 0usize;

        'outer: while let Some(current) = queue.pop_front() {
            if count >= max_expansion {
                break;
            }
            for neighbour in self.neighbours(&current.id) {
                if visited.contains(&neighbour.id) {
                    continue;
                }
                let new_weight = current.weight * neighbour.weight * HOP_ATTENUATION;
                if new_weight < min_weight {
                    continue;
                }
                let mut path = current.path.clone();
                path.push(neighbour.id.clone());
                let item = Expanded {
                    id: neighbour.id.clone(),
                    weight: new_weight,
                    path,
                };
                visited.insert(neighbour.id.clone());
                expanded.push(item.clone());
                queue.push_back(item);
                count += 1;
                if count >= max_expansion {
                    break 'outer;
                }
            }
        }

        expanded.sort_by(|a, b| b.weight.partial_cmp(&a.weight).unwrap_or(std::cmp::Ordering::Equal));
        expanded
    }

    /// Strengthen every consecutive edge along `path` by `REINFORCE_BOOST`,
    /// capped at `MAX_WEIGHT`. No-op for edges that don't exist.
    pub fn reinforce(&mut self, path: &[String], now_ms: i64) -> Result<(), WaypointError> {
        if path.len() < 2 {
            return Ok(());
        }
        let mut changed = false;
        for pair in path.windows(2) {
            let (src, dst) = (&pair[0], &pair[1]);
            if let Some(edge) = self.edges.get_mut(src).and_then(|m| m.get_mut(dst)) {
                edge.weight = (edge.weight + REINFORCE_BOOST).min(MAX_WEIGHT);
                edge.updated_at = now_ms;
                changed = true;
            }
        }
        if changed {
            self.save()?;
        }
        Ok(())
    }

    /// Remove every edge incident to `id`, incoming and outgoing.
    pub fn remove_memory(&mut self, id: &str) -> Result<(), WaypointError> {
        self.edges.remove(id);
        for dsts in self.edges.values_mut() {
            dsts.remove(id);
        }
        self.save()
    }

    /// Remove edges below `min_weight`, then drop source entries left
    /// empty. Returns the number of edges pruned.
    pub fn prune_weak_edges(&mut self, min_weight: f64) -> Result<usize, WaypointError> {
        let mut pruned = 0usize;
        for dsts in self.edges.values_mut() {
            let before = dsts.len();
            dsts.retain(|_, edge| edge.weight >= min_weight);
            pruned += before - dsts.len();
        }
        self.edges.retain(|_, dsts| !dsts.is_empty());
        if pruned > 0 {
            self.save()?;
        }
        Ok(pruned)
    }

    pub fn stats(&self) -> WaypointStats {
        let mut nodes: HashSet<&str> = HashSet::new();
        let mut weights = Vec::new();
        for (src, dsts) in &self.edges {
            nodes.insert(src.as_str());
            for (dst, edge) in dsts {
                nodes.insert(dst.as_str());
                weights.push(edge.weight);
            }
        }
        let total_edges = weights.len();
        let average_weight = if weights.is_empty() {
            0.0
        } else {
            weights.iter().sum::<f64>() / weights.len() as f64
        };
        WaypointStats {
            total_nodes: nodes.len(),
            total_edges,
            average_weight,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn self_edges_are_rejected() {
        let mut g = WaypointGraph::new();
        g.create("a", "a", None, true, 0).unwrap();
        assert!(g.neighbours("a").is_empty());
    }

    #[test]
    fn bidirectional_create_writes_both_directions() {
        let mut g = WaypointGraph::new();
        g.create("a", "b", Some(0.6), true, 0).unwrap();
        assert_eq!(g.neighbours("a"), vec![Neighbour { id: "b".into(), weight: 0.6 }]);
        assert_eq!(g.neighbours("b"), vec![Neighbour { id: "a".into(), weight: 0.6 }]);
    }

    #[test]
    fn expansion_weights_match_concrete_scenario() {
        let mut g = WaypointGraph::new();
        g.create("m1", "m2", Some(0.8), false, 0).unwrap();
        g.create("m2", "m3", Some(0.8), false, 0).unwrap();

        let out = g.expand(&["m1".to_string()], 10, 0.1);
        assert_eq!(out.len(), 2);

        let m2 = out.iter().find(|e| e.id == "m2").unwrap();
        assert!((m2.weight - 0.64).abs() < 0.01);
        assert_eq!(m2.path, vec!["m1", "m2"]);

        let m3 = out.iter().find(|e| e.id == "m3").unwrap();
        assert!((m3.weight - 0.4096).abs() < 0.01);
        assert_eq!(m3.path, vec!["m1", "m2", "m3"]);
    }

    #[test]
    fn expand_never_emits_seeds_or_duplicates() {
        let mut g = WaypointGraph::new();
        g.create("a", "b", Some(0.9), true, 0).unwrap();
        g.create("b", "c", Some(0.9), true, 0).unwrap();
        g.create("c", "a", Some(0.9), true, 0).unwrap();

        let out = g.expand(&["a".to_string()], 10, 0.01);
        let ids: Vec<&str> = out.iter().map(|e| e.id.as_str()).collect();
        assert!(!ids.contains(&"a"));
        let mut unique = ids.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), ids.len());
    }

    #[test]
    fn cascade_delete_removes_incident_edges() {
        let mut g = WaypointGraph::new();
        g.create("m1", "m2", None, true, 0).unwrap();
        g.create("m1", "m3", None, true, 0).unwrap();
        g.remove_memory("m1").unwrap();
        assert!(g.neighbours("m1").is_empty());
        assert!(g.neighbours("m2").iter().all(|n| n.id != "m1"));
        assert!(g.neighbours("m3").iter().all(|n| n.id != "m1"));
    }

    #[test]
    fn prune_weak_edges_drops_below_threshold_and_empty_sources() {
        let mut g = WaypointGraph::new();
        g.create("a", "b", Some(0.02), false, 0).unwrap();
        let pruned = g.prune_weak_edges(MIN_WEIGHT).unwrap();
        assert_eq!(pruned, 1);
        assert!(g.neighbours("a").is_empty());
    }

    #[test]
    fn reinforce_caps_at_max_weight() {
        let mut g = WaypointGraph::new();
        g.create("a", "b", Some(0.98), false, 0).unwrap();
        g.reinforce(&["a".to_string(), "b".to_string()], 1).unwrap();
        let n = g.neighbours("a");
        assert_eq!(n[0].weight, MAX_WEIGHT);
    }

    #[test]
    fn reinforce_is_noop_for_missing_edge() {
        let mut g = WaypointGraph::new();
        g.reinforce(&["a".to_string(), "b".to_string()], 1).unwrap();
        assert!(g.neighbours("a").is_empty());
    }
}
