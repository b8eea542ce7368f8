//! End-to-end coverage of the concrete scenarios a full store/search/decay
//! round trip must satisfy, driven through the public scope router and
//! memory core rather than any single component in isolation.

use engram_core::embedding::LocalHashEmbedding;
use engram_core::memory::MemoryCore;
use engram_core::{Scope, ScopeSelector, Sector};

use engram_e2e_tests::harness::{store_input, TestHarness};

#[test]
fn temporal_evolution_returns_the_fact_valid_at_each_point_in_time() {
    let mut h = TestHarness::new();

    let t_2020 = "2020-01-01T00:00:00Z";
    let t_2024 = "2024-01-01T00:00:00Z";
    let t_query = "2022-06-01T00:00:00Z";

    h.router
        .store_fact("Alice", "works_at", "Google", Some(t_2020), 1.0, None, Scope::Project)
        .unwrap();
    h.router
        .store_fact("Alice", "works_at", "Meta", Some(t_2024), 1.0, None, Scope::Project)
        .unwrap();

    let at_2022 = h
        .router
        .query_facts(Some("Alice"), Some("works_at"), None, Some(t_query), Some(Scope::Project))
        .unwrap();
    assert_eq!(at_2022.len(), 1);
    assert_eq!(at_2022[0].object, "Google");

    let at_now = h
        .router
        .query_facts(Some("Alice"), Some("works_at"), None, None, Some(Scope::Project))
        .unwrap();
    assert_eq!(at_now.len(), 1);
    assert_eq!(at_now[0].object, "Meta");
}

#[test]
fn storing_similar_memories_creates_waypoints_and_expansion_surfaces_them() {
    let dir = tempfile::tempdir().unwrap();
    let mut core = MemoryCore::open(dir.path(), Box::new(LocalHashEmbedding::new())).unwrap();

    core.store(store_input("the quick brown fox jumps over the lazy dog")).unwrap();
    core.store(store_input("the quick brown fox leaps over the lazy hound")).unwrap();
    core.store(store_input("a quick brown fox ran past the lazy dog again")).unwrap();

    let stats = core.stats();
    assert!(stats.waypoints.total_edges > 0, "near-duplicate stores should link waypoints");

    let hits = core
        .search("quick brown fox", "default", 10, &[], None, true)
        .unwrap();
    assert!(!hits.is_empty());
}

#[test]
fn sector_bias_matches_every_concrete_example() {
    let mut h = TestHarness::new();

    let cases = [
        ("Yesterday I went to the store", Sector::Episodic),
        ("Python is a programming language", Sector::Semantic),
        ("How to install Python: first download the installer", Sector::Procedural),
        ("I feel so happy today!", Sector::Emotional),
        ("I realized that the pattern connects everything", Sector::Reflective),
    ];

    for (content, expected) in cases {
        let (_, result) = h.router.store(store_input(content), ScopeSelector::User).unwrap();
        assert_eq!(result.primary_sector, expected, "misclassified: {content}");
    }
}

#[test]
fn scope_routing_sends_codebase_talk_to_project_and_preferences_to_user() {
    let mut h = TestHarness::new();

    let (project_scope, _) = h
        .router
        .store(store_input("This codebase uses FastAPI for REST APIs"), ScopeSelector::Auto)
        .unwrap();
    assert_eq!(project_scope, Scope::Project);

    let (user_scope, _) = h
        .router
        .store(store_input("I prefer pytest over unittest"), ScopeSelector::Auto)
        .unwrap();
    assert_eq!(user_scope, Scope::User);
}

#[test]
fn reinforcement_has_diminishing_returns_and_never_reaches_one() {
    use std::collections::HashMap;

    let dir = tempfile::tempdir().unwrap();
    let mut core = MemoryCore::open(dir.path(), Box::new(LocalHashEmbedding::new())).unwrap();
    let result = core.store(store_input("a memory worth reinforcing")).unwrap();

    // A freshly stored memory starts at full salience, so reinforcing it is
    // a no-op; drop it to 0.5 on disk the way decay would over time, then
    // reopen so the core picks the lowered value back up.
    let meta_path = dir.path().join("memory_meta.json");
    let raw = std::fs::read_to_string(&meta_path).unwrap();
    let mut memories: HashMap<String, engram_core::Memory> = serde_json::from_str(&raw).unwrap();
    memories.get_mut(&result.id).unwrap().salience = 0.5;
    std::fs::write(&meta_path, serde_json::to_string(&memories).unwrap()).unwrap();

    let mut core = MemoryCore::open(dir.path(), Box::new(LocalHashEmbedding::new())).unwrap();

    let mut salience = 0.5_f64;
    let mut last_delta = f64::MAX;
    for _ in 0..10 {
        let next = core.reinforce(&result.id, 0.15).unwrap().unwrap();
        let delta = next - salience;
        assert!(delta > 0.0, "reinforcement must strictly increase salience below the ceiling");
        assert!(delta <= last_delta + 1e-9, "each successive boost must be no larger than the last");
        last_delta = delta;
        salience = next;
    }
    assert!((salience - 0.912).abs() < 0.001);
    assert!(salience < 1.0);
}

#[test]
fn deleting_a_memory_drops_every_incident_waypoint() {
    let dir = tempfile::tempdir().unwrap();
    let mut core = MemoryCore::open(dir.path(), Box::new(LocalHashEmbedding::new())).unwrap();

    let m1 = core.store(store_input("shared context about the deployment pipeline")).unwrap();
    core.store(store_input("more shared context about the deployment pipeline")).unwrap();
    core.store(store_input("additional shared context about the deployment pipeline")).unwrap();

    let edges_before = core.stats().waypoints.total_edges;
    assert!(edges_before > 0);

    assert!(core.delete(&m1.id, "default").unwrap());
    let edges_after = core.stats().waypoints.total_edges;
    assert!(edges_after < edges_before);
}
