//! End-to-end coverage of the MCP tool dispatch layer: every call goes
//! through `engram_mcp::tools::dispatch` exactly as the stdio server would
//! invoke it, never through `engram_core` directly.

use engram_mcp::tools::dispatch;

use engram_e2e_tests::harness::TestHarness;

#[test]
fn store_then_get_round_trips_through_dispatch() {
    let mut h = TestHarness::new();

    let stored = dispatch(
        "store",
        Some(serde_json::json!({"content": "Yesterday I debugged the flaky upload test", "scope": "user"})),
        &mut h.router,
    )
    .unwrap();
    let id = stored["id"].as_str().unwrap().to_string();
    assert_eq!(stored["primarySector"], "episodic");

    let fetched = dispatch("get", Some(serde_json::json!({"id": id})), &mut h.router).unwrap();
    assert_eq!(fetched["id"], id);
}

#[test]
fn query_surfaces_a_stored_memory_by_content() {
    let mut h = TestHarness::new();

    dispatch(
        "store",
        Some(serde_json::json!({"content": "the deployment pipeline runs on every merge to main", "scope": "project"})),
        &mut h.router,
    )
    .unwrap();

    let results = dispatch("query", Some(serde_json::json!({"query": "deployment pipeline"})), &mut h.router).unwrap();
    assert!(!results["results"].as_array().unwrap().is_empty());
}

#[test]
fn delete_then_get_returns_not_found() {
    let mut h = TestHarness::new();

    let stored = dispatch("store", Some(serde_json::json!({"content": "a throwaway note", "scope": "user"})), &mut h.router).unwrap();
    let id = stored["id"].as_str().unwrap().to_string();

    let deleted = dispatch("delete", Some(serde_json::json!({"id": id})), &mut h.router).unwrap();
    assert_eq!(deleted, true);

    let fetched = dispatch("get", Some(serde_json::json!({"id": id})), &mut h.router).unwrap();
    assert!(fetched.is_null());
}

#[test]
fn unknown_tool_name_is_rejected() {
    let mut h = TestHarness::new();
    assert!(dispatch("not_a_real_tool", None, &mut h.router).is_err());
}

#[test]
fn store_fact_then_query_facts_round_trips() {
    let mut h = TestHarness::new();

    dispatch(
        "store_fact",
        Some(serde_json::json!({"subject": "Alice", "predicate": "works_at", "object": "Google"})),
        &mut h.router,
    )
    .unwrap();

    let facts = dispatch(
        "query_facts",
        Some(serde_json::json!({"subject": "Alice", "predicate": "works_at"})),
        &mut h.router,
    )
    .unwrap();
    let facts = facts["facts"].as_array().unwrap();
    assert_eq!(facts.len(), 1);
    assert_eq!(facts[0]["object"], "Google");
}

#[test]
fn reinforce_rejects_an_out_of_range_boost() {
    let mut h = TestHarness::new();
    let stored = dispatch("store", Some(serde_json::json!({"content": "remember this", "scope": "user"})), &mut h.router).unwrap();
    let id = stored["id"].as_str().unwrap().to_string();

    let result = dispatch("reinforce", Some(serde_json::json!({"id": id, "boost": 5.0})), &mut h.router);
    assert!(result.is_err());
}

#[test]
fn stats_and_apply_decay_report_both_scopes() {
    let mut h = TestHarness::new();
    dispatch("store", Some(serde_json::json!({"content": "a", "scope": "project"})), &mut h.router).unwrap();
    dispatch("store", Some(serde_json::json!({"content": "b", "scope": "user"})), &mut h.router).unwrap();

    let stats = dispatch("stats", None, &mut h.router).unwrap();
    assert!(stats.get("project").is_some());
    assert!(stats.get("user").is_some());

    let decayed = dispatch("apply_decay", None, &mut h.router).unwrap();
    assert!(decayed.get("project").is_some());
    assert!(decayed.get("user").is_some());
}

#[test]
fn list_merges_both_scopes_by_default() {
    let mut h = TestHarness::new();
    dispatch("store", Some(serde_json::json!({"content": "project thing", "scope": "project"})), &mut h.router).unwrap();
    dispatch("store", Some(serde_json::json!({"content": "user thing", "scope": "user"})), &mut h.router).unwrap();

    let listed = dispatch("list", Some(serde_json::json!({"limit": 10})), &mut h.router).unwrap();
    assert_eq!(listed["results"].as_array().unwrap().len(), 2);
}
