//! MCP tools.
//!
//! Each file implements one operation from the operation surface: argument
//! parsing, a JSON schema for `tools/list`, and an `execute` that runs
//! against a shared [`ScopeRouter`]. [`dispatch`] is the single router from
//! tool name to `execute`; [`descriptions`] is what `tools/list` returns.

mod apply_decay;
mod common;
mod delete;
mod delete_all;
mod get;
mod get_timeline;
mod list;
mod query;
mod query_facts;
mod reinforce;
mod stats;
mod store;
mod store_fact;

use serde_json::Value;

use engram_core::ScopeRouter;

use crate::protocol::types::ToolDescription;

fn tool(name: &str, description: &str, schema: Value) -> ToolDescription {
    ToolDescription {
        name: name.to_string(),
        description: description.to_string(),
        input_schema: schema,
    }
}

pub fn descriptions() -> Vec<ToolDescription> {
    vec![
        tool(
            "store",
            "Classify and persist a new memory, routing it to the project or user scope.",
            store::schema(),
        ),
        tool(
            "query",
            "Search stored memories by semantic similarity, with sector penalty, salience weighting, and waypoint expansion.",
            query::schema(),
        ),
        tool("get", "Fetch a single memory by id.", get::schema()),
        tool("delete", "Delete a single memory by id, cascading to its waypoints.", delete::schema()),
        tool("list", "List memories, most salient and recently seen first.", list::schema()),
        tool("delete_all", "Delete every memory for a tenant, across both scopes.", delete_all::schema()),
        tool(
            "store_fact",
            "Record a (subject, predicate, object) fact, closing any earlier-starting open fact for the same pair.",
            store_fact::schema(),
        ),
        tool("query_facts", "Query facts valid at a point in time.", query_facts::schema()),
        tool("get_timeline", "Fetch every fact for a subject, ordered by validity start.", get_timeline::schema()),
        tool("reinforce", "Apply a diminishing-returns salience boost to a memory.", reinforce::schema()),
        tool(
            "apply_decay",
            "Run salience decay, temporal confidence decay, and waypoint pruning across both scopes.",
            apply_decay::schema(),
        ),
        tool("stats", "Aggregate counts for both scope cores.", stats::schema()),
    ]
}

pub fn dispatch(name: &str, args: Option<Value>, router: &mut ScopeRouter) -> Result<Value, String> {
    match name {
        "store" => store::execute(router, args),
        "query" => query::execute(router, args),
        "get" => get::execute(router, args),
        "delete" => delete::execute(router, args),
        "list" => list::execute(router, args),
        "delete_all" => delete_all::execute(router, args),
        "store_fact" => store_fact::execute(router, args),
        "query_facts" => query_facts::execute(router, args),
        "get_timeline" => get_timeline::execute(router, args),
        "reinforce" => reinforce::execute(router, args),
        "apply_decay" => apply_decay::execute(router, args),
        "stats" => stats::execute(router, args),
        other => Err(format!("unknown tool: {other}")),
    }
}
