//! `query` — search memories by semantic similarity across both scopes.

use serde::Deserialize;
use serde_json::Value;

use engram_core::ScopeRouter;

use super::common::{default_tenant, parse_sector};

const DEFAULT_LIMIT: usize = 10;
const MAX_LIMIT: usize = 50;

pub fn schema() -> Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "query": {"type": "string", "description": "Natural-language search text"},
            "limit": {"type": "integer", "default": DEFAULT_LIMIT, "minimum": 1, "maximum": MAX_LIMIT},
            "tags": {"type": "array", "items": {"type": "string"}, "default": []},
            "sector": {
                "type": "string",
                "enum": ["episodic", "semantic", "procedural", "emotional", "reflective"]
            },
            "expandWaypoints": {"type": "boolean", "default": true},
            "tenantId": {"type": "string", "default": "default"}
        },
        "required": ["query"]
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QueryArgs {
    query: String,
    #[serde(default = "default_limit")]
    limit: usize,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    sector: Option<String>,
    #[serde(default = "default_expand")]
    expand_waypoints: bool,
    #[serde(default = "default_tenant")]
    tenant_id: String,
}

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

fn default_expand() -> bool {
    true
}

pub fn execute(router: &mut ScopeRouter, args: Option<Value>) -> Result<Value, String> {
    let args: QueryArgs = match args {
        Some(v) => serde_json::from_value(v).map_err(|e| format!("invalid arguments: {e}"))?,
        None => return Err("missing arguments".to_string()),
    };

    if !(1..=MAX_LIMIT).contains(&args.limit) {
        return Err(format!("limit must be in [1, {MAX_LIMIT}]"));
    }
    let sector_filter = parse_sector(args.sector.as_deref())?;

    let hits = router
        .search(&args.query, &args.tenant_id, args.limit, &args.tags, sector_filter, args.expand_waypoints)
        .map_err(|e| e.to_string())?;

    let results: Vec<Value> = hits
        .into_iter()
        .map(|hit| {
            let mut memory = serde_json::to_value(&hit.memory).unwrap_or_default();
            if let Value::Object(map) = &mut memory {
                map.insert("score".to_string(), serde_json::json!(hit.score));
                map.insert("scope".to_string(), serde_json::json!(hit.scope.to_string()));
                if let Some(path) = hit.expanded_via {
                    map.insert("expandedVia".to_string(), serde_json::json!(path));
                }
            }
            memory
        })
        .collect();

    Ok(serde_json::json!({ "results": results }))
}
