//! `list` — page through memories, most salient and recently seen first.

use serde::Deserialize;
use serde_json::Value;

use engram_core::ScopeRouter;

use super::common::{default_tenant, parse_scope, parse_sector};

const DEFAULT_LIMIT: usize = 20;

pub fn schema() -> Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "tags": {"type": "array", "items": {"type": "string"}, "default": []},
            "sector": {
                "type": "string",
                "enum": ["episodic", "semantic", "procedural", "emotional", "reflective"]
            },
            "scope": {"type": "string", "enum": ["project", "user"]},
            "limit": {"type": "integer", "default": DEFAULT_LIMIT},
            "offset": {"type": "integer", "default": 0},
            "tenantId": {"type": "string", "default": "default"}
        }
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListArgs {
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    sector: Option<String>,
    #[serde(default)]
    scope: Option<String>,
    #[serde(default = "default_limit")]
    limit: usize,
    #[serde(default)]
    offset: usize,
    #[serde(default = "default_tenant")]
    tenant_id: String,
}

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

pub fn execute(router: &mut ScopeRouter, args: Option<Value>) -> Result<Value, String> {
    let args: ListArgs = match args {
        Some(v) => serde_json::from_value(v).map_err(|e| format!("invalid arguments: {e}"))?,
        None => serde_json::from_value(serde_json::json!({})).unwrap(),
    };
    let sector_filter = parse_sector(args.sector.as_deref())?;
    let scope = parse_scope(args.scope.as_deref())?;

    let listed = router.list(&args.tenant_id, &args.tags, sector_filter, args.limit, args.offset, scope);

    let results: Vec<Value> = listed
        .into_iter()
        .map(|(scope, memory)| {
            let mut value = serde_json::to_value(&memory).unwrap_or_default();
            if let Value::Object(map) = &mut value {
                map.insert("scope".to_string(), serde_json::json!(scope.to_string()));
            }
            value
        })
        .collect();

    Ok(serde_json::json!({ "results": results }))
}
