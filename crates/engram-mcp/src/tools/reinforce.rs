//! `reinforce` — apply a diminishing-returns salience boost to a memory.

use serde::Deserialize;
use serde_json::Value;

use engram_core::ScopeRouter;

use super::common::parse_scope;

const DEFAULT_BOOST: f64 = 0.15;

pub fn schema() -> Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "id": {"type": "string"},
            "boost": {"type": "number", "default": DEFAULT_BOOST, "minimum": 0.01, "maximum": 0.5},
            "scope": {"type": "string", "enum": ["project", "user"]}
        },
        "required": ["id"]
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReinforceArgs {
    id: String,
    #[serde(default = "default_boost")]
    boost: f64,
    #[serde(default)]
    scope: Option<String>,
}

fn default_boost() -> f64 {
    DEFAULT_BOOST
}

pub fn execute(router: &mut ScopeRouter, args: Option<Value>) -> Result<Value, String> {
    let args: ReinforceArgs = match args {
        Some(v) => serde_json::from_value(v).map_err(|e| format!("invalid arguments: {e}"))?,
        None => return Err("missing arguments".to_string()),
    };
    let scope = parse_scope(args.scope.as_deref())?;

    match router.reinforce(&args.id, args.boost, scope).map_err(|e| e.to_string())? {
        Some(salience) => Ok(serde_json::json!({ "newSalience": salience })),
        None => Ok(Value::Null),
    }
}
