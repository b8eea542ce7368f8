//! `stats` — aggregate counts for both scope cores.

use serde_json::Value;

use engram_core::ScopeRouter;

pub fn schema() -> Value {
    serde_json::json!({ "type": "object", "properties": {} })
}

pub fn execute(router: &mut ScopeRouter, _args: Option<Value>) -> Result<Value, String> {
    serde_json::to_value(router.stats()).map_err(|e| e.to_string())
}
