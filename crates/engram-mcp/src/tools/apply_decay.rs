//! `apply_decay` — run decay, confidence decay, and waypoint pruning.

use serde_json::Value;

use engram_core::ScopeRouter;

pub fn schema() -> Value {
    serde_json::json!({ "type": "object", "properties": {} })
}

pub fn execute(router: &mut ScopeRouter, _args: Option<Value>) -> Result<Value, String> {
    let counts = router.apply_decay().map_err(|e| e.to_string())?;
    Ok(serde_json::json!({
        "count": counts.project + counts.user,
        "project": counts.project,
        "user": counts.user,
    }))
}
