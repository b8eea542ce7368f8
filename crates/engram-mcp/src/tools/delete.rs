//! `delete` — remove a single memory by id, cascading to its waypoints.

use serde::Deserialize;
use serde_json::Value;

use engram_core::ScopeRouter;

use super::common::{default_tenant, parse_scope};

pub fn schema() -> Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "id": {"type": "string"},
            "scope": {"type": "string", "enum": ["project", "user"]},
            "tenantId": {"type": "string", "default": "default"}
        },
        "required": ["id"]
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeleteArgs {
    id: String,
    #[serde(default)]
    scope: Option<String>,
    #[serde(default = "default_tenant")]
    tenant_id: String,
}

pub fn execute(router: &mut ScopeRouter, args: Option<Value>) -> Result<Value, String> {
    let args: DeleteArgs = match args {
        Some(v) => serde_json::from_value(v).map_err(|e| format!("invalid arguments: {e}"))?,
        None => return Err("missing arguments".to_string()),
    };
    let scope = parse_scope(args.scope.as_deref())?;

    let deleted = router.delete(&args.id, &args.tenant_id, scope).map_err(|e| e.to_string())?;
    Ok(serde_json::json!(deleted))
}
