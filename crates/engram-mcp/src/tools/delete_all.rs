//! `delete_all` — remove every memory for a tenant, across both scopes.

use serde::Deserialize;
use serde_json::Value;

use engram_core::ScopeRouter;

use super::common::default_tenant;

pub fn schema() -> Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "tenantId": {"type": "string", "default": "default"}
        }
    })
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct DeleteAllArgs {
    #[serde(default = "default_tenant")]
    tenant_id: String,
}

pub fn execute(router: &mut ScopeRouter, args: Option<Value>) -> Result<Value, String> {
    let args: DeleteAllArgs = match args {
        Some(v) => serde_json::from_value(v).map_err(|e| format!("invalid arguments: {e}"))?,
        None => DeleteAllArgs::default(),
    };

    let counts = router.delete_all(&args.tenant_id).map_err(|e| e.to_string())?;
    Ok(serde_json::json!({
        "count": counts.project + counts.user,
        "project": counts.project,
        "user": counts.user,
    }))
}
