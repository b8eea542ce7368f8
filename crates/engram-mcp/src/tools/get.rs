//! `get` — fetch a single memory by id.

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
struct GetArgs {
    id: String,
    #[serde(default)]
    scope: Option<String>,
    #[serde(default = "default_tenant")]
    tenant_id: String,
}

pub fn execute(router: &mut ScopeRouter, args: Option<Value>) -> Result<Value, String> {
    let args: GetArgs = match args {
        Some(v) => serde_json::from_value(v).map_err(|e| format!("invalid arguments: {e}"))?,
        None => return Err("missing arguments".to_string()),
    };
    let scope = parse_scope(args.scope.as_deref())?;

    match router.get(&args.id, &args.tenant_id, scope) {
        Some((scope, memory)) => {
            let mut value = serde_json::to_value(&memory).unwrap_or_default();
            if let Value::Object(map) = &mut value {
                map.insert("scope".to_string(), serde_json::json!(scope.to_string()));
            }
            Ok(value)
        }
        None => Ok(Value::Null),
    }
}
