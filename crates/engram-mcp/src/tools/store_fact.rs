//! `store_fact` — record a temporal `(subject, predicate, object)` fact.

use std::str::FromStr;

use serde::Deserialize;
use serde_json::Value;

use engram_core::{Scope, ScopeRouter};

pub fn schema() -> Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "subject": {"type": "string"},
            "predicate": {"type": "string"},
            "object": {"type": "string"},
            "validFrom": {"type": "string", "description": "ms epoch, ISO-8601, or omitted for now"},
            "confidence": {"type": "number", "default": 1.0, "minimum": 0.1, "maximum": 1.0},
            "metadata": {"type": "object"},
            "scope": {"type": "string", "enum": ["project", "user"], "default": "project"}
        },
        "required": ["subject", "predicate", "object"]
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoreFactArgs {
    subject: String,
    predicate: String,
    object: String,
    #[serde(default)]
    valid_from: Option<String>,
    #[serde(default = "default_confidence")]
    confidence: f64,
    #[serde(default)]
    metadata: Option<Value>,
    #[serde(default)]
    scope: Option<String>,
}

fn default_confidence() -> f64 {
    1.0
}

pub fn execute(router: &mut ScopeRouter, args: Option<Value>) -> Result<Value, String> {
    let args: StoreFactArgs = match args {
        Some(v) => serde_json::from_value(v).map_err(|e| format!("invalid arguments: {e}"))?,
        None => return Err("missing arguments".to_string()),
    };

    if !(0.1..=1.0).contains(&args.confidence) {
        return Err("confidence must be in [0.1, 1.0]".to_string());
    }
    let scope = match args.scope.as_deref() {
        Some(s) => Scope::from_str(s)?,
        None => Scope::Project,
    };

    let id = router
        .store_fact(
            &args.subject,
            &args.predicate,
            &args.object,
            args.valid_from.as_deref(),
            args.confidence,
            args.metadata,
            scope,
        )
        .map_err(|e| e.to_string())?;

    Ok(serde_json::json!({ "id": id, "scope": scope.to_string() }))
}
