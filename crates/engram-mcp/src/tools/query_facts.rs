//! `query_facts` — facts valid at a point in time.

use serde::Deserialize;
use serde_json::Value;

use engram_core::ScopeRouter;

use super::common::parse_scope;

pub fn schema() -> Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "subject": {"type": "string"},
            "predicate": {"type": "string"},
            "object": {"type": "string"},
            "at": {"type": "string", "description": "ms epoch, ISO-8601, or omitted for now"},
            "scope": {"type": "string", "enum": ["project", "user"]}
        }
    })
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct QueryFactsArgs {
    #[serde(default)]
    subject: Option<String>,
    #[serde(default)]
    predicate: Option<String>,
    #[serde(default)]
    object: Option<String>,
    #[serde(default)]
    at: Option<String>,
    #[serde(default)]
    scope: Option<String>,
}

pub fn execute(router: &mut ScopeRouter, args: Option<Value>) -> Result<Value, String> {
    let args: QueryFactsArgs = match args {
        Some(v) => serde_json::from_value(v).map_err(|e| format!("invalid arguments: {e}"))?,
        None => QueryFactsArgs::default(),
    };
    let scope = parse_scope(args.scope.as_deref())?;

    let facts = router
        .query_facts(args.subject.as_deref(), args.predicate.as_deref(), args.object.as_deref(), args.at.as_deref(), scope)
        .map_err(|e| e.to_string())?;

    Ok(serde_json::json!({ "facts": facts }))
}
