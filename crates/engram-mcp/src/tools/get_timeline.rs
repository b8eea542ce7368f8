//! `get_timeline` — every fact for a subject, ordered by validity start.

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
            "scope": {"type": "string", "enum": ["project", "user"]}
        },
        "required": ["subject"]
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TimelineArgs {
    subject: String,
    #[serde(default)]
    predicate: Option<String>,
    #[serde(default)]
    scope: Option<String>,
}

pub fn execute(router: &mut ScopeRouter, args: Option<Value>) -> Result<Value, String> {
    let args: TimelineArgs = match args {
        Some(v) => serde_json::from_value(v).map_err(|e| format!("invalid arguments: {e}"))?,
        None => return Err("missing arguments".to_string()),
    };
    let scope = parse_scope(args.scope.as_deref())?;

    let facts = router.get_timeline(&args.subject, args.predicate.as_deref(), scope);
    Ok(serde_json::json!({ "facts": facts }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use engram_core::embedding::LocalHashEmbedding;
    use engram_core::Scope;

    fn test_router() -> (ScopeRouter, tempfile::TempDir, tempfile::TempDir) {
        let project_dir = tempfile::tempdir().unwrap();
        let user_dir = tempfile::tempdir().unwrap();
        let router = ScopeRouter::open(project_dir.path(), user_dir.path(), || Box::new(LocalHashEmbedding::new())).unwrap();
        (router, project_dir, user_dir)
    }

    #[test]
    fn timeline_is_ordered_ascending() {
        let (mut router, _p, _u) = test_router();
        router
            .store_fact("Alice", "works_at", "Google", Some("0"), 1.0, None, Scope::Project)
            .unwrap();
        router
            .store_fact("Alice", "works_at", "Meta", Some("86400000"), 1.0, None, Scope::Project)
            .unwrap();

        let args = serde_json::json!({"subject": "Alice"});
        let result = execute(&mut router, Some(args)).unwrap();
        let facts = result["facts"].as_array().unwrap();
        assert_eq!(facts.len(), 2);
        assert_eq!(facts[0]["object"], "Google");
        assert_eq!(facts[1]["object"], "Meta");
    }
}
