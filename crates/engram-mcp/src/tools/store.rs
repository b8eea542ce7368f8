//! `engram_store` — classify and persist a new memory.

use std::collections::HashSet;
use std::str::FromStr;

use serde::Deserialize;
use serde_json::Value;

use engram_core::memory::StoreInput;
use engram_core::{Scope, ScopeRouter, ScopeSelector, Sector};

use super::common::{default_tenant, parse_sector};

pub fn schema() -> Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "content": {
                "type": "string",
                "description": "The memory content to store"
            },
            "scope": {
                "type": "string",
                "enum": ["auto", "project", "user"],
                "default": "auto",
                "description": "Which memory store to write to; auto classifies the content"
            },
            "tags": {
                "type": "array",
                "items": {"type": "string"},
                "default": []
            },
            "metadata": {
                "type": "object",
                "description": "Arbitrary caller-supplied JSON attached to the memory"
            },
            "sector": {
                "type": "string",
                "enum": ["episodic", "semantic", "procedural", "emotional", "reflective"],
                "description": "Force a cognitive sector instead of classifying the content"
            },
            "tenantId": {"type": "string", "default": "default"}
        },
        "required": ["content"]
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoreArgs {
    content: String,
    #[serde(default)]
    scope: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    metadata: Option<Value>,
    #[serde(default)]
    sector: Option<String>,
    #[serde(default = "default_tenant")]
    tenant_id: String,
}

pub fn execute(router: &mut ScopeRouter, args: Option<Value>) -> Result<Value, String> {
    let args: StoreArgs = match args {
        Some(v) => serde_json::from_value(v).map_err(|e| format!("invalid arguments: {e}"))?,
        None => return Err("missing arguments".to_string()),
    };

    if args.content.trim().is_empty() {
        return Err("content cannot be empty".to_string());
    }

    let selector = match args.scope.as_deref() {
        Some(s) => ScopeSelector::from_str(s)?,
        None => ScopeSelector::Auto,
    };
    let sector_override: Option<Sector> = parse_sector(args.sector.as_deref())?;

    let input = StoreInput {
        content: args.content,
        tenant_id: args.tenant_id,
        tags: args.tags.into_iter().collect::<HashSet<_>>(),
        metadata: args.metadata,
        sector_override,
    };

    let (scope, result) = router.store(input, selector).map_err(|e| e.to_string())?;

    Ok(serde_json::json!({
        "id": result.id,
        "scope": scope.to_string(),
        "primarySector": result.primary_sector.to_string(),
        "confidence": result.confidence,
        "createdAt": result.created_at.to_rfc3339(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use engram_core::embedding::LocalHashEmbedding;

    fn test_router() -> (ScopeRouter, tempfile::TempDir, tempfile::TempDir) {
        let project_dir = tempfile::tempdir().unwrap();
        let user_dir = tempfile::tempdir().unwrap();
        let router = ScopeRouter::open(project_dir.path(), user_dir.path(), || Box::new(LocalHashEmbedding::new())).unwrap();
        (router, project_dir, user_dir)
    }

    #[test]
    fn empty_content_is_rejected() {
        let (mut router, _p, _u) = test_router();
        let args = serde_json::json!({"content": "   "});
        assert!(execute(&mut router, Some(args)).is_err());
    }

    #[test]
    fn missing_arguments_is_rejected() {
        let (mut router, _p, _u) = test_router();
        assert!(execute(&mut router, None).is_err());
    }

    #[test]
    fn explicit_scope_and_sector_are_honoured() {
        let (mut router, _p, _u) = test_router();
        let args = serde_json::json!({
            "content": "some content",
            "scope": "project",
            "sector": "semantic",
        });
        let result = execute(&mut router, Some(args)).unwrap();
        assert_eq!(result["scope"], "project");
        assert_eq!(result["primarySector"], "semantic");
    }

    #[test]
    fn unknown_scope_is_rejected() {
        let (mut router, _p, _u) = test_router();
        let args = serde_json::json!({"content": "x", "scope": "nowhere"});
        assert!(execute(&mut router, Some(args)).is_err());
    }
}
