//! Isolated scope-router fixtures for end-to-end tests.
//!
//! Every test gets its own pair of temp directories so memories, waypoints,
//! and facts from one test never leak into another.

use std::collections::HashSet;

use engram_core::embedding::LocalHashEmbedding;
use engram_core::memory::StoreInput;
use engram_core::ScopeRouter;

/// An isolated [`ScopeRouter`] plus the temp dirs backing it. Keep both
/// alive for the test's duration — dropping the dirs deletes the data.
pub struct TestHarness {
    pub router: ScopeRouter,
    _project_dir: tempfile::TempDir,
    _user_dir: tempfile::TempDir,
}

impl TestHarness {
    pub fn new() -> Self {
        let project_dir = tempfile::tempdir().expect("create project temp dir");
        let user_dir = tempfile::tempdir().expect("create user temp dir");
        let router = ScopeRouter::open(project_dir.path(), user_dir.path(), || Box::new(LocalHashEmbedding::new()))
            .expect("open scope router");
        Self {
            router,
            _project_dir: project_dir,
            _user_dir: user_dir,
        }
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a [`StoreInput`] for `content` under the `default` tenant with no
/// tags, metadata, or sector override.
pub fn store_input(content: &str) -> StoreInput {
    StoreInput {
        content: content.to_string(),
        tenant_id: "default".to_string(),
        tags: HashSet::new(),
        metadata: None,
        sector_override: None,
    }
}
