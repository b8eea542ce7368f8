//! Scope routing (C6).
//!
//! Composes two independent [`crate::memory::MemoryCore`] instances — one
//! rooted at a detected project directory, one at a user-global directory —
//! behind a single entry point. Content with no explicit scope is routed by
//! [`classifier::ScopeClassifier`], a semantic classifier over a fixed set of
//! project/user exemplar sentences rather than a regex family, since "is this
//! about code or about me" doesn't decompose into sector-style keyword
//! patterns.

mod classifier;
mod project_root;
mod router;

pub use classifier::{ScopeClassification, ScopeClassifier, CONFIDENCE_THRESHOLD};
pub use project_root::{resolve_scope_paths, ScopePaths};
pub use router::{DecayCounts, ScopeRouter, ScopedSearchHit};

use serde::{Deserialize, Serialize};

/// Which of the two memory cores a record lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    Project,
    User,
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scope::Project => write!(f, "project"),
            Scope::User => write!(f, "user"),
        }
    }
}

impl std::str::FromStr for Scope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "project" => Ok(Scope::Project),
            "user" => Ok(Scope::User),
            _ => Err(format!("unknown scope: {s}")),
        }
    }
}

/// The `scope` argument accepted by `store`: either pinned explicitly or
/// left to the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScopeSelector {
    #[default]
    Auto,
    Project,
    User,
}

impl std::str::FromStr for ScopeSelector {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(ScopeSelector::Auto),
            "project" => Ok(ScopeSelector::Project),
            "user" => Ok(ScopeSelector::User),
            _ => Err(format!("unknown scope: {s}")),
        }
    }
}
