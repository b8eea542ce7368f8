//! # Engram Core
//!
//! Cognitive memory engine for agent and assistant workloads. A stored
//! memory is classified into one of five cognitive sectors, decays over
//! time unless reinforced, and accumulates associations with other
//! memories via a waypoint graph. A parallel temporal knowledge graph
//! tracks versioned `(subject, predicate, object)` facts. Two independent
//! instances of the memory core — project-scoped and user-scoped — sit
//! behind a semantic scope router so callers can store and recall without
//! naming a scope explicitly.
//!
//! ## Modules
//!
//! - [`sector`] — cognitive sector classification (C1)
//! - [`decay`] — salience decay and reinforcement (C2)
//! - [`waypoint`] — the association graph between memories (C3)
//! - [`temporal`] — the `(subject, predicate, object)` fact graph (C4)
//! - [`memory`] — the memory core orchestrating C1-C4 and the embedding
//!   backend (C5)
//! - [`scope`] — the project/user scope router (C6)
//! - [`storage`] — on-disk JSON persistence (C7)
//! - [`embedding`] — the embedding backend trait and default implementation
//! - [`error`] — shared error types
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use engram_core::embedding::LocalHashEmbedding;
//! use engram_core::memory::{MemoryCore, StoreInput};
//!
//! let mut core = MemoryCore::open("./data/project", Box::new(LocalHashEmbedding::new()))?;
//! let result = core.store(StoreInput {
//!     content: "Remember to review the auth PR tomorrow".to_string(),
//!     tenant_id: "default".to_string(),
//!     ..Default::default()
//! })?;
//! println!("stored as {:?} memory {}", result.primary_sector, result.id);
//! # Ok::<(), engram_core::error::MemoryError>(())
//! ```

pub mod decay;
pub mod embedding;
pub mod error;
pub mod memory;
pub mod scope;
pub mod sector;
pub mod storage;
pub mod temporal;
pub mod waypoint;

pub use decay::Tier;
pub use embedding::{EmbeddingBackend, LocalHashEmbedding};
pub use error::{ErrorKind, MemoryError, Result};
pub use memory::{Memory, MemoryCore, MemoryStats, SearchHit, StoreInput, StoreResult};
pub use scope::{Scope, ScopeRouter, ScopeSelector};
pub use sector::Sector;
pub use temporal::Fact;
pub use waypoint::WaypointGraph;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
