//! Memory core (C5): record types plus the orchestration of the sector
//! classifier, decay engine, waypoint graph, temporal graph, and embedding
//! backend behind `store` / `search` / `get` / `delete` / `list` /
//! `apply_decay`.

mod engine;
mod record;

pub use engine::{MemoryCore, SearchHit, StoreInput, StoreResult};
pub use record::{Memory, MemoryStats};
