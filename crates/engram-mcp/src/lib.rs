//! Engram MCP server library surface.
//!
//! `main.rs` wires these modules into a stdio-bound binary; this library
//! split exists so integration tests can drive [`server::McpServer`]
//! directly without shelling out to a subprocess.

pub mod protocol;
pub mod server;
pub mod tools;
