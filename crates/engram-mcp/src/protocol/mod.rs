//! JSON-RPC 2.0 over stdio for the Model Context Protocol.

pub mod stdio;
pub mod types;
