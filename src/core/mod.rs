//! Core types: the envelope contract, upstream errors, RPC wire structs.

pub mod envelope;
pub mod error;
pub mod mcp;
