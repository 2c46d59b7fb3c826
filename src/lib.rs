//! doctoc-mcp-gateway
//!
//! MCP gateway exposing the Doctoc medical-practice API and Unipile/Telegram
//! messaging as schema-validated tools. Every tool validates its arguments,
//! makes at most two upstream HTTP calls and wraps the outcome in a uniform
//! success/error envelope.

pub mod api;
pub mod cli;
pub mod clients;
pub mod core;
pub mod infra;
pub mod tools;
