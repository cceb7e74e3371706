//! Account Service Library
//!
//! User registration, password login and profile lookup over HTTP.
//! The binary in `main.rs` only wires configuration to these modules.

pub mod api;
pub mod auth;
pub mod config;
pub mod middleware;
