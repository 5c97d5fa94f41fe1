//! shortkey - a token-gated URL shortener
//!
//! Maps short symbols to destination URLs, serves anonymous redirects and a
//! bearer-token management API whose reach depends on the caller's role.
//!
//! # Architecture
//! - `auth`: roles, the authorization policy and bearer token resolution
//! - `storage`: link/token models and the SeaORM backend
//! - `services`: the link repository service and the expiry sweeper
//! - `api`: actix-web middleware and handlers
//! - `config`: static configuration (TOML + environment)
//! - `runtime`: application lifecycle and execution modes
//! - `system`: logging

pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod errors;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
