//! HTTP surface: caller identity middleware plus the redirect and `/links` handlers

pub mod middleware;
pub mod services;

pub use middleware::CallerIdentity;
pub use services::configure_routes;
