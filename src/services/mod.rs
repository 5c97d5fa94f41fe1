//! Service layer for business logic
//!
//! Shared between the HTTP handlers and the CLI.

mod invite_service;
mod link_service;
mod sweeper;

pub use invite_service::{DEFAULT_INVITE_LEVEL, INVITE_CODE_LENGTH, InviteService};
pub use link_service::*;
pub use sweeper::{ExpirySweeper, SweeperHandle, SweeperSettings};
