//! Authorization policy
//!
//! A pure decision function. Nothing here touches storage or caches a
//! decision; every request is evaluated from its freshly resolved role.

use strum::{AsRefStr, Display, EnumIter};

use super::Role;

/// Operations the dispatcher can ask about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum Operation {
    /// Public `GET /{symbol}`
    Redirect,
    /// `GET /links/`
    List,
    /// `HEAD /links/`
    Head,
    /// `GET /links/{symbol}`
    Read,
    /// `POST /links/`
    Create,
    /// `DELETE /links/`; the repository narrows the scope for non-admins
    BulkDelete,
    /// `DELETE /links/{symbol}`
    Delete,
    Update,
    /// `POST /invites`; the invite service still checks level and quota
    Invite,
    /// `POST /invite/{code}`, the code itself is the credential
    RedeemInvite,
}

/// Decide whether `role` may perform `operation`
///
/// `is_owner` only matters for operations on a single existing resource.
pub fn permit(role: Role, operation: Operation, is_owner: bool) -> bool {
    match role {
        Role::Admin => true,
        Role::User => match operation {
            Operation::Redirect
            | Operation::List
            | Operation::Head
            | Operation::Read
            | Operation::Create
            | Operation::BulkDelete
            | Operation::Invite
            | Operation::RedeemInvite => true,
            Operation::Delete | Operation::Update => is_owner,
        },
        Role::Anonymous => matches!(operation, Operation::Redirect | Operation::RedeemInvite),
    }
}
