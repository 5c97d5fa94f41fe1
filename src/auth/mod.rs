//! Caller identity and authorization
//!
//! - `role`: the `Role` ladder and its mapping to stored levels
//! - `policy`: pure allow/deny decisions per operation
//! - `token_store`: bearer token → role resolution

pub mod policy;
pub mod role;
pub mod token_store;

pub use policy::{Operation, permit};
pub use role::Role;
pub use token_store::{TokenRef, TokenStore};

/// Who is making a request, resolved once per request
///
/// An anonymous caller never carries a token, so ownership checks can only
/// succeed for tokens that exist in storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub token: Option<String>,
    pub role: Role,
}

impl Caller {
    pub fn anonymous() -> Self {
        Self {
            token: None,
            role: Role::Anonymous,
        }
    }

    pub fn new(token: impl Into<String>, role: Role) -> Self {
        if role == Role::Anonymous {
            return Self::anonymous();
        }
        Self {
            token: Some(token.into()),
            role,
        }
    }

    /// Whether this caller created a link owned by `owner_token`
    pub fn owns(&self, owner_token: Option<&str>) -> bool {
        match (self.token.as_deref(), owner_token) {
            (Some(mine), Some(theirs)) => mine == theirs,
            _ => false,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anonymous_caller_drops_token() {
        let caller = Caller::new("leaked", Role::Anonymous);
        assert_eq!(caller, Caller::anonymous());
        assert!(!caller.owns(Some("leaked")));
    }

    #[test]
    fn test_owns_requires_both_sides() {
        let caller = Caller::new("t1", Role::User);
        assert!(caller.owns(Some("t1")));
        assert!(!caller.owns(Some("t2")));
        assert!(!caller.owns(None));
    }
}
