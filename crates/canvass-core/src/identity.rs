use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Lightweight authenticated user identity for cross-crate passing.
///
/// Produced by whatever signs the user in (out of scope here), consumed by
/// the backends for their access rules. Contains only data fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AuthIdentity {
    /// Opaque user ID issued by the identity provider.
    pub user_id: String,
}

impl AuthIdentity {
    #[must_use]
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }
}

/// The two signals the application consumes from the identity provider.
#[derive(Debug, Clone, Default)]
pub struct AuthContext {
    identity: Option<AuthIdentity>,
}

impl AuthContext {
    #[must_use]
    pub const fn anonymous() -> Self {
        Self { identity: None }
    }

    #[must_use]
    pub const fn signed_in(identity: AuthIdentity) -> Self {
        Self {
            identity: Some(identity),
        }
    }

    /// Build from an optional configured user ID; empty means anonymous.
    #[must_use]
    pub fn from_user_id(user_id: Option<&str>) -> Self {
        match user_id {
            Some(id) if !id.is_empty() => Self::signed_in(AuthIdentity::new(id)),
            _ => Self::anonymous(),
        }
    }

    #[must_use]
    pub fn current_user_id(&self) -> Option<&str> {
        self.identity.as_ref().map(|identity| identity.user_id.as_str())
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    #[must_use]
    pub const fn identity(&self) -> Option<&AuthIdentity> {
        self.identity.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_user_id_is_anonymous() {
        let ctx = AuthContext::from_user_id(Some(""));
        assert!(!ctx.is_authenticated());
        assert_eq!(ctx.current_user_id(), None);
    }

    #[test]
    fn configured_user_id_signs_in() {
        let ctx = AuthContext::from_user_id(Some("user_42"));
        assert!(ctx.is_authenticated());
        assert_eq!(ctx.current_user_id(), Some("user_42"));
    }
}
