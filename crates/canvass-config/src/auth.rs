//! Identity of the local user.

use canvass_core::identity::AuthContext;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AuthConfig {
    /// User ID issued by the identity provider. Empty means anonymous.
    #[serde(default)]
    pub user_id: String,
}

impl AuthConfig {
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.user_id.is_empty()
    }

    #[must_use]
    pub fn context(&self) -> AuthContext {
        AuthContext::from_user_id(Some(self.user_id.as_str()))
    }
}
