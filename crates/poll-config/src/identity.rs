//! Signed-in user identity used when `--as` is not given.

use poll_core::identity::AuthIdentity;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct IdentityConfig {
    #[serde(default)]
    pub user_id: String,

    #[serde(default)]
    pub display_name: String,
}

impl IdentityConfig {
    pub fn is_configured(&self) -> bool {
        !self.user_id.trim().is_empty()
    }

    /// Build an identity if a user id is configured.
    #[must_use]
    pub fn to_identity(&self) -> Option<AuthIdentity> {
        if !self.is_configured() {
            return None;
        }
        Some(AuthIdentity {
            user_id: self.user_id.trim().to_string(),
            display_name: Some(self.display_name.trim())
                .filter(|name| !name.is_empty())
                .map(ToString::to_string),
        })
    }
}
