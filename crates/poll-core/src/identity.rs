use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Lightweight authenticated user identity passed explicitly to every
/// operation that acts on behalf of a user.
///
/// Produced by the CLI from `--as` or the `identity` config section.
/// Contains only data fields, no sign-in logic.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AuthIdentity {
    /// Stable user id. Used as the vote key and as `created_by` on polls.
    pub user_id: String,
    /// Optional human-readable name for output.
    pub display_name: Option<String>,
}

impl AuthIdentity {
    #[must_use]
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            display_name: None,
        }
    }

    /// Name to show in output: display name if set, otherwise the user id.
    #[must_use]
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.user_id)
    }
}
