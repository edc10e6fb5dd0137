//! Principal resolved from a token's subject claim.

use serde::{Deserialize, Serialize};

/// A principal known to the identity store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    /// Identifier carried in the `user_id` claim
    pub id: String,

    /// Whether the principal may currently authenticate
    pub is_active: bool,
}

impl Subject {
    pub fn active(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            is_active: true,
        }
    }

    pub fn disabled(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            is_active: false,
        }
    }
}
