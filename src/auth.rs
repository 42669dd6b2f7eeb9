//! Authentication collaborator types
//!
//! Authentication itself is external; the store only observes the
//! resolved identity. Session resolution hands the store an `Identity`
//! (sign-in) or takes it away (sign-out), and each transition bumps the
//! store's session epoch.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::UserId;

/// The authenticated user as supplied by the authentication collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Stable user id, the owner key for all gateway records
    pub id: UserId,

    /// The user's email address
    pub email: String,
}

impl Identity {
    /// Create an identity
    pub fn new(id: UserId, email: impl Into<String>) -> Self {
        Self {
            id,
            email: email.into(),
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}>", self.id, self.email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_email() {
        let identity = Identity::new(UserId::new(), "asha@example.com");
        assert!(identity.to_string().contains("asha@example.com"));
    }

    #[test]
    fn test_serde_roundtrip() {
        let identity = Identity::new(UserId::new(), "asha@example.com");
        let json = serde_json::to_string(&identity).unwrap();
        let back: Identity = serde_json::from_str(&json).unwrap();
        assert_eq!(identity, back);
    }
}
