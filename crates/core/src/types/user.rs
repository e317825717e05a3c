//! User identity and authenticated sessions.

use serde::{Deserialize, Serialize};

use crate::types::email::Email;
use crate::types::id::UserId;

/// A storefront account holder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// An authenticated session: the user plus an optional bearer credential.
///
/// Presence of a session means "authenticated"; the token may be absent when
/// the backend authenticates via cookie instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    pub user: User,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl AuthSession {
    /// Create a session for a user with a bearer token.
    #[must_use]
    pub const fn new(user: User, token: Option<String>) -> Self {
        Self { user, token }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_session_serde_roundtrip() {
        let session = AuthSession::new(
            User {
                id: UserId::new("u1"),
                name: "Ada".to_owned(),
                email: Email::parse("ada@example.com").unwrap(),
                role: None,
            },
            Some("jwt-token".to_owned()),
        );
        let json = serde_json::to_string(&session).unwrap();
        let parsed: AuthSession = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, session);
    }

    #[test]
    fn test_role_is_optional_on_the_wire() {
        let session: AuthSession = serde_json::from_str(
            r#"{"user":{"id":"u1","name":"Ada","email":"ada@example.com"}}"#,
        )
        .unwrap();
        assert!(session.user.role.is_none());
        assert!(session.token.is_none());
    }
}
