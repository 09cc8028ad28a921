use mongodb::bson::{oid::ObjectId, Document};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Role assigned on a user's first login.
pub const DEFAULT_ROLE: &str = "borrower";

/// A user document in the `users` collection, keyed by `email` at the
/// application level (no unique index behind it).
///
/// Timestamps are stored as RFC 3339 strings, matching what the frontend
/// already renders.
#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct User {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub _id: Option<ObjectId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Set once, on the insert half of the login upsert.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Refreshed on every login upsert.
    #[serde(rename = "last_loggedIn", skip_serializing_if = "Option::is_none")]
    pub last_logged_in: Option<String>,
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub extra: Document,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_payload_keeps_profile_extras() {
        let body = r#"{
            "email": "someone@example.com",
            "name": "Someone",
            "photoURL": "https://example.com/p.png"
        }"#;

        let user: User = serde_json::from_str(body).unwrap();
        assert_eq!(user.email.as_deref(), Some("someone@example.com"));
        assert_eq!(user.extra.get_str("name").unwrap(), "Someone");
        assert!(user.role.is_none());
    }

    #[test]
    fn login_timestamp_uses_legacy_wire_name() {
        let user = User {
            _id: None,
            email: Some("someone@example.com".to_string()),
            role: Some(DEFAULT_ROLE.to_string()),
            created_at: Some("2026-01-01T00:00:00+00:00".to_string()),
            last_logged_in: Some("2026-01-02T00:00:00+00:00".to_string()),
            extra: Document::new(),
        };

        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("last_loggedIn").is_some());
        assert!(json.get("last_logged_in").is_none());
    }
}
