use mongodb::bson::{oid::ObjectId, DateTime, Document};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A loan offer document in the `all-Loans` collection.
///
/// Only the fields the API filters or stamps are named; everything else the
/// dashboard sends (title, amount, interest rate, images, ...) rides along in
/// `extra` untouched.
#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct Loan {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub _id: Option<ObjectId>,
    #[serde(rename = "createdBy", skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    /// Stamped server-side on insert.
    #[serde(rename = "createdAt", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub created_at: Option<DateTime>,
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub extra: Document,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_fields_survive_deserialization() {
        let body = r#"{
            "createdBy": "lender@example.com",
            "title": "Home improvement",
            "maxAmount": 5000
        }"#;

        let loan: Loan = serde_json::from_str(body).unwrap();
        assert_eq!(loan.created_by.as_deref(), Some("lender@example.com"));
        assert_eq!(loan.extra.get_str("title").unwrap(), "Home improvement");
        assert_eq!(loan.extra.get_i64("maxAmount").unwrap(), 5000);
        assert!(loan._id.is_none());
        assert!(loan.created_at.is_none());
    }

    #[test]
    fn wire_names_are_camel_case() {
        let loan = Loan {
            _id: None,
            created_by: Some("lender@example.com".to_string()),
            created_at: Some(DateTime::now()),
            extra: Document::new(),
        };

        let json = serde_json::to_value(&loan).unwrap();
        assert!(json.get("createdBy").is_some());
        assert!(json.get("createdAt").is_some());
        assert!(json.get("_id").is_none());
    }
}
