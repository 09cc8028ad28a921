use mongodb::bson::{oid::ObjectId, DateTime, Document};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A loan application document in the `loan-application` collection.
///
/// `borrowerEmail`, `status` and `updatedBy` are the list-endpoint filter
/// fields; the rest of the form payload stays in `extra`.
#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct Application {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub _id: Option<ObjectId>,
    #[serde(rename = "borrowerEmail", skip_serializing_if = "Option::is_none")]
    pub borrower_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(rename = "updatedBy", skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
    /// Stamped server-side on insert.
    #[serde(rename = "appliedAt", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub applied_at: Option<DateTime>,
    /// Stamped server-side on every patch.
    #[serde(rename = "updatedAt", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub updated_at: Option<DateTime>,
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub extra: Document,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_fields_map_to_wire_names() {
        let body = r#"{
            "borrowerEmail": "borrower@example.com",
            "status": "pending",
            "monthlyIncome": 2200.5
        }"#;

        let application: Application = serde_json::from_str(body).unwrap();
        assert_eq!(
            application.borrower_email.as_deref(),
            Some("borrower@example.com")
        );
        assert_eq!(application.status.as_deref(), Some("pending"));
        assert!(application.extra.get_f64("monthlyIncome").is_ok());

        let json = serde_json::to_value(&application).unwrap();
        assert!(json.get("borrowerEmail").is_some());
        assert!(json.get("updatedAt").is_none());
    }
}
