// ==================== LOAN APPLICATIONS ====================
// CRUD against the `loan-application` collection. `appliedAt` is stamped on
// insert, `updatedAt` on every patch.

use crate::{
    database::MongoDB,
    models::{Application, DeleteAck, InsertAck, UpdateAck},
};
use futures::stream::StreamExt;
use mongodb::bson::{doc, oid::ObjectId, DateTime, Document};

/// Equality filters for GET /applications. `email` matches `borrowerEmail`.
#[derive(Debug, Default)]
pub struct ApplicationFilter {
    pub email: Option<String>,
    pub updated_by: Option<String>,
    pub status: Option<String>,
}

pub async fn list_applications(
    db: &MongoDB,
    filter: ApplicationFilter,
) -> Result<Vec<Application>, String> {
    let mut query = doc! {};
    if let Some(email) = filter.email {
        query.insert("borrowerEmail", email);
    }
    if let Some(updated_by) = filter.updated_by {
        query.insert("updatedBy", updated_by);
    }
    if let Some(status) = filter.status {
        query.insert("status", status);
    }

    let mut cursor = db
        .applications()
        .find(query)
        .await
        .map_err(|e| format!("Database error: {}", e))?;

    let mut applications = Vec::new();
    while let Some(result) = cursor.next().await {
        match result {
            Ok(application) => applications.push(application),
            Err(e) => return Err(format!("Cursor error: {}", e)),
        }
    }
    Ok(applications)
}

pub async fn get_application(db: &MongoDB, id: ObjectId) -> Result<Option<Application>, String> {
    db.applications()
        .find_one(doc! { "_id": id })
        .await
        .map_err(|e| format!("Database error: {}", e))
}

pub async fn create_application(
    db: &MongoDB,
    mut application: Application,
) -> Result<InsertAck, String> {
    application.applied_at = Some(DateTime::now());

    db.applications()
        .insert_one(application)
        .await
        .map(InsertAck::from)
        .map_err(|e| format!("Database error: {}", e))
}

/// Merge patch plus a fresh `updatedAt` stamp on every call.
pub async fn update_application(
    db: &MongoDB,
    id: ObjectId,
    mut patch: Document,
) -> Result<UpdateAck, String> {
    patch.insert("updatedAt", DateTime::now());

    db.applications()
        .update_one(doc! { "_id": id }, doc! { "$set": patch })
        .await
        .map(UpdateAck::from)
        .map_err(|e| format!("Database error: {}", e))
}

pub async fn delete_application(db: &MongoDB, id: ObjectId) -> Result<DeleteAck, String> {
    db.applications()
        .delete_one(doc! { "_id": id })
        .await
        .map(DeleteAck::from)
        .map_err(|e| format!("Database error: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_db() -> MongoDB {
        dotenv::dotenv().ok();
        let uri = std::env::var("MONGODB_URI")
            .unwrap_or_else(|_| "mongodb://localhost:27017/loanLinkDB-test".to_string());
        MongoDB::new(&uri).await.expect("connection failed")
    }

    fn sample_application(email: &str, status: &str) -> Application {
        let body = serde_json::json!({
            "borrowerEmail": email,
            "status": status,
            "loanTitle": "Test application"
        });
        serde_json::from_value(body).unwrap()
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn status_filter_returns_only_matching_documents() {
        let db = test_db().await;

        let approved = create_application(&db, sample_application("a@test.io", "approved"))
            .await
            .unwrap();
        let pending = create_application(&db, sample_application("a@test.io", "pending"))
            .await
            .unwrap();
        let approved_id = ObjectId::parse_str(&approved.inserted_id).unwrap();
        let pending_id = ObjectId::parse_str(&pending.inserted_id).unwrap();

        let filter = ApplicationFilter {
            email: Some("a@test.io".to_string()),
            status: Some("approved".to_string()),
            ..Default::default()
        };
        let matches = list_applications(&db, filter).await.unwrap();
        assert!(matches.iter().all(|a| a.status.as_deref() == Some("approved")));
        assert!(matches.iter().any(|a| a._id == Some(approved_id)));
        assert!(!matches.iter().any(|a| a._id == Some(pending_id)));

        delete_application(&db, approved_id).await.unwrap();
        delete_application(&db, pending_id).await.unwrap();
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn patch_stamps_updated_at() {
        let db = test_db().await;

        let ack = create_application(&db, sample_application("b@test.io", "pending"))
            .await
            .unwrap();
        let id = ObjectId::parse_str(&ack.inserted_id).unwrap();

        let patch: Document =
            serde_json::from_value(serde_json::json!({ "status": "approved" })).unwrap();
        update_application(&db, id, patch).await.unwrap();

        let found = get_application(&db, id).await.unwrap().expect("missing");
        assert_eq!(found.status.as_deref(), Some("approved"));
        assert!(found.updated_at.is_some());
        assert!(found.applied_at.is_some());

        delete_application(&db, id).await.unwrap();
    }
}
