// ==================== LOANS ====================
// One document-store operation per function, against the `all-Loans`
// collection. Callers hand over open documents; the service only stamps
// `createdAt` on insert.

use crate::{
    database::MongoDB,
    models::{DeleteAck, InsertAck, Loan, UpdateAck},
};
use futures::stream::StreamExt;
use mongodb::bson::{doc, oid::ObjectId, DateTime, Document};

/// GET /all-loans - all loans, optionally only those created by one email
pub async fn list_loans(db: &MongoDB, created_by: Option<String>) -> Result<Vec<Loan>, String> {
    let mut query = doc! {};
    if let Some(email) = created_by {
        query.insert("createdBy", email);
    }

    let mut cursor = db
        .loans()
        .find(query)
        .await
        .map_err(|e| format!("Database error: {}", e))?;

    let mut loans = Vec::new();
    while let Some(result) = cursor.next().await {
        match result {
            Ok(loan) => loans.push(loan),
            Err(e) => return Err(format!("Cursor error: {}", e)),
        }
    }
    Ok(loans)
}

/// GET /loan/{id} - a missing document is `None`, not an error
pub async fn get_loan(db: &MongoDB, id: ObjectId) -> Result<Option<Loan>, String> {
    db.loans()
        .find_one(doc! { "_id": id })
        .await
        .map_err(|e| format!("Database error: {}", e))
}

/// POST /add-loan - inserts the body verbatim, stamping `createdAt`
pub async fn create_loan(db: &MongoDB, mut loan: Loan) -> Result<InsertAck, String> {
    loan.created_at = Some(DateTime::now());

    db.loans()
        .insert_one(loan)
        .await
        .map(InsertAck::from)
        .map_err(|e| format!("Database error: {}", e))
}

/// PATCH /update-loan/{id} - unrestricted $set merge of the body
pub async fn update_loan(db: &MongoDB, id: ObjectId, patch: Document) -> Result<UpdateAck, String> {
    db.loans()
        .update_one(doc! { "_id": id }, doc! { "$set": patch })
        .await
        .map(UpdateAck::from)
        .map_err(|e| format!("Database error: {}", e))
}

/// DELETE /delete-loan/{id}
pub async fn delete_loan(db: &MongoDB, id: ObjectId) -> Result<DeleteAck, String> {
    db.loans()
        .delete_one(doc! { "_id": id })
        .await
        .map(DeleteAck::from)
        .map_err(|e| format!("Database error: {}", e))
}
