// ==================== USERS ====================
// Users are keyed by email at the application level. The login upsert is a
// single conditional update so two simultaneous first logins cannot insert
// twice.

use crate::{
    database::MongoDB,
    models::{UpdateAck, User, DEFAULT_ROLE},
};
use futures::stream::StreamExt;
use mongodb::bson::{doc, oid::ObjectId, Document};

pub async fn list_users(db: &MongoDB) -> Result<Vec<User>, String> {
    let mut cursor = db
        .users()
        .find(doc! {})
        .await
        .map_err(|e| format!("Database error: {}", e))?;

    let mut users = Vec::new();
    while let Some(result) = cursor.next().await {
        match result {
            Ok(user) => users.push(user),
            Err(e) => return Err(format!("Cursor error: {}", e)),
        }
    }
    Ok(users)
}

/// POST /users - atomic upsert on email.
///
/// Existing user: only `last_loggedIn` is refreshed. New user: the profile
/// extras from the login payload land once via `$setOnInsert`, with the
/// default role and a `created_at` stamp. Caller-supplied `role` is ignored.
pub async fn upsert_user_on_login(
    db: &MongoDB,
    email: &str,
    user: &User,
) -> Result<UpdateAck, String> {
    let now = chrono::Utc::now().to_rfc3339();

    let mut on_insert = doc! {
        "email": email,
        "role": DEFAULT_ROLE,
        "created_at": &now,
    };
    for (key, value) in user.extra.iter() {
        if !on_insert.contains_key(key) {
            on_insert.insert(key.as_str(), value.clone());
        }
    }

    db.users()
        .update_one(
            doc! { "email": email },
            doc! {
                "$set": { "last_loggedIn": &now },
                "$setOnInsert": on_insert,
            },
        )
        .upsert(true)
        .await
        .map(UpdateAck::from)
        .map_err(|e| format!("Database error: {}", e))
}

/// GET /user/role - a missing user yields `None`, not an error.
pub async fn get_role(db: &MongoDB, email: &str) -> Result<Option<String>, String> {
    db.users()
        .find_one(doc! { "email": email })
        .await
        .map(|user| user.and_then(|u| u.role))
        .map_err(|e| format!("Database error: {}", e))
}

/// PATCH /user/{id} - unrestricted $set merge of the body.
pub async fn update_user(db: &MongoDB, id: ObjectId, patch: Document) -> Result<UpdateAck, String> {
    db.users()
        .update_one(doc! { "_id": id }, doc! { "$set": patch })
        .await
        .map(UpdateAck::from)
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

    fn login_payload(email: &str) -> User {
        let body = serde_json::json!({
            "email": email,
            "name": "Upsert Test",
            "role": "admin"
        });
        serde_json::from_value(body).unwrap()
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn second_login_refreshes_timestamp_without_inserting() {
        let db = test_db().await;
        let email = format!("upsert-{}@test.io", ObjectId::new().to_hex());
        let user = login_payload(&email);

        let first = upsert_user_on_login(&db, &email, &user).await.unwrap();
        assert!(first.upserted_id.is_some());

        let stored = db.users().find_one(doc! { "email": &email }).await.unwrap().unwrap();
        let created_at = stored.created_at.clone().expect("created_at missing");
        let first_login = stored.last_logged_in.clone().expect("last_loggedIn missing");
        // caller-supplied role is ignored in favor of the default
        assert_eq!(stored.role.as_deref(), Some(DEFAULT_ROLE));

        tokio::time::sleep(std::time::Duration::from_millis(20)).await;

        let second = upsert_user_on_login(&db, &email, &user).await.unwrap();
        assert!(second.upserted_id.is_none());
        assert_eq!(second.matched_count, 1);

        let all: Vec<User> = list_users(&db)
            .await
            .unwrap()
            .into_iter()
            .filter(|u| u.email.as_deref() == Some(email.as_str()))
            .collect();
        assert_eq!(all.len(), 1);

        let stored = &all[0];
        assert_eq!(stored.created_at.as_deref(), Some(created_at.as_str()));
        assert_eq!(stored.role.as_deref(), Some(DEFAULT_ROLE));
        assert!(stored.last_logged_in.as_deref().unwrap() > first_login.as_str());

        db.users().delete_one(doc! { "email": &email }).await.unwrap();
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn role_lookup_for_unknown_user_is_none() {
        let db = test_db().await;
        let role = get_role(&db, "nobody@test.io").await.unwrap();
        assert!(role.is_none());
    }
}
