use actix_web::{web, HttpResponse, Responder};
use mongodb::bson::Document;

use crate::{
    database::MongoDB, middleware::VerifiedUser, models::User, services::user_service,
};

use super::parse_object_id;

/// GET /users - every user document, no filters
#[utoipa::path(
    get,
    path = "/users",
    tag = "Users",
    responses((status = 200, description = "Array of user documents"))
)]
pub async fn list_users(db: web::Data<MongoDB>) -> impl Responder {
    log::info!("📋 GET /users");

    match user_service::list_users(&db).await {
        Ok(users) => HttpResponse::Ok().json(users),
        Err(e) => {
            log::error!("❌ Error listing users: {}", e);
            HttpResponse::InternalServerError()
                .json(serde_json::json!({ "success": false, "error": e }))
        }
    }
}

/// POST /users - login upsert; first call inserts, later calls only refresh
/// the login timestamp
#[utoipa::path(
    post,
    path = "/users",
    tag = "Users",
    responses(
        (status = 200, description = "Upsert acknowledgment", body = crate::models::UpdateAck),
        (status = 400, description = "Body without an email field")
    )
)]
pub async fn save_user(db: web::Data<MongoDB>, body: web::Json<User>) -> impl Responder {
    let user = body.into_inner();
    let Some(email) = user.email.clone() else {
        return HttpResponse::BadRequest()
            .json(serde_json::json!({ "success": false, "error": "email is required" }));
    };
    log::info!("👤 POST /users - login upsert for {}", email);

    match user_service::upsert_user_on_login(&db, &email, &user).await {
        Ok(ack) => HttpResponse::Ok().json(ack),
        Err(e) => {
            log::error!("❌ Error upserting user {}: {}", email, e);
            HttpResponse::InternalServerError()
                .json(serde_json::json!({ "success": false, "error": e }))
        }
    }
}

/// GET /user/role - role of the authenticated caller; null when unknown
#[utoipa::path(
    get,
    path = "/user/role",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "{\"role\": <role or null>}"),
        (status = 401, description = "Missing or invalid bearer token")
    )
)]
pub async fn user_role(user: VerifiedUser, db: web::Data<MongoDB>) -> impl Responder {
    log::info!("🎭 GET /user/role - {}", user.email);

    match user_service::get_role(&db, &user.email).await {
        Ok(role) => HttpResponse::Ok().json(serde_json::json!({ "role": role })),
        Err(e) => {
            log::error!("❌ Error fetching role for {}: {}", user.email, e);
            HttpResponse::InternalServerError()
                .json(serde_json::json!({ "success": false, "error": e }))
        }
    }
}

/// PATCH /user/{id} - merge patch on a user document
#[utoipa::path(
    patch,
    path = "/user/{id}",
    tag = "Users",
    request_body = Object,
    params(("id" = String, Path, description = "User ObjectId (hex)")),
    responses((status = 200, description = "Update acknowledgment", body = crate::models::UpdateAck))
)]
pub async fn update_user(
    db: web::Data<MongoDB>,
    id: web::Path<String>,
    body: web::Json<Document>,
) -> impl Responder {
    let oid = match parse_object_id(&id) {
        Ok(oid) => oid,
        Err(response) => return response,
    };
    log::info!("🔧 PATCH /user/{}", id);

    match user_service::update_user(&db, oid, body.into_inner()).await {
        Ok(ack) => HttpResponse::Ok().json(ack),
        Err(e) => {
            log::error!("❌ Error updating user {}: {}", id, e);
            HttpResponse::InternalServerError()
                .json(serde_json::json!({ "success": false, "error": e }))
        }
    }
}
