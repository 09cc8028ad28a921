use actix_web::{web, HttpResponse, Responder};
use mongodb::bson::Document;
use serde::Deserialize;

use crate::{
    database::MongoDB,
    middleware::VerifiedUser,
    models::Application,
    services::application_service::{self, ApplicationFilter},
};

use super::parse_object_id;

#[derive(Debug, Deserialize)]
pub struct ApplicationListQuery {
    pub email: Option<String>,
    #[serde(rename = "updatedBy")]
    pub updated_by: Option<String>,
    pub status: Option<String>,
}

/// GET /applications - gated; filters are query params, not the token email
#[utoipa::path(
    get,
    path = "/applications",
    tag = "Applications",
    params(
        ("email" = Option<String>, Query, description = "Filter by borrower email"),
        ("updatedBy" = Option<String>, Query, description = "Filter by last updater"),
        ("status" = Option<String>, Query, description = "Filter by status")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Array of application documents"),
        (status = 401, description = "Missing or invalid bearer token")
    )
)]
pub async fn list_applications(
    user: VerifiedUser,
    db: web::Data<MongoDB>,
    query: web::Query<ApplicationListQuery>,
) -> impl Responder {
    let query = query.into_inner();
    log::info!("📋 GET /applications - requested by {}", user.email);

    let filter = ApplicationFilter {
        email: query.email,
        updated_by: query.updated_by,
        status: query.status,
    };

    match application_service::list_applications(&db, filter).await {
        Ok(applications) => HttpResponse::Ok().json(applications),
        Err(e) => {
            log::error!("❌ Error listing applications: {}", e);
            HttpResponse::InternalServerError()
                .json(serde_json::json!({ "success": false, "error": e }))
        }
    }
}

/// GET /application-details/{id} - gated single-document fetch
#[utoipa::path(
    get,
    path = "/application-details/{id}",
    tag = "Applications",
    params(("id" = String, Path, description = "Application ObjectId (hex)")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Application document, or null when absent"),
        (status = 401, description = "Missing or invalid bearer token")
    )
)]
pub async fn application_details(
    user: VerifiedUser,
    db: web::Data<MongoDB>,
    id: web::Path<String>,
) -> impl Responder {
    let oid = match parse_object_id(&id) {
        Ok(oid) => oid,
        Err(response) => return response,
    };
    log::info!("📄 GET /application-details/{} - by {}", id, user.email);

    match application_service::get_application(&db, oid).await {
        Ok(application) => HttpResponse::Ok().json(application),
        Err(e) => {
            log::error!("❌ Error fetching application {}: {}", id, e);
            HttpResponse::InternalServerError()
                .json(serde_json::json!({ "success": false, "error": e }))
        }
    }
}

/// POST /applications - open endpoint, stamps appliedAt
#[utoipa::path(
    post,
    path = "/applications",
    tag = "Applications",
    responses((status = 200, description = "Insert acknowledgment", body = crate::models::InsertAck))
)]
pub async fn add_application(
    db: web::Data<MongoDB>,
    body: web::Json<Application>,
) -> impl Responder {
    log::info!("📝 POST /applications - from {:?}", body.borrower_email);

    match application_service::create_application(&db, body.into_inner()).await {
        Ok(ack) => HttpResponse::Ok().json(ack),
        Err(e) => {
            log::error!("❌ Error creating application: {}", e);
            HttpResponse::InternalServerError()
                .json(serde_json::json!({ "success": false, "error": e }))
        }
    }
}

/// PATCH /applications/{id} - merge patch plus updatedAt stamp
#[utoipa::path(
    patch,
    path = "/applications/{id}",
    tag = "Applications",
    request_body = Object,
    params(("id" = String, Path, description = "Application ObjectId (hex)")),
    responses((status = 200, description = "Update acknowledgment", body = crate::models::UpdateAck))
)]
pub async fn update_application(
    db: web::Data<MongoDB>,
    id: web::Path<String>,
    body: web::Json<Document>,
) -> impl Responder {
    let oid = match parse_object_id(&id) {
        Ok(oid) => oid,
        Err(response) => return response,
    };
    log::info!("🔧 PATCH /applications/{}", id);

    match application_service::update_application(&db, oid, body.into_inner()).await {
        Ok(ack) => HttpResponse::Ok().json(ack),
        Err(e) => {
            log::error!("❌ Error updating application {}: {}", id, e);
            HttpResponse::InternalServerError()
                .json(serde_json::json!({ "success": false, "error": e }))
        }
    }
}

/// DELETE /my-applications/{id}
#[utoipa::path(
    delete,
    path = "/my-applications/{id}",
    tag = "Applications",
    params(("id" = String, Path, description = "Application ObjectId (hex)")),
    responses((status = 200, description = "Delete acknowledgment", body = crate::models::DeleteAck))
)]
pub async fn delete_application(db: web::Data<MongoDB>, id: web::Path<String>) -> impl Responder {
    let oid = match parse_object_id(&id) {
        Ok(oid) => oid,
        Err(response) => return response,
    };
    log::info!("🗑️  DELETE /my-applications/{}", id);

    match application_service::delete_application(&db, oid).await {
        Ok(ack) => HttpResponse::Ok().json(ack),
        Err(e) => {
            log::error!("❌ Error deleting application {}: {}", id, e);
            HttpResponse::InternalServerError()
                .json(serde_json::json!({ "success": false, "error": e }))
        }
    }
}
