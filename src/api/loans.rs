use actix_web::{web, HttpResponse, Responder};
use mongodb::bson::Document;
use serde::Deserialize;

use crate::{database::MongoDB, models::Loan, services::loan_service};

use super::parse_object_id;

#[derive(Debug, Deserialize)]
pub struct LoanListQuery {
    pub email: Option<String>,
}

/// GET /all-loans - lists loans, optionally filtered by creator email
#[utoipa::path(
    get,
    path = "/all-loans",
    tag = "Loans",
    params(("email" = Option<String>, Query, description = "Filter by creator email")),
    responses((status = 200, description = "Array of loan documents"))
)]
pub async fn all_loans(
    db: web::Data<MongoDB>,
    query: web::Query<LoanListQuery>,
) -> impl Responder {
    log::info!("📋 GET /all-loans - filter: {:?}", query.email);

    match loan_service::list_loans(&db, query.into_inner().email).await {
        Ok(loans) => HttpResponse::Ok().json(loans),
        Err(e) => {
            log::error!("❌ Error listing loans: {}", e);
            HttpResponse::InternalServerError()
                .json(serde_json::json!({ "success": false, "error": e }))
        }
    }
}

/// GET /loan/{id} - a single loan; responds `null` when the id is unknown
#[utoipa::path(
    get,
    path = "/loan/{id}",
    tag = "Loans",
    params(("id" = String, Path, description = "Loan ObjectId (hex)")),
    responses((status = 200, description = "Loan document, or null when absent"))
)]
pub async fn loan_details(db: web::Data<MongoDB>, id: web::Path<String>) -> impl Responder {
    let oid = match parse_object_id(&id) {
        Ok(oid) => oid,
        Err(response) => return response,
    };

    match loan_service::get_loan(&db, oid).await {
        Ok(loan) => HttpResponse::Ok().json(loan),
        Err(e) => {
            log::error!("❌ Error fetching loan {}: {}", id, e);
            HttpResponse::InternalServerError()
                .json(serde_json::json!({ "success": false, "error": e }))
        }
    }
}

/// POST /add-loan - inserts the body as a new loan
#[utoipa::path(
    post,
    path = "/add-loan",
    tag = "Loans",
    responses((status = 200, description = "Insert acknowledgment", body = crate::models::InsertAck))
)]
pub async fn add_loan(db: web::Data<MongoDB>, body: web::Json<Loan>) -> impl Responder {
    log::info!("📝 POST /add-loan - by {:?}", body.created_by);

    match loan_service::create_loan(&db, body.into_inner()).await {
        Ok(ack) => HttpResponse::Ok().json(ack),
        Err(e) => {
            log::error!("❌ Error creating loan: {}", e);
            HttpResponse::InternalServerError()
                .json(serde_json::json!({ "success": false, "error": e }))
        }
    }
}

/// PATCH /update-loan/{id} - merge patch, any field goes
#[utoipa::path(
    patch,
    path = "/update-loan/{id}",
    tag = "Loans",
    request_body = Object,
    params(("id" = String, Path, description = "Loan ObjectId (hex)")),
    responses((status = 200, description = "Update acknowledgment", body = crate::models::UpdateAck))
)]
pub async fn update_loan(
    db: web::Data<MongoDB>,
    id: web::Path<String>,
    body: web::Json<Document>,
) -> impl Responder {
    let oid = match parse_object_id(&id) {
        Ok(oid) => oid,
        Err(response) => return response,
    };
    log::info!("🔧 PATCH /update-loan/{}", id);

    match loan_service::update_loan(&db, oid, body.into_inner()).await {
        Ok(ack) => HttpResponse::Ok().json(ack),
        Err(e) => {
            log::error!("❌ Error updating loan {}: {}", id, e);
            HttpResponse::InternalServerError()
                .json(serde_json::json!({ "success": false, "error": e }))
        }
    }
}

/// DELETE /delete-loan/{id}
#[utoipa::path(
    delete,
    path = "/delete-loan/{id}",
    tag = "Loans",
    params(("id" = String, Path, description = "Loan ObjectId (hex)")),
    responses((status = 200, description = "Delete acknowledgment", body = crate::models::DeleteAck))
)]
pub async fn delete_loan(db: web::Data<MongoDB>, id: web::Path<String>) -> impl Responder {
    let oid = match parse_object_id(&id) {
        Ok(oid) => oid,
        Err(response) => return response,
    };
    log::info!("🗑️  DELETE /delete-loan/{}", id);

    match loan_service::delete_loan(&db, oid).await {
        Ok(ack) => HttpResponse::Ok().json(ack),
        Err(e) => {
            log::error!("❌ Error deleting loan {}: {}", id, e);
            HttpResponse::InternalServerError()
                .json(serde_json::json!({ "success": false, "error": e }))
        }
    }
}
