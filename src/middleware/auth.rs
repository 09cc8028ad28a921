use actix_web::{
    dev::Payload, error::InternalError, web, Error, FromRequest, HttpRequest, HttpResponse,
};
use futures::future::LocalBoxFuture;
use serde_json::json;

use crate::services::firebase_service::FirebaseAuth;

/// Identity attached to a request once its bearer token checks out.
///
/// Used as an extractor, so auth can differ per method on the same path
/// (GET /applications is gated, POST /applications is not). Any valid token
/// passes; role checks are the handlers' business.
#[derive(Debug, Clone)]
pub struct VerifiedUser {
    pub email: String,
}

fn bearer_token(req: &HttpRequest) -> Option<String> {
    let header = req.headers().get("Authorization")?.to_str().ok()?;
    header
        .strip_prefix("Bearer ")
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

fn unauthorized(detail: Option<String>) -> Error {
    let body = match detail {
        Some(err) => json!({ "message": "Unauthorized Access!", "err": err }),
        None => json!({ "message": "Unauthorized Access!" }),
    };
    InternalError::from_response("unauthorized", HttpResponse::Unauthorized().json(body)).into()
}

impl FromRequest for VerifiedUser {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let auth = req.app_data::<web::Data<FirebaseAuth>>().cloned();
        let token = bearer_token(req);

        Box::pin(async move {
            let auth = auth.ok_or_else(|| {
                actix_web::error::ErrorInternalServerError("token verifier not configured")
            })?;
            let token = token.ok_or_else(|| unauthorized(None))?;

            let claims = auth.verify_id_token(&token).await.map_err(|e| {
                log::warn!("🔒 Token rejected: {}", e);
                unauthorized(Some(e.to_string()))
            })?;

            let email = claims
                .email
                .ok_or_else(|| unauthorized(Some("token carries no email claim".to_string())))?;

            log::debug!("✅ Token verified for {} (uid {})", email, claims.sub);
            Ok(VerifiedUser { email })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, App, Responder};
    use base64::Engine;

    async fn whoami(user: VerifiedUser) -> impl Responder {
        HttpResponse::Ok().body(user.email)
    }

    fn test_verifier() -> FirebaseAuth {
        let json = r#"{"type":"service_account","project_id":"loanlink-demo"}"#;
        let encoded = base64::engine::general_purpose::STANDARD.encode(json);
        FirebaseAuth::from_service_key(&encoded).unwrap()
    }

    #[actix_web::test]
    async fn missing_header_is_rejected_with_401() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_verifier()))
                .route("/whoami", web::get().to(whoami)),
        )
        .await;

        let req = test::TestRequest::get().uri("/whoami").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), 401);

        let body = test::read_body(res).await;
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["message"], "Unauthorized Access!");
        assert!(json.get("err").is_none());
    }

    #[actix_web::test]
    async fn non_bearer_header_is_rejected_with_401() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_verifier()))
                .route("/whoami", web::get().to(whoami)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/whoami")
            .insert_header(("Authorization", "Basic dXNlcjpwYXNz"))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), 401);
    }

    #[actix_web::test]
    async fn malformed_token_surfaces_verifier_detail() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_verifier()))
                .route("/whoami", web::get().to(whoami)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/whoami")
            .insert_header(("Authorization", "Bearer not-a-jwt"))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), 401);

        let body = test::read_body(res).await;
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["message"], "Unauthorized Access!");
        assert!(json["err"].as_str().is_some());
    }
}
