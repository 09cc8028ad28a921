mod api;
mod database;
mod middleware;
mod models;
mod services;
mod utils;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use std::env;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use services::firebase_service::FirebaseAuth;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    // Get configuration from environment
    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let mongodb_uri = env::var("MONGODB_URI").expect("MONGODB_URI must be set");

    log::info!("🚀 Starting LoanLink Service...");

    // Firebase verifier from the base64-encoded service-account key
    let firebase = FirebaseAuth::from_env().expect("Failed to load FB_SERVICE_KEY");
    log::info!("🔑 Token verifier ready for project {}", firebase.project_id());

    // Initialize MongoDB connection
    let db = database::MongoDB::new(&mongodb_uri)
        .await
        .expect("Failed to connect to MongoDB");
    log::info!("✅ MongoDB connected successfully");

    let db_data = web::Data::new(db);
    let firebase_data = web::Data::new(firebase);

    log::info!("🌐 Server starting on {}:{}", host, port);
    log::info!("📚 Swagger UI available at: http://{}:{}/swagger-ui/", host, port);

    // Start HTTP server
    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin("http://localhost:5173")
            .allowed_origin("http://localhost:5174")
            .allowed_origin("https://b12-m11-session.web.app")
            .allowed_methods(vec!["GET", "POST", "PATCH", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                actix_web::http::header::AUTHORIZATION,
                actix_web::http::header::CONTENT_TYPE,
                actix_web::http::header::ACCEPT,
            ])
            .supports_credentials()
            .max_age(3600);

        // Generate OpenAPI specification
        let openapi = api::swagger::ApiDoc::openapi();

        App::new()
            .app_data(db_data.clone())
            .app_data(firebase_data.clone())
            .wrap(cors)
            .wrap(Logger::default())
            // Swagger UI
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi.clone()),
            )
            // Greeting & health
            .route("/", web::get().to(api::health::greeting))
            .route("/health", web::get().to(api::health::health_check))
            // Loans
            .route("/all-loans", web::get().to(api::loans::all_loans))
            .route("/loan/{id}", web::get().to(api::loans::loan_details))
            .route("/add-loan", web::post().to(api::loans::add_loan))
            .route("/update-loan/{id}", web::patch().to(api::loans::update_loan))
            .route("/delete-loan/{id}", web::delete().to(api::loans::delete_loan))
            // Applications - GET is token-gated, POST is open, so auth lives in
            // the VerifiedUser extractor rather than a scope middleware
            .service(
                web::resource("/applications")
                    .route(web::get().to(api::applications::list_applications))
                    .route(web::post().to(api::applications::add_application)),
            )
            .route(
                "/application-details/{id}",
                web::get().to(api::applications::application_details),
            )
            .route(
                "/applications/{id}",
                web::patch().to(api::applications::update_application),
            )
            .route(
                "/my-applications/{id}",
                web::delete().to(api::applications::delete_application),
            )
            // Users - /user/role before /user/{id} so the literal wins
            .service(
                web::resource("/users")
                    .route(web::get().to(api::users::list_users))
                    .route(web::post().to(api::users::save_user)),
            )
            .route("/user/role", web::get().to(api::users::user_role))
            .route("/user/{id}", web::patch().to(api::users::update_user))
    })
    .bind(format!("{}:{}", host, port))?
    .run()
    .await
}
