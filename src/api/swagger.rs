use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "LoanLink API",
        version = "1.0.0",
        description = "REST backend for the LoanLink dashboard: loan offers, loan applications and users, backed by MongoDB.\n\n**Authentication:** endpoints marked with the bearer scheme expect a Firebase ID token in the `Authorization` header. Responses are raw MongoDB documents or driver acknowledgments, no envelope."
    ),
    paths(
        // Health
        crate::api::health::health_check,

        // Loans
        crate::api::loans::all_loans,
        crate::api::loans::loan_details,
        crate::api::loans::add_loan,
        crate::api::loans::update_loan,
        crate::api::loans::delete_loan,

        // Applications
        crate::api::applications::list_applications,
        crate::api::applications::application_details,
        crate::api::applications::add_application,
        crate::api::applications::update_application,
        crate::api::applications::delete_application,

        // Users
        crate::api::users::list_users,
        crate::api::users::save_user,
        crate::api::users::user_role,
        crate::api::users::update_user,
    ),
    components(
        schemas(
            crate::models::InsertAck,
            crate::models::UpdateAck,
            crate::models::DeleteAck,
            crate::api::health::HealthResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint for monitoring service status."),
        (name = "Loans", description = "Loan offer CRUD. Open documents; only createdBy/createdAt are known to the server."),
        (name = "Applications", description = "Loan application CRUD. Listing and detail reads require a Firebase ID token."),
        (name = "Users", description = "User records keyed by email, with login upsert and role lookup.")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
