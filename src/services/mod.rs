pub mod application_service;
pub mod firebase_service;
pub mod loan_service;
pub mod user_service;
