use mongodb::{Client, Collection, Database};
use std::error::Error;

use crate::models::{Application, Loan, User};

/// Database name used when the connection string carries no path segment.
pub const DEFAULT_DB_NAME: &str = "loanLinkDB";

pub const LOANS_COLLECTION: &str = "all-Loans";
pub const APPLICATIONS_COLLECTION: &str = "loan-application";
pub const USERS_COLLECTION: &str = "users";

/// Connected handle built once in `main` and shared via `web::Data`.
/// The driver's `Database` keeps its `Client` (and pool) alive internally.
#[derive(Clone)]
pub struct MongoDB {
    db: Database,
}

impl MongoDB {
    pub async fn new(uri: &str) -> Result<Self, Box<dyn Error>> {
        let mut client_options = mongodb::options::ClientOptions::parse(uri).await?;

        client_options.connect_timeout = Some(std::time::Duration::from_secs(5));
        client_options.server_selection_timeout = Some(std::time::Duration::from_secs(5));

        let db_name = client_options
            .default_database
            .clone()
            .unwrap_or_else(|| DEFAULT_DB_NAME.to_string());

        let client = Client::with_options(client_options)?;
        let db = client.database(&db_name);

        // Test connection
        db.list_collection_names().await?;

        Ok(Self { db })
    }

    pub fn loans(&self) -> Collection<Loan> {
        self.db.collection(LOANS_COLLECTION)
    }

    pub fn applications(&self) -> Collection<Application> {
        self.db.collection(APPLICATIONS_COLLECTION)
    }

    pub fn users(&self) -> Collection<User> {
        self.db.collection(USERS_COLLECTION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_connection_and_collections() {
        dotenv::dotenv().ok();
        let uri = std::env::var("MONGODB_URI")
            .unwrap_or_else(|_| "mongodb://localhost:27017/loanLinkDB".to_string());

        let db = MongoDB::new(&uri).await.expect("connection failed");
        assert_eq!(db.loans().name(), LOANS_COLLECTION);
        assert_eq!(db.applications().name(), APPLICATIONS_COLLECTION);
        assert_eq!(db.users().name(), USERS_COLLECTION);
    }
}
