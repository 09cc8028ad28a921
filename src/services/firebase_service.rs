// ==================== FIREBASE TOKEN VERIFICATION ====================
// Verifies Firebase ID tokens (RS256) against Google's secure-token JWKs.
// The service-account JSON arrives base64-encoded in FB_SERVICE_KEY; only
// its project_id is needed to pin audience and issuer.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use serde::Deserialize;

use crate::utils::AppError;

const JWK_URL: &str =
    "https://www.googleapis.com/service_accounts/v1/jwk/securetoken@system.gserviceaccount.com";
const ISSUER_PREFIX: &str = "https://securetoken.google.com/";

/// Google rotates signing keys; an hour is well under their cert lifetime.
const JWK_CACHE_TTL: Duration = Duration::from_secs(3600);

#[derive(Debug, Deserialize)]
struct ServiceAccount {
    project_id: String,
}

#[derive(Debug, Clone, Deserialize)]
struct GoogleJwk {
    kid: String,
    n: String,
    e: String,
}

#[derive(Debug, Deserialize)]
struct GoogleJwkSet {
    keys: Vec<GoogleJwk>,
}

/// Claims of a verified Firebase ID token. Signature, expiry, audience and
/// issuer are enforced during decoding; only what handlers consume is kept.
#[derive(Debug, Clone, Deserialize)]
pub struct FirebaseClaims {
    pub sub: String,
    pub email: Option<String>,
}

// Signing keys are global to the process; every verifier instance shares them.
lazy_static::lazy_static! {
    static ref JWK_CACHE: RwLock<HashMap<String, GoogleJwk>> = RwLock::new(HashMap::new());
    static ref JWK_FETCHED_AT: RwLock<Option<Instant>> = RwLock::new(None);
}

fn cached_jwk(kid: &str) -> Option<GoogleJwk> {
    let fetched_at = JWK_FETCHED_AT.read().ok()?;
    let fresh = fetched_at
        .map(|at| at.elapsed() < JWK_CACHE_TTL)
        .unwrap_or(false);
    if !fresh {
        return None;
    }
    JWK_CACHE.read().ok()?.get(kid).cloned()
}

fn store_jwks(keys: Vec<GoogleJwk>) {
    if let Ok(mut cache) = JWK_CACHE.write() {
        cache.clear();
        for key in keys {
            cache.insert(key.kid.clone(), key);
        }
    }
    if let Ok(mut fetched_at) = JWK_FETCHED_AT.write() {
        *fetched_at = Some(Instant::now());
    }
}

/// Firebase ID token verifier, built once at startup and injected via
/// `web::Data` into the auth extractor.
#[derive(Debug, Clone)]
pub struct FirebaseAuth {
    project_id: String,
    http: reqwest::Client,
}

impl FirebaseAuth {
    /// Builds the verifier from the FB_SERVICE_KEY environment variable.
    pub fn from_env() -> Result<Self, AppError> {
        let encoded = std::env::var("FB_SERVICE_KEY")
            .map_err(|_| AppError::ConfigError("FB_SERVICE_KEY must be set".to_string()))?;
        Self::from_service_key(&encoded)
    }

    /// Builds the verifier from a base64-encoded service-account JSON.
    pub fn from_service_key(encoded: &str) -> Result<Self, AppError> {
        use base64::Engine;

        let decoded = base64::engine::general_purpose::STANDARD
            .decode(encoded.trim())
            .map_err(|e| {
                AppError::ConfigError(format!("FB_SERVICE_KEY is not valid base64: {}", e))
            })?;
        let account: ServiceAccount = serde_json::from_slice(&decoded).map_err(|e| {
            AppError::ConfigError(format!("FB_SERVICE_KEY is not a service-account JSON: {}", e))
        })?;

        Ok(Self {
            project_id: account.project_id,
            http: reqwest::Client::new(),
        })
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// Verifies signature, expiry, audience and issuer of a Firebase ID token.
    pub async fn verify_id_token(&self, token: &str) -> Result<FirebaseClaims, AppError> {
        let header = decode_header(token)
            .map_err(|e| AppError::AuthError(format!("invalid token header: {}", e)))?;
        let kid = header
            .kid
            .ok_or_else(|| AppError::AuthError("token has no key id".to_string()))?;

        let jwk = self.signing_key(&kid).await?;
        let decoding_key = DecodingKey::from_rsa_components(&jwk.n, &jwk.e)
            .map_err(|e| AppError::AuthError(format!("bad signing key: {}", e)))?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[&self.project_id]);
        validation.set_issuer(&[format!("{}{}", ISSUER_PREFIX, self.project_id)]);

        decode::<FirebaseClaims>(token, &decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| AppError::AuthError(e.to_string()))
    }

    async fn signing_key(&self, kid: &str) -> Result<GoogleJwk, AppError> {
        if let Some(jwk) = cached_jwk(kid) {
            return Ok(jwk);
        }

        self.refresh_jwks().await?;

        if let Ok(cache) = JWK_CACHE.read() {
            if let Some(jwk) = cache.get(kid) {
                return Ok(jwk.clone());
            }
        }
        Err(AppError::AuthError(format!("unknown signing key id: {}", kid)))
    }

    async fn refresh_jwks(&self) -> Result<(), AppError> {
        log::debug!("Refreshing Google secure-token JWKs");
        let jwk_set: GoogleJwkSet = self
            .http
            .get(JWK_URL)
            .send()
            .await
            .map_err(|e| AppError::HttpError(format!("JWK fetch failed: {}", e)))?
            .json()
            .await
            .map_err(|e| AppError::HttpError(format!("JWK response was not JSON: {}", e)))?;

        store_jwks(jwk_set.keys);
        Ok(())
    }
}
