//! Authentication data models

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// JWT claims structure
///
/// `sub` and `role` are copied into the token at issuance time and
/// re-hydrated into the request identity on every read.
#[derive(Serialize, Deserialize, Debug)]
pub struct Claims {
    pub sub: String,
    pub role: String,
    pub exp: usize,
}

/// User database model
#[derive(FromRow, Serialize, Deserialize, Debug, Clone)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    pub role: String,
    pub image: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// Linked external-provider account row
#[derive(FromRow, Serialize, Deserialize, Debug)]
pub struct Account {
    pub id: String,
    pub user_id: String,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub account_type: String,
    pub provider: String,
    pub provider_account_id: String,
    pub refresh_token: Option<String>,
    pub access_token: Option<String>,
    pub expires_at: Option<i64>,
    pub token_type: Option<String>,
    pub scope: Option<String>,
    pub id_token: Option<String>,
    pub created_at: Option<String>,
}

/// Minimal identity payload returned by the credential verifier on a match
#[derive(Debug, Clone, Serialize)]
pub struct SessionUser {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub role: String,
}

/// External-provider link carried into reconciliation for non-credential
/// sign-ins
#[derive(Debug, Clone)]
pub struct ProviderLink {
    pub provider: String,
    pub provider_account_id: String,
    pub account_type: String,
    pub refresh_token: Option<String>,
    pub access_token: Option<String>,
    pub expires_at: Option<i64>,
    pub token_type: Option<String>,
    pub scope: Option<String>,
    pub id_token: Option<String>,
}

impl ProviderLink {
    /// Link for an OpenID Connect provider where only the ID token is held
    pub fn oidc(provider: &str, provider_account_id: &str, id_token: Option<String>) -> Self {
        Self {
            provider: provider.to_string(),
            provider_account_id: provider_account_id.to_string(),
            account_type: "oidc".to_string(),
            refresh_token: None,
            access_token: None,
            expires_at: None,
            token_type: None,
            scope: None,
            id_token,
        }
    }
}

/// Candidate identity handed to the reconciler after a successful
/// authentication on either path
#[derive(Debug, Clone)]
pub struct CandidateIdentity {
    /// Pre-chosen id (set at registration time for the credential path)
    pub id: Option<String>,
    pub email: String,
    pub name: Option<String>,
    pub image: Option<String>,
    /// Present only for non-credential providers
    pub link: Option<ProviderLink>,
}

/// POST /api/auth/register request body
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// POST /api/auth/login request body
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Google ID token payload for OAuth
#[derive(Deserialize)]
pub struct GoogleIdTokenPayload {
    pub id_token: String,
}
