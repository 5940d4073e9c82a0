//! Authentication handlers

use axum::{
    extract::{Extension, Json},
    http::{header::SET_COOKIE, StatusCode},
    response::{AppendHeaders, IntoResponse},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use super::extractors::{AuthedUser, SESSION_COOKIE};
use super::models::{
    CandidateIdentity, Claims, GoogleIdTokenPayload, LoginRequest, ProviderLink, RegisterRequest,
    User,
};
use super::services::AuthService;
use super::validators::LoginValidator;
use crate::common::{safe_email_log, ApiError, AppState, Validator};

/// POST /api/auth/register
/// Creates a credential account; the user signs in separately afterwards
///
/// # Request Body
/// ```json
/// { "name": "...", "email": "...", "password": "..." }
/// ```
pub async fn register_handler(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let state = state_lock.read().await.clone();

    let auth_service = AuthService::new(state.db.clone());
    let user = auth_service.register(payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "Account created successfully",
            "user": user,
        })),
    ))
}

/// POST /api/auth/login
/// Authenticates with email and password
///
/// Every failure mode answers with the same message so attempts cannot tell
/// an unknown address from a wrong password.
pub async fn login_handler(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let state = state_lock.read().await.clone();

    // A malformed submission gets the same uniform rejection as a mismatch
    let shape = LoginValidator.validate(&payload);
    if !shape.is_valid {
        debug!("Login rejected: malformed credentials submission");
        return Err(ApiError::Unauthorized("Invalid email or password".to_string()));
    }

    let auth_service = AuthService::new(state.db.clone());

    let identity = auth_service
        .verify_credentials(&payload.email, &payload.password)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid email or password".to_string()))?;

    let user = auth_service
        .reconcile(CandidateIdentity {
            id: Some(identity.id),
            email: identity.email,
            name: identity.name,
            image: None,
            link: None,
        })
        .await?;

    info!(
        user_id = %user.id,
        email = %safe_email_log(&user.email),
        "User authentication successful via credentials"
    );

    session_response(&state, &user)
}

/// POST /api/auth/google
/// Authenticates a user via Google OAuth ID token
///
/// # Request Body
/// ```json
/// { "id_token": "<google id token>" }
/// ```
pub async fn google_auth_handler(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Json(payload): Json<GoogleIdTokenPayload>,
) -> Result<impl IntoResponse, ApiError> {
    info!("🔐 Received Google auth request");
    let state = state_lock.read().await.clone();

    let google = state.providers.google.clone().ok_or_else(|| {
        warn!("Google sign-in attempted but the provider is not configured");
        ApiError::ServiceUnavailable("google sign-in is not enabled".to_string())
    })?;

    // Verify token with Google's tokeninfo endpoint
    // Docs: https://developers.google.com/identity/sign-in/web/backend-auth
    let tokeninfo_url = format!(
        "https://oauth2.googleapis.com/tokeninfo?id_token={}",
        payload.id_token
    );

    debug!("Initiating Google token validation with tokeninfo endpoint");

    let resp = state.http.get(&tokeninfo_url).send().await;
    let body = match resp {
        Ok(r) => {
            let status = r.status();
            debug!(http_status = %status, "Received response from Google tokeninfo endpoint");

            if status.is_success() {
                match r.json::<serde_json::Value>().await {
                    Ok(j) => j,
                    Err(e) => {
                        error!(error = %e, "Failed to parse Google tokeninfo JSON response");
                        return Err(ApiError::BadRequest("malformed id_token".to_string()));
                    }
                }
            } else {
                match status.as_u16() {
                    400 => {
                        warn!(http_status = %status, "Google tokeninfo returned 400");
                        return Err(ApiError::BadRequest(
                            "invalid or malformed id_token".to_string(),
                        ));
                    }
                    401 => {
                        warn!(http_status = %status, "Google tokeninfo returned 401");
                        return Err(ApiError::Unauthorized(
                            "expired or invalid id_token".to_string(),
                        ));
                    }
                    _ => {
                        warn!(http_status = %status, "Google tokeninfo returned error status");
                        return Err(ApiError::BadRequest(
                            "id_token validation failed".to_string(),
                        ));
                    }
                }
            }
        }
        Err(e) => {
            error!(
                error = %e,
                endpoint = "https://oauth2.googleapis.com/tokeninfo",
                "HTTP error contacting Google tokeninfo endpoint"
            );
            return Err(ApiError::InternalServer(
                "google token validation service unavailable".to_string(),
            ));
        }
    };

    // Extract required fields: email, sub
    let email = body
        .get("email")
        .and_then(|v| v.as_str())
        .map(str::to_string);
    let sub = body.get("sub").and_then(|v| v.as_str()).map(str::to_string);
    let name = body
        .get("name")
        .and_then(|v| v.as_str())
        .map(str::to_string);
    let picture = body
        .get("picture")
        .and_then(|v| v.as_str())
        .map(str::to_string);

    // Reconciliation fails closed without an email, so require it here too
    let (email, sub) = match (email, sub) {
        (Some(e), Some(s)) => (e, s),
        (email, sub) => {
            warn!(
                has_email = email.is_some(),
                has_sub = sub.is_some(),
                "Google token missing required fields (email/sub)"
            );
            return Err(ApiError::BadRequest(
                "token missing required fields".to_string(),
            ));
        }
    };

    if let Some(email_verified) = body.get("email_verified").and_then(|v| v.as_bool()) {
        if !email_verified {
            warn!("Google token contains unverified email address");
        }
    }

    // Check token expiration
    if let Some(exp) = body.get("exp").and_then(|v| v.as_i64()) {
        if exp < Utc::now().timestamp() {
            warn!(token_exp = exp, "Google token has expired");
            return Err(ApiError::Unauthorized("token has expired".to_string()));
        }
    }

    // Audience must match the configured client id
    match body.get("aud").and_then(|v| v.as_str()) {
        Some(aud) if aud == google.client_id => {
            debug!(token_audience = %aud, "Google token audience validation successful");
        }
        Some(aud) => {
            warn!(
                token_audience = %aud,
                expected_client_id = %google.client_id,
                "Google token audience validation failed - rejecting token"
            );
            return Err(ApiError::Unauthorized("token audience mismatch".to_string()));
        }
        None => {
            warn!("Google token missing audience field - rejecting token");
            return Err(ApiError::Unauthorized("token missing audience".to_string()));
        }
    }

    debug!(
        email = %safe_email_log(&email),
        provider = "google",
        provider_id = %sub,
        "Google token validation successful, proceeding with reconciliation"
    );

    let auth_service = AuthService::new(state.db.clone());
    let user = auth_service
        .reconcile(CandidateIdentity {
            id: None,
            email,
            name,
            image: picture,
            link: Some(ProviderLink::oidc(
                "google",
                &sub,
                Some(payload.id_token.clone()),
            )),
        })
        .await?;

    info!(
        user_id = %user.id,
        email = %safe_email_log(&user.email),
        provider = "google",
        "User authentication successful via Google OAuth"
    );

    session_response(&state, &user)
}

/// GET /api/me
/// Returns the current authenticated user's information
pub async fn me_handler(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let state = state_lock.read().await.clone();

    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(&authed.id)
        .fetch_one(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    Ok(Json(serde_json::json!({
        "user": user,
        "role": authed.role,
    })))
}

/// POST /api/auth/logout
/// Clears the session cookie; tokens are stateless so nothing is revoked
/// server-side
pub async fn logout_handler(_authed: AuthedUser) -> Result<impl IntoResponse, ApiError> {
    info!("User logout successful");

    let expired_cookie = format!(
        "{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0",
        SESSION_COOKIE
    );

    Ok((
        AppendHeaders([(SET_COOKIE, expired_cookie)]),
        Json(serde_json::json!({
            "message": "Logout successful"
        })),
    ))
}

// ---- Helper Functions ----

/// Encode session claims (user id and role) into a signed token
pub fn issue_session_token(
    jwt_secret: &str,
    ttl_hours: i64,
    user: &User,
) -> Result<String, ApiError> {
    let exp = (Utc::now() + Duration::hours(ttl_hours)).timestamp() as usize;
    let claims = Claims {
        sub: user.id.clone(),
        role: user.role.clone(),
        exp,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(jwt_secret.as_bytes()),
    )
    .map_err(|e| {
        error!(error = %e, user_id = %user.id, "JWT encoding error during authentication");
        ApiError::InternalServer("jwt error".to_string())
    })
}

/// Build the token + user JSON body and attach the session cookie
fn session_response(
    state: &AppState,
    user: &User,
) -> Result<(AppendHeaders<[(axum::http::HeaderName, String); 1]>, Json<serde_json::Value>), ApiError>
{
    let token = issue_session_token(&state.jwt_secret, state.session_ttl_hours, user)?;

    let cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE,
        token,
        state.session_ttl_hours * 3600
    );

    Ok((
        AppendHeaders([(SET_COOKIE, cookie)]),
        Json(serde_json::json!({
            "token": token,
            "user": user,
        })),
    ))
}
