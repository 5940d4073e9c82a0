// src/route_guard_middleware.rs
//! Per-request page guard
//!
//! Evaluated for every non-API request: signed-in users are pushed off the
//! auth pages onto the dashboard, signed-out users are pushed off private
//! pages onto the login page, everything else passes through. API routes
//! and static assets are exempt and rely on the `AuthedUser` extractor
//! instead.

use axum::{
    extract::{Extension, Request},
    http::header::{AUTHORIZATION, COOKIE},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::auth::extractors::cookie_session_token;
use crate::auth::models::Claims;
use crate::common::AppState;

/// Outcome of the guard predicate for one request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    RedirectToLogin,
    RedirectToDashboard,
}

/// Paths never guarded: API surface and static assets
fn is_exempt(path: &str) -> bool {
    path.starts_with("/api") || path.starts_with("/assets") || path == "/favicon.ico"
}

fn is_auth_page(path: &str) -> bool {
    path.starts_with("/login") || path.starts_with("/register")
}

/// The guard predicate
///
/// Public pages are the home page and the two auth pages; every other page
/// requires an authenticated session.
pub fn decide(path: &str, is_authenticated: bool) -> GuardDecision {
    if is_exempt(path) {
        return GuardDecision::Allow;
    }

    let auth_page = is_auth_page(path);
    let public = path == "/" || auth_page;

    if !is_authenticated && !public {
        return GuardDecision::RedirectToLogin;
    }

    if is_authenticated && auth_page {
        return GuardDecision::RedirectToDashboard;
    }

    GuardDecision::Allow
}

/// Whether the request carries a valid session token
/// Checks the session cookie first, then a Bearer header
fn request_is_authenticated(request: &Request, jwt_secret: &str) -> bool {
    let token = request
        .headers()
        .get(COOKIE)
        .and_then(|h| h.to_str().ok())
        .and_then(cookie_session_token)
        .or_else(|| {
            request
                .headers()
                .get(AUTHORIZATION)
                .and_then(|h| h.to_str().ok())
                .map(|auth| auth.strip_prefix("Bearer ").unwrap_or(auth).to_string())
        });

    match token {
        Some(t) => decode::<Claims>(
            &t,
            &DecodingKey::from_secret(jwt_secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .is_ok(),
        None => false,
    }
}

/// Route guard middleware
pub async fn route_guard(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();

    let jwt_secret = {
        let state = state_lock.read().await;
        state.jwt_secret.clone()
    };

    let is_authenticated = request_is_authenticated(&request, &jwt_secret);

    match decide(&path, is_authenticated) {
        GuardDecision::Allow => next.run(request).await,
        GuardDecision::RedirectToLogin => {
            debug!(path = %path, "Route guard: redirecting unauthenticated request to login");
            Redirect::temporary("/login").into_response()
        }
        GuardDecision::RedirectToDashboard => {
            debug!(path = %path, "Route guard: redirecting authenticated request to dashboard");
            Redirect::temporary("/dashboard").into_response()
        }
    }
}
