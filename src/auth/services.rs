use sqlx::SqlitePool;
use tracing::{debug, info, warn};

use super::models::{CandidateIdentity, RegisterRequest, SessionUser, User};
use super::password::{hash_password, verify_password};
use super::validators::RegisterValidator;
use crate::common::{
    generate_account_id, generate_user_id, safe_email_log, ApiError, Validator,
};

pub struct AuthService {
    db: SqlitePool,
}

impl AuthService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    // ============================================================================
    // Credential Verifier
    // ============================================================================

    /// Check a submitted email/password pair against the stored hash
    ///
    /// Returns `None` for an unknown email, a row without a password hash
    /// (OAuth-only account), or a mismatched password. The three cases are
    /// indistinguishable to the caller so failed attempts cannot enumerate
    /// registered addresses.
    pub async fn verify_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<SessionUser>, ApiError> {
        let user: Option<User> = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.db)
            .await
            .map_err(ApiError::DatabaseError)?;

        let user = match user {
            Some(u) => u,
            None => {
                debug!(email = %safe_email_log(email), "Credential check: no such user");
                return Ok(None);
            }
        };

        let stored_hash = match &user.password_hash {
            Some(h) => h,
            None => {
                debug!(
                    user_id = %user.id,
                    "Credential check: account has no password (external provider only)"
                );
                return Ok(None);
            }
        };

        if !verify_password(stored_hash, password) {
            debug!(user_id = %user.id, "Credential check: password mismatch");
            return Ok(None);
        }

        Ok(Some(SessionUser {
            id: user.id,
            email: user.email,
            name: user.name,
            role: user.role,
        }))
    }

    // ============================================================================
    // Identity Reconciler
    // ============================================================================

    /// Map an authentication event to exactly one durable user record
    ///
    /// A single conditional insert keyed on the unique email creates the row
    /// when it is missing and leaves the existing row untouched otherwise,
    /// so two concurrent first sign-ins for the same address converge on one
    /// user. The returned identity always carries the surviving row's id.
    /// For non-credential providers the account link is inserted
    /// idempotently on its (provider, provider_account_id) key.
    pub async fn reconcile(&self, candidate: CandidateIdentity) -> Result<User, ApiError> {
        if candidate.email.is_empty() {
            warn!("Reconciliation rejected: candidate identity has no email");
            return Err(ApiError::Unauthorized(
                "authentication did not supply an email".to_string(),
            ));
        }

        let new_id = candidate
            .id
            .clone()
            .unwrap_or_else(generate_user_id);

        let insert = sqlx::query(
            r#"
            INSERT OR IGNORE INTO users (id, email, name, role, image, created_at, updated_at)
            VALUES (?, ?, ?, 'ADMIN', ?, datetime('now'), datetime('now'))
            "#,
        )
        .bind(&new_id)
        .bind(&candidate.email)
        .bind(&candidate.name)
        .bind(&candidate.image)
        .execute(&self.db)
        .await
        .map_err(ApiError::DatabaseError)?;

        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
            .bind(&candidate.email)
            .fetch_one(&self.db)
            .await
            .map_err(ApiError::DatabaseError)?;

        if insert.rows_affected() > 0 {
            info!(
                user_id = %user.id,
                email = %safe_email_log(&user.email),
                "Created user during reconciliation"
            );
        } else {
            debug!(
                user_id = %user.id,
                email = %safe_email_log(&user.email),
                "Reconciled sign-in onto existing user"
            );
        }

        if let Some(link) = &candidate.link {
            sqlx::query(
                r#"
                INSERT OR IGNORE INTO accounts (
                    id, user_id, type, provider, provider_account_id,
                    refresh_token, access_token, expires_at, token_type,
                    scope, id_token, created_at
                )
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, datetime('now'))
                "#,
            )
            .bind(generate_account_id())
            .bind(&user.id)
            .bind(&link.account_type)
            .bind(&link.provider)
            .bind(&link.provider_account_id)
            .bind(&link.refresh_token)
            .bind(&link.access_token)
            .bind(link.expires_at)
            .bind(&link.token_type)
            .bind(&link.scope)
            .bind(&link.id_token)
            .execute(&self.db)
            .await
            .map_err(ApiError::DatabaseError)?;

            debug!(
                user_id = %user.id,
                provider = %link.provider,
                "Provider account link ensured"
            );
        }

        Ok(user)
    }

    // ============================================================================
    // Registration
    // ============================================================================

    /// Create a credential user
    ///
    /// An already-used email is reported as such and leaves the table
    /// unchanged; all field validation happens before any write.
    pub async fn register(&self, request: RegisterRequest) -> Result<User, ApiError> {
        let validation = RegisterValidator.validate(&request);
        if !validation.is_valid {
            return Err(ApiError::from(validation));
        }

        let existing: Option<(String,)> = sqlx::query_as("SELECT id FROM users WHERE email = ?")
            .bind(&request.email)
            .fetch_optional(&self.db)
            .await
            .map_err(ApiError::DatabaseError)?;

        if existing.is_some() {
            return Err(ApiError::BadRequest("User already exists".to_string()));
        }

        let password_hash = hash_password(&request.password)?;
        let user_id = generate_user_id();

        sqlx::query(
            r#"
            INSERT INTO users (id, email, name, password_hash, role, created_at, updated_at)
            VALUES (?, ?, ?, ?, 'ADMIN', datetime('now'), datetime('now'))
            "#,
        )
        .bind(&user_id)
        .bind(&request.email)
        .bind(request.name.trim())
        .bind(&password_hash)
        .execute(&self.db)
        .await
        .map_err(|e| {
            // The pre-check leaves a narrow window for a concurrent insert
            if e.to_string().contains("UNIQUE constraint failed") {
                ApiError::BadRequest("User already exists".to_string())
            } else {
                ApiError::DatabaseError(e)
            }
        })?;

        info!(
            user_id = %user_id,
            email = %safe_email_log(&request.email),
            "New user registered"
        );

        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(&user_id)
            .fetch_one(&self.db)
            .await
            .map_err(ApiError::DatabaseError)
    }
}
