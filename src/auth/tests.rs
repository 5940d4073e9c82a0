//! Tests for auth module
//!
//! These tests verify core authentication functionality including:
//! - Session token encoding and validation
//! - Credential verification (uniform failure behavior)
//! - Identity reconciliation properties

#[cfg(test)]
mod tests {
    use super::super::*;
    use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
    use sqlx::sqlite::SqlitePoolOptions;
    use sqlx::SqlitePool;

    use super::super::models::{Account, CandidateIdentity, ProviderLink, RegisterRequest};
    use super::super::services::AuthService;
    use crate::common::{migrations, ApiError};

    /// Fresh in-memory database with the real schema
    /// A single connection keeps every query on the same :memory: instance
    async fn test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("Failed to open in-memory database");

        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        pool
    }

    fn register_request(name: &str, email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    fn oauth_candidate(email: &str, provider: &str, account_id: &str) -> CandidateIdentity {
        CandidateIdentity {
            id: None,
            email: email.to_string(),
            name: Some("OAuth User".to_string()),
            image: None,
            link: Some(ProviderLink::oidc(provider, account_id, None)),
        }
    }

    async fn count(pool: &SqlitePool, sql: &str) -> i64 {
        sqlx::query_scalar::<_, i64>(sql)
            .fetch_one(pool)
            .await
            .expect("count query failed")
    }

    // ========================================================================
    // Session token
    // ========================================================================

    #[test]
    fn test_claims_structure() {
        let claims = models::Claims {
            sub: "U_TEST01".to_string(),
            role: "ADMIN".to_string(),
            exp: 1234567890,
        };

        assert_eq!(claims.sub, "U_TEST01");
        assert_eq!(claims.role, "ADMIN");
        assert_eq!(claims.exp, 1234567890);
    }

    #[test]
    fn test_jwt_encoding_and_decoding() {
        let secret = "test_secret_key";
        let claims = models::Claims {
            sub: "U_TEST02".to_string(),
            role: "ADMIN".to_string(),
            exp: 9999999999, // Far future
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .expect("Failed to encode token");

        let decoded = decode::<models::Claims>(
            &token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .expect("Failed to decode token");

        assert_eq!(decoded.claims.sub, "U_TEST02");
        assert_eq!(decoded.claims.role, "ADMIN");
    }

    #[test]
    fn test_jwt_validation_fails_with_wrong_secret() {
        let claims = models::Claims {
            sub: "U_TEST03".to_string(),
            role: "ADMIN".to_string(),
            exp: 9999999999,
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret("test_secret_key".as_bytes()),
        )
        .expect("Failed to encode token");

        let result = decode::<models::Claims>(
            &token,
            &DecodingKey::from_secret("wrong_secret_key".as_bytes()),
            &Validation::new(Algorithm::HS256),
        );

        assert!(
            result.is_err(),
            "Token validation should fail with wrong secret"
        );
    }

    #[test]
    fn test_cookie_session_token_parsing() {
        let header = "theme=dark; session_token=abc.def.ghi; other=1";
        assert_eq!(
            extractors::cookie_session_token(header),
            Some("abc.def.ghi".to_string())
        );

        assert_eq!(extractors::cookie_session_token("theme=dark"), None);
    }

    // ========================================================================
    // Credential Verifier
    // ========================================================================

    #[tokio::test]
    async fn test_correct_password_yields_identity() {
        let pool = test_pool().await;
        let service = AuthService::new(pool.clone());

        let registered = service
            .register(register_request("Alice", "alice@example.com", "secret123"))
            .await
            .expect("registration failed");

        let identity = service
            .verify_credentials("alice@example.com", "secret123")
            .await
            .expect("verification errored")
            .expect("correct password should match");

        assert_eq!(identity.id, registered.id);
        assert_eq!(identity.email, "alice@example.com");
        assert_eq!(identity.role, "ADMIN");
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_email_fail_alike() {
        let pool = test_pool().await;
        let service = AuthService::new(pool.clone());

        service
            .register(register_request("Alice", "alice@example.com", "secret123"))
            .await
            .expect("registration failed");

        let wrong_password = service
            .verify_credentials("alice@example.com", "wrong-password")
            .await
            .expect("verification errored");
        let unknown_email = service
            .verify_credentials("nobody@example.com", "secret123")
            .await
            .expect("verification errored");

        assert!(wrong_password.is_none());
        assert!(unknown_email.is_none());
    }

    #[tokio::test]
    async fn test_passwordless_account_fails_credential_check() {
        let pool = test_pool().await;
        let service = AuthService::new(pool.clone());

        // Account that only ever signed in through a provider
        service
            .reconcile(oauth_candidate("oauth-only@example.com", "google", "g-123"))
            .await
            .expect("reconciliation failed");

        let result = service
            .verify_credentials("oauth-only@example.com", "whatever-password")
            .await
            .expect("verification errored");

        assert!(
            result.is_none(),
            "an account without a stored hash must not verify"
        );
    }

    // ========================================================================
    // Identity Reconciler
    // ========================================================================

    #[tokio::test]
    async fn test_reconcile_creates_user_and_account_link() {
        let pool = test_pool().await;
        let service = AuthService::new(pool.clone());

        let user = service
            .reconcile(oauth_candidate("new@example.com", "google", "g-001"))
            .await
            .expect("reconciliation failed");

        assert!(user.id.starts_with("U_"));
        assert_eq!(user.email, "new@example.com");
        assert_eq!(user.role, "ADMIN");
        assert_eq!(count(&pool, "SELECT COUNT(*) FROM users").await, 1);

        let account = sqlx::query_as::<_, Account>("SELECT * FROM accounts")
            .fetch_one(&pool)
            .await
            .expect("account link missing");
        assert_eq!(account.user_id, user.id);
        assert_eq!(account.provider, "google");
        assert_eq!(account.provider_account_id, "g-001");
        assert_eq!(account.account_type, "oidc");
    }

    #[tokio::test]
    async fn test_same_email_across_providers_is_one_user() {
        let pool = test_pool().await;
        let service = AuthService::new(pool.clone());

        let via_google = service
            .reconcile(oauth_candidate("shared@example.com", "google", "g-002"))
            .await
            .expect("reconciliation failed");
        let via_github = service
            .reconcile(oauth_candidate("shared@example.com", "github", "gh-777"))
            .await
            .expect("reconciliation failed");

        assert_eq!(
            via_google.id, via_github.id,
            "same email must reconcile onto the same user"
        );
        assert_eq!(count(&pool, "SELECT COUNT(*) FROM users").await, 1);
        assert_eq!(count(&pool, "SELECT COUNT(*) FROM accounts").await, 2);
    }

    #[tokio::test]
    async fn test_repeat_provider_sign_in_creates_no_duplicate_link() {
        let pool = test_pool().await;
        let service = AuthService::new(pool.clone());

        for _ in 0..3 {
            service
                .reconcile(oauth_candidate("repeat@example.com", "google", "g-003"))
                .await
                .expect("reconciliation failed");
        }

        assert_eq!(count(&pool, "SELECT COUNT(*) FROM users").await, 1);
        assert_eq!(
            count(&pool, "SELECT COUNT(*) FROM accounts").await,
            1,
            "repeated sign-ins through one provider account must not add rows"
        );
    }

    #[tokio::test]
    async fn test_oauth_sign_in_adopts_credential_user_id() {
        let pool = test_pool().await;
        let service = AuthService::new(pool.clone());

        let registered = service
            .register(register_request("Bob", "bob@example.com", "secret123"))
            .await
            .expect("registration failed");

        let reconciled = service
            .reconcile(oauth_candidate("bob@example.com", "google", "g-004"))
            .await
            .expect("reconciliation failed");

        assert_eq!(
            reconciled.id, registered.id,
            "session identity must be overwritten to the existing user's id"
        );
        // The provider link points at the pre-existing user
        let linked: (String,) =
            sqlx::query_as("SELECT user_id FROM accounts WHERE provider = 'google'")
                .fetch_one(&pool)
                .await
                .expect("account row missing");
        assert_eq!(linked.0, registered.id);
    }

    #[tokio::test]
    async fn test_unseen_email_creates_distinct_user() {
        // Email is the sole reconciliation key: a provider sign-in under a
        // different address is a different identity
        let pool = test_pool().await;
        let service = AuthService::new(pool.clone());

        service
            .register(register_request("Carol", "carol@example.com", "secret123"))
            .await
            .expect("registration failed");

        let other = service
            .reconcile(oauth_candidate("carol@gmail.example", "google", "g-005"))
            .await
            .expect("reconciliation failed");

        assert_eq!(count(&pool, "SELECT COUNT(*) FROM users").await, 2);
        assert_eq!(other.email, "carol@gmail.example");
    }

    #[tokio::test]
    async fn test_reconcile_without_email_fails_closed() {
        let pool = test_pool().await;
        let service = AuthService::new(pool.clone());

        let result = service
            .reconcile(CandidateIdentity {
                id: None,
                email: String::new(),
                name: None,
                image: None,
                link: Some(ProviderLink::oidc("google", "g-006", None)),
            })
            .await;

        assert!(matches!(result, Err(ApiError::Unauthorized(_))));
        assert_eq!(count(&pool, "SELECT COUNT(*) FROM users").await, 0);
        assert_eq!(count(&pool, "SELECT COUNT(*) FROM accounts").await, 0);
    }

    #[tokio::test]
    async fn test_credential_path_reconciles_without_account_row() {
        let pool = test_pool().await;
        let service = AuthService::new(pool.clone());

        let registered = service
            .register(register_request("Dave", "dave@example.com", "secret123"))
            .await
            .expect("registration failed");

        let reconciled = service
            .reconcile(CandidateIdentity {
                id: Some(registered.id.clone()),
                email: registered.email.clone(),
                name: registered.name.clone(),
                image: None,
                link: None,
            })
            .await
            .expect("reconciliation failed");

        assert_eq!(reconciled.id, registered.id);
        assert_eq!(count(&pool, "SELECT COUNT(*) FROM accounts").await, 0);
    }

    // ========================================================================
    // Registration
    // ========================================================================

    #[tokio::test]
    async fn test_duplicate_email_registration_rejected() {
        let pool = test_pool().await;
        let service = AuthService::new(pool.clone());

        service
            .register(register_request("Eve", "eve@example.com", "secret123"))
            .await
            .expect("first registration failed");

        let second = service
            .register(register_request("Eve Again", "eve@example.com", "other-pass"))
            .await;

        match second {
            Err(ApiError::BadRequest(msg)) => assert_eq!(msg, "User already exists"),
            other => panic!("expected User already exists, got {:?}", other.map(|u| u.id)),
        }
        assert_eq!(count(&pool, "SELECT COUNT(*) FROM users").await, 1);
    }

    #[tokio::test]
    async fn test_registration_validation_rejects_before_write() {
        let pool = test_pool().await;
        let service = AuthService::new(pool.clone());

        let short_name = service
            .register(register_request("X", "x@example.com", "secret123"))
            .await;
        let bad_email = service
            .register(register_request("Frank", "not-an-email", "secret123"))
            .await;
        let short_password = service
            .register(register_request("Frank", "frank@example.com", "12345"))
            .await;

        assert!(matches!(short_name, Err(ApiError::ValidationError(_))));
        assert!(matches!(bad_email, Err(ApiError::ValidationError(_))));
        assert!(matches!(short_password, Err(ApiError::ValidationError(_))));
        assert_eq!(
            count(&pool, "SELECT COUNT(*) FROM users").await,
            0,
            "no row may be written for an invalid registration"
        );
    }

    #[tokio::test]
    async fn test_registered_user_stores_hash_not_password() {
        let pool = test_pool().await;
        let service = AuthService::new(pool.clone());

        service
            .register(register_request("Grace", "grace@example.com", "secret123"))
            .await
            .expect("registration failed");

        let stored: (Option<String>,) =
            sqlx::query_as("SELECT password_hash FROM users WHERE email = 'grace@example.com'")
                .fetch_one(&pool)
                .await
                .expect("user row missing");

        let hash = stored.0.expect("hash should be stored");
        assert_ne!(hash, "secret123");
        assert!(hash.starts_with("$argon2"));
    }
}
