//! Session and login-code store implementation.
//!
//! Sessions are opaque bearer tokens. Only a SHA-256 hash of the token is
//! stored; the cleartext exists once, in the issuance response.

use chrono::{Duration, Utc};
use sha2::{Digest, Sha256};
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use quire_core::{defaults, Error, Result, Session};

/// PostgreSQL-backed session store.
pub struct PgSessionStore {
    pool: Pool<Postgres>,
}

impl PgSessionStore {
    /// Create a new PgSessionStore with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    fn hash_secret(secret: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(secret.as_bytes());
        hex::encode(hasher.finalize())
    }

    fn generate_secret() -> String {
        let bytes: [u8; 32] = rand::random();
        hex::encode(bytes)
    }

    /// Issue a new session for `email` with the given lifetime.
    ///
    /// Returns the session including the cleartext bearer token.
    pub async fn issue(&self, email: &str, lifetime: Duration) -> Result<Session> {
        let token = Self::generate_secret();
        let token_hash = Self::hash_secret(&token);
        let expires_at = Utc::now() + lifetime;

        sqlx::query(
            "INSERT INTO session (id, token_hash, email, expires_at)
             VALUES ($1, $2, $3, $4)",
        )
        .bind(Uuid::new_v4())
        .bind(&token_hash)
        .bind(email)
        .bind(expires_at)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(Session {
            access_token: token,
            email: email.to_string(),
            expires_at,
        })
    }

    /// Issue a session with the default lifetime.
    pub async fn issue_default(&self, email: &str) -> Result<Session> {
        self.issue(email, Duration::hours(defaults::SESSION_LIFETIME_HOURS))
            .await
    }

    /// Look up a bearer token. Returns `None` for unknown, revoked, or
    /// expired tokens.
    pub async fn introspect(&self, token: &str) -> Result<Option<Session>> {
        let hash = Self::hash_secret(token);
        let now = Utc::now();

        let row = sqlx::query(
            "SELECT email, expires_at, revoked FROM session WHERE token_hash = $1",
        )
        .bind(&hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(row.and_then(|r| {
            let revoked: bool = r.get("revoked");
            let expires_at: chrono::DateTime<Utc> = r.get("expires_at");
            if revoked || expires_at <= now {
                return None;
            }
            Some(Session {
                access_token: token.to_string(),
                email: r.get("email"),
                expires_at,
            })
        }))
    }

    /// Revoke a session token. Idempotent.
    pub async fn revoke(&self, token: &str) -> Result<()> {
        let hash = Self::hash_secret(token);
        sqlx::query("UPDATE session SET revoked = true WHERE token_hash = $1")
            .bind(&hash)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(())
    }

    /// Create a one-shot authorization code for `email`, as handed to the
    /// auth callback redirect.
    pub async fn create_login_code(&self, email: &str) -> Result<String> {
        let code = Self::generate_secret();
        let code_hash = Self::hash_secret(&code);
        let expires_at = Utc::now() + Duration::minutes(defaults::LOGIN_CODE_LIFETIME_MINS);

        sqlx::query(
            "INSERT INTO auth_code (code_hash, email, expires_at)
             VALUES ($1, $2, $3)",
        )
        .bind(&code_hash)
        .bind(email)
        .bind(expires_at)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(code)
    }

    /// Exchange an authorization code for a session. Each code works exactly
    /// once; expired, consumed, or unknown codes return `None`.
    pub async fn exchange_code(&self, code: &str) -> Result<Option<Session>> {
        let code_hash = Self::hash_secret(code);
        let now = Utc::now();

        let row = sqlx::query(
            "UPDATE auth_code
             SET consumed = true
             WHERE code_hash = $1 AND consumed = false AND expires_at > $2
             RETURNING email",
        )
        .bind(&code_hash)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        match row {
            Some(r) => {
                let email: String = r.get("email");
                let session = self.issue_default(&email).await?;
                Ok(Some(session))
            }
            None => Ok(None),
        }
    }
}
