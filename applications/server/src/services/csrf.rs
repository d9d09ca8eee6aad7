/// CSRF token service
///
/// Tokens are HS256 JWTs whose `sid` claim names the session they were issued
/// for. A token only verifies when presented alongside that same session
/// cookie, so a token lifted from one browser is useless in another.
use crate::error::{Result, ServerError};
use crate::services::session::SessionId;
use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Headers a client may send the token in
pub const CSRF_HEADERS: [&str; 2] = ["x-csrftoken", "x-csrf-token"];

/// Form field a client may send the token in
pub const CSRF_FIELD: &str = "csrf_token";

const MAX_TOKEN_LIFETIME_SECS: u64 = 31 * 24 * 3600;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CsrfError {
    #[error("The CSRF session cookie is missing.")]
    MissingSession,

    #[error("The CSRF token is missing.")]
    MissingToken,

    #[error("The CSRF token has expired.")]
    Expired,

    #[error("The CSRF token is invalid.")]
    Invalid,

    #[error("The CSRF tokens do not match.")]
    SessionMismatch,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CsrfClaims {
    pub sid: String, // Session the token is bound to
    pub exp: i64,    // Expiration time
    pub iat: i64,    // Issued at
}

#[derive(Clone)]
pub struct CsrfService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_lifetime: Duration,
}

impl CsrfService {
    pub fn new(secret: &str, token_lifetime_secs: u64) -> Self {
        let secs = token_lifetime_secs.min(MAX_TOKEN_LIFETIME_SECS) as i64;
        Self::with_lifetime(secret, Duration::seconds(secs))
    }

    fn with_lifetime(secret: &str, token_lifetime: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            token_lifetime,
        }
    }

    /// Issue a token bound to `session`
    pub fn issue_token(&self, session: &SessionId) -> Result<String> {
        let now = Utc::now();
        let claims = CsrfClaims {
            sid: session.as_str().to_string(),
            exp: (now + self.token_lifetime).timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(ServerError::from)
    }

    /// Check that `token` is genuine, unexpired and bound to `session`
    pub fn verify_token(
        &self,
        token: &str,
        session: &SessionId,
    ) -> std::result::Result<(), CsrfError> {
        let claims = decode::<CsrfClaims>(token, &self.decoding_key, &Validation::default())
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => CsrfError::Expired,
                _ => CsrfError::Invalid,
            })?
            .claims;

        if claims.sid != session.as_str() {
            return Err(CsrfError::SessionMismatch);
        }

        Ok(())
    }
}
