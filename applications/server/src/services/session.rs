/// Anonymous browser sessions
///
/// A session is nothing more than a random id in a cookie. It carries no data;
/// its only job is to give CSRF tokens something to be bound to.
use axum::http::{header, HeaderMap, HeaderValue};
use std::fmt;
use uuid::Uuid;

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "murmur_session";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    /// Generate a new random session ID
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Parse a session id, accepting only well-formed UUIDs
    pub fn parse(value: &str) -> Option<Self> {
        Uuid::parse_str(value).ok().map(|id| Self(id.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Read the session cookie from request headers
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == SESSION_COOKIE)
            .and_then(|(_, value)| Self::parse(value.trim()))
    }

    /// `Set-Cookie` value establishing this session
    pub fn set_cookie_header(&self) -> HeaderValue {
        // UUIDs are plain ASCII, always a valid header value
        HeaderValue::from_str(&format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax",
            SESSION_COOKIE, self.0
        ))
        .unwrap_or_else(|_| HeaderValue::from_static("murmur_session=; Path=/"))
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
