/// Request body form fields
///
/// Write endpoints accept the same fields as urlencoded, multipart or JSON
/// bodies. The CSRF middleware may already have parsed the body to find the
/// token; in that case the parsed fields travel in the request extensions and
/// the body is not read twice.
use crate::error::{Result, ServerError};
use axum::{
    async_trait,
    extract::{rejection::BytesRejection, FromRequest, Request},
    http::{header, StatusCode},
};
use bytes::Bytes;
use futures_util::stream;
use std::collections::HashMap;
use std::convert::Infallible;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields(HashMap<String, String>);

impl FormFields {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parse a buffered body according to its content type
    ///
    /// Unknown content types yield no fields. Repeated fields keep their first
    /// value. File parts of a multipart body are skipped.
    pub async fn parse(content_type: Option<&str>, body: Bytes) -> Result<Self> {
        let mime = content_type
            .and_then(|ct| ct.split(';').next())
            .map(|m| m.trim().to_ascii_lowercase())
            .unwrap_or_default();

        match mime.as_str() {
            "application/x-www-form-urlencoded" => Ok(Self::from_urlencoded(&body)),
            "multipart/form-data" => {
                Self::from_multipart(content_type.unwrap_or_default(), body).await
            }
            "application/json" => Self::from_json(&body),
            _ => Ok(Self::default()),
        }
    }

    fn from_urlencoded(body: &[u8]) -> Self {
        let mut fields = HashMap::new();
        for (name, value) in url::form_urlencoded::parse(body) {
            fields
                .entry(name.into_owned())
                .or_insert_with(|| value.into_owned());
        }
        Self(fields)
    }

    async fn from_multipart(content_type: &str, body: Bytes) -> Result<Self> {
        let boundary = multer::parse_boundary(content_type)
            .map_err(|e| ServerError::BadRequest(format!("Invalid multipart body: {}", e)))?;

        let body_stream = stream::once(async move { Ok::<Bytes, Infallible>(body) });
        let mut multipart = multer::Multipart::new(body_stream, boundary);

        let mut fields = HashMap::new();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ServerError::BadRequest(format!("Invalid multipart body: {}", e)))?
        {
            if field.file_name().is_some() {
                continue;
            }
            let Some(name) = field.name().map(str::to_owned) else {
                continue;
            };
            let value = field
                .text()
                .await
                .map_err(|e| ServerError::BadRequest(format!("Invalid multipart body: {}", e)))?;
            fields.entry(name).or_insert(value);
        }

        Ok(Self(fields))
    }

    fn from_json(body: &[u8]) -> Result<Self> {
        let object: serde_json::Map<String, serde_json::Value> = serde_json::from_slice(body)
            .map_err(|e| ServerError::BadRequest(format!("Invalid JSON body: {}", e)))?;

        // Only string values can be form fields
        let fields = object
            .into_iter()
            .filter_map(|(name, value)| match value {
                serde_json::Value::String(s) => Some((name, s)),
                _ => None,
            })
            .collect();

        Ok(Self(fields))
    }
}

/// Map a failure to buffer the request body
pub fn body_rejection(rejection: BytesRejection) -> ServerError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ServerError::PayloadTooLarge
    } else {
        ServerError::BadRequest(rejection.body_text())
    }
}

#[async_trait]
impl<S> FromRequest<S> for FormFields
where
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request(req: Request, state: &S) -> std::result::Result<Self, Self::Rejection> {
        if let Some(fields) = req.extensions().get::<FormFields>() {
            return Ok(fields.clone());
        }

        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);

        let body = Bytes::from_request(req, state)
            .await
            .map_err(body_rejection)?;

        Self::parse(content_type.as_deref(), body).await
    }
}
