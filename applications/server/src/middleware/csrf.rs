/// CSRF middleware
use crate::{
    error::ServerError,
    forms::FormFields,
    services::{
        csrf::{CsrfError, CSRF_FIELD, CSRF_HEADERS},
        SessionId,
    },
    state::AppState,
};
use axum::{
    body::{to_bytes, Body},
    extract::{Request, State},
    http::{header, HeaderMap, Method},
    middleware::Next,
    response::Response,
};

fn is_safe(method: &Method) -> bool {
    matches!(
        *method,
        Method::GET | Method::HEAD | Method::OPTIONS | Method::TRACE
    )
}

fn header_token(headers: &HeaderMap) -> Option<String> {
    CSRF_HEADERS
        .iter()
        .filter_map(|name| headers.get(*name))
        .filter_map(|value| value.to_str().ok())
        .map(str::trim)
        .find(|value| !value.is_empty())
        .map(str::to_owned)
}

/// Require a valid anti-forgery token on state-changing requests
///
/// The token is read from the `X-CSRFToken`/`X-CSRF-Token` header, falling
/// back to the `csrf_token` form field. When the body had to be parsed, the
/// parsed fields are handed on to the handler through the request extensions.
pub async fn csrf_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    if is_safe(request.method()) {
        return Ok(next.run(request).await);
    }

    let session = SessionId::from_headers(request.headers()).ok_or(CsrfError::MissingSession)?;

    let (token, request) = match header_token(request.headers()) {
        Some(token) => (token, request),
        None => {
            let (parts, body) = request.into_parts();
            // Buffering only fails past the body cap or on a dropped connection
            let bytes = to_bytes(body, state.max_body_bytes)
                .await
                .map_err(|_| ServerError::PayloadTooLarge)?;

            let content_type = parts
                .headers
                .get(header::CONTENT_TYPE)
                .and_then(|value| value.to_str().ok());

            // An unparseable body simply has no token in it
            let fields = FormFields::parse(content_type, bytes.clone())
                .await
                .unwrap_or_default();
            let token = fields
                .get(CSRF_FIELD)
                .map(str::to_owned)
                .ok_or(CsrfError::MissingToken)?;

            let mut request = Request::from_parts(parts, Body::from(bytes));
            request.extensions_mut().insert(fields);
            (token, request)
        }
    };

    state.csrf.verify_token(&token, &session)?;

    Ok(next.run(request).await)
}
