//! Index page: the comment form and the client script that drives the API.

use crate::{
    error::Result,
    services::{csrf::CSRF_FIELD, SessionId},
    state::AppState,
};
use axum::{
    extract::State,
    http::{header, HeaderMap},
    response::{Html, IntoResponse, Response},
};
use maud::{html, Markup, DOCTYPE};
use murmur_core::validation::{FieldDescriptor, FormDescriptor, COMMENT_FORM};

/// Everything the index page needs to render
#[derive(Debug, Clone)]
pub struct IndexView {
    pub form: &'static FormDescriptor,
    pub csrf_token: String,
}

impl IndexView {
    pub fn new(csrf_token: String) -> Self {
        Self {
            form: &COMMENT_FORM,
            csrf_token,
        }
    }

    pub fn render(&self) -> Markup {
        html! {
            (DOCTYPE)
            html lang="en" {
                head {
                    meta charset="utf-8";
                    meta name="viewport" content="width=device-width, initial-scale=1";
                    meta name="csrf-token" content=(self.csrf_token);
                    title { "Murmur" }
                    link rel="stylesheet" href="/static/css/style.css";
                }
                body {
                    main {
                        h1 { "Murmur" }
                        form id="comment-form" method="post" action="/api/comments" {
                            input type="hidden" name=(CSRF_FIELD) value=(self.csrf_token);
                            @for field in self.form.fields {
                                (render_field(field))
                            }
                            button type="submit" { "Post" }
                        }
                        ul id="comments" {}
                    }
                    script src="/static/js/app.js" {}
                }
            }
        }
    }
}

fn render_field(field: &FieldDescriptor) -> Markup {
    html! {
        label for=(field.name) { (field.label) }
        input
            type="text"
            id=(field.name)
            name=(field.name)
            required[field.required]
            maxlength=[field.max_length];
    }
}

/// GET /
///
/// Starts a session for first-time visitors and embeds a token bound to it.
pub async fn index(State(app_state): State<AppState>, headers: HeaderMap) -> Result<Response> {
    let existing = SessionId::from_headers(&headers);
    let session = existing.clone().unwrap_or_else(SessionId::generate);

    let csrf_token = app_state.csrf.issue_token(&session)?;
    let page = Html(IndexView::new(csrf_token).render().into_string());

    let mut response = page.into_response();
    if existing.is_none() {
        tracing::debug!(session = %session, "Starting new session");
        response
            .headers_mut()
            .insert(header::SET_COOKIE, session.set_cookie_header());
    }

    Ok(response)
}
