/// HTTP router
use crate::{api, config::ServerConfig, middleware, state::AppState, views};
use axum::{
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    limit::RequestBodyLimitLayer,
    services::ServeDir,
    trace::{DefaultMakeSpan, TraceLayer},
};

/// Build the application router
///
/// Write routes check the client's rate limit first, then the CSRF token, and
/// only then run the handler. The like route resolves its comment id before
/// all of these.
pub fn create_router(app_state: AppState, config: &ServerConfig) -> Router {
    let submit_limit = Arc::clone(&app_state.limits.submit);
    let like_limit = Arc::clone(&app_state.limits.like);
    let csrf_layer =
        || axum_middleware::from_fn_with_state(app_state.clone(), middleware::csrf_middleware);

    let api_routes = Router::new()
        .route("/health", get(api::health::health))
        .route(
            "/comments",
            get(api::comments::list_comments).merge(
                post(api::comments::create_comment)
                    .route_layer(csrf_layer())
                    .route_layer(axum_middleware::from_fn_with_state(
                        submit_limit,
                        middleware::rate_limit_middleware,
                    )),
            ),
        )
        .route(
            "/comments/:id/like",
            post(api::comments::like_comment)
                .route_layer(csrf_layer())
                .route_layer(axum_middleware::from_fn_with_state(
                    like_limit,
                    middleware::rate_limit_middleware,
                ))
                .route_layer(axum_middleware::from_fn(middleware::comment_id_middleware)),
        );

    let max_body = config.uploads.max_content_length;

    Router::new()
        .route("/", get(views::index))
        .nest("/api", api_routes)
        .nest_service("/static", ServeDir::new(&config.server.static_dir))
        .layer(DefaultBodyLimit::max(max_body))
        .layer(RequestBodyLimitLayer::new(max_body))
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default()))
        .with_state(app_state)
}
