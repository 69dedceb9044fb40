use axum::{Router, http::StatusCode, routing::get};
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::AppState;
use crate::config::Config;
use crate::handlers;

/// Create explorer routes
pub fn explore_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::explore))
        .route("/{*path}", get(handlers::explore))
}

/// Wrap `router` in the configured middleware stack: request timeout,
/// tracing and, if enabled, permissive CORS.
pub fn with_middleware<S>(router: Router<S>, config: &Config) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    let router = router
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            config.request_timeout(),
        ))
        .layer(TraceLayer::new_for_http());

    if config.cors {
        router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
    } else {
        router
    }
}

/// Full application: routes plus the configured middleware stack
pub fn app(state: AppState) -> Router {
    let config = state.config.clone();
    with_middleware(explore_routes(), &config).with_state(state)
}
