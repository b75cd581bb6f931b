use std::sync::Arc;
use std::time::Duration;

use axum::{
    middleware,
    routing::{get, post},
    Json, Router,
};
use tower_governor::{
    governor::GovernorConfigBuilder,
    key_extractor::{PeerIpKeyExtractor, SmartIpKeyExtractor},
    GovernorLayer,
};
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};
use utoipa::OpenApi;

use crate::api::handlers::{auth, health, users};
use crate::api::openapi::ApiDoc;
use crate::auth::middleware::auth_middleware;
use crate::utils::toml_config::RateLimitConfig;
use crate::AppState;

/// Largest accepted request body.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// Builds the full application: public routes, the bearer-protected `/api`
/// tree, and the HTTP layers around them.
pub fn create_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route(
            "/users/{id}",
            get(users::get_user).delete(users::delete_user),
        )
        .route("/me", get(users::me))
        .route_layer(middleware::from_fn_with_state(
            state.token_service.clone(),
            auth_middleware,
        ));

    let rate_limit = state.config.rate_limit.clone();

    #[allow(unused_mut)]
    let mut app = Router::new()
        .route("/health", get(health::health))
        .route("/healthy", get(health::health))
        .route("/users", post(users::register))
        .route("/login", post(auth::login))
        .route("/api-docs/openapi.json", get(openapi_json))
        .nest("/api", protected_routes)
        .with_state(state);

    #[cfg(feature = "swagger-ui")]
    {
        app = app.merge(
            utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
                .url("/swagger-ui/openapi.json", ApiDoc::openapi()),
        );
    }

    let app = if rate_limit.enabled {
        with_rate_limit(app, &rate_limit)
    } else {
        app
    };

    app.layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Builds the governor layer for one key extractor type and applies it.
macro_rules! governed {
    ($app:expr, $config:expr, $extractor:expr) => {{
        let config: &RateLimitConfig = $config;
        let per_request_ms = (60_000 / u64::from(config.requests_per_minute.max(1))).max(1);

        match GovernorConfigBuilder::default()
            .per_millisecond(per_request_ms)
            .burst_size(config.requests_per_minute.max(1))
            .key_extractor($extractor)
            .use_headers()
            .finish()
        {
            Some(governor_conf) => {
                // The limiter keeps one entry per client; drop idle ones periodically.
                let limiter = governor_conf.limiter().clone();
                if let Ok(handle) = tokio::runtime::Handle::try_current() {
                    handle.spawn(async move {
                        let mut interval = tokio::time::interval(Duration::from_secs(60));
                        loop {
                            interval.tick().await;
                            limiter.retain_recent();
                        }
                    });
                }

                $app.layer(GovernorLayer::new(Arc::new(governor_conf)))
            }
            None => {
                tracing::warn!("invalid rate limit settings, rate limiting disabled");
                $app
            }
        }
    }};
}

/// Per-client token bucket: `requests_per_minute` sustained with an equal
/// burst. Responses carry `x-ratelimit-*` headers; excess requests get 429.
///
/// Clients are keyed on the TCP peer address unless `trust_proxy_headers`
/// is set, in which case `X-Forwarded-For`/`X-Real-IP` win.
fn with_rate_limit(app: Router, config: &RateLimitConfig) -> Router {
    tracing::info!(
        requests_per_minute = config.requests_per_minute,
        trust_proxy_headers = config.trust_proxy_headers,
        "rate limiting enabled"
    );

    if config.trust_proxy_headers {
        governed!(app, config, SmartIpKeyExtractor)
    } else {
        governed!(app, config, PeerIpKeyExtractor)
    }
}
