use crate::api::handlers::{auth, health, restricted, users};
use anyhow::{Context, Result};
use axum::{
    body::Body,
    extract::MatchedPath,
    http::{HeaderName, HeaderValue, Request},
    middleware,
    routing::{get, post},
    Extension, Router,
};
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    request_id::PropagateRequestIdLayer, set_header::SetRequestHeaderLayer, trace::TraceLayer,
};
use tracing::{info, info_span, Span};
use ulid::Ulid;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod handlers;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        users::users,
        restricted::restricted,
        auth::register::register,
        auth::login::login,
        auth::session::logout,
        auth::session::checklogin,
    ),
    components(schemas(
        auth::types::Credentials,
        auth::types::WelcomeResponse,
        auth::types::MessageResponse,
        auth::types::ErrorResponse,
        users::UserSummary,
    )),
    tags(
        (name = "auth", description = "Register, login, logout and session checks"),
        (name = "users", description = "User listing behind the session gate"),
        (name = "restricted", description = "Session-gated sections"),
        (name = "health", description = "Service health and build info")
    )
)]
struct ApiDoc;

/// Start the server
/// # Errors
/// Return error if failed to start the server
pub async fn new(port: u16, dsn: String, config: auth::AuthConfig) -> Result<()> {
    // Connect to database
    let pool = PgPoolOptions::new()
        .min_connections(1)
        .max_connections(5)
        .max_lifetime(Duration::from_secs(60 * 2))
        .test_before_acquire(true)
        .connect(&dsn)
        .await
        .context("Failed to connect to database")?;

    auth::ensure_schema(&pool)
        .await
        .context("Failed to prepare database schema")?;

    let app = router(pool, config);

    let listener = TcpListener::bind(format!("::0:{port}")).await?;

    info!("Listening on [::]:{}", port);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Gracefully shutdown");
        })
        .await?;

    Ok(())
}

/// Build the application router; the integration tests drive this directly.
#[must_use]
pub fn router(pool: PgPool, config: auth::AuthConfig) -> Router {
    // The gate runs only for these routes; it resolves the session once and
    // hands the record to the handler through request extensions.
    let protected = Router::new()
        .route("/api/users", get(users::users))
        .route("/api/restricted/:section", get(restricted::restricted))
        .route_layer(middleware::from_fn(auth::session::require_session));

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(health::health))
        .route("/api/checklogin", get(auth::session::checklogin))
        .route("/api/login", post(auth::login::login))
        .route("/api/logout", post(auth::session::logout))
        .route("/api/register", post(auth::register::register))
        .merge(protected)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestHeaderLayer::if_not_present(
                    HeaderName::from_static("x-request-id"),
                    |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
                ))
                .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                    "x-request-id",
                )))
                .layer(TraceLayer::new_for_http().make_span_with(make_span))
                .layer(Extension(pool))
                .layer(Extension(Arc::new(config))),
        )
}

fn make_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);

    info_span!(
        "http.request",
        http.method = %request.method(),
        http.route = matched_path,
        request_id
    )
}
