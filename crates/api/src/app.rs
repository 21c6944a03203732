use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use domain::Repositories;
use shared::jwt::{JwtConfig, JwtError};

use crate::config::Config;
use crate::middleware::{metrics_handler, metrics_middleware, require_lecturer_auth, trace_id};
use crate::routes::{attendance, auth, courses, health, sessions};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub repos: Repositories,
    pub jwt: Arc<JwtConfig>,
    /// Present only with the Postgres backend; used by the health probes.
    pub pool: Option<PgPool>,
}

impl AppState {
    pub fn new(
        config: Config,
        repos: Repositories,
        pool: Option<PgPool>,
    ) -> Result<Self, JwtError> {
        let jwt = JwtConfig::with_leeway(
            &config.jwt.secret,
            config.jwt.access_token_expiry_secs,
            config.jwt.leeway_secs,
        )?;

        Ok(Self {
            config: Arc::new(config),
            repos,
            jwt: Arc::new(jwt),
            pool,
        })
    }
}

fn cors_layer(config: &Config) -> CorsLayer {
    if config.security.cors_origins.is_empty() {
        // Default: allow any origin (for development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

pub fn create_app(state: AppState) -> Router {
    let config = state.config.clone();

    // Lecturer routes (require a bearer token)
    let protected_routes = Router::new()
        .route("/verify-token", get(auth::verify_token))
        .route(
            "/jadwal",
            get(sessions::list_sessions).post(sessions::create_session),
        )
        .route(
            "/jadwal/:id",
            get(sessions::get_session)
                .put(sessions::update_session)
                .delete(sessions::delete_session),
        )
        .route("/jadwal/:id/close", post(sessions::close_session))
        .route("/presensi/jadwal/:id", get(attendance::list_attendance))
        .route(
            "/presensi/jadwal/:id/summary",
            get(attendance::attendance_summary),
        )
        .route(
            "/presensi/jadwal/:id/:presensi_id",
            patch(attendance::update_status),
        )
        .route(
            "/mata-kuliah",
            get(courses::list_courses).post(courses::create_course),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_lecturer_auth,
        ));

    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/login-dosen", post(auth::login_by_nidn))
        .route("/login", post(auth::login_by_email))
        .route("/presensi", post(attendance::check_in))
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors_layer(&config))
        .with_state(state)
}
