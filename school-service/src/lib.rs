pub mod config;
pub mod db;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod utils;

use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    middleware::{from_fn, from_fn_with_state},
    routing::{delete, get, post, put},
    Router,
};
use service_core::middleware::{
    metrics::metrics_middleware,
    rate_limit::{ip_rate_limit_middleware, IpRateLimiter},
    security_headers::security_headers_middleware,
    tracing::request_id_middleware,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::SchoolConfig;
use crate::middleware::{
    authenticate, require_capability, require_roles, AuthState, INSTITUTION_HEADER,
};
use crate::models::Role;
use crate::services::Database;

#[derive(Clone)]
pub struct AppState {
    pub config: SchoolConfig,
    pub db: Database,
    pub auth: AuthState,
    pub login_rate_limiter: IpRateLimiter,
    pub ip_rate_limiter: IpRateLimiter,
}

pub fn build_router(state: AppState) -> Router {
    // Administration: role-gated on top of authentication.
    let admin_routes = Router::new()
        .route("/admin/institutions", post(handlers::institution::create_institution))
        .route(
            "/admin/accounts",
            post(handlers::account::create_account).get(handlers::account::list_accounts),
        )
        .route(
            "/admin/accounts/:account_id/institutions/:institution_id",
            put(handlers::account::grant_institution_link)
                .delete(handlers::account::revoke_institution_link),
        )
        .route(
            "/admin/institutions/:institution_id/grading-periods",
            post(handlers::grading::create_grading_period),
        )
        .route(
            "/admin/grading-periods/:period_id/sub-periods",
            post(handlers::grading::create_grading_sub_period),
        )
        .route(
            "/admin/role-grants",
            post(handlers::grant::create_role_grant).get(handlers::grant::list_role_grants),
        )
        .route(
            "/admin/role-grants/:grant_id",
            delete(handlers::grant::delete_role_grant),
        )
        .route_layer(from_fn(require_roles(&[Role::Admin])));

    // Everything that requires a resolved session.
    let protected_routes = Router::new()
        .route("/users/me", get(handlers::auth::me))
        .route("/institutions", get(handlers::institution::list_institutions))
        .route(
            "/institutions/:institution_id",
            get(handlers::institution::get_institution),
        )
        .route(
            "/students",
            post(handlers::student::create_student).get(handlers::student::list_students),
        )
        .route("/students/:student_id", get(handlers::student::get_student))
        .route(
            "/students/:student_id/grades",
            post(handlers::grade::record_grade).get(handlers::grade::list_grades),
        )
        .route(
            "/students/:student_id/report-card",
            get(handlers::report::report_card)
                .route_layer(from_fn(require_capability("reports", "read"))),
        )
        .route(
            "/courses",
            post(handlers::course::create_course).get(handlers::course::list_courses),
        )
        .route("/courses/:course_id", get(handlers::course::get_course))
        .route(
            "/subjects",
            post(handlers::subject::create_subject).get(handlers::subject::list_subjects),
        )
        .route("/subjects/:subject_id", get(handlers::subject::get_subject))
        .merge(admin_routes)
        .layer(from_fn_with_state(state.auth.clone(), authenticate));

    // Login gets its own, tighter rate limit.
    let login_route = Router::new()
        .route("/auth/login", post(handlers::auth::login))
        .layer(from_fn_with_state(
            state.login_rate_limiter.clone(),
            ip_rate_limit_middleware,
        ));

    let ip_limiter = state.ip_rate_limiter.clone();
    let allowed_origins: Vec<HeaderValue> = state
        .config
        .security
        .allowed_origins
        .iter()
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::error!(origin = %o, error = %e, "Invalid CORS origin, skipping");
                None
            }
        })
        .collect();

    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/health/ready", get(handlers::health::readiness))
        .merge(login_route)
        .merge(protected_routes)
        .with_state(state)
        .layer(from_fn_with_state(ip_limiter, ip_rate_limit_middleware))
        .layer(from_fn(metrics_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .layer(from_fn(security_headers_middleware))
        .layer(
            CorsLayer::new()
                .allow_origin(allowed_origins)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([
                    header::AUTHORIZATION,
                    header::CONTENT_TYPE,
                    HeaderName::from_static(INSTITUTION_HEADER),
                ]),
        )
}
