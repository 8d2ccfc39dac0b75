// src/routes.rs

use axum::{
    Router,
    http::Method,
    routing::{get, post, put},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{admin, attempt, exam},
    state::AppState,
};

/// Assembles the main application router.
///
/// * Merges all sub-routers (exams, attempts, admin).
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (content store + attempt registry).
pub fn create_router(state: AppState) -> Router {
    let origins = [
        "http://localhost:3000".parse().unwrap(),
        "http://127.0.0.1:3000".parse().unwrap(),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ]);

    let exam_routes = Router::new()
        .route("/", get(exam::list_exams))
        .route("/{id}", get(exam::get_exam))
        .route("/{id}/attempts", post(attempt::start_attempt));

    let attempt_routes = Router::new()
        .route("/{id}", get(attempt::attempt_status))
        .route("/{id}/answer", post(attempt::select_option))
        .route("/{id}/goto", post(attempt::navigate))
        .route("/{id}/flag", post(attempt::toggle_flag))
        .route("/{id}/submit", post(attempt::submit_attempt));

    let admin_routes = Router::new()
        .route("/exams", post(admin::create_exam))
        .route(
            "/exams/{id}",
            put(admin::update_exam).delete(admin::delete_exam),
        )
        .route("/exams/{id}/results", get(admin::list_results));

    Router::new()
        .nest("/api/exams", exam_routes)
        .nest("/api/attempts", attempt_routes)
        .nest("/api/admin", admin_routes)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
