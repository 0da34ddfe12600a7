// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::{delete, get, post},
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::{
    handlers::{admin, assignment, quiz},
    state::AppState,
};

/// Assembles the main application router.
///
/// * Merges all sub-routers (quizzes, attempts, learners, assignments, admin).
/// * Applies global middleware (Trace, CORS).
/// * Serves the static frontend as the fallback when `STATIC_DIR` is set.
pub fn create_router(state: AppState) -> Router {
    let origins = [
        HeaderValue::from_static("http://localhost:3000"),
        HeaderValue::from_static("http://127.0.0.1:3000"),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]);

    let quiz_routes = Router::new()
        .route("/", get(quiz::list_quizzes))
        .route("/{id}", get(quiz::get_quiz))
        .route("/{id}/attempts", post(quiz::submit_attempt));

    let learner_routes = Router::new()
        .route("/{id}/attempts", get(quiz::learner_attempts))
        .route("/{id}/submissions", get(assignment::learner_submissions));

    let assignment_routes = Router::new()
        .route("/", get(assignment::list_assignments))
        .route("/{id}/submissions", post(assignment::submit_assignment));

    // Identity and role checks belong to the session collaborator in front of this service.
    let admin_routes = Router::new()
        .route("/quizzes", post(admin::create_quiz))
        .route("/quizzes/{id}", get(admin::get_quiz))
        .route("/quizzes/{id}/analytics", get(admin::quiz_analytics))
        .route("/quizzes/{id}/attempts", get(admin::quiz_attempts))
        .route("/attempts", get(admin::list_attempts))
        .route(
            "/learners",
            get(admin::list_learners).post(admin::create_learner),
        )
        .route(
            "/learners/{id}",
            get(admin::get_learner).delete(admin::delete_learner),
        )
        .route(
            "/faculty",
            get(admin::list_faculty).post(admin::create_faculty),
        )
        .route("/faculty/{id}", delete(admin::delete_faculty))
        .route("/assignments", post(admin::create_assignment))
        .route(
            "/assignments/{id}/submissions",
            get(admin::assignment_submissions),
        )
        .route("/assignments/{id}/stats", get(admin::assignment_stats))
        .route("/reminders", get(admin::pending_reminders));

    let mut router = Router::new()
        .route("/health", get(|| async { "ok" }))
        .nest("/api/quizzes", quiz_routes)
        .route("/api/attempts/{id}", get(quiz::get_attempt))
        .nest("/api/learners", learner_routes)
        .nest("/api/assignments", assignment_routes)
        .nest("/api/admin", admin_routes);

    if let Some(dir) = &state.config.static_dir {
        router = router.fallback_service(ServeDir::new(dir));
    }

    router
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
