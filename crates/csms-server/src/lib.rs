pub mod auth;
pub mod error;
pub mod routes;
pub mod state;

use axum::routing::{get, post, put};
use axum::{middleware, Router};
use std::path::PathBuf;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Build the axum Router with all API routes and middleware.
/// Used by `serve()` and available for integration testing.
pub fn build_router(root: PathBuf) -> Router {
    let app_state = state::AppState::new(root);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let protected = Router::new()
        .route("/api/auth/me", get(routes::auth::me))
        // Institutions
        .route(
            "/api/institutions",
            get(routes::institutions::list_institutions)
                .post(routes::institutions::create_institution),
        )
        .route(
            "/api/institutions/{id}",
            put(routes::institutions::rename_institution)
                .delete(routes::institutions::delete_institution),
        )
        // Users
        .route(
            "/api/users",
            get(routes::users::list_users).post(routes::users::create_user),
        )
        .route(
            "/api/users/{id}",
            put(routes::users::update_user).delete(routes::users::delete_user),
        )
        // Employees
        .route(
            "/api/employees",
            get(routes::employees::list_employees).post(routes::employees::create_employee),
        )
        .route(
            "/api/employees/search",
            get(routes::employees::find_by_zan_id),
        )
        .route(
            "/api/employees/urgent-actions",
            get(routes::employees::urgent_actions),
        )
        .route("/api/employees/{id}", get(routes::employees::get_employee))
        // Requests
        .route(
            "/api/requests",
            get(routes::requests::list_requests).post(routes::requests::submit_request),
        )
        .route("/api/requests/track", get(routes::track::track_requests))
        .route("/api/requests/{id}", get(routes::requests::get_request))
        .route(
            "/api/requests/{id}/{action}",
            post(routes::requests::apply_action),
        )
        // Notifications
        .route(
            "/api/notifications",
            get(routes::notifications::list_notifications),
        )
        .route(
            "/api/notifications/read",
            post(routes::notifications::mark_read),
        )
        // Dashboard, reports, config
        .route("/api/dashboard/summary", get(routes::dashboard::get_summary))
        .route("/api/reports/{kind}", get(routes::reports::get_report))
        .route("/api/config", get(routes::config::get_config))
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            auth::require_actor,
        ));

    Router::new()
        .route("/api/auth/login", post(routes::auth::login))
        .route("/api/events", get(routes::events::sse_events))
        .merge(protected)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

/// Start the API server on `0.0.0.0:{port}`.
pub async fn serve(root: PathBuf, port: u16) -> anyhow::Result<()> {
    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    serve_on(root, listener).await
}

/// Start the API server on a pre-bound listener.
///
/// Lets the caller read the actual port first, which matters when binding
/// port 0.
pub async fn serve_on(root: PathBuf, listener: tokio::net::TcpListener) -> anyhow::Result<()> {
    let actual_port = listener.local_addr()?.port();
    let app = build_router(root);

    tracing::info!("CSMS API listening on http://localhost:{actual_port}");

    axum::serve(listener, app).await?;
    Ok(())
}
