use axum::{
    body::Body,
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use csms_core::user::User;

use crate::state::AppState;

/// Header carrying the id of the acting user.
pub const USER_HEADER: &str = "x-user-id";

/// The authenticated caller, inserted into request extensions by
/// [`require_actor`]. Handlers take it as `Extension<Actor>`.
#[derive(Debug, Clone)]
pub struct Actor(pub User);

/// Resolves `x-user-id` to an active user before the request reaches a
/// protected handler. Missing, unknown or deactivated users get a JSON 401.
pub async fn require_actor(State(app): State<AppState>, mut req: Request, next: Next) -> Response {
    let Some(user_id) = req
        .headers()
        .get(USER_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
    else {
        return unauthorized();
    };

    let root = app.root.clone();
    let lookup = tokio::task::spawn_blocking(move || User::load(&root, &user_id)).await;
    match lookup {
        Ok(Ok(user)) if user.active => {
            req.extensions_mut().insert(Actor(user));
            next.run(req).await
        }
        Ok(Ok(user)) => {
            tracing::warn!(user = %user.username, "deactivated user rejected");
            unauthorized()
        }
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "actor lookup failed");
            unauthorized()
        }
        Err(e) => {
            tracing::error!(error = %e, "actor lookup task failed");
            unauthorized()
        }
    }
}

fn unauthorized() -> Response {
    Response::builder()
        .status(401)
        .header("Content-Type", "application/json")
        .body(Body::from(r#"{"error":"unauthorized"}"#))
        .unwrap_or_else(|_| Response::new(Body::empty()))
}
