use axum::extract::State;
use axum::{Extension, Json};
use csms_core::user::User;

use crate::auth::Actor;
use crate::error::AppError;
use crate::routes::join_error;
use crate::state::AppState;

#[derive(serde::Deserialize)]
pub struct LoginBody {
    username: String,
    password: String,
}

/// POST /api/auth/login: check credentials and return the user profile.
///
/// The returned `id` is what clients send back as `x-user-id`.
pub async fn login(
    State(app): State<AppState>,
    Json(body): Json<LoginBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let user = User::authenticate(&root, &body.username, &body.password)?;
        let json = serde_json::to_value(user.view())?;
        Ok::<_, csms_core::CsmsError>(json)
    })
    .await
    .map_err(join_error)??;

    Ok(Json(result))
}

/// GET /api/auth/me: the profile behind the current `x-user-id`.
pub async fn me(Extension(Actor(actor)): Extension<Actor>) -> Result<Json<serde_json::Value>, AppError> {
    Ok(Json(serde_json::to_value(actor.view())?))
}
