use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use csms_core::types::Role;
use csms_core::user::{NewUser, User, UserUpdate, UserView};

use crate::auth::Actor;
use crate::error::AppError;
use crate::routes::{join_error, require_role};
use crate::state::AppState;

/// GET /api/users: all accounts without password hashes; ADMIN only.
pub async fn list_users(
    State(app): State<AppState>,
    Extension(Actor(actor)): Extension<Actor>,
) -> Result<Json<serde_json::Value>, AppError> {
    require_role(&actor, &[Role::Admin])?;
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let views: Vec<UserView> = User::list(&root)?.iter().map(UserView::from).collect();
        Ok::<_, csms_core::CsmsError>(serde_json::to_value(views)?)
    })
    .await
    .map_err(join_error)??;

    Ok(Json(result))
}

/// POST /api/users: ADMIN only.
pub async fn create_user(
    State(app): State<AppState>,
    Extension(Actor(actor)): Extension<Actor>,
    Json(body): Json<NewUser>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    require_role(&actor, &[Role::Admin])?;
    let _guard = app.write_lock.lock().await;
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let user = User::create(&root, body)?;
        Ok::<_, csms_core::CsmsError>(serde_json::to_value(user.view())?)
    })
    .await
    .map_err(join_error)??;

    Ok((StatusCode::CREATED, Json(result)))
}

/// PUT /api/users/{id}: partial update; ADMIN only.
pub async fn update_user(
    State(app): State<AppState>,
    Extension(Actor(actor)): Extension<Actor>,
    Path(id): Path<String>,
    Json(body): Json<UserUpdate>,
) -> Result<Json<serde_json::Value>, AppError> {
    require_role(&actor, &[Role::Admin])?;
    if id == actor.id && body.active == Some(false) {
        return Err(AppError::bad_request("you cannot deactivate your own account"));
    }
    let _guard = app.write_lock.lock().await;
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let user = User::update(&root, &id, body)?;
        Ok::<_, csms_core::CsmsError>(serde_json::to_value(user.view())?)
    })
    .await
    .map_err(join_error)??;

    Ok(Json(result))
}

/// DELETE /api/users/{id}: ADMIN only.
pub async fn delete_user(
    State(app): State<AppState>,
    Extension(Actor(actor)): Extension<Actor>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    require_role(&actor, &[Role::Admin])?;
    if id == actor.id {
        return Err(AppError::bad_request("you cannot delete your own account"));
    }
    let _guard = app.write_lock.lock().await;
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        User::delete(&root, &id)?;
        Ok::<_, csms_core::CsmsError>(serde_json::json!({ "deleted": id }))
    })
    .await
    .map_err(join_error)??;

    Ok(Json(result))
}
