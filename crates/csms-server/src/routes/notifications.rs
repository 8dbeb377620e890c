use axum::extract::State;
use axum::{Extension, Json};
use csms_core::config::Config;
use csms_core::notification;

use crate::auth::Actor;
use crate::error::AppError;
use crate::routes::join_error;
use crate::state::AppState;

/// GET /api/notifications: the caller's newest notifications and unread count.
pub async fn list_notifications(
    State(app): State<AppState>,
    Extension(Actor(actor)): Extension<Actor>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let limit = Config::load(&root)?.policy.notification_limit;
        let items = notification::recent(&root, &actor.id, limit)?;
        let unread = notification::unread_count(&root, &actor.id)?;
        Ok::<_, csms_core::CsmsError>(serde_json::json!({
            "notifications": items,
            "unread_count": unread,
        }))
    })
    .await
    .map_err(join_error)??;

    Ok(Json(result))
}

#[derive(serde::Deserialize)]
pub struct MarkReadBody {
    #[serde(default)]
    ids: Vec<String>,
}

/// POST /api/notifications/read: mark the given ids read. Ids owned by
/// other users are ignored.
pub async fn mark_read(
    State(app): State<AppState>,
    Extension(Actor(actor)): Extension<Actor>,
    Json(body): Json<MarkReadBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let _guard = app.write_lock.lock().await;
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let updated = notification::mark_read(&root, &actor.id, &body.ids)?;
        Ok::<_, csms_core::CsmsError>(serde_json::json!({ "updated": updated }))
    })
    .await
    .map_err(join_error)??;

    Ok(Json(result))
}
