use axum::extract::State;
use axum::{Extension, Json};
use csms_core::dashboard;

use crate::auth::Actor;
use crate::error::AppError;
use crate::routes::{join_error, today};
use crate::state::AppState;

/// GET /api/dashboard/summary
pub async fn get_summary(
    State(app): State<AppState>,
    Extension(Actor(actor)): Extension<Actor>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let summary = dashboard::summary(&root, &actor, today())?;
        Ok::<_, csms_core::CsmsError>(serde_json::to_value(summary)?)
    })
    .await
    .map_err(join_error)??;

    Ok(Json(result))
}
