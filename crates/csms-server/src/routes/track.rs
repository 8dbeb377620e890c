use axum::extract::{Query, State};
use axum::{Extension, Json};
use csms_core::track::{self, TrackQuery};

use crate::auth::Actor;
use crate::error::AppError;
use crate::routes::join_error;
use crate::state::AppState;

/// GET /api/requests/track?zan_id=&institution_name=&status=&from=&to=
pub async fn track_requests(
    State(app): State<AppState>,
    Extension(Actor(actor)): Extension<Actor>,
    Query(query): Query<TrackQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let rows = track::track(&root, &actor, &query)?;
        Ok::<_, csms_core::CsmsError>(serde_json::to_value(rows)?)
    })
    .await
    .map_err(join_error)??;

    Ok(Json(result))
}
