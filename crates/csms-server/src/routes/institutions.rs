use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use csms_core::institution::Institution;
use csms_core::types::Role;

use crate::auth::Actor;
use crate::error::AppError;
use crate::routes::{join_error, require_role};
use crate::state::AppState;

#[derive(serde::Deserialize)]
pub struct InstitutionBody {
    name: String,
}

/// GET /api/institutions: every institution, sorted by name.
pub async fn list_institutions(
    State(app): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let list = Institution::list(&root)?;
        Ok::<_, csms_core::CsmsError>(serde_json::to_value(list)?)
    })
    .await
    .map_err(join_error)??;

    Ok(Json(result))
}

/// POST /api/institutions: ADMIN only.
pub async fn create_institution(
    State(app): State<AppState>,
    Extension(Actor(actor)): Extension<Actor>,
    Json(body): Json<InstitutionBody>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    require_role(&actor, &[Role::Admin])?;
    let _guard = app.write_lock.lock().await;
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let inst = Institution::create(&root, &body.name)?;
        Ok::<_, csms_core::CsmsError>(serde_json::to_value(inst)?)
    })
    .await
    .map_err(join_error)??;

    Ok((StatusCode::CREATED, Json(result)))
}

/// PUT /api/institutions/{id}: rename; ADMIN only.
pub async fn rename_institution(
    State(app): State<AppState>,
    Extension(Actor(actor)): Extension<Actor>,
    Path(id): Path<String>,
    Json(body): Json<InstitutionBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    require_role(&actor, &[Role::Admin])?;
    let _guard = app.write_lock.lock().await;
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let inst = Institution::rename(&root, &id, &body.name)?;
        Ok::<_, csms_core::CsmsError>(serde_json::to_value(inst)?)
    })
    .await
    .map_err(join_error)??;

    Ok(Json(result))
}

/// DELETE /api/institutions/{id}: refused while users or employees still
/// belong to it.
pub async fn delete_institution(
    State(app): State<AppState>,
    Extension(Actor(actor)): Extension<Actor>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    require_role(&actor, &[Role::Admin])?;
    let _guard = app.write_lock.lock().await;
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        Institution::delete(&root, &id)?;
        Ok::<_, csms_core::CsmsError>(serde_json::json!({ "deleted": id }))
    })
    .await
    .map_err(join_error)??;

    Ok(Json(result))
}
