use axum::extract::State;
use axum::Json;

use crate::error::AppError;
use crate::routes::join_error;
use crate::state::AppState;

/// GET /api/config: read-only view of `.csms/config.yaml`, with any
/// validation warnings.
///
/// There is no write endpoint; policy changes go through the YAML file.
pub async fn get_config(State(app): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let config = csms_core::config::Config::load(&root)?;
        let warnings = config.validate();
        let mut json = serde_json::to_value(&config)?;
        json["warnings"] = serde_json::to_value(warnings)?;
        Ok::<_, csms_core::CsmsError>(json)
    })
    .await
    .map_err(join_error)??;

    Ok(Json(result))
}
