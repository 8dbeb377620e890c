use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use csms_core::report::{self, ReportFilter, ReportKind};

use crate::auth::Actor;
use crate::error::AppError;
use crate::routes::join_error;
use crate::state::AppState;

/// GET /api/reports/{kind}?from=&to=&institution_id=
pub async fn get_report(
    State(app): State<AppState>,
    Extension(Actor(actor)): Extension<Actor>,
    Path(kind): Path<String>,
    Query(filter): Query<ReportFilter>,
) -> Result<Json<serde_json::Value>, AppError> {
    let kind: ReportKind = kind.parse()?;
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let report = report::generate(&root, &actor, kind, &filter)?;
        Ok::<_, csms_core::CsmsError>(serde_json::to_value(report)?)
    })
    .await
    .map_err(join_error)??;

    Ok(Json(result))
}
