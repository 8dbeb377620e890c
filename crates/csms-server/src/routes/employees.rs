use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use csms_core::config::Config;
use csms_core::employee::{Employee, NewEmployee};
use csms_core::types::Role;
use csms_core::CsmsError;

use crate::auth::Actor;
use crate::error::AppError;
use crate::routes::{join_error, require_role, today};
use crate::state::AppState;

#[derive(Debug, Default, serde::Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    q: Option<String>,
    #[serde(default)]
    zan_id: Option<String>,
    #[serde(default)]
    institution_id: Option<String>,
}

/// GET /api/employees?q=: employees visible to the caller, by name.
pub async fn list_employees(
    State(app): State<AppState>,
    Extension(Actor(actor)): Extension<Actor>,
    Query(params): Query<SearchParams>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let limit = Config::load(&root)?.policy.employee_search_limit;
        let hits = Employee::search(&root, &actor, params.q.as_deref(), limit)?;
        Ok::<_, CsmsError>(serde_json::to_value(hits)?)
    })
    .await
    .map_err(join_error)??;

    Ok(Json(result))
}

/// POST /api/employees: ADMIN, or HRO for its own institution.
pub async fn create_employee(
    State(app): State<AppState>,
    Extension(Actor(actor)): Extension<Actor>,
    Json(body): Json<NewEmployee>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    require_role(&actor, &[Role::Admin, Role::Hro])?;
    if actor.role == Role::Hro && body.institution_id != actor.institution_id {
        return Err(AppError::forbidden(
            "HRO can only register employees of their own institution",
        ));
    }
    let _guard = app.write_lock.lock().await;
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let employee = Employee::create(&root, body)?;
        Ok::<_, CsmsError>(serde_json::to_value(employee)?)
    })
    .await
    .map_err(join_error)??;

    Ok((StatusCode::CREATED, Json(result)))
}

/// GET /api/employees/search?zan_id=: exact ZAN-ID lookup used by the
/// request forms.
pub async fn find_by_zan_id(
    State(app): State<AppState>,
    Extension(Actor(actor)): Extension<Actor>,
    Query(params): Query<SearchParams>,
) -> Result<Json<serde_json::Value>, AppError> {
    let Some(zan_id) = params.zan_id.filter(|z| !z.trim().is_empty()) else {
        return Err(AppError::bad_request("zan_id is required"));
    };
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let employee = Employee::find_by_zan_id(&root, &zan_id)?
            .ok_or_else(|| CsmsError::EmployeeNotFound(zan_id.clone()))?;
        if !employee.visible_to(&actor) {
            return Err(CsmsError::forbidden(format!(
                "employee {zan_id} belongs to another institution"
            )));
        }
        Ok::<_, CsmsError>(serde_json::to_value(employee)?)
    })
    .await
    .map_err(join_error)??;

    Ok(Json(result))
}

/// GET /api/employees/urgent-actions: overdue probations and upcoming
/// retirements. HRO/HRRP always see their own institution; other reviewers
/// pick one with `institution_id`.
pub async fn urgent_actions(
    State(app): State<AppState>,
    Extension(Actor(actor)): Extension<Actor>,
    Query(params): Query<SearchParams>,
) -> Result<Json<serde_json::Value>, AppError> {
    let institution_id = if actor.role.is_institution_scoped() {
        actor.institution_id.clone()
    } else if actor.role == Role::Employee {
        return Err(AppError::forbidden("EMPLOYEE cannot view urgent actions"));
    } else {
        params
            .institution_id
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| AppError::bad_request("institution_id is required"))?
    };
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let policy = Config::load(&root)?.policy;
        let urgent = Employee::urgent_actions(&root, &institution_id, &policy, today())?;
        Ok::<_, CsmsError>(serde_json::to_value(urgent)?)
    })
    .await
    .map_err(join_error)??;

    Ok(Json(result))
}

/// GET /api/employees/{id}
pub async fn get_employee(
    State(app): State<AppState>,
    Extension(Actor(actor)): Extension<Actor>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let employee = Employee::load(&root, &id)?;
        if !employee.visible_to(&actor) {
            return Err(CsmsError::forbidden("employee is outside your scope"));
        }
        Ok::<_, CsmsError>(serde_json::to_value(employee)?)
    })
    .await
    .map_err(join_error)??;

    Ok(Json(result))
}
