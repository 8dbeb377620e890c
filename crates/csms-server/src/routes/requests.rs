use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use csms_core::details::RequestDetails;
use csms_core::request::{Request, RequestFilter, RequestView, SubmitRequest};
use csms_core::workflow::Action;
use csms_core::CsmsError;

use crate::auth::Actor;
use crate::error::AppError;
use crate::routes::{join_error, today};
use crate::state::AppState;

/// GET /api/requests: requests visible to the caller, newest first.
pub async fn list_requests(
    State(app): State<AppState>,
    Extension(Actor(actor)): Extension<Actor>,
    Query(filter): Query<RequestFilter>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let views: Vec<RequestView> = Request::list_visible(&root, &actor, &filter)?
            .into_iter()
            .map(RequestView::from)
            .collect();
        Ok::<_, CsmsError>(serde_json::to_value(views)?)
    })
    .await
    .map_err(join_error)??;

    Ok(Json(result))
}

/// POST /api/requests: submit a new request.
///
/// Answers 201 for a new request and 200 when `client_token` matched an
/// earlier submission, which is returned unchanged.
pub async fn submit_request(
    State(app): State<AppState>,
    Extension(Actor(actor)): Extension<Actor>,
    Json(body): Json<SubmitRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let _guard = app.write_lock.lock().await;
    let root = app.root.clone();
    let (created, json) = tokio::task::spawn_blocking(move || {
        let submitted = Request::submit(&root, &actor, body, today())?;
        let json = serde_json::to_value(RequestView::from(submitted.request))?;
        Ok::<_, CsmsError>((submitted.created, json))
    })
    .await
    .map_err(join_error)??;

    let status = if created { StatusCode::CREATED } else { StatusCode::OK };
    Ok((status, Json(json)))
}

/// GET /api/requests/{id}
pub async fn get_request(
    State(app): State<AppState>,
    Extension(Actor(actor)): Extension<Actor>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let request = Request::get_visible(&root, &actor, &id)?;
        Ok::<_, CsmsError>(serde_json::to_value(RequestView::from(request))?)
    })
    .await
    .map_err(join_error)??;

    Ok(Json(result))
}

#[derive(Debug, Default, serde::Deserialize)]
pub struct ActionBody {
    #[serde(default)]
    expected_version: Option<u64>,
    #[serde(default)]
    reason: Option<String>,
    #[serde(default)]
    approve: Option<bool>,
    #[serde(default)]
    details: Option<RequestDetails>,
}

fn parse_action(verb: &str, body: &ActionBody) -> Result<Action, AppError> {
    Ok(match verb {
        "forward" => Action::Forward,
        "return" => Action::Return {
            reason: body.reason.clone().unwrap_or_default(),
        },
        "resubmit" => Action::Resubmit {
            details: body.details.clone(),
            reason: body.reason.clone(),
        },
        "decide" => Action::Decide {
            approve: body
                .approve
                .ok_or_else(|| AppError::bad_request("approve is required"))?,
            reason: body.reason.clone(),
        },
        "close" => Action::Close,
        "withdraw" => Action::Withdraw,
        other => return Err(AppError::not_found(format!("unknown action '{other}'"))),
    })
}

/// POST /api/requests/{id}/{action}: forward, return, resubmit, decide,
/// close or withdraw. The JSON body is optional for actions without
/// arguments.
pub async fn apply_action(
    State(app): State<AppState>,
    Extension(Actor(actor)): Extension<Actor>,
    Path((id, verb)): Path<(String, String)>,
    body: Bytes,
) -> Result<Json<serde_json::Value>, AppError> {
    let body: ActionBody = if body.iter().all(u8::is_ascii_whitespace) {
        ActionBody::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| AppError::bad_request(format!("invalid request body: {e}")))?
    };
    let action = parse_action(&verb, &body)?;

    let _guard = app.write_lock.lock().await;
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let request = Request::apply(&root, &actor, &id, action, body.expected_version, today())?;
        Ok::<_, CsmsError>(serde_json::to_value(RequestView::from(request))?)
    })
    .await
    .map_err(join_error)??;

    Ok(Json(result))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_action_verbs() {
        let body = ActionBody {
            reason: Some("incomplete file".into()),
            approve: Some(false),
            ..Default::default()
        };
        assert_eq!(parse_action("forward", &body).unwrap(), Action::Forward);
        assert_eq!(
            parse_action("return", &body).unwrap(),
            Action::Return {
                reason: "incomplete file".into()
            }
        );
        assert_eq!(
            parse_action("decide", &body).unwrap(),
            Action::Decide {
                approve: false,
                reason: Some("incomplete file".into())
            }
        );
        assert_eq!(
            parse_action("resubmit", &body).unwrap(),
            Action::Resubmit {
                details: None,
                reason: Some("incomplete file".into())
            }
        );
        assert!(parse_action("approve", &body).is_err());
        assert!(parse_action("decide", &ActionBody::default()).is_err());
    }
}
