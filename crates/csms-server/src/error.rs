use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use csms_core::error::CsmsError;

// ---------------------------------------------------------------------------
// Internal sentinel for routes that do not exist
// ---------------------------------------------------------------------------

/// Carries an explicit HTTP 404 through the `anyhow::Error` chain for
/// lookups that are not store records, such as unknown action verbs.
#[derive(Debug)]
struct NotFoundError(String);

impl std::fmt::Display for NotFoundError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for NotFoundError {}

// ---------------------------------------------------------------------------
// AppError
// ---------------------------------------------------------------------------

/// Unified error type for HTTP responses.
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl AppError {
    /// 400 Bad Request.
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self(CsmsError::Validation(msg.into()).into())
    }

    /// 404 Not Found.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self(NotFoundError(msg.into()).into())
    }

    /// 403 Forbidden.
    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self(CsmsError::Forbidden(msg.into()).into())
    }
}

fn status_for(e: &CsmsError) -> StatusCode {
    match e {
        CsmsError::NotInitialized
        | CsmsError::Validation(_)
        | CsmsError::InvalidRole(_)
        | CsmsError::InvalidRequestType(_)
        | CsmsError::InvalidReportKind(_) => StatusCode::BAD_REQUEST,
        CsmsError::Unauthorized => StatusCode::UNAUTHORIZED,
        CsmsError::Forbidden(_) => StatusCode::FORBIDDEN,
        CsmsError::InstitutionNotFound(_)
        | CsmsError::UserNotFound(_)
        | CsmsError::EmployeeNotFound(_)
        | CsmsError::RequestNotFound(_) => StatusCode::NOT_FOUND,
        CsmsError::InstitutionExists(_)
        | CsmsError::InstitutionInUse(_)
        | CsmsError::UsernameTaken(_)
        | CsmsError::EmployeeExists(_)
        | CsmsError::VersionConflict { .. } => StatusCode::CONFLICT,
        CsmsError::InvalidTransition { .. } | CsmsError::Ineligible(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        CsmsError::Io(_) | CsmsError::Yaml(_) | CsmsError::Json(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let Some(n) = self.0.downcast_ref::<NotFoundError>() {
            let body = serde_json::json!({ "error": n.0.clone() });
            return (StatusCode::NOT_FOUND, axum::Json(body)).into_response();
        }

        let status = self
            .0
            .downcast_ref::<CsmsError>()
            .map(status_for)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        }

        let body = serde_json::json!({ "error": self.0.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
