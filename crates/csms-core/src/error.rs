use thiserror::Error;

#[derive(Debug, Error)]
pub enum CsmsError {
    #[error("not initialized: run 'csms init'")]
    NotInitialized,

    #[error("institution not found: {0}")]
    InstitutionNotFound(String),

    #[error("institution already exists: {0}")]
    InstitutionExists(String),

    #[error("institution '{0}' is still referenced by users or employees")]
    InstitutionInUse(String),

    #[error("user not found: {0}")]
    UserNotFound(String),

    #[error("username already taken: {0}")]
    UsernameTaken(String),

    #[error("employee not found: {0}")]
    EmployeeNotFound(String),

    #[error("employee with ZAN-ID {0} already exists")]
    EmployeeExists(String),

    #[error("request not found: {0}")]
    RequestNotFound(String),

    #[error("invalid role: {0}")]
    InvalidRole(String),

    #[error("invalid request type: {0}")]
    InvalidRequestType(String),

    #[error("invalid report kind: {0}")]
    InvalidReportKind(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("invalid username or password")]
    Unauthorized,

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("cannot {action} a request that is '{from}': {reason}")]
    InvalidTransition {
        from: String,
        action: String,
        reason: String,
    },

    #[error("not eligible: {0}")]
    Ineligible(String),

    #[error("request was modified concurrently (expected version {expected}, found {actual})")]
    VersionConflict { expected: u64, actual: u64 },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl CsmsError {
    pub fn validation(msg: impl Into<String>) -> Self {
        CsmsError::Validation(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        CsmsError::Forbidden(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, CsmsError>;
