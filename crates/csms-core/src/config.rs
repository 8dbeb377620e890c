use crate::error::{CsmsError, Result};
use crate::paths;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

impl ConfigWarning {
    fn warning(message: impl Into<String>) -> Self {
        Self {
            level: WarnLevel::Warning,
            message: message.into(),
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            level: WarnLevel::Error,
            message: message.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Policy
// ---------------------------------------------------------------------------

/// Eligibility thresholds and list limits applied by the workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Policy {
    #[serde(default = "default_promotion_min_service_years")]
    pub promotion_min_service_years: u32,
    #[serde(default = "default_probation_months")]
    pub probation_months: u32,
    #[serde(default = "default_retirement_notice_months")]
    pub retirement_notice_months: u32,
    #[serde(default = "default_compulsory_retirement_age")]
    pub compulsory_retirement_age: u32,
    #[serde(default = "default_voluntary_retirement_age")]
    pub voluntary_retirement_age: u32,
    #[serde(default = "default_nearing_retirement_window_months")]
    pub nearing_retirement_window_months: u32,
    #[serde(default = "default_notification_limit")]
    pub notification_limit: usize,
    #[serde(default = "default_employee_search_limit")]
    pub employee_search_limit: usize,
    #[serde(default = "default_recent_activity_limit")]
    pub recent_activity_limit: usize,
}

fn default_promotion_min_service_years() -> u32 {
    3
}

fn default_probation_months() -> u32 {
    12
}

fn default_retirement_notice_months() -> u32 {
    6
}

fn default_compulsory_retirement_age() -> u32 {
    60
}

fn default_voluntary_retirement_age() -> u32 {
    55
}

fn default_nearing_retirement_window_months() -> u32 {
    6
}

fn default_notification_limit() -> usize {
    20
}

fn default_employee_search_limit() -> usize {
    50
}

fn default_recent_activity_limit() -> usize {
    5
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            promotion_min_service_years: default_promotion_min_service_years(),
            probation_months: default_probation_months(),
            retirement_notice_months: default_retirement_notice_months(),
            compulsory_retirement_age: default_compulsory_retirement_age(),
            voluntary_retirement_age: default_voluntary_retirement_age(),
            nearing_retirement_window_months: default_nearing_retirement_window_months(),
            notification_limit: default_notification_limit(),
            employee_search_limit: default_employee_search_limit(),
            recent_activity_limit: default_recent_activity_limit(),
        }
    }
}

// ---------------------------------------------------------------------------
// Commission / Server
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommissionConfig {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    pub commission: CommissionConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub policy: Policy,
}

fn default_version() -> u32 {
    1
}

impl Config {
    pub fn new(commission_name: impl Into<String>) -> Self {
        Self {
            version: 1,
            commission: CommissionConfig {
                name: commission_name.into(),
            },
            server: ServerConfig::default(),
            policy: Policy::default(),
        }
    }

    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Err(CsmsError::NotInitialized);
        }
        let data = std::fs::read_to_string(&path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::config_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();
        let p = &self.policy;

        if self.commission.name.trim().is_empty() {
            warnings.push(ConfigWarning::error("commission.name is empty"));
        }

        if p.voluntary_retirement_age > p.compulsory_retirement_age {
            warnings.push(ConfigWarning::error(format!(
                "policy.voluntary_retirement_age ({}) exceeds compulsory_retirement_age ({})",
                p.voluntary_retirement_age, p.compulsory_retirement_age
            )));
        }

        for (key, value) in [
            ("notification_limit", p.notification_limit),
            ("employee_search_limit", p.employee_search_limit),
            ("recent_activity_limit", p.recent_activity_limit),
        ] {
            if value == 0 {
                warnings.push(ConfigWarning::warning(format!(
                    "policy.{key} is 0; the corresponding list will always be empty"
                )));
            }
        }

        if p.probation_months == 0 {
            warnings.push(ConfigWarning::warning(
                "policy.probation_months is 0; every new employee is immediately overdue",
            ));
        }

        if p.nearing_retirement_window_months > 24 {
            warnings.push(ConfigWarning::warning(format!(
                "policy.nearing_retirement_window_months={} (>24 is unusual)",
                p.nearing_retirement_window_months
            )));
        }

        if self.server.port == 0 {
            warnings.push(ConfigWarning::error("server.port must not be 0"));
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
