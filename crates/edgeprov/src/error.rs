//! CLI error types with miette diagnostics.
//!
//! Maps core, api, and config errors into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use edgeprov_config::ConfigError;
use edgeprov_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not reach the orchestrator")]
    #[diagnostic(
        code(edgeprov::connection_failed),
        help(
            "Check that the orchestrator is running and reachable.\n\
             Self-signed certificates are accepted by default; --verify-tls disables that."
        )
    )]
    ConnectionFailed {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    // ── Authentication ───────────────────────────────────────────────

    #[error("Authentication failed")]
    #[diagnostic(
        code(edgeprov::auth_failed),
        help(
            "Verify the username, password, and auth mode for this orchestrator.\n\
             Credentials come from ORCH_USER / ORCH_PASSWORD or the active profile."
        )
    )]
    AuthFailed,

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(edgeprov::no_credentials),
        help(
            "Set ORCH_USER and ORCH_PASSWORD, or add username/password to the\n\
             profile with: edgeprov config init"
        )
    )]
    NoCredentials { profile: String },

    #[error("No orchestrator address configured")]
    #[diagnostic(
        code(edgeprov::no_orchestrator),
        help(
            "Pass --orchestrator, set ORCH_URL, or create a profile with:\n\
             edgeprov config init <url>"
        )
    )]
    NoOrchestrator,

    // ── Resources ────────────────────────────────────────────────────

    #[error("{what} not found on the orchestrator")]
    #[diagnostic(code(edgeprov::not_found))]
    NotFound { what: String },

    // ── API ──────────────────────────────────────────────────────────

    #[error("Orchestrator API error: {message}")]
    #[diagnostic(code(edgeprov::api_error))]
    ApiError { message: String },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(edgeprov::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error(transparent)]
    #[diagnostic(code(edgeprov::config))]
    Config(Box<ConfigError>),

    // ── IO ───────────────────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } | Self::NoOrchestrator => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── api / core / config error mapping ────────────────────────────────

impl From<edgeprov_api::Error> for CliError {
    fn from(err: edgeprov_api::Error) -> Self {
        if err.is_auth() {
            return Self::AuthFailed;
        }
        if err.is_connection() {
            return Self::ConnectionFailed {
                source: Box::new(err),
            };
        }
        match err {
            edgeprov_api::Error::NotFound { what } => Self::NotFound { what },
            other => Self::ApiError {
                message: other.to_string(),
            },
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::MissingField { field } => Self::Validation {
                field: "template".into(),
                reason: format!("references CSV field '{field}' which no record provides"),
            },
            CoreError::Schema { message } => Self::Validation {
                field: "csv".into(),
                reason: message,
            },
            CoreError::Csv(e) => Self::Validation {
                field: "csv".into(),
                reason: e.to_string(),
            },
            CoreError::Template { message } => Self::Validation {
                field: "template".into(),
                reason: message,
            },
            CoreError::Io(e) => Self::Io(e),
            CoreError::Api(e) => e.into(),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { profile } => Self::NoCredentials { profile },
            ConfigError::NoOrchestrator => Self::NoOrchestrator,
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            ConfigError::Io(e) => Self::Io(e),
            other => Self::Config(Box::new(other)),
        }
    }
}
