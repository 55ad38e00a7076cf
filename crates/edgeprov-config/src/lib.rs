//! Shared configuration for the edgeprov CLI.
//!
//! TOML profiles, environment-based credential resolution, and
//! translation to the api crate's transport settings. Credentials come
//! from the environment (`ORCH_USER` / `ORCH_PASSWORD`) or a profile;
//! the orchestrator address from `ORCH_URL`, a profile, or a CLI flag.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use edgeprov_api::{AuthMode, TlsMode, TransportConfig, transport};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no credentials configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("no orchestrator address configured")]
    NoOrchestrator,

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Named orchestrator profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            profiles: HashMap::new(),
        }
    }
}

/// A named orchestrator profile.
#[derive(Debug, Deserialize, Serialize)]
pub struct Profile {
    /// Orchestrator base URL (e.g., "https://orch.example.com").
    pub orchestrator: String,

    /// Username for session login.
    pub username: Option<String>,

    /// Password (plaintext -- prefer the ORCH_PASSWORD env var).
    pub password: Option<String>,

    /// Auth mode: "local", "radius", or "tacacs".
    #[serde(default = "default_auth_mode")]
    pub auth_mode: String,

    /// Verify TLS certificates (default off -- orchestrators ship
    /// self-signed).
    #[serde(default)]
    pub verify_tls: bool,

    /// Request timeout in seconds.
    pub timeout: Option<u64>,

    /// Default output directory for rendered documents.
    pub output_dir: Option<PathBuf>,
}

fn default_auth_mode() -> String {
    "local".into()
}

/// Default directory for rendered documents when neither the profile nor
/// the CLI says otherwise.
pub const DEFAULT_OUTPUT_DIR: &str = "preconfig_outputs";

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "edgeprov", "edgeprov").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("edgeprov");
    p
}

// ── Config loading / saving ─────────────────────────────────────────

/// Load the full Config from file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    let path = config_path();

    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(&path))
        .merge(Env::prefixed("EDGEPROV_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    let path = config_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(&path, toml_str)?;
    Ok(())
}

// ── Resolution ──────────────────────────────────────────────────────

/// Fully resolved connection settings for one run.
pub struct OrchSettings {
    pub url: url::Url,
    pub username: String,
    pub password: SecretString,
    pub auth_mode: AuthMode,
    pub transport: TransportConfig,
    pub output_dir: PathBuf,
}

/// Resolve the orchestrator address: CLI flag, then `ORCH_URL`, then the
/// profile. Bare hostnames are promoted to `https://`.
pub fn resolve_url(
    flag: Option<&str>,
    profile: Option<&Profile>,
) -> Result<url::Url, ConfigError> {
    let raw = flag
        .map(ToOwned::to_owned)
        .or_else(|| std::env::var("ORCH_URL").ok())
        .or_else(|| profile.map(|p| p.orchestrator.clone()))
        .ok_or(ConfigError::NoOrchestrator)?;

    let with_scheme = if raw.contains("://") {
        raw.clone()
    } else {
        format!("https://{raw}")
    };

    with_scheme.parse().map_err(|_| ConfigError::Validation {
        field: "orchestrator".into(),
        reason: format!("invalid URL: {raw}"),
    })
}

/// Resolve credentials: environment first, then profile plaintext.
pub fn resolve_credentials(
    profile: Option<&Profile>,
    profile_name: &str,
) -> Result<(String, SecretString), ConfigError> {
    let username = std::env::var("ORCH_USER")
        .ok()
        .or_else(|| profile.and_then(|p| p.username.clone()))
        .ok_or_else(|| ConfigError::NoCredentials {
            profile: profile_name.into(),
        })?;

    if let Ok(pw) = std::env::var("ORCH_PASSWORD") {
        return Ok((username, SecretString::from(pw)));
    }

    if let Some(pw) = profile.and_then(|p| p.password.clone()) {
        return Ok((username, SecretString::from(pw)));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Parse a profile's `auth_mode` string.
pub fn resolve_auth_mode(profile: Option<&Profile>) -> Result<AuthMode, ConfigError> {
    let Some(profile) = profile else {
        return Ok(AuthMode::Local);
    };
    match profile.auth_mode.as_str() {
        "local" => Ok(AuthMode::Local),
        "radius" => Ok(AuthMode::Radius),
        "tacacs" => Ok(AuthMode::Tacacs),
        other => Err(ConfigError::Validation {
            field: "auth_mode".into(),
            reason: format!("expected 'local', 'radius', or 'tacacs', got '{other}'"),
        }),
    }
}

/// Build fully resolved settings from config, profile, and flag overrides.
pub fn resolve_settings(
    cfg: &Config,
    profile_name: &str,
    url_flag: Option<&str>,
    timeout_flag: Option<u64>,
    output_dir_flag: Option<&PathBuf>,
) -> Result<OrchSettings, ConfigError> {
    let profile = cfg.profiles.get(profile_name);

    let url = resolve_url(url_flag, profile)?;
    let (username, password) = resolve_credentials(profile, profile_name)?;
    let auth_mode = resolve_auth_mode(profile)?;

    let tls = if profile.is_some_and(|p| p.verify_tls) {
        TlsMode::System
    } else {
        TlsMode::DangerAcceptInvalid
    };
    let timeout = timeout_flag
        .or_else(|| profile.and_then(|p| p.timeout))
        .unwrap_or(transport::DEFAULT_TIMEOUT_SECS);

    let output_dir = output_dir_flag
        .cloned()
        .or_else(|| profile.and_then(|p| p.output_dir.clone()))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));

    Ok(OrchSettings {
        url,
        username,
        password,
        auth_mode,
        transport: TransportConfig {
            tls,
            timeout: Duration::from_secs(timeout),
            cookie_jar: None,
        },
        output_dir,
    })
}

/// The active profile name: explicit flag, then config default.
pub fn active_profile_name(flag: Option<&str>, cfg: &Config) -> String {
    flag.map(ToOwned::to_owned)
        .or_else(|| cfg.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn bare_hostname_gets_https_scheme() {
        let url = resolve_url(Some("orch.example.com"), None).unwrap();
        assert_eq!(url.as_str(), "https://orch.example.com/");
    }

    #[test]
    fn flag_beats_profile() {
        let profile = Profile {
            orchestrator: "https://profile.example.com".into(),
            username: None,
            password: None,
            auth_mode: default_auth_mode(),
            verify_tls: false,
            timeout: None,
            output_dir: None,
        };
        let url = resolve_url(Some("https://flag.example.com"), Some(&profile)).unwrap();
        assert_eq!(url.host_str(), Some("flag.example.com"));
    }

    #[test]
    fn unknown_auth_mode_is_rejected() {
        let profile = Profile {
            orchestrator: "https://orch.example.com".into(),
            username: None,
            password: None,
            auth_mode: "saml".into(),
            verify_tls: false,
            timeout: None,
            output_dir: None,
        };
        assert!(matches!(
            resolve_auth_mode(Some(&profile)),
            Err(ConfigError::Validation { .. })
        ));
    }
}
