use thiserror::Error;

/// Top-level error type for the `edgeprov-api` crate.
///
/// One variant per failure category the batch tooling branches on:
/// connection faults, authentication, remote validation rejection,
/// stale-id targets, and everything else as a generic API error.
/// `edgeprov-core` logs these and continues; it never retries.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Login failed or the session is no longer valid.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout).
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Remote API ──────────────────────────────────────────────────
    /// The orchestrator rejected a preconfig document during validation.
    #[error("Preconfig rejected by orchestrator: {message}")]
    Rejected { message: String },

    /// A delete/apply call targeted an id the orchestrator no longer knows.
    #[error("Not found: {what}")]
    NotFound { what: String },

    /// Any other non-success HTTP status from the orchestrator.
    #[error("Orchestrator API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with a body preview for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String },
}

impl Error {
    /// Returns `true` for connection-level failures (remote unreachable,
    /// TLS/transport fault, timeout).
    pub fn is_connection(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            Self::Tls(_) => true,
            _ => false,
        }
    }

    /// Returns `true` if re-authentication might resolve this error.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }

    /// Returns `true` if the target object no longer exists remotely.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
