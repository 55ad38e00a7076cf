// Orchestrator authentication
//
// Cookie-based session login/logout. The login endpoint sets a session
// cookie in the client's jar and an `orchCsrfToken` cookie whose value
// must be echoed back as the `X-XSRF-TOKEN` header on every mutating
// request for the rest of the session.

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::{debug, warn};

use crate::client::OrchClient;
use crate::error::Error;

/// Name of the login response cookie carrying the CSRF token.
const CSRF_COOKIE: &str = "orchCsrfToken";

/// Authentication modes the orchestrator supports for session login.
///
/// The wire format is the mode's position in the orchestrator's auth
/// mode table, sent as `loginType`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    #[default]
    Local,
    Radius,
    Tacacs,
}

impl AuthMode {
    /// The `loginType` value for the login request body.
    pub fn login_type(self) -> u8 {
        match self {
            Self::Local => 0,
            Self::Radius => 1,
            Self::Tacacs => 2,
        }
    }
}

impl OrchClient {
    /// Authenticate with the orchestrator using username/password.
    ///
    /// `POST /authentication/login` with `{user, password, loginType}`.
    /// On success the session cookie lands in the client's cookie jar and
    /// the CSRF token is captured from the `orchCsrfToken` cookie. A
    /// non-200 response is an `Authentication` error; connection faults
    /// surface as `Transport`. There is no retry -- the operator re-runs
    /// the batch.
    pub async fn login(&self, user: &str, password: &SecretString) -> Result<(), Error> {
        let url = self.api_url("/authentication/login");
        debug!("logging in at {}", url);

        let body = json!({
            "user": user,
            "password": password.expose_secret(),
            "loginType": self.auth_mode().login_type(),
        });

        let resp = self
            .http()
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Authentication {
                message: format!("login failed (HTTP {status}): {body}"),
            });
        }

        if let Some(token) = resp
            .cookies()
            .find(|c| c.name() == CSRF_COOKIE)
            .map(|c| c.value().to_owned())
        {
            self.set_csrf_token(token);
        }

        debug!("login successful");
        Ok(())
    }

    /// End the current session.
    ///
    /// `GET /authentication/logout`. Callers treat this as best-effort;
    /// the drivers invoke it on every exit path once login has succeeded
    /// so no session is left open on the orchestrator.
    pub async fn logout(&self) -> Result<(), Error> {
        let url = self.api_url("/authentication/logout");
        debug!("logging out at {}", url);

        let result = self.get_unit(url).await;
        self.clear_csrf_token();

        if let Err(ref e) = result {
            warn!("logout failed: {e}");
        }
        result
    }
}
