// Orchestrator HTTP client
//
// Wraps `reqwest::Client` with orchestrator-specific URL construction,
// session-cookie auth, and CSRF header handling. Endpoint groups
// (preconfig, appliance) are implemented as inherent methods via
// separate files to keep this module focused on transport mechanics.

use std::sync::RwLock;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::auth::AuthMode;
use crate::error::Error;
use crate::transport::TransportConfig;

/// Every REST path is rooted under this prefix on the orchestrator.
const REST_PREFIX: &str = "/gms/rest";

/// Source tag the orchestrator expects as a query parameter on API calls.
const API_SOURCE: &str = "menu_rest_apis_id";

/// Raw HTTP client for the orchestrator REST API.
///
/// Holds the session state for one login: the cookie jar lives inside
/// the `reqwest::Client`, and the CSRF token captured at login is
/// attached to every mutating request. There is exactly one logical
/// thread of control driving this client; no call retries internally.
pub struct OrchClient {
    http: reqwest::Client,
    base_url: Url,
    auth_mode: AuthMode,
    /// CSRF token from the `orchCsrfToken` login cookie. Required on all
    /// POST/PUT/DELETE requests once a session is established.
    csrf_token: RwLock<Option<String>>,
}

impl OrchClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// If the config doesn't already include a cookie jar, one is created
    /// automatically (session auth requires cookies). `base_url` is the
    /// orchestrator root, e.g. `https://orch.example.com`.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let config = if transport.cookie_jar.is_some() {
            transport.clone()
        } else {
            transport.clone().with_cookie_jar()
        };
        let http = config.build_client()?;
        Ok(Self {
            http,
            base_url,
            auth_mode: AuthMode::Local,
            csrf_token: RwLock::new(None),
        })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    ///
    /// Use this when you already have a client with a session cookie in
    /// its jar, or in tests against a mock server.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url,
            auth_mode: AuthMode::Local,
            csrf_token: RwLock::new(None),
        }
    }

    /// The orchestrator base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The authentication mode used by `login`.
    pub fn auth_mode(&self) -> AuthMode {
        self.auth_mode
    }

    /// Select the authentication mode before calling `login`.
    pub fn set_auth_mode(&mut self, mode: AuthMode) {
        self.auth_mode = mode;
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    // ── CSRF token management ─────────────────────────────────────────

    /// Store the CSRF token captured from the login response cookie.
    pub(crate) fn set_csrf_token(&self, token: String) {
        debug!("storing CSRF token");
        *self.csrf_token.write().expect("CSRF lock poisoned") = Some(token);
    }

    pub(crate) fn clear_csrf_token(&self) {
        *self.csrf_token.write().expect("CSRF lock poisoned") = None;
    }

    /// Apply the stored CSRF token to a request builder.
    fn apply_csrf(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let guard = self.csrf_token.read().expect("CSRF lock poisoned");
        match guard.as_deref() {
            Some(token) => builder.header("X-XSRF-TOKEN", token),
            None => builder,
        }
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Build a full URL for a REST path: `{base}/gms/rest{path}` with the
    /// API source tag appended as a query parameter.
    ///
    /// `path` must start with `/` and may already carry a query string
    /// (e.g. `/gms/appliance/preconfiguration?filter=metadata`).
    pub(crate) fn api_url(&self, path: &str) -> Url {
        let base = self.base_url.as_str().trim_end_matches('/');
        let sep = if path.contains('?') { '&' } else { '?' };
        let full = format!("{base}{REST_PREFIX}{path}{sep}source={API_SOURCE}");
        Url::parse(&full).expect("invalid API URL")
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and deserialize the JSON body.
    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {}", url);
        let resp = self.http.get(url).send().await.map_err(Error::Transport)?;
        let resp = Self::check_status(resp).await?;
        Self::parse_body(resp).await
    }

    /// Send a GET request, discarding any response body.
    pub(crate) async fn get_unit(&self, url: Url) -> Result<(), Error> {
        debug!("GET {}", url);
        let resp = self.http.get(url).send().await.map_err(Error::Transport)?;
        Self::check_status(resp).await?;
        Ok(())
    }

    /// Send a POST request with a JSON body, discarding any response body.
    pub(crate) async fn post_unit(
        &self,
        url: Url,
        body: &(impl Serialize + Sync),
    ) -> Result<(), Error> {
        debug!("POST {}", url);
        let builder = self.apply_csrf(self.http.post(url).json(body));
        let resp = builder.send().await.map_err(Error::Transport)?;
        Self::check_status(resp).await?;
        Ok(())
    }

    /// Send a POST request with a JSON body and deserialize the response.
    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        debug!("POST {}", url);
        let builder = self.apply_csrf(self.http.post(url).json(body));
        let resp = builder.send().await.map_err(Error::Transport)?;
        let resp = Self::check_status(resp).await?;
        Self::parse_body(resp).await
    }

    /// Send a POST request with no body (apply/approve endpoints).
    pub(crate) async fn post_empty(&self, url: Url) -> Result<(), Error> {
        debug!("POST {}", url);
        let builder = self.apply_csrf(self.http.post(url));
        let resp = builder.send().await.map_err(Error::Transport)?;
        Self::check_status(resp).await?;
        Ok(())
    }

    /// Send a DELETE request, discarding any response body.
    pub(crate) async fn delete(&self, url: Url) -> Result<(), Error> {
        debug!("DELETE {}", url);
        let builder = self.apply_csrf(self.http.delete(url));
        let resp = builder.send().await.map_err(Error::Transport)?;
        Self::check_status(resp).await?;
        Ok(())
    }

    /// Map non-success statuses onto the error taxonomy.
    ///
    /// 401/403 become `Authentication` (session expired or insufficient
    /// rights), 404 becomes `NotFound` (stale id), everything else
    /// surfaces as `Api` with a body preview.
    async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, Error> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let path = resp.url().path().to_owned();
        let body = resp.text().await.unwrap_or_default();
        let preview = body_preview(&body);

        match status {
            reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
                Err(Error::Authentication {
                    message: format!("HTTP {status}: {preview}"),
                })
            }
            reqwest::StatusCode::NOT_FOUND => Err(Error::NotFound { what: path }),
            _ => Err(Error::Api {
                status: status.as_u16(),
                message: preview,
            }),
        }
    }

    async fn parse_body<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let body = resp.text().await.map_err(Error::Transport)?;
        serde_json::from_str(&body).map_err(|e| {
            let preview = body_preview(&body);
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
            }
        })
    }
}

/// First 200 characters of a response body, for error messages.
fn body_preview(body: &str) -> String {
    body.chars().take(200).collect()
}
