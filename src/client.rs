//! The authenticated API client.
//!
//! [`Client`] owns the bearer-token session and drives every call: it signs
//! the request body when required, re-authenticates transparently when the
//! token is missing or expired, retries transient HTTP failures, and splits
//! the response envelope into a typed payload or an API error.

use chrono::Utc;
use http::{HeaderMap, HeaderValue, Method, StatusCode, header};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;
use tracing::{debug, trace};
use url::Url;

use ecobank_types::envelope::{Envelope, EnvelopeError};
use ecobank_types::errors::ResponseErrors;
use ecobank_types::timestamp::Timestamp;

use crate::retry::RetryPolicy;
use crate::secure_hash::{SignedRequest, ensure_secure_hash};
use crate::session::Session;

/// Sandbox host of the Corporate API.
pub const DEFAULT_BASE_URL: &str = "https://developer.ecobank.com/corporateapi/";

/// The API rejects requests without this exact `Origin`.
const ORIGIN: &str = "developer.ecobank.com";

const DEFAULT_USER_AGENT: &str = concat!("ecobank-rs/", env!("CARGO_PKG_VERSION"));

const TOKEN_PATH: &str = "user/token";

/// Errors produced by the client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("invalid base URL")]
    BaseUrl(#[source] url::ParseError),
    #[error("invalid request path {path:?}")]
    Path {
        path: String,
        #[source]
        source: url::ParseError,
    },
    #[error("no credentials configured and no valid token available")]
    MissingCredentials,
    #[error("login failed with HTTP status {status}")]
    LoginFailed { status: StatusCode },
    #[error("HTTP error: {context}")]
    Http {
        context: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("unexpected HTTP status {status}: {body}")]
    HttpStatus { status: StatusCode, body: String },
    #[error("failed to decode {context}")]
    Decode {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },
    /// The API returned a populated error list inside a well-formed
    /// envelope. Match this variant to recover the individual messages.
    #[error("API error: {errors}")]
    Api {
        errors: ResponseErrors,
        response: ApiResponse,
    },
}

/// Per-call metadata: the envelope's own status fields plus the HTTP status.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub http_status: StatusCode,
    /// `response_code` from the envelope; `000` or `200` means success.
    pub code: i32,
    /// `response_message` from the envelope.
    pub message: String,
    /// `response_timestamp` from the envelope.
    pub timestamp: Option<Timestamp>,
}

/// Credentials for the token endpoint plus the hash secret.
#[derive(Clone)]
struct Credentials {
    username: String,
    password: String,
}

/// The login request body. The token endpoint is the one call that skips
/// both the bearer header and the secure hash.
#[derive(Serialize)]
struct AccessTokenRequest<'a> {
    #[serde(rename = "userId")]
    user_id: &'a str,
    password: &'a str,
}

/// The token endpoint's response, decoded straight from the body: it does
/// not use the standard envelope.
#[derive(Debug, serde::Deserialize)]
pub struct BearerToken {
    #[serde(default)]
    pub username: String,
    pub token: String,
}

/// An authenticated Ecobank Corporate API client.
///
/// Cheap to share by reference; all session state lives behind a
/// reader/writer lock, so concurrent calls from separate tasks are safe.
/// Readers never block each other; a login blocks only for the swap.
pub struct Client {
    http: reqwest::Client,
    base_url: Url,
    user_agent: String,
    lab_key: String,
    credentials: Option<Credentials>,
    session: RwLock<Option<Session>>,
    retry: Option<RetryPolicy>,
}

impl Client {
    /// Creates a client with the default base URL and retry policy.
    ///
    /// `lab_key` is the pre-provisioned shared secret used as hash input; it
    /// is never transmitted.
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        lab_key: impl Into<String>,
    ) -> Result<Self, ClientError> {
        Self::builder()
            .credentials(username, password)
            .lab_key(lab_key)
            .build()
    }

    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// The configured base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Authenticates against the token endpoint and replaces the session
    /// wholesale. The expiry comes from the token's `exp` claim, falling
    /// back to the documented two-hour lifetime.
    ///
    /// Login never recurses through the authenticated path: a failure here
    /// surfaces directly instead of triggering another re-authentication.
    pub async fn login(&self) -> Result<(), ClientError> {
        let credentials = self
            .credentials
            .as_ref()
            .ok_or(ClientError::MissingCredentials)?;
        let body = AccessTokenRequest {
            user_id: &credentials.username,
            password: &credentials.password,
        };
        debug!(username = %credentials.username, "logging in");
        let response = self.post_once(TOKEN_PATH, &body, None).await?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(ClientError::LoginFailed { status });
        }
        let bytes = response.bytes().await.map_err(|e| ClientError::Http {
            context: "read token response body",
            source: e,
        })?;
        let bearer: BearerToken =
            serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode {
                context: "token response",
                source: e,
            })?;
        let session = Session::from_token(bearer.token);
        let mut guard = self.session.write().await;
        *guard = Some(session);
        Ok(())
    }

    /// Executes a typed call: ensures the secure hash, authenticates, sends
    /// the request with retries, and splits the envelope.
    pub async fn execute<O, T>(
        &self,
        method: Method,
        path: &str,
        mut opts: O,
    ) -> Result<(T, ApiResponse), ClientError>
    where
        O: SignedRequest + Serialize,
        T: DeserializeOwned + Default,
    {
        ensure_secure_hash(&mut opts, &self.lab_key);

        let token = self.ensure_session().await?;
        trace!(%method, path, "dispatching request");
        let response = self.send_with_retry(method, path, &opts, &token).await?;

        let http_status = response.status();
        let bytes = response.bytes().await.map_err(|e| ClientError::Http {
            context: "read response body",
            source: e,
        })?;

        let envelope = match Envelope::from_slice(&bytes) {
            Ok(envelope) => envelope,
            Err(source) if http_status.is_success() => {
                return Err(ClientError::Decode {
                    context: "response envelope",
                    source,
                });
            }
            Err(_) => {
                return Err(ClientError::HttpStatus {
                    status: http_status,
                    body: String::from_utf8_lossy(&bytes).into_owned(),
                });
            }
        };

        let meta = envelope.meta();
        let api = ApiResponse {
            http_status,
            code: meta.code,
            message: meta.message,
            timestamp: meta.timestamp,
        };
        match envelope.decode::<T>() {
            Ok(value) => Ok((value, api)),
            Err(EnvelopeError::Api(errors)) => Err(ClientError::Api {
                errors,
                response: api,
            }),
            Err(EnvelopeError::Content(source)) => Err(ClientError::Decode {
                context: "response content",
                source,
            }),
        }
    }

    /// Returns a token that is valid right now, logging in first if the
    /// session is absent or expired.
    ///
    /// Concurrent callers hitting an expired session may each log in; the
    /// losers simply install a slightly newer session, which is harmless.
    async fn ensure_session(&self) -> Result<String, ClientError> {
        let now = Utc::now();
        {
            let guard = self.session.read().await;
            if let Some(session) = guard.as_ref()
                && session.is_valid_at(now)
            {
                return Ok(session.token.clone());
            }
        }

        if self.credentials.is_none() {
            return Err(ClientError::MissingCredentials);
        }
        debug!("session missing or expired, re-authenticating");
        self.login().await?;

        let guard = self.session.read().await;
        guard
            .as_ref()
            .map(|session| session.token.clone())
            .ok_or(ClientError::MissingCredentials)
    }

    /// Sends one request with the retry loop around it. Only 429 and server
    /// errors are retried; transport failures surface immediately.
    async fn send_with_retry<B>(
        &self,
        method: Method,
        path: &str,
        body: &B,
        token: &str,
    ) -> Result<reqwest::Response, ClientError>
    where
        B: Serialize + ?Sized,
    {
        let url = self.endpoint(path)?;
        let mut attempt = 0u32;
        loop {
            let response = self
                .request(method.clone(), url.clone(), body, Some(token))
                .send()
                .await
                .map_err(|e| ClientError::Http {
                    context: "send request",
                    source: e,
                })?;
            let status = response.status();
            match &self.retry {
                Some(policy) if policy.should_retry(status) && attempt < policy.max_retries => {
                    let wait = policy.wait_for(attempt);
                    debug!(%status, attempt, ?wait, "retrying after transient failure");
                    tokio::time::sleep(wait).await;
                    attempt += 1;
                }
                _ => return Ok(response),
            }
        }
    }

    /// Sends exactly one request, no retries. Used by login so that a failed
    /// login cannot loop.
    async fn post_once<B>(
        &self,
        path: &str,
        body: &B,
        token: Option<&str>,
    ) -> Result<reqwest::Response, ClientError>
    where
        B: Serialize + ?Sized,
    {
        let url = self.endpoint(path)?;
        self.request(Method::POST, url, body, token)
            .send()
            .await
            .map_err(|e| ClientError::Http {
                context: "send request",
                source: e,
            })
    }

    fn request<B>(
        &self,
        method: Method,
        url: Url,
        body: &B,
        token: Option<&str>,
    ) -> reqwest::RequestBuilder
    where
        B: Serialize + ?Sized,
    {
        let mut builder = self
            .http
            .request(method, url)
            .headers(self.default_headers())
            .json(body);
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    fn default_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(header::ORIGIN, HeaderValue::from_static(ORIGIN));
        if let Ok(agent) = HeaderValue::from_str(&self.user_agent) {
            headers.insert(header::USER_AGENT, agent);
        }
        headers
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        // The base URL always ends with a slash; a leading slash here would
        // escape it.
        let relative = path.trim_start_matches('/');
        self.base_url.join(relative).map_err(|e| ClientError::Path {
            path: path.to_string(),
            source: e,
        })
    }
}

/// Configures and builds a [`Client`].
#[derive(Default)]
pub struct ClientBuilder {
    credentials: Option<(String, String)>,
    lab_key: Option<String>,
    base_url: Option<String>,
    session: Option<Session>,
    http: Option<reqwest::Client>,
    user_agent: Option<String>,
    retry: Option<RetryPolicy>,
    disable_retries: bool,
}

impl ClientBuilder {
    /// Username and password for the token endpoint. Without these, the
    /// client can only run on an injected token until it expires.
    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.credentials = Some((username.into(), password.into()));
        self
    }

    /// The shared hash secret ("lab key").
    pub fn lab_key(mut self, lab_key: impl Into<String>) -> Self {
        self.lab_key = Some(lab_key.into());
        self
    }

    /// Overrides the base URL. A trailing slash is added when missing.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Injects a raw token; the expiry is derived from its `exp` claim.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.session = Some(Session::from_token(token));
        self
    }

    /// Injects a token with an explicitly known expiry.
    pub fn token_with_expiry(
        mut self,
        token: impl Into<String>,
        expires_at: chrono::DateTime<Utc>,
    ) -> Self {
        self.session = Some(Session::with_expiry(token, expires_at));
        self
    }

    /// Uses a pre-configured reqwest client (proxies, timeouts, TLS, ...).
    pub fn http_client(mut self, http: reqwest::Client) -> Self {
        self.http = Some(http);
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = Some(retry);
        self
    }

    /// Turns the retry loop off entirely.
    pub fn disable_retries(mut self) -> Self {
        self.disable_retries = true;
        self
    }

    pub fn build(self) -> Result<Client, ClientError> {
        let mut base = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base).map_err(ClientError::BaseUrl)?;

        let retry = if self.disable_retries {
            None
        } else {
            Some(self.retry.unwrap_or_default())
        };

        Ok(Client {
            http: self.http.unwrap_or_default(),
            base_url,
            user_agent: self
                .user_agent
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            lab_key: self.lab_key.unwrap_or_default(),
            credentials: self
                .credentials
                .map(|(username, password)| Credentials { username, password }),
            session: RwLock::new(self.session),
            retry,
        })
    }
}

/// Raw dispatch for callers with their own request types: anything that is
/// serializable and hash-aware can go through the typed entry point.
pub async fn do_request<O, T>(
    client: &Client,
    method: Method,
    path: &str,
    opts: O,
) -> Result<(T, ApiResponse), ClientError>
where
    O: SignedRequest + Serialize,
    T: DeserializeOwned + Default,
{
    client.execute(method, path, opts).await
}
