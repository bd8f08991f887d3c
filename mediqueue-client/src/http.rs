//! HTTP client for the MediQueue backend API
//!
//! Single point of outbound HTTP: injects the bearer token from the
//! [`CredentialStore`], enforces the request timeout, and classifies
//! every failure into the [`ClientError`] taxonomy. A 401 additionally
//! clears the store and fires the `on_unauthorized` hook, because an
//! expired session is not something an individual view can recover from.

use crate::{ClientConfig, ClientError, ClientResult, CredentialStore};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use shared::client::{
    CooldownInfo, CreatedTurn, LoginRequest, LoginResponse, PublicTurnRequest, UserInfo,
};
use shared::{ApiResponse, Area, Turn};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Hook fired when the server answers 401; the host application
/// subscribes once at startup and translates it into navigation.
pub type UnauthorizedHook = Arc<dyn Fn() + Send + Sync>;

/// HTTP client for making network requests to the queue backend
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    store: Arc<dyn CredentialStore>,
    on_unauthorized: Option<UnauthorizedHook>,
}

impl fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl HttpClient {
    /// Create a new HTTP client from configuration and a credential store
    pub fn new(config: &ClientConfig, store: Arc<dyn CredentialStore>) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: config.base_url.clone(),
            store,
            on_unauthorized: None,
        }
    }

    /// Register the hook fired on HTTP 401
    pub fn with_on_unauthorized(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_unauthorized = Some(Arc::new(hook));
        self
    }

    /// Build authorization header value from the store
    fn auth_header(&self) -> Option<String> {
        self.store.get().map(|t| format!("Bearer {}", t))
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let mut request = self.client.get(self.url(path));

        if let Some(auth) = self.auth_header() {
            request = request.header(reqwest::header::AUTHORIZATION, auth);
        }

        let response = request.send().await?;
        self.handle_response(response).await
    }

    /// Make a POST request with JSON body
    pub async fn post<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let mut request = self.client.post(self.url(path)).json(body);

        if let Some(auth) = self.auth_header() {
            request = request.header(reqwest::header::AUTHORIZATION, auth);
        }

        let response = request.send().await?;
        self.handle_response(response).await
    }

    /// Make a POST request without body
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let mut request = self.client.post(self.url(path));

        if let Some(auth) = self.auth_header() {
            request = request.header(reqwest::header::AUTHORIZATION, auth);
        }

        let response = request.send().await?;
        self.handle_response(response).await
    }

    /// Handle the HTTP response: parse on 2xx, classify otherwise
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> ClientResult<T> {
        let status = response.status();

        if status.is_success() {
            return response.json().await.map_err(Into::into);
        }

        let body = response.text().await.unwrap_or_default();
        Err(self.classify(status, body))
    }

    /// Map an error status plus body into the taxonomy
    fn classify(&self, status: StatusCode, body: String) -> ClientError {
        // Backend errors arrive in the standard envelope; fall back to the
        // raw body for proxies and other non-envelope responses.
        let message = serde_json::from_str::<ApiResponse<serde_json::Value>>(&body)
            .map(|envelope| envelope.message)
            .unwrap_or_else(|_| body.clone());

        match status {
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                ClientError::Validation(message)
            }
            StatusCode::UNAUTHORIZED => {
                // Global side effect: the session is gone for every view.
                warn!("Received 401, clearing stored credentials");
                self.store.clear();
                if let Some(hook) = &self.on_unauthorized {
                    hook();
                }
                ClientError::Auth
            }
            StatusCode::FORBIDDEN => ClientError::Permission(message),
            StatusCode::NOT_FOUND => ClientError::NotFound(message),
            StatusCode::CONFLICT => ClientError::Conflict(message),
            StatusCode::TOO_MANY_REQUESTS => {
                let seconds_remaining = serde_json::from_str::<ApiResponse<CooldownInfo>>(&body)
                    .ok()
                    .and_then(|envelope| envelope.data)
                    .map(|info| info.time_remaining);
                ClientError::Cooldown {
                    message,
                    seconds_remaining,
                }
            }
            s if s.is_server_error() => ClientError::Server(message),
            _ => ClientError::Unknown(message),
        }
    }

    // ========== Public Queue API ==========

    /// List areas available on the public kiosk
    pub async fn basic_areas(&self) -> ClientResult<Vec<Area>> {
        self.get::<ApiResponse<Vec<Area>>>("/api/areas/basicas")
            .await?
            .data
            .ok_or_else(|| ClientError::InvalidResponse("Missing areas data".to_string()))
    }

    /// Active turns (WAITING/CALLING) across all areas
    pub async fn public_turns(&self, include_inactive: bool) -> ClientResult<Vec<Turn>> {
        let path = if include_inactive {
            "/api/turnos/publicos?incluir_inactivos=true"
        } else {
            "/api/turnos/publicos"
        };
        self.get::<ApiResponse<Vec<Turn>>>(path)
            .await?
            .data
            .ok_or_else(|| ClientError::InvalidResponse("Missing turns data".to_string()))
    }

    /// The single next turn, or None when the queue is empty
    pub async fn next_turn(&self) -> ClientResult<Option<Turn>> {
        let response = self.get::<ApiResponse<Turn>>("/api/turnos/proximo").await?;
        // data: null is a valid "queue empty" answer here
        Ok(response.data)
    }

    /// Create a turn with automatic office assignment
    ///
    /// May fail with [`ClientError::Cooldown`] when the caller must wait
    /// before requesting another turn.
    pub async fn create_public_turn(&self, area_id: &str) -> ClientResult<CreatedTurn> {
        let body = PublicTurnRequest {
            area_id: area_id.to_string(),
        };
        debug!(area_id, "Requesting public turn");
        self.post::<ApiResponse<CreatedTurn>, _>("/api/turnos/publico/auto", &body)
            .await?
            .data
            .ok_or_else(|| ClientError::InvalidResponse("Missing created turn data".to_string()))
    }

    // ========== Auth API ==========

    /// Login with username and password
    ///
    /// Writes the returned token into the credential store, in the
    /// persistent scope when `remember` is set.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
        remember: bool,
    ) -> ClientResult<UserInfo> {
        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };

        let login = self
            .post::<ApiResponse<LoginResponse>, _>("/api/auth/login", &request)
            .await?
            .data
            .ok_or_else(|| ClientError::InvalidResponse("Missing login data".to_string()))?;

        self.store.set(&login.token, remember);
        Ok(login.user)
    }

    /// Logout, clearing the stored credentials regardless of the server reply
    pub async fn logout(&self) -> ClientResult<()> {
        let result = self.post_empty::<ApiResponse<()>>("/api/auth/logout").await;
        self.store.clear();
        result.map(|_| ())
    }
}
