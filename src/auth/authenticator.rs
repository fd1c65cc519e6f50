use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::auth::types::{AuthState, Credentials, LoginResponse, SessionToken};
use crate::errors::{ShotCallError, ShotCallResult};

/// Supplies the credential pair used for the startup login.
pub trait CredentialProvider: Send + Sync {
    fn credentials(&self) -> ShotCallResult<Credentials>;
}

/// Credentials fixed at construction time (normally taken from config).
pub struct StaticCredentials {
    credentials: Credentials,
}

impl StaticCredentials {
    pub fn new(credentials: Credentials) -> Self {
        Self { credentials }
    }
}

impl CredentialProvider for StaticCredentials {
    fn credentials(&self) -> ShotCallResult<Credentials> {
        if self.credentials.username.is_empty() {
            return Err(ShotCallError::Auth("no username configured".into()));
        }
        Ok(self.credentials.clone())
    }
}

/// One credential → token exchange with the remote service.
#[async_trait]
pub trait LoginExchange: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> ShotCallResult<SessionToken>;
}

/// OAuth2 password-form login against `POST {base}/login`.
pub struct HttpLogin {
    login_url: String,
    client: reqwest::Client,
}

impl HttpLogin {
    pub fn new(login_url: String, client: reqwest::Client) -> Self {
        Self { login_url, client }
    }
}

#[async_trait]
impl LoginExchange for HttpLogin {
    async fn login(&self, credentials: &Credentials) -> ShotCallResult<SessionToken> {
        let form = [
            ("grant_type", ""),
            ("username", credentials.username.as_str()),
            ("password", credentials.password.as_str()),
            ("scope", ""),
            ("client_id", ""),
            ("client_secret", ""),
        ];

        tracing::debug!(url = %self.login_url, username = %credentials.username, "sending login request");

        let response = self
            .client
            .post(&self.login_url)
            .header(reqwest::header::ACCEPT, "application/json")
            .form(&form)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let err_body = response.text().await.unwrap_or_default();
            return Err(ShotCallError::Auth(format!("{}: {}", status, err_body)));
        }

        let body: LoginResponse = response.json().await?;
        if body.access_token.is_empty() {
            return Err(ShotCallError::Auth("login response carried an empty access_token".into()));
        }
        Ok(SessionToken::new(body.access_token))
    }
}

/// Owns the session token. Cloning yields another handle onto the same state.
///
/// Authentication runs at most once per session: there is no retry, refresh or
/// re-login, and a failure is permanent. Prediction requests never wait on it.
#[derive(Clone)]
pub struct SessionAuthenticator {
    state: Arc<RwLock<AuthState>>,
    exchange: Arc<dyn LoginExchange>,
}

impl SessionAuthenticator {
    pub fn new(exchange: Arc<dyn LoginExchange>) -> Self {
        Self {
            state: Arc::new(RwLock::new(AuthState::Unauthenticated)),
            exchange,
        }
    }

    pub async fn state(&self) -> AuthState {
        self.state.read().await.clone()
    }

    /// Snapshot of the current token, `None` unless authenticated.
    pub async fn token(&self) -> Option<SessionToken> {
        self.state.read().await.token().cloned()
    }

    /// Performs the login exchange if none has been attempted yet and returns the
    /// resulting terminal state. Later calls return the current state untouched.
    pub async fn authenticate(&self, credentials: &Credentials) -> AuthState {
        {
            let mut state = self.state.write().await;
            if *state != AuthState::Unauthenticated {
                tracing::warn!(state = state.label(), "authentication already attempted; ignoring");
                return state.clone();
            }
            *state = AuthState::Authenticating;
        }

        let outcome = match self.exchange.login(credentials).await {
            Ok(token) => {
                tracing::info!(username = %credentials.username, "Login successful");
                AuthState::Authenticated(token)
            }
            Err(e) => {
                tracing::error!(error = %e, "Login failed");
                AuthState::AuthFailed(e.to_string())
            }
        };
        tracing::info!("Login finished");

        *self.state.write().await = outcome.clone();
        outcome
    }

    /// Like [`authenticate`](Self::authenticate), pulling credentials from `provider`.
    /// A provider error fails the session the same way a rejected login does.
    pub async fn authenticate_with(&self, provider: &dyn CredentialProvider) -> AuthState {
        match provider.credentials() {
            Ok(credentials) => self.authenticate(&credentials).await,
            Err(e) => {
                let mut state = self.state.write().await;
                if *state != AuthState::Unauthenticated {
                    return state.clone();
                }
                tracing::error!(error = %e, "Login failed: credentials unavailable");
                *state = AuthState::AuthFailed(e.to_string());
                state.clone()
            }
        }
    }
}
