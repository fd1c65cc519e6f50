use serde::Deserialize;

/// Username/password pair for the one-time login exchange.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Opaque bearer credential returned by `/login`.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SessionToken(<{} chars>)", self.0.len())
    }
}

/// Authentication lifecycle. `Authenticated` and `AuthFailed` are terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    Unauthenticated,
    Authenticating,
    Authenticated(SessionToken),
    AuthFailed(String),
}

impl AuthState {
    pub fn token(&self) -> Option<&SessionToken> {
        match self {
            AuthState::Authenticated(token) => Some(token),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AuthState::Unauthenticated => "unauthenticated",
            AuthState::Authenticating => "authenticating",
            AuthState::Authenticated(_) => "authenticated",
            AuthState::AuthFailed(_) => "auth failed",
        }
    }
}

/// `/login` response body. Extra fields (e.g. `token_type`) are ignored.
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
}
