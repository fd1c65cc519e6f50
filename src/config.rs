use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::auth::types::Credentials;
use crate::court::types::RenderSurfaceSpec;
use crate::errors::{ShotCallError, ShotCallResult};

pub const API_URL_ENV: &str = "SHOTCALL_API_URL";
pub const USERNAME_ENV: &str = "SHOTCALL_USERNAME";
pub const PASSWORD_ENV: &str = "SHOTCALL_PASSWORD";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub credentials: CredentialsConfig,
    #[serde(default)]
    pub surface: SurfaceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the prediction service; `/login` and `/predict` are joined onto it.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

/// Demo login used once at startup (falls back to env vars SHOTCALL_USERNAME / SHOTCALL_PASSWORD).
#[derive(Clone, Serialize, Deserialize)]
pub struct CredentialsConfig {
    #[serde(default = "default_username")]
    pub username: String,
    #[serde(default = "default_password")]
    pub password: String,
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            username: default_username(),
            password: default_password(),
        }
    }
}

impl std::fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsConfig")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

fn default_username() -> String {
    "johndoe".to_string()
}

fn default_password() -> String {
    "secret".to_string()
}

/// Pixel size of the clickable court surface (250×375 scaled by 0.85).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurfaceConfig {
    #[serde(default = "default_width_px")]
    pub width_px: f64,
    #[serde(default = "default_height_px")]
    pub height_px: f64,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            width_px: default_width_px(),
            height_px: default_height_px(),
        }
    }
}

fn default_width_px() -> f64 {
    250.0 * 0.85
}

fn default_height_px() -> f64 {
    375.0 * 0.85
}

impl AppConfig {
    pub fn validate(&self) -> ShotCallResult<()> {
        if self.api.base_url.trim().is_empty() {
            return Err(ShotCallError::Config("api.base_url must not be empty".into()));
        }
        if self.api.request_timeout_secs == 0 {
            return Err(ShotCallError::Config(
                "api.request_timeout_secs must be at least 1".into(),
            ));
        }
        self.surface_spec().map(|_| ())
    }

    pub fn surface_spec(&self) -> ShotCallResult<RenderSurfaceSpec> {
        RenderSurfaceSpec::new(self.surface.width_px, self.surface.height_px)
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::new(
            self.credentials.username.clone(),
            self.credentials.password.clone(),
        )
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.api.request_timeout_secs)
    }

    /// `base_url` joined with `path`, without doubling the separator.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.api.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Applies environment overrides. `lookup` is `std::env::var` in production.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(API_URL_ENV).filter(|v| !v.trim().is_empty()) {
            tracing::debug!(url = %url, "api url overridden from environment");
            self.api.base_url = url;
        }
        if let Some(username) = lookup(USERNAME_ENV) {
            self.credentials.username = username;
        }
        if let Some(password) = lookup(PASSWORD_ENV) {
            self.credentials.password = password;
        }
    }
}

fn resolve_config_path() -> Option<PathBuf> {
    if let Ok(exe) = std::env::current_exe() {
        if let Some(parent) = exe.parent() {
            let candidate = parent.join("config.toml");
            if candidate.exists() {
                tracing::debug!(path = %candidate.display(), "config found next to executable");
                return Some(candidate);
            }
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        let candidate = cwd.join("config.toml");
        if candidate.exists() {
            tracing::debug!(path = %candidate.display(), "config found in working directory");
            return Some(candidate);
        }
    }

    let candidate = dirs::config_dir()?.join("shotcall").join("config.toml");
    if candidate.exists() {
        tracing::debug!(path = %candidate.display(), "config found in user config directory");
        return Some(candidate);
    }
    None
}

pub fn parse_config(content: &str) -> ShotCallResult<AppConfig> {
    let config: AppConfig = toml::from_str(content)?;
    Ok(config)
}

/// Loads `config.toml` if one exists, otherwise the built-in defaults, then applies
/// environment overrides and validates the result.
pub fn load_config() -> ShotCallResult<AppConfig> {
    let mut config = match resolve_config_path() {
        Some(path) => {
            let content = std::fs::read_to_string(&path)?;
            let config = parse_config(&content)?;
            tracing::info!(path = %path.display(), "config loaded");
            config
        }
        None => {
            tracing::info!("no config.toml found; using defaults");
            AppConfig::default()
        }
    };
    config.apply_overrides(|key| std::env::var(key).ok());
    config.validate()?;
    Ok(config)
}

/// Defaults plus environment overrides, used when the config file is unusable.
pub fn defaults_from_env() -> AppConfig {
    let mut config = AppConfig::default();
    config.apply_overrides(|key| std::env::var(key).ok());
    config
}
