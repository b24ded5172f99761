use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{DarsError, Result};

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_BIND: &str = "0.0.0.0";
pub const DEFAULT_CONFIG_FILE: &str = "dars.toml";
pub const DEFAULT_STATIC_DIR: &str = "public";
pub const DEFAULT_LOGIN_URL: &str = "https://login.emaktab.uz/";
pub const DEFAULT_EXPORT_URL: &str = "https://emaktab.uz/marks/export";
pub const DEFAULT_REFRESH_HOUR: u8 = 6;
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 120;

/// Top-level config (dars.toml + DARS_* env overrides).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DarsConfig {
    pub gateway: GatewayConfig,
    pub portal: PortalConfig,
    #[serde(default)]
    pub refresh: RefreshConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Shared secret expected in `?key=` on `/schedule`.
    /// When unset every request is rejected.
    pub access_key: Option<String>,
    /// Directory served for every path not matched by a route.
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

/// Where and as whom the raw schedule export is downloaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortalConfig {
    #[serde(default = "default_login_url")]
    pub login_url: String,
    #[serde(default = "default_export_url")]
    pub export_url: String,
    pub login: String,
    pub password: String,
    #[serde(default = "default_login_field")]
    pub login_field: String,
    #[serde(default = "default_password_field")]
    pub password_field: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Daily refresh timer and fetch limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshConfig {
    /// Local wall-clock hour of the daily refresh (0-23).
    #[serde(default = "default_refresh_hour")]
    pub hour: u8,
    #[serde(default)]
    pub minute: u8,
    /// Upper bound on one portal round-trip. `0` disables the bound.
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
    /// Warm the cache once at boot.
    #[serde(default)]
    pub on_start: bool,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            hour: DEFAULT_REFRESH_HOUR,
            minute: 0,
            fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
            on_start: false,
        }
    }
}

impl RefreshConfig {
    pub fn fetch_timeout(&self) -> Option<std::time::Duration> {
        (self.fetch_timeout_secs > 0)
            .then(|| std::time::Duration::from_secs(self.fetch_timeout_secs))
    }
}

fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}
fn default_static_dir() -> String {
    DEFAULT_STATIC_DIR.to_string()
}
fn default_login_url() -> String {
    DEFAULT_LOGIN_URL.to_string()
}
fn default_export_url() -> String {
    DEFAULT_EXPORT_URL.to_string()
}
fn default_login_field() -> String {
    "login".to_string()
}
fn default_password_field() -> String {
    "password".to_string()
}
fn default_user_agent() -> String {
    concat!("dars/", env!("CARGO_PKG_VERSION")).to_string()
}
fn default_refresh_hour() -> u8 {
    DEFAULT_REFRESH_HOUR
}
fn default_fetch_timeout_secs() -> u64 {
    DEFAULT_FETCH_TIMEOUT_SECS
}

impl DarsConfig {
    /// Load config from a TOML file with DARS_* env var overrides.
    ///
    /// Checks in order:
    ///   1. Explicit path argument
    ///   2. `DARS_CONFIG` env var
    ///   3. ./dars.toml
    ///
    /// Nested keys use a double underscore: `DARS_PORTAL__PASSWORD`.
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let path = config_path
            .map(String::from)
            .or_else(|| std::env::var("DARS_CONFIG").ok())
            .unwrap_or_else(|| DEFAULT_CONFIG_FILE.to_string());

        tracing::debug!(path = %path, "loading config");

        let config: DarsConfig = Figment::new()
            .merge(Toml::file(&path))
            .merge(Env::prefixed("DARS_").ignore(&["CONFIG"]).split("__"))
            .extract()
            .map_err(|e| DarsError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Reject values that would only fail later at runtime.
    pub fn validate(&self) -> Result<()> {
        if self.refresh.hour > 23 {
            return Err(DarsError::Config(format!(
                "refresh.hour must be 0-23, got {}",
                self.refresh.hour
            )));
        }
        if self.refresh.minute > 59 {
            return Err(DarsError::Config(format!(
                "refresh.minute must be 0-59, got {}",
                self.refresh.minute
            )));
        }
        if self.portal.login.trim().is_empty() || self.portal.password.is_empty() {
            return Err(DarsError::Config(
                "portal.login and portal.password are required".to_string(),
            ));
        }
        if self
            .gateway
            .access_key
            .as_deref()
            .map_or(true, |k| k.is_empty())
        {
            tracing::warn!("gateway.access_key is not set; /schedule will reject every request");
        }
        Ok(())
    }
}
