//! Application configuration read from environment variables.
//!
//! Sensitive fields are marked and must never be logged.

use anyhow::{Context, bail};
use derive_more::Display;
use envconfig::Envconfig;
use std::{str::FromStr, sync::OnceLock};

/// Where tables and accounts live
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum DataBackend {
    #[display("supabase")]
    Supabase,
    #[display("sqlite")]
    Sqlite,
}

impl FromStr for DataBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "supabase" => Ok(DataBackend::Supabase),
            "sqlite" => Ok(DataBackend::Sqlite),
            other => bail!("unknown data backend `{other}`, expected supabase or sqlite"),
        }
    }
}

#[derive(Envconfig, Clone)]
pub struct AppConfig {
    /// Environment name to deploy the app (NON-SENSITIVE)
    /// Values: "local", "dev", "prod"
    #[envconfig(from = "ENV", default = "local")]
    pub env: String,

    #[envconfig(from = "DATA_BACKEND", default = "supabase")]
    pub data_backend: DataBackend,

    /// Local database, only read by the sqlite backend (NON-SENSITIVE)
    /// Example: "sqlite:data/petglow.db?mode=rwc"
    #[envconfig(from = "DB_HOST", default = "sqlite:data/petglow.db?mode=rwc")]
    pub db_host: String,

    /// Hosted backend project url (NON-SENSITIVE)
    /// Example: "https://xyzcompany.supabase.co"
    #[envconfig(from = "SUPABASE_URL", default = "")]
    pub supabase_url: String,

    /// 🔒 SENSITIVE: hosted backend anon key, sent as `apikey` and bearer token
    #[envconfig(from = "SUPABASE_ANON_KEY", default = "")]
    pub supabase_anon_key: String,

    /// Host address for the cookies domain (NON-SENSITIVE)
    #[envconfig(from = "WEB_SERVER_HOST", default = "localhost")]
    pub web_server_host: String,

    #[envconfig(from = "WEB_SERVER_PORT", default = "8080")]
    pub web_server_port: u16,

    /// Path to SSL private key file, used in prod (SENSITIVE PATH)
    #[envconfig(from = "PRIVATE_KEY_PATH", default = "server.key")]
    pub private_key_path: String,

    #[envconfig(from = "CERTIFICATE_PATH", default = "server.crt")]
    pub certificate_path: String,

    /// 🔒 SENSITIVE: CSRF protection password (UUID format)
    #[envconfig(from = "CSRF_PASS")]
    pub csrf_pass: String,

    /// 🔒 SENSITIVE: CSRF protection salt (UUID format)
    #[envconfig(from = "CSRF_SALT")]
    pub csrf_salt: String,

    /// 🔒 SENSITIVE: logfire write token, logs go to the terminal when empty
    #[envconfig(from = "LOGFIRE_TOKEN", default = "")]
    pub logfire_token: String,
}

impl AppConfig {
    pub fn is_prod(&self) -> bool {
        self.env.to_lowercase() == "prod"
    }

    pub fn has_logfire(&self) -> bool {
        !self.logfire_token.trim().is_empty()
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.data_backend == DataBackend::Supabase
            && (self.supabase_url.trim().is_empty() || self.supabase_anon_key.trim().is_empty())
        {
            bail!("SUPABASE_URL and SUPABASE_ANON_KEY are required by the supabase backend");
        }

        if self.csrf_pass.trim().is_empty() || self.csrf_salt.trim().is_empty() {
            bail!("CSRF_PASS and CSRF_SALT are required");
        }

        Ok(())
    }
}

/// Global application configuration, set once by [init_config]
pub static APP_CONFIG: OnceLock<AppConfig> = OnceLock::new();

pub fn init_config() -> anyhow::Result<()> {
    let app_config = AppConfig::init_from_env().context("failed to read app config from env")?;
    app_config.validate()?;

    APP_CONFIG
        .set(app_config)
        .map_err(|_| anyhow::anyhow!("app config already initialized"))
}
