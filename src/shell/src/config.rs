use anyhow::{Context, Result, ensure};
use reqwest::Url;
use std::{env, time::Duration};

/// Database endpoint used when `DATABASE_URL` is not set
pub const DEFAULT_DATABASE_URL: &str = "https://nhom6-14bca-default-rtdb.firebaseio.com/";

const DEFAULT_RECONNECT_DELAY_SECS: u64 = 5;

/// Application configuration loaded and validated at startup
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Realtime database configuration
    pub database: DatabaseConfig,

    /// Shell behaviour
    pub shell: ShellConfig,
}

#[derive(Clone, Debug)]
pub struct DatabaseConfig {
    /// Base URL without trailing slash
    pub url: String,
    /// Token appended as `auth` query parameter
    pub auth: Option<String>,
}

#[derive(Clone, Debug)]
pub struct ShellConfig {
    /// Pause before reopening an interrupted event stream
    pub reconnect_delay: Duration,
}

impl AppConfig {
    /// Load and validate all configuration from environment variables
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let database = DatabaseConfig::load(&lookup)?;
        let shell = ShellConfig::load(&lookup)?;

        Ok(Self { database, shell })
    }
}

impl DatabaseConfig {
    fn load(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self> {
        let url = lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());
        let parsed = Url::parse(&url).context("failed to parse DATABASE_URL: invalid format")?;

        ensure!(
            matches!(parsed.scheme(), "http" | "https"),
            "failed to parse DATABASE_URL: unsupported scheme {}",
            parsed.scheme()
        );

        let auth = lookup("DATABASE_AUTH").filter(|token| !token.trim().is_empty());

        Ok(Self {
            url: url.trim_end_matches('/').to_string(),
            auth,
        })
    }
}

impl ShellConfig {
    fn load(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self> {
        let secs = lookup("RECONNECT_DELAY_SECS")
            .unwrap_or_else(|| DEFAULT_RECONNECT_DELAY_SECS.to_string())
            .parse::<u64>()
            .context("failed to parse RECONNECT_DELAY_SECS: invalid format")?;

        Ok(Self {
            reconnect_delay: Duration::from_secs(secs),
        })
    }
}
