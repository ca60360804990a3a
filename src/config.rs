use std::env;
use std::time::Duration;

use clap::ArgMatches;
use log::{info, warn};

pub const API_KEY_VAR: &str = "GOOGLE_API_KEY";
pub const SEARCH_SCOPE_VAR: &str = "GOOGLE_CX";

/// Credentials for the image search collaborator
#[derive(Clone)]
pub struct ImageSearchCredentials {
    pub api_key: String,
    pub search_scope: String,
}

impl ImageSearchCredentials {
    /// Both values must be present and non-blank
    pub fn from_values(api_key: Option<String>, search_scope: Option<String>) -> Option<Self> {
        let api_key = api_key.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())?;
        let search_scope = search_scope.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())?;
        Some(Self { api_key, search_scope })
    }

    /// Read from the environment. Missing credentials are not fatal: the
    /// service keeps running and always serves the fallback image.
    pub fn from_env() -> Option<Self> {
        let credentials = Self::from_values(env::var(API_KEY_VAR).ok(), env::var(SEARCH_SCOPE_VAR).ok());
        if credentials.is_none() {
            warn!(
                "{} or {} is not set. Image search is disabled and the fallback image will be served.",
                API_KEY_VAR, SEARCH_SCOPE_VAR
            );
        }
        credentials
    }
}

// Keep the key out of debug output and logs
impl std::fmt::Debug for ImageSearchCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageSearchCredentials")
            .field("api_key", &"<redacted>")
            .field("search_scope", &self.search_scope)
            .finish()
    }
}

#[derive(Debug)]
pub struct Settings {
    pub listen_host: String,
    pub log_file: Option<String>,
    pub figures_file: Option<String>,
    pub daily_size: usize,
    pub daily_limit: u32,
    pub fallback_image: String,
    pub lookup_timeout: Duration,
    pub credentials: Option<ImageSearchCredentials>,
}

impl Settings {
    /// Build settings from parsed CLI arguments. Credentials are read
    /// separately (after logging is up) via [`ImageSearchCredentials::from_env`].
    pub fn from_matches(matches: &ArgMatches) -> Self {
        let string = |id: &str| matches.get_one::<String>(id).cloned();

        Self {
            listen_host: string("listen-host").unwrap_or_else(|| "0.0.0.0:3000".to_string()),
            log_file: string("log-file"),
            figures_file: string("figures"),
            daily_size: matches.get_one::<usize>("daily-size").copied().unwrap_or(6),
            daily_limit: matches.get_one::<u32>("daily-limit").copied().unwrap_or(100),
            fallback_image: string("fallback-image").unwrap_or_else(|| "/default-image.png".to_string()),
            lookup_timeout: Duration::from_secs(
                matches.get_one::<u64>("lookup-timeout-secs").copied().unwrap_or(5),
            ),
            credentials: None,
        }
    }

    pub fn log_summary(&self) {
        info!(
            "Daily set size {}, daily limit {}, fallback image {}, lookup timeout {:?}",
            self.daily_size, self.daily_limit, self.fallback_image, self.lookup_timeout
        );
    }
}
