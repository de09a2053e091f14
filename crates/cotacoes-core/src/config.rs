//! Client configuration, resolved once at process start and injected into
//! every surface.

use crate::ValidationError;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_PER_PAGE: u32 = 10;

pub const ENV_BASE_URL: &str = "COTACOES_API_URL";
pub const ENV_TIMEOUT_MS: &str = "COTACOES_TIMEOUT_MS";
pub const ENV_METADATA_TIMEOUT_MS: &str = "COTACOES_METADATA_TIMEOUT_MS";
pub const ENV_PER_PAGE: &str = "COTACOES_PER_PAGE";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Origin of the quotes API, without trailing slash.
    pub base_url: String,
    pub list_timeout_ms: u64,
    /// Ceiling for `/sectors` and `/types`.
    pub metadata_timeout_ms: u64,
    pub detail_timeout_ms: u64,
    pub per_page: u32,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: String::from(DEFAULT_BASE_URL),
            list_timeout_ms: 3_000,
            metadata_timeout_ms: 10_000,
            detail_timeout_ms: 10_000,
            per_page: DEFAULT_PER_PAGE,
            user_agent: String::from(concat!("cotacoes/", env!("CARGO_PKG_VERSION"))),
        }
    }
}

impl ClientConfig {
    /// Defaults overlaid with `COTACOES_*` environment variables.
    pub fn from_env() -> Result<Self, ValidationError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`ClientConfig::from_env`] with an injectable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ValidationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_BASE_URL) {
            config = config.with_base_url(&url)?;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_MS) {
            config.list_timeout_ms = parse_positive(ENV_TIMEOUT_MS, &raw)?;
        }
        if let Some(raw) = lookup(ENV_METADATA_TIMEOUT_MS) {
            config.metadata_timeout_ms = parse_positive(ENV_METADATA_TIMEOUT_MS, &raw)?;
        }
        if let Some(raw) = lookup(ENV_PER_PAGE) {
            let per_page = parse_positive(ENV_PER_PAGE, &raw)?;
            config.per_page = u32::try_from(per_page).map_err(|_| ValidationError::InvalidEnvValue {
                name: ENV_PER_PAGE,
                value: raw.clone(),
            })?;
        }

        Ok(config)
    }

    pub fn with_base_url(mut self, url: &str) -> Result<Self, ValidationError> {
        let trimmed = url.trim().trim_end_matches('/');
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Err(ValidationError::InvalidBaseUrl {
                value: url.to_owned(),
            });
        }
        self.base_url = trimmed.to_owned();
        Ok(self)
    }

    pub fn with_per_page(mut self, per_page: u32) -> Result<Self, ValidationError> {
        if per_page == 0 {
            return Err(ValidationError::InvalidPerPage);
        }
        self.per_page = per_page;
        Ok(self)
    }

    pub fn with_list_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.list_timeout_ms = timeout_ms;
        self
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

fn parse_positive(name: &'static str, raw: &str) -> Result<u64, ValidationError> {
    raw.trim()
        .parse::<u64>()
        .ok()
        .filter(|value| *value > 0)
        .ok_or_else(|| ValidationError::InvalidEnvValue {
            name,
            value: raw.to_owned(),
        })
}
