use anyhow::{bail, Context, Result};

/// Which backend memoizes model replies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheBackend {
    Memory,
    Redis,
    None,
}

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub google_api_key: String,
    pub port: u16,
    pub rust_log: String,
    pub cache_backend: CacheBackend,
    pub redis_url: Option<String>,
    pub cache_ttl_secs: u64,
    pub cache_max_entries: usize,
    pub max_upload_bytes: usize,
    pub llm_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let google_api_key = lookup("GOOGLE_API_KEY")
            .filter(|v| !v.trim().is_empty())
            .context("Required environment variable 'GOOGLE_API_KEY' is not set")?;

        let cache_backend = match lookup("CACHE_BACKEND")
            .unwrap_or_else(|| "memory".to_string())
            .to_lowercase()
            .as_str()
        {
            "memory" => CacheBackend::Memory,
            "redis" => CacheBackend::Redis,
            "none" | "off" => CacheBackend::None,
            other => bail!("CACHE_BACKEND must be one of memory, redis, none (got '{other}')"),
        };

        let redis_url = lookup("REDIS_URL");
        if cache_backend == CacheBackend::Redis && redis_url.is_none() {
            bail!("REDIS_URL must be set when CACHE_BACKEND=redis");
        }

        let max_upload_mb: usize = parse_or(&lookup, "MAX_UPLOAD_MB", 25)?;

        Ok(Config {
            google_api_key,
            port: parse_or(&lookup, "PORT", 8080)?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            cache_backend,
            redis_url,
            cache_ttl_secs: parse_or(&lookup, "CACHE_TTL_SECS", 3600)?,
            cache_max_entries: parse_or(&lookup, "CACHE_MAX_ENTRIES", 512)?,
            max_upload_bytes: max_upload_mb * 1024 * 1024,
            llm_timeout_secs: parse_or(&lookup, "LLM_TIMEOUT_SECS", 120)?,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .ok()
            .with_context(|| format!("{key} has an invalid value '{raw}'")),
        None => Ok(default),
    }
}
