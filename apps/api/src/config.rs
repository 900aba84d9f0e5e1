use std::str::FromStr;

use anyhow::{Context, Result};
use reqwest::Url;

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed numbers fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the CMS REST API, e.g. `http://localhost:1337/api`.
    pub cms_api_url: String,
    /// Frontend origin: CORS origin and base of password-reset links.
    pub frontend_url: String,
    pub session_cookie_days: i64,
    pub cms_timeout_secs: u64,
    pub pdf_engine: String,
    pub port: u16,
    pub rust_log: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            cms_api_url: "http://localhost:1337/api".to_string(),
            frontend_url: "http://localhost:3000".to_string(),
            session_cookie_days: 7,
            cms_timeout_secs: 30,
            pdf_engine: "tectonic".to_string(),
            port: 8080,
            rust_log: "info".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = Config::default();
        let frontend_url = env_or("FRONTEND_URL", defaults.frontend_url);
        Url::parse(&frontend_url)
            .with_context(|| format!("FRONTEND_URL '{frontend_url}' is not a valid URL"))?;

        Ok(Config {
            cms_api_url: env_or("CMS_API_URL", defaults.cms_api_url),
            frontend_url,
            session_cookie_days: parse_env("SESSION_COOKIE_DAYS", defaults.session_cookie_days)?,
            cms_timeout_secs: parse_env("CMS_TIMEOUT_SECS", defaults.cms_timeout_secs)?,
            pdf_engine: env_or("PDF_ENGINE", defaults.pdf_engine),
            port: parse_env("PORT", defaults.port)?,
            rust_log: env_or("RUST_LOG", defaults.rust_log),
        })
    }
}

fn env_or(key: &str, default: String) -> String {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or(default)
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        _ => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.cms_api_url, "http://localhost:1337/api");
        assert_eq!(config.session_cookie_days, 7);
        assert_eq!(config.pdf_engine, "tectonic");
    }

    #[test]
    fn test_parse_env_rejects_garbage() {
        std::env::set_var("RESUMECRAFT_TEST_PORT", "eighty");
        let err = parse_env::<u16>("RESUMECRAFT_TEST_PORT", 8080).unwrap_err();
        assert!(err.to_string().contains("RESUMECRAFT_TEST_PORT"));
        std::env::remove_var("RESUMECRAFT_TEST_PORT");
    }

    #[test]
    fn test_parse_env_falls_back_when_unset() {
        assert_eq!(parse_env::<u64>("RESUMECRAFT_TEST_UNSET", 30).unwrap(), 30);
    }
}
