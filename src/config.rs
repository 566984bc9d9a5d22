// Configuration - Environment variables
// Read after dotenvy has loaded .env

use std::env;

const DEFAULT_CORS_ORIGINS: &str = "http://localhost:3000,http://localhost:5173";

/// Application configuration loaded from environment
#[derive(Clone, Debug)]
pub struct Config {
    /// Server port
    pub port: u16,
    /// Supabase project URL
    pub supabase_url: Option<String>,
    /// Supabase anon/public key
    pub supabase_key: Option<String>,
    /// Supabase service role key, used only when no anon key is configured
    pub supabase_service_key: Option<String>,
    /// Origins allowed by the CORS layer
    pub cors_origins: Vec<String>,
    /// Deployment environment name
    pub environment: String,
    /// Verbose logging
    pub debug: bool,
    /// Optional log file, in addition to stdout
    pub log_file: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8000,
            supabase_url: None,
            supabase_key: None,
            supabase_service_key: None,
            cors_origins: parse_origins(DEFAULT_CORS_ORIGINS),
            environment: "development".to_string(),
            debug: true,
            log_file: None,
        }
    }
}

/// Split a comma separated origin list, dropping blanks
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|origin| origin.trim())
        .filter(|origin| !origin.is_empty())
        .map(|origin| origin.to_string())
        .collect()
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn non_empty(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            supabase_url: non_empty("SUPABASE_URL"),
            supabase_key: non_empty("SUPABASE_KEY"),
            supabase_service_key: non_empty("SUPABASE_SERVICE_KEY"),
            cors_origins: env::var("CORS_ORIGINS")
                .ok()
                .map(|raw| parse_origins(&raw))
                .unwrap_or(defaults.cors_origins),
            environment: non_empty("ENVIRONMENT").unwrap_or(defaults.environment),
            debug: env::var("DEBUG")
                .ok()
                .and_then(|v| parse_bool(&v))
                .unwrap_or(defaults.debug),
            log_file: non_empty("LOG_FILE"),
        }
    }

    /// Validate that required configuration is present
    pub fn validate(&self) -> Result<(), String> {
        if self.supabase_url.is_none() {
            return Err("SUPABASE_URL not set".to_string());
        }
        if self.supabase_key.is_none() && self.supabase_service_key.is_none() {
            return Err("SUPABASE_KEY not set".to_string());
        }
        if self.cors_origins.is_empty() {
            tracing::warn!("CORS_ORIGINS is empty - browsers will be refused cross-origin access");
        }
        Ok(())
    }

    /// Key used for store requests
    pub fn api_key(&self) -> Option<&str> {
        self.supabase_key
            .as_deref()
            .or(self.supabase_service_key.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_origins() {
        assert_eq!(
            parse_origins(" http://a.test , ,http://b.test,"),
            vec!["http://a.test".to_string(), "http://b.test".to_string()]
        );
        assert_eq!(Config::default().cors_origins.len(), 2);
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("True"), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn test_validate_and_api_key() {
        let mut config = Config::default();
        assert!(config.validate().is_err());

        config.supabase_url = Some("https://example.supabase.co".to_string());
        assert_eq!(config.validate().unwrap_err(), "SUPABASE_KEY not set");

        config.supabase_service_key = Some("service".to_string());
        assert!(config.validate().is_ok());
        assert_eq!(config.api_key(), Some("service"));

        config.supabase_key = Some("anon".to_string());
        assert_eq!(config.api_key(), Some("anon"));
    }
}
