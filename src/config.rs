//! Configuration types.

use std::time::Duration;

use secrecy::SecretString;

use crate::error::ConfigError;

/// Default OpenAI-compatible endpoint for NVIDIA NIM.
pub const DEFAULT_BASE_URL: &str = "https://integrate.api.nvidia.com/v1";
/// Default chat model served by NIM.
pub const DEFAULT_MODEL: &str = "meta/llama3-70b-instruct";

/// Sampling parameters sent with every completion request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParams {
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_tokens: 1024,
            temperature: 0.2,
            top_p: 0.7,
        }
    }
}

/// Which UI surface the binary drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceMode {
    /// Single conversation over stdin/stdout.
    Cli,
    /// JSON API, one independent session per client.
    Serve,
}

impl std::str::FromStr for SurfaceMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cli" => Ok(Self::Cli),
            "serve" | "server" | "http" => Ok(Self::Serve),
            other => Err(ConfigError::InvalidValue {
                key: "TALENTSCOUT_MODE".to_string(),
                message: format!("expected 'cli' or 'serve', got '{other}'"),
            }),
        }
    }
}

/// Process configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_key: SecretString,
    pub base_url: String,
    pub model: String,
    pub mode: SurfaceMode,
    pub port: u16,
    pub http_timeout: Duration,
    /// HTTP sessions untouched for this long are dropped.
    pub session_idle_timeout: Duration,
    pub generation: GenerationParams,
}

impl AppConfig {
    /// Read configuration from the process environment.
    ///
    /// `NVIDIA_API_KEY` is required; everything else has a default.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("NVIDIA_API_KEY")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar("NVIDIA_API_KEY".to_string()))?;

        let base_url = lookup("TALENTSCOUT_BASE_URL")
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let model = lookup("TALENTSCOUT_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let mode = match lookup("TALENTSCOUT_MODE") {
            Some(raw) => raw.parse()?,
            None => SurfaceMode::Cli,
        };

        let port: u16 = parse_or(&lookup, "TALENTSCOUT_PORT", 8080)?;
        let timeout_secs: u64 = parse_or(&lookup, "TALENTSCOUT_HTTP_TIMEOUT_SECS", 60)?;
        let idle_secs: u64 = parse_or(&lookup, "TALENTSCOUT_SESSION_IDLE_SECS", 3600)?;

        Ok(Self {
            api_key: SecretString::from(api_key),
            base_url,
            model,
            mode,
            port,
            http_timeout: Duration::from_secs(timeout_secs),
            session_idle_timeout: Duration::from_secs(idle_secs),
            generation: GenerationParams::default(),
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use secrecy::ExposeSecret;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn missing_api_key_is_fatal() {
        let err = AppConfig::from_vars(lookup(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(ref k) if k == "NVIDIA_API_KEY"));
    }

    #[test]
    fn blank_api_key_is_treated_as_missing() {
        let err = AppConfig::from_vars(lookup(&[("NVIDIA_API_KEY", "  ")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(_)));
    }

    #[test]
    fn defaults_apply() {
        let config = AppConfig::from_vars(lookup(&[("NVIDIA_API_KEY", "nvapi-test")])).unwrap();
        assert_eq!(config.api_key.expose_secret(), "nvapi-test");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.mode, SurfaceMode::Cli);
        assert_eq!(config.port, 8080);
        assert_eq!(config.http_timeout, Duration::from_secs(60));
        assert_eq!(config.session_idle_timeout, Duration::from_secs(3600));
        assert_eq!(config.generation, GenerationParams::default());
    }

    #[test]
    fn overrides_are_parsed() {
        let config = AppConfig::from_vars(lookup(&[
            ("NVIDIA_API_KEY", "k"),
            ("TALENTSCOUT_BASE_URL", "http://localhost:9000/v1/"),
            ("TALENTSCOUT_MODEL", "mistral"),
            ("TALENTSCOUT_MODE", "serve"),
            ("TALENTSCOUT_PORT", "9090"),
            ("TALENTSCOUT_HTTP_TIMEOUT_SECS", "5"),
            ("TALENTSCOUT_SESSION_IDLE_SECS", "120"),
        ]))
        .unwrap();
        assert_eq!(config.base_url, "http://localhost:9000/v1");
        assert_eq!(config.model, "mistral");
        assert_eq!(config.mode, SurfaceMode::Serve);
        assert_eq!(config.port, 9090);
        assert_eq!(config.http_timeout, Duration::from_secs(5));
        assert_eq!(config.session_idle_timeout, Duration::from_secs(120));
    }

    #[test]
    fn invalid_idle_timeout_is_rejected() {
        let err = AppConfig::from_vars(lookup(&[
            ("NVIDIA_API_KEY", "k"),
            ("TALENTSCOUT_SESSION_IDLE_SECS", "-1"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "TALENTSCOUT_SESSION_IDLE_SECS"));
    }

    #[test]
    fn invalid_port_is_rejected() {
        let err = AppConfig::from_vars(lookup(&[
            ("NVIDIA_API_KEY", "k"),
            ("TALENTSCOUT_PORT", "not-a-port"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "TALENTSCOUT_PORT"));
    }

    #[test]
    fn invalid_mode_is_rejected() {
        let err = AppConfig::from_vars(lookup(&[
            ("NVIDIA_API_KEY", "k"),
            ("TALENTSCOUT_MODE", "gui"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn generation_defaults() {
        let params = GenerationParams::default();
        assert_eq!(params.max_tokens, 1024);
        assert_eq!(params.temperature, 0.2);
        assert_eq!(params.top_p, 0.7);
    }
}
