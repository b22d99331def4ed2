//! Environment-driven configuration.

pub const DEFAULT_VOICE_ID: &str = "pNInz6obpgDQGcFmaJgB";
pub const DEFAULT_ANKI_CONNECT_URL: &str = "http://localhost:8765";
pub const DEFAULT_DECK: &str = "Default";
pub const DEFAULT_MODEL: &str = "Basic";

/// Application configuration.
///
/// Read from the process environment after loading `.env`:
/// - HOST / PORT: listen address (default 0.0.0.0:3000)
/// - DATABASE_URL: PostgreSQL session store; in-memory store when unset
/// - ELEVENLABS_API_KEY, ELEVENLABS_VOICE_ID: speech synthesis
/// - GEMINI_API_KEY: explanation generation
/// - ANKI_CONNECT_URL, ANKI_DEFAULT_DECK, ANKI_DEFAULT_MODEL: note creation
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: Option<String>,
    pub elevenlabs_api_key: Option<String>,
    pub default_voice_id: String,
    pub gemini_api_key: Option<String>,
    pub anki_connect_url: String,
    pub default_deck: String,
    pub default_model: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            database_url: None,
            elevenlabs_api_key: None,
            default_voice_id: DEFAULT_VOICE_ID.to_string(),
            gemini_api_key: None,
            anki_connect_url: DEFAULT_ANKI_CONNECT_URL.to_string(),
            default_deck: DEFAULT_DECK.to_string(),
            default_model: DEFAULT_MODEL.to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup. Empty values count
    /// as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let port = match get("PORT").map(|p| p.parse::<u16>()) {
            Some(Ok(port)) => port,
            Some(Err(_)) => {
                tracing::warn!("Invalid PORT value, using {}", defaults.port);
                defaults.port
            }
            None => defaults.port,
        };

        Self {
            host: get("HOST").unwrap_or(defaults.host),
            port,
            database_url: get("DATABASE_URL"),
            elevenlabs_api_key: get("ELEVENLABS_API_KEY"),
            default_voice_id: get("ELEVENLABS_VOICE_ID").unwrap_or(defaults.default_voice_id),
            gemini_api_key: get("GEMINI_API_KEY"),
            anki_connect_url: get("ANKI_CONNECT_URL").unwrap_or(defaults.anki_connect_url),
            default_deck: get("ANKI_DEFAULT_DECK").unwrap_or(defaults.default_deck),
            default_model: get("ANKI_DEFAULT_MODEL").unwrap_or(defaults.default_model),
        }
    }

    /// Listen address as `host:port`.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = config_from(&[]);
        assert_eq!(config.bind_addr(), "0.0.0.0:3000");
        assert_eq!(config.default_voice_id, DEFAULT_VOICE_ID);
        assert_eq!(config.anki_connect_url, DEFAULT_ANKI_CONNECT_URL);
        assert_eq!(config.default_deck, "Default");
        assert_eq!(config.default_model, "Basic");
        assert!(config.database_url.is_none());
        assert!(config.elevenlabs_api_key.is_none());
        assert!(config.gemini_api_key.is_none());
    }

    #[test]
    fn test_values_from_env() {
        let config = config_from(&[
            ("PORT", "8080"),
            ("ELEVENLABS_API_KEY", "xi-key"),
            ("ANKI_DEFAULT_DECK", "Greek::A1"),
        ]);
        assert_eq!(config.port, 8080);
        assert_eq!(config.elevenlabs_api_key.as_deref(), Some("xi-key"));
        assert_eq!(config.default_deck, "Greek::A1");
    }

    #[test]
    fn test_empty_values_are_unset() {
        let config = config_from(&[("GEMINI_API_KEY", "  "), ("HOST", "")]);
        assert!(config.gemini_api_key.is_none());
        assert_eq!(config.host, "0.0.0.0");
    }

    #[test]
    fn test_invalid_port_falls_back() {
        let config = config_from(&[("PORT", "not-a-port")]);
        assert_eq!(config.port, 3000);
    }
}
