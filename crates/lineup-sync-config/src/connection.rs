use crate::error::ConfigError;
use std::fmt;

pub const PLEX_URL: &str = "PLEX_URL";
pub const PLEX_TOKEN: &str = "PLEX_TOKEN";
pub const TUNARR_URL: &str = "TUNARR_URL";
pub const TUNARR_API_KEY: &str = "TUNARR_API_KEY";

/// Connection details for the catalog server and the lineup store,
/// supplied through the environment.
#[derive(Clone)]
pub struct ConnectionSettings {
    pub plex_url: String,
    pub plex_token: String,
    pub tunarr_url: String,
    pub tunarr_api_key: Option<String>,
}

impl ConnectionSettings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| -> Result<String, ConfigError> {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::MissingVar(key))
        };

        let plex_url = required(PLEX_URL)?;
        let plex_token = required(PLEX_TOKEN)?;
        let tunarr_url = required(TUNARR_URL)?;
        let tunarr_api_key = lookup(TUNARR_API_KEY)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        for (var, url) in [(PLEX_URL, &plex_url), (TUNARR_URL, &tunarr_url)] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::InvalidVar {
                    var,
                    reason: format!("expected an http(s) URL, got '{}'", url),
                });
            }
        }

        Ok(Self {
            plex_url: plex_url.trim_end_matches('/').to_string(),
            plex_token,
            tunarr_url: tunarr_url.trim_end_matches('/').to_string(),
            tunarr_api_key,
        })
    }
}

fn mask(secret: &str) -> String {
    if secret.chars().count() <= 4 {
        "****".to_string()
    } else {
        format!("{}****", secret.chars().take(4).collect::<String>())
    }
}

impl fmt::Debug for ConnectionSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionSettings")
            .field("plex_url", &self.plex_url)
            .field("plex_token", &mask(&self.plex_token))
            .field("tunarr_url", &self.tunarr_url)
            .field("tunarr_api_key", &self.tunarr_api_key.as_deref().map(mask))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_from_lookup() {
        let vars = env(&[
            (PLEX_URL, "http://plex.local:32400/"),
            (PLEX_TOKEN, "abcdef123"),
            (TUNARR_URL, "http://tunarr.local:8000"),
        ]);
        let settings = ConnectionSettings::from_lookup(|k| vars.get(k).cloned()).unwrap();
        assert_eq!(settings.plex_url, "http://plex.local:32400");
        assert_eq!(settings.tunarr_api_key, None);
        assert!(!format!("{:?}", settings).contains("abcdef123"));
    }

    #[test]
    fn test_missing_required_var() {
        let vars = env(&[(PLEX_URL, "http://plex.local:32400"), (PLEX_TOKEN, "t")]);
        let result = ConnectionSettings::from_lookup(|k| vars.get(k).cloned());
        assert!(matches!(result, Err(ConfigError::MissingVar(TUNARR_URL))));
    }

    #[test]
    fn test_invalid_url() {
        let vars = env(&[
            (PLEX_URL, "plex.local:32400"),
            (PLEX_TOKEN, "t"),
            (TUNARR_URL, "http://tunarr.local"),
        ]);
        let result = ConnectionSettings::from_lookup(|k| vars.get(k).cloned());
        assert!(matches!(result, Err(ConfigError::InvalidVar { var: PLEX_URL, .. })));
    }
}
