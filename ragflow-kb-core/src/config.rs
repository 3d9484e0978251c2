//! Layered configuration: config file, then environment, then explicit flags.
//!
//! Each source is read into a [`ConfigLayer`]; [`Settings::resolve`] folds them in
//! increasing priority and rejects anything still missing before a request is made.

use std::fmt;

use serde::Deserialize;
use tracing::debug;

use crate::error::{KbError, KbResult};

pub const DEFAULT_CONFIG_FILE: &str = "ragflow_config.json";
pub const ENV_API_URL: &str = "RAGFLOW_API_URL";
pub const ENV_API_KEY: &str = "RAGFLOW_API_KEY";

/// One partially-populated configuration source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ConfigLayer {
    #[serde(default)]
    pub api_url: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
}

impl ConfigLayer {
    pub fn new(api_url: Option<String>, api_key: Option<String>) -> Self {
        Self { api_url, api_key }.normalised()
    }

    /// Blank values count as absent.
    fn normalised(self) -> Self {
        fn keep(v: Option<String>) -> Option<String> {
            v.filter(|s| !s.trim().is_empty())
        }
        Self {
            api_url: keep(self.api_url),
            api_key: keep(self.api_key),
        }
    }

    /// Field by field, values present in `higher` win.
    pub fn overridden_by(self, higher: ConfigLayer) -> ConfigLayer {
        let lower = self.normalised();
        let higher = higher.normalised();
        ConfigLayer {
            api_url: higher.api_url.or(lower.api_url),
            api_key: higher.api_key.or(lower.api_key),
        }
    }
}

/// Effective configuration for one run.
#[derive(Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_url: String,
    pub api_key: String,
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("api_url", &self.api_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl Settings {
    /// Merge `file < env < flags` and validate the result.
    pub fn resolve(file: ConfigLayer, env: ConfigLayer, flags: ConfigLayer) -> KbResult<Settings> {
        debug!(
            file_url = file.api_url.is_some(),
            file_key = file.api_key.is_some(),
            env_url = env.api_url.is_some(),
            env_key = env.api_key.is_some(),
            flag_url = flags.api_url.is_some(),
            flag_key = flags.api_key.is_some(),
            "Resolving configuration layers"
        );
        let merged = file.overridden_by(env).overridden_by(flags);

        let api_url = merged.api_url.ok_or_else(|| {
            KbError::Config(format!(
                "api_url is not set; provide it via \"api_url\" in the config file, \
                 the {ENV_API_URL} environment variable, or --api-url"
            ))
        })?;
        let api_key = merged.api_key.ok_or_else(|| {
            KbError::Config(format!(
                "api_key is not set; provide it via \"api_key\" in the config file, \
                 the {ENV_API_KEY} environment variable, or --api-key"
            ))
        })?;

        let api_url = api_url.trim().trim_end_matches('/').to_string();
        if !(api_url.starts_with("http://") || api_url.starts_with("https://")) {
            return Err(KbError::Config(format!(
                "api_url must start with http:// or https://, got {api_url:?}"
            )));
        }

        Ok(Settings {
            api_url,
            api_key: api_key.trim().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layer(url: Option<&str>, key: Option<&str>) -> ConfigLayer {
        ConfigLayer::new(url.map(String::from), key.map(String::from))
    }

    #[test]
    fn flag_beats_env_beats_file() {
        for file in [None, Some("http://file")] {
            for env in [None, Some("http://env")] {
                for flag in [None, Some("http://flag")] {
                    let got = Settings::resolve(
                        layer(file, Some("k-file")),
                        layer(env, Some("k-env")),
                        layer(flag, None),
                    );
                    let expected = flag.or(env).or(file);
                    match expected {
                        Some(url) => assert_eq!(got.unwrap().api_url, url),
                        None => assert!(matches!(got, Err(KbError::Config(_)))),
                    }
                }
            }
        }
    }

    #[test]
    fn api_key_layers_independently_of_url() {
        let s = Settings::resolve(
            layer(Some("http://file"), Some("file-key")),
            layer(None, Some("env-key")),
            layer(None, None),
        )
        .unwrap();
        assert_eq!(s.api_url, "http://file");
        assert_eq!(s.api_key, "env-key");
    }

    #[test]
    fn blank_values_fall_through() {
        let s = Settings::resolve(
            layer(Some("http://file/api/v1/"), Some("file-key")),
            layer(Some("  "), Some("")),
            layer(None, None),
        )
        .unwrap();
        assert_eq!(s.api_url, "http://file/api/v1");
        assert_eq!(s.api_key, "file-key");
    }

    #[test]
    fn missing_key_is_a_config_error() {
        let err = Settings::resolve(
            layer(Some("http://x"), None),
            ConfigLayer::default(),
            ConfigLayer::default(),
        )
        .unwrap_err();
        assert!(matches!(err, KbError::Config(ref m) if m.contains("api_key")));
    }

    #[test]
    fn non_http_url_is_rejected() {
        let err = Settings::resolve(
            layer(Some("localhost:9380"), Some("k")),
            ConfigLayer::default(),
            ConfigLayer::default(),
        )
        .unwrap_err();
        assert!(matches!(err, KbError::Config(_)));
    }

    #[test]
    fn debug_output_hides_the_key() {
        let s = Settings {
            api_url: "http://x".into(),
            api_key: "secret-token".into(),
        };
        assert!(!format!("{s:?}").contains("secret-token"));
    }
}
