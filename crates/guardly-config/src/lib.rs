//! Profile configuration for guardly.
//!
//! TOML profiles, token resolution (env + keyring + plaintext), and
//! translation to `guardly_core::PanelConfig`. The CLI layers flag
//! overrides on top; this crate knows nothing about clap.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use guardly_core::PanelConfig;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("unknown profile '{profile}'")]
    UnknownProfile { profile: String },

    #[error("no panel token configured for profile '{profile}'")]
    NoToken { profile: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named panel profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

impl Config {
    /// Pick a profile by explicit name or fall back to the default.
    pub fn profile<'a>(&'a self, name: Option<&'a str>) -> Result<(&'a str, &'a Profile), ConfigError> {
        let name = name
            .or(self.default_profile.as_deref())
            .unwrap_or("default");
        self.profiles
            .get(name)
            .map(|p| (name, p))
            .ok_or_else(|| ConfigError::UnknownProfile {
                profile: name.into(),
            })
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default)]
    pub insecure: bool,

    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            insecure: false,
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_timeout() -> u64 {
    30
}

/// A named panel profile.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Profile {
    /// Panel API base URL (e.g., "https://panel.example.com:8000/api").
    pub panel_url: String,

    /// Billing sidecar base URL. Billing commands refuse to run when
    /// unset — the billing service is configured independently, never
    /// derived from the panel URL.
    pub billing_url: Option<String>,

    /// Bearer token (plaintext — prefer keyring or env var).
    pub token: Option<String>,

    /// Environment variable name containing the bearer token.
    pub token_env: Option<String>,

    /// Override insecure TLS setting.
    pub insecure: Option<bool>,

    /// Override timeout (seconds).
    pub timeout: Option<u64>,

    /// Connect timeout for the billing sidecar (seconds).
    pub billing_connect_timeout: Option<u64>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("tech", "hyperbliss", "guardly").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("guardly");
    p
}

// ── Config loading / saving ─────────────────────────────────────────

/// Load the full Config from file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    let path = config_path();

    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(&path))
        .merge(Env::prefixed("GUARDLY_").split("_"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    let path = config_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(&path, toml_str)?;
    Ok(())
}

// ── Token resolution ────────────────────────────────────────────────

const KEYRING_SERVICE: &str = "guardly";

/// Resolve the panel token from the credential chain (no CLI flag
/// step): profile env var → keyring → plaintext in the profile.
pub fn resolve_token(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    // 1. Profile's token_env → env var lookup
    if let Some(ref env_name) = profile.token_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    // 2. System keyring
    if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/token")) {
        if let Ok(secret) = entry.get_password() {
            return Ok(SecretString::from(secret));
        }
    }

    // 3. Plaintext in config
    if let Some(ref token) = profile.token {
        return Ok(SecretString::from(token.clone()));
    }

    Err(ConfigError::NoToken {
        profile: profile_name.into(),
    })
}

/// Store a token in the system keyring for a profile.
pub fn store_token(profile_name: &str, token: &str) -> Result<(), ConfigError> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/token"))?;
    entry.set_password(token)?;
    Ok(())
}

// ── Profile → PanelConfig ───────────────────────────────────────────

/// Build a `PanelConfig` from a profile — no CLI flag overrides.
pub fn profile_to_panel_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<PanelConfig, ConfigError> {
    let panel_url: url::Url = profile
        .panel_url
        .parse()
        .map_err(|_| ConfigError::Validation {
            field: "panel_url".into(),
            reason: format!("invalid URL: {}", profile.panel_url),
        })?;

    let billing_url = profile
        .billing_url
        .as_deref()
        .map(str::parse::<url::Url>)
        .transpose()
        .map_err(|_| ConfigError::Validation {
            field: "billing_url".into(),
            reason: format!(
                "invalid URL: {}",
                profile.billing_url.as_deref().unwrap_or_default()
            ),
        })?;

    let token = resolve_token(profile, profile_name)?;

    let mut config = PanelConfig::new(panel_url, token);
    config.billing_url = billing_url;
    config.insecure = profile.insecure.unwrap_or(defaults.insecure);
    config.timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));
    if let Some(secs) = profile.billing_connect_timeout {
        config.billing_connect_timeout = Duration::from_secs(secs);
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use pretty_assertions::assert_eq;

    use super::{Config, Defaults, Profile, profile_to_panel_config};

    fn profile(panel_url: &str) -> Profile {
        Profile {
            panel_url: panel_url.into(),
            token: Some("plain-token".into()),
            ..Profile::default()
        }
    }

    #[test]
    fn profile_translates_with_defaults() {
        let config =
            profile_to_panel_config(&profile("https://p.example.com/api"), "default", &Defaults::default())
                .unwrap();
        assert_eq!(config.panel_url.as_str(), "https://p.example.com/api");
        assert!(config.billing_url.is_none());
        assert!(!config.insecure);
        assert_eq!(config.timeout.as_secs(), 30);
        assert_eq!(config.billing_connect_timeout.as_secs(), 10);
    }

    #[test]
    fn profile_overrides_beat_defaults() {
        let mut p = profile("https://p.example.com/api");
        p.insecure = Some(true);
        p.timeout = Some(5);
        p.billing_url = Some("http://10.0.0.2:9000".into());
        p.billing_connect_timeout = Some(3);

        let config = profile_to_panel_config(&p, "default", &Defaults::default()).unwrap();
        assert!(config.insecure);
        assert_eq!(config.timeout.as_secs(), 5);
        assert_eq!(
            config.billing_url.as_ref().map(url::Url::as_str),
            Some("http://10.0.0.2:9000/")
        );
        assert_eq!(config.billing_connect_timeout.as_secs(), 3);
    }

    #[test]
    fn invalid_panel_url_is_a_validation_error() {
        let err = profile_to_panel_config(&profile("not a url"), "default", &Defaults::default())
            .unwrap_err();
        assert!(matches!(err, super::ConfigError::Validation { ref field, .. } if field == "panel_url"));
    }

    #[test]
    fn unknown_profile_lookup_fails() {
        let config = Config::default();
        let err = config.profile(Some("missing")).unwrap_err();
        assert!(matches!(err, super::ConfigError::UnknownProfile { ref profile } if profile == "missing"));
    }

    #[test]
    fn toml_round_trip_keeps_profiles() {
        let mut config = Config::default();
        config.profiles.insert(
            "prod".into(),
            Profile {
                panel_url: "https://panel.prod/api".into(),
                billing_url: Some("http://billing.prod".into()),
                ..Profile::default()
            },
        );

        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed.profiles.len(), 1);
        assert_eq!(parsed.profiles["prod"].panel_url, "https://panel.prod/api");
    }
}
