//! Flag-aware configuration resolution.
//!
//! Layers CLI flag overrides on top of the profile loaded by
//! `guardly-config`, and supports running without a config file when
//! `--panel-url` and `--token` are supplied directly.

use std::time::Duration;

use secrecy::SecretString;

use guardly_core::PanelConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Build a `PanelConfig` from the config file, profile, and CLI overrides.
pub fn build_panel_config(global: &GlobalOpts) -> Result<PanelConfig, CliError> {
    let cfg = guardly_config::load_config_or_default();

    // A profile is optional when the panel URL and token come from
    // flags, but a profile the user named explicitly must exist.
    let mut config = match cfg.profile(global.profile.as_deref()) {
        Ok((name, profile)) => resolve_with_profile(profile, name, &cfg.defaults, global)?,
        Err(err) if global.profile.is_some() => return Err(err.into()),
        Err(_) => resolve_from_flags(global)?,
    };

    apply_overrides(&mut config, global)?;
    Ok(config)
}

fn resolve_with_profile(
    profile: &guardly_config::Profile,
    name: &str,
    defaults: &guardly_config::Defaults,
    global: &GlobalOpts,
) -> Result<PanelConfig, CliError> {
    // A --token flag short-circuits the whole credential chain.
    if let Some(ref token) = global.token {
        let panel_url = global
            .panel_url
            .as_deref()
            .unwrap_or(&profile.panel_url)
            .parse()
            .map_err(|_| CliError::Validation {
                field: "panel-url".into(),
                reason: "invalid URL".into(),
            })?;
        let mut config = PanelConfig::new(panel_url, SecretString::from(token.clone()));
        config.insecure = profile.insecure.unwrap_or(defaults.insecure);
        config.timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));
        config.billing_url = profile
            .billing_url
            .as_deref()
            .map(str::parse)
            .transpose()
            .map_err(|_| CliError::Validation {
                field: "billing_url".into(),
                reason: "invalid URL".into(),
            })?;
        return Ok(config);
    }

    Ok(guardly_config::profile_to_panel_config(
        profile, name, defaults,
    )?)
}

fn resolve_from_flags(global: &GlobalOpts) -> Result<PanelConfig, CliError> {
    let url_str = global.panel_url.as_deref().ok_or_else(|| CliError::Config {
        detail: format!(
            "no profile found and no --panel-url given; config expected at {}",
            guardly_config::config_path().display()
        ),
    })?;

    let panel_url = url_str.parse().map_err(|_| CliError::Validation {
        field: "panel-url".into(),
        reason: format!("invalid URL: {url_str}"),
    })?;

    let token = global
        .token
        .as_deref()
        .ok_or_else(|| CliError::NoToken {
            profile: global.profile.clone().unwrap_or_else(|| "default".into()),
        })?;

    Ok(PanelConfig::new(panel_url, SecretString::from(token.to_owned())))
}

/// CLI flags that always win, profile or not.
fn apply_overrides(config: &mut PanelConfig, global: &GlobalOpts) -> Result<(), CliError> {
    if let Some(ref billing) = global.billing_url {
        config.billing_url = Some(billing.parse().map_err(|_| CliError::Validation {
            field: "billing-url".into(),
            reason: format!("invalid URL: {billing}"),
        })?);
    }
    if global.insecure {
        config.insecure = true;
    }
    if let Some(secs) = global.timeout {
        config.timeout = Duration::from_secs(secs);
    }
    Ok(())
}
