//! Config subcommand handlers.

use dialoguer::{Input, Password, Select};

use guardly_config::{Config, Profile};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

fn config_err(e: guardly_config::ConfigError) -> CliError {
    e.into()
}

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let config_path = guardly_config::config_path();
            eprintln!("guardly — configuration wizard");
            eprintln!("  Config path: {}\n", config_path.display());

            let profile_name: String = Input::new()
                .with_prompt("Profile name")
                .default("default".into())
                .interact_text()
                .map_err(prompt_err)?;

            let panel_url: String = Input::new()
                .with_prompt("Panel API URL")
                .default("https://panel.example.com:8000/api".into())
                .interact_text()
                .map_err(prompt_err)?;

            let billing_url: String = Input::new()
                .with_prompt("Billing sidecar URL (empty to skip)")
                .allow_empty(true)
                .interact_text()
                .map_err(prompt_err)?;

            let token = Password::new()
                .with_prompt("Panel bearer token")
                .interact()
                .map_err(prompt_err)?;

            if token.is_empty() {
                return Err(CliError::Validation {
                    field: "token".into(),
                    reason: "token cannot be empty".into(),
                });
            }

            let store_choices = &[
                "Store in system keyring (recommended)",
                "Save to config file (plaintext)",
            ];
            let store_selection = Select::new()
                .with_prompt("Where to store the token?")
                .items(store_choices)
                .default(0)
                .interact()
                .map_err(prompt_err)?;

            let token_field = if store_selection == 0 {
                guardly_config::store_token(&profile_name, &token).map_err(config_err)?;
                eprintln!("  Token stored in system keyring");
                None
            } else {
                Some(token)
            };

            let profile = Profile {
                panel_url,
                billing_url: if billing_url.trim().is_empty() {
                    None
                } else {
                    Some(billing_url.trim().to_owned())
                },
                token: token_field,
                ..Profile::default()
            };

            let mut cfg = guardly_config::load_config_or_default();
            cfg.default_profile = Some(profile_name.clone());
            cfg.profiles.insert(profile_name.clone(), profile);
            guardly_config::save_config(&cfg).map_err(config_err)?;

            eprintln!("\nConfiguration written to {}", config_path.display());
            eprintln!("  Active profile: {profile_name}");
            eprintln!("\n  Test it: guardly system info");
            Ok(())
        }

        // ── Show (secrets redacted) ─────────────────────────────────
        ConfigCommand::Show => {
            let mut cfg = guardly_config::load_config_or_default();
            for profile in cfg.profiles.values_mut() {
                if profile.token.is_some() {
                    profile.token = Some("<redacted>".into());
                }
            }
            let out = output::render_single(
                &global.output,
                &render_view(&cfg),
                |c| format!("{c:#?}"),
                |_| "config".into(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Path ────────────────────────────────────────────────────
        ConfigCommand::Path => {
            println!("{}", guardly_config::config_path().display());
            Ok(())
        }

        // ── SetToken ────────────────────────────────────────────────
        ConfigCommand::SetToken { profile } => {
            let cfg = guardly_config::load_config_or_default();
            let profile_name = profile
                .or_else(|| global.profile.clone())
                .or(cfg.default_profile)
                .unwrap_or_else(|| "default".into());

            let token = Password::new()
                .with_prompt("Panel bearer token")
                .interact()
                .map_err(prompt_err)?;

            if token.is_empty() {
                return Err(CliError::Validation {
                    field: "token".into(),
                    reason: "token cannot be empty".into(),
                });
            }

            guardly_config::store_token(&profile_name, &token).map_err(config_err)?;
            eprintln!("Token stored in system keyring for profile '{profile_name}'");
            Ok(())
        }
    }
}

/// Serializable + debug-printable view for `config show`.
fn render_view(cfg: &Config) -> serde_json::Value {
    serde_json::to_value(cfg).unwrap_or(serde_json::Value::Null)
}
