//! System and overview command handlers.

use guardly_core::{Overview, Panel};
use owo_colors::OwoColorize;

use crate::cli::{GlobalOpts, SystemArgs, SystemCommand};
use crate::error::CliError;
use crate::output::{self, format_bytes};

pub async fn handle(panel: &Panel, args: SystemArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        SystemCommand::Info => {
            let metrics = panel.system_metrics().await?;
            let rendered = output::render_single(
                &global.output,
                &metrics,
                |m| {
                    format!(
                        "Version:  {}\nCPU:      {:.1}% ({} cores)\nRAM:      {} / {} ({:.1}%)\nOnline:   {} users",
                        m.version.as_deref().unwrap_or("unknown"),
                        m.cpu_percent(),
                        m.cpu_cores(),
                        format_bytes(m.ram_used()),
                        format_bytes(m.ram_total()),
                        m.ram_percent(),
                        m.online_users(),
                    )
                },
                |m| m.version.clone().unwrap_or_default(),
            );
            output::print_output(&rendered, global.quiet);
            Ok(())
        }

        SystemCommand::Stats { users, nodes } => {
            if users {
                let stats = panel.users_stats().await?;
                let rendered = serde_json::to_string_pretty(&stats)
                    .map_err(|e| CliError::Internal { detail: e.to_string() })?;
                output::print_output(&rendered, global.quiet);
                return Ok(());
            }
            if nodes {
                let stats = panel.nodes_stats().await?;
                let rendered = serde_json::to_string_pretty(&stats)
                    .map_err(|e| CliError::Internal { detail: e.to_string() })?;
                output::print_output(&rendered, global.quiet);
                return Ok(());
            }

            let stats = panel.stats().await?;
            let rendered = output::render_single(
                &global.output,
                &stats,
                |s| {
                    format!(
                        "Users:    {} total, {} active, {} online\nTraffic:  {} (up {}, down {})",
                        s.total_users(),
                        s.active_users(),
                        s.online_users(),
                        format_bytes(s.total_traffic()),
                        format_bytes(s.total_upload()),
                        format_bytes(s.total_download()),
                    )
                },
                |s| s.total_users().to_string(),
            );
            output::print_output(&rendered, global.quiet);
            Ok(())
        }

        SystemCommand::Overview => {
            let overview = panel.overview().await?;
            let rendered = output::render_single(
                &global.output,
                &overview,
                overview_detail,
                |o| o.total_users.to_string(),
            );
            output::print_output(&rendered, global.quiet);
            Ok(())
        }
    }
}

fn overview_detail(overview: &Overview) -> String {
    let header = "Panel overview".bold().to_string();
    format!(
        "{header}\n\
         Users:    {} total, {} active, {} online\n\
         Traffic:  {} (up {}, down {})\n\
         CPU:      {:.1}% ({} cores)\n\
         RAM:      {} / {}\n\
         Version:  {}",
        overview.total_users,
        overview.active_users,
        overview.online_users,
        format_bytes(overview.total_traffic),
        format_bytes(overview.total_upload),
        format_bytes(overview.total_download),
        overview.cpu_percent,
        overview.cpu_cores,
        format_bytes(overview.ram_used),
        format_bytes(overview.ram_total),
        overview.version.as_deref().unwrap_or("unknown"),
    )
}
