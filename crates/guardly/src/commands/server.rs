//! Server power operation handlers (via the billing sidecar).

use guardly_core::Panel;

use crate::cli::{GlobalOpts, ServerArgs, ServerCommand};
use crate::error::CliError;

use super::util;

pub async fn handle(panel: &Panel, args: ServerArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ServerCommand::Reboot { ip } => {
            if !util::confirm(
                &format!("Reboot server {ip}? Connected users will be dropped."),
                global.yes,
            )? {
                return Ok(());
            }
            let ack = panel.reboot_server(&ip).await?;
            if !global.quiet {
                match ack.message {
                    Some(message) => eprintln!("Reboot of {ip}: {message}"),
                    None => eprintln!("Reboot of {ip} requested"),
                }
            }
            Ok(())
        }
    }
}
