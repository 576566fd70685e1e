//! Inbound command handlers.

use guardly_core::{Inbound, Panel};
use tabled::Tabled;

use crate::cli::{GlobalOpts, InboundsArgs, InboundsCommand};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct InboundRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "PROTOCOL")]
    protocol: String,
    #[tabled(rename = "PORT")]
    port: String,
}

fn inbound_row(inbound: &Inbound) -> InboundRow {
    InboundRow {
        id: inbound.id,
        name: inbound.name.clone(),
        protocol: inbound.protocol.clone().unwrap_or_default(),
        port: inbound.port.map(|p| p.to_string()).unwrap_or_default(),
    }
}

fn inbound_detail(inbound: &Inbound) -> String {
    format!(
        "ID:        {}\nName:      {}\nProtocol:  {}\nPort:      {}\nListen:    {}",
        inbound.id,
        inbound.name,
        inbound.protocol.as_deref().unwrap_or("unknown"),
        inbound.port.map(|p| p.to_string()).unwrap_or_default(),
        inbound.listen.as_deref().unwrap_or("-"),
    )
}

pub async fn handle(
    panel: &Panel,
    args: InboundsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        InboundsCommand::List => {
            let inbounds = panel.list_inbounds().await?;
            let rendered =
                output::render_list(&global.output, &inbounds, inbound_row, |i| i.id.to_string());
            output::print_output(&rendered, global.quiet);
            Ok(())
        }

        InboundsCommand::Get { id } => {
            let inbound = panel.get_inbound(id).await?;
            let rendered = output::render_single(&global.output, &inbound, inbound_detail, |i| {
                i.id.to_string()
            });
            output::print_output(&rendered, global.quiet);
            Ok(())
        }
    }
}
