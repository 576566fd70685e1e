//! Node command handlers.

use guardly_core::{Node, Panel};
use tabled::Tabled;

use crate::cli::{GlobalOpts, NodesArgs, NodesCommand};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct NodeRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "ADDRESS")]
    address: String,
    #[tabled(rename = "PORT")]
    port: String,
    #[tabled(rename = "STATUS")]
    status: String,
}

fn node_row(node: &Node) -> NodeRow {
    NodeRow {
        id: node.id,
        name: node.name.clone(),
        address: node.address.clone(),
        port: node.port.map(|p| p.to_string()).unwrap_or_default(),
        status: node.status.clone().unwrap_or_default(),
    }
}

fn node_detail(node: &Node) -> String {
    format!(
        "ID:       {}\nName:     {}\nAddress:  {}\nPort:     {}\nStatus:   {}",
        node.id,
        node.name,
        node.address,
        node.port.map(|p| p.to_string()).unwrap_or_default(),
        node.status.as_deref().unwrap_or("unknown"),
    )
}

pub async fn handle(panel: &Panel, args: NodesArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        NodesCommand::List => {
            let nodes = panel.list_nodes().await?;
            let rendered =
                output::render_list(&global.output, &nodes, node_row, |n| n.id.to_string());
            output::print_output(&rendered, global.quiet);
            Ok(())
        }

        NodesCommand::Get { id } => {
            let node = panel.get_node(id).await?;
            let rendered =
                output::render_single(&global.output, &node, node_detail, |n| n.id.to_string());
            output::print_output(&rendered, global.quiet);
            Ok(())
        }
    }
}
