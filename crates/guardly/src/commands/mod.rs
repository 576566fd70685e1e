//! Command dispatch: bridges CLI args -> Panel calls -> output formatting.

pub mod billing;
pub mod config_cmd;
pub mod inbounds;
pub mod nodes;
pub mod server;
pub mod system;
pub mod users;
pub mod util;

use guardly_core::Panel;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a panel-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, panel: &Panel, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Users(args) => users::handle(panel, args, global).await,
        Command::System(args) => system::handle(panel, args, global).await,
        Command::Nodes(args) => nodes::handle(panel, args, global).await,
        Command::Inbounds(args) => inbounds::handle(panel, args, global).await,
        Command::Payments(args) => billing::handle_payments(panel, args, global).await,
        Command::Tariffs(args) => billing::handle_tariffs(panel, args, global).await,
        Command::Subscriptions(args) => billing::handle_subscriptions(panel, args, global).await,
        Command::Server(args) => server::handle(panel, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
