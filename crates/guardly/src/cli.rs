//! Clap derive structures for the `guardly` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// guardly -- admin CLI for PasarGuard-style VPN panels
#[derive(Debug, Parser)]
#[command(
    name = "guardly",
    version,
    about = "Manage VPN panel users, nodes, and billing from the command line",
    long_about = "An admin client for self-hosted VPN panel backends.\n\n\
        Tolerates the response-shape and field-name drift between panel\n\
        versions, and optionally talks to a billing sidecar service.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Panel profile to use
    #[arg(long, short = 'p', env = "GUARDLY_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Panel API base URL (overrides profile)
    #[arg(long, env = "GUARDLY_PANEL_URL", global = true)]
    pub panel_url: Option<String>,

    /// Panel bearer token
    #[arg(long, env = "GUARDLY_TOKEN", global = true, hide_env = true)]
    pub token: Option<String>,

    /// Billing sidecar base URL (overrides profile)
    #[arg(long, env = "GUARDLY_BILLING_URL", global = true)]
    pub billing_url: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "GUARDLY_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "GUARDLY_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, env = "GUARDLY_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// Plain text, one value per line (scripting)
    Plain,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage VPN users
    #[command(alias = "u")]
    Users(UsersArgs),

    /// Server metrics and dashboard overview
    #[command(alias = "sys")]
    System(SystemArgs),

    /// View backend nodes
    Nodes(NodesArgs),

    /// View inbound listeners
    Inbounds(InboundsArgs),

    /// Manage payments (billing sidecar)
    Payments(PaymentsArgs),

    /// View tariff plans (billing sidecar)
    Tariffs(TariffsArgs),

    /// View billing subscriptions (billing sidecar)
    Subscriptions(SubscriptionsArgs),

    /// Server power operations (billing sidecar)
    Server(ServerArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  USERS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct UsersArgs {
    #[command(subcommand)]
    pub command: UsersCommand,
}

#[derive(Debug, Subcommand)]
pub enum UsersCommand {
    /// List all users
    #[command(alias = "ls")]
    List {
        /// Only show currently online users
        #[arg(long)]
        online: bool,

        /// Filter by status (active, disabled, expired)
        #[arg(long)]
        status: Option<String>,
    },

    /// Get user details
    Get {
        /// User ID
        id: i64,
    },

    /// Create a new user
    Create {
        /// Username
        #[arg(long, required = true)]
        username: String,

        /// Email address
        #[arg(long)]
        email: Option<String>,

        /// Protocol (default: vless)
        #[arg(long, default_value = "vless")]
        protocol: String,

        /// Inbound listener ID to attach
        #[arg(long, required = true)]
        inbound: i64,

        /// Expiry timestamp (RFC 3339)
        #[arg(long, required = true)]
        expiry: String,

        /// Traffic limit in bytes (0 = unlimited)
        #[arg(long, default_value = "0")]
        traffic_limit: i64,
    },

    /// Update an existing user
    Update {
        /// User ID
        id: i64,

        /// New email address
        #[arg(long)]
        email: Option<String>,

        /// New expiry timestamp (RFC 3339)
        #[arg(long)]
        expiry: Option<String>,

        /// New traffic limit in bytes
        #[arg(long)]
        traffic_limit: Option<i64>,

        /// New status (active, disabled)
        #[arg(long)]
        status: Option<String>,
    },

    /// Delete a user (deactivates when the panel refuses deletes)
    Delete {
        /// User ID
        id: i64,
    },

    /// Show subscription links for a user
    Subscription {
        /// User ID
        id: i64,

        /// Print only the single resolved subscription URL
        #[arg(long)]
        link: bool,
    },

    /// Show raw client configuration for a user
    Config {
        /// User ID
        id: i64,
    },

    /// Show usage stats for a user
    Stats {
        /// User ID
        id: i64,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SYSTEM
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct SystemArgs {
    #[command(subcommand)]
    pub command: SystemCommand,
}

#[derive(Debug, Subcommand)]
pub enum SystemCommand {
    /// Server metrics snapshot
    Info,

    /// Aggregate panel statistics
    Stats {
        /// Include raw per-user stats
        #[arg(long)]
        users: bool,

        /// Include raw per-node stats
        #[arg(long)]
        nodes: bool,
    },

    /// Merged dashboard overview (users + metrics + stats)
    Overview,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  NODES / INBOUNDS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct NodesArgs {
    #[command(subcommand)]
    pub command: NodesCommand,
}

#[derive(Debug, Subcommand)]
pub enum NodesCommand {
    /// List backend nodes
    #[command(alias = "ls")]
    List,

    /// Get node details
    Get {
        /// Node ID
        id: i64,
    },
}

#[derive(Debug, Args)]
pub struct InboundsArgs {
    #[command(subcommand)]
    pub command: InboundsCommand,
}

#[derive(Debug, Subcommand)]
pub enum InboundsCommand {
    /// List inbound listeners
    #[command(alias = "ls")]
    List,

    /// Get inbound details
    Get {
        /// Inbound ID
        id: i64,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  BILLING
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct PaymentsArgs {
    #[command(subcommand)]
    pub command: PaymentsCommand,
}

#[derive(Debug, Subcommand)]
pub enum PaymentsCommand {
    /// List payments
    #[command(alias = "ls")]
    List {
        /// Filter by status (pending, confirmed, ...)
        #[arg(long)]
        status: Option<String>,

        /// Max results
        #[arg(long, short = 'l', default_value = "50")]
        limit: u32,

        /// Pagination offset
        #[arg(long, default_value = "0")]
        offset: u32,
    },

    /// Get payment details
    Get {
        /// Payment ID
        id: i64,
    },

    /// Confirm a pending payment
    Confirm {
        /// Payment ID
        id: i64,
    },
}

#[derive(Debug, Args)]
pub struct TariffsArgs {
    #[command(subcommand)]
    pub command: TariffsCommand,
}

#[derive(Debug, Subcommand)]
pub enum TariffsCommand {
    /// List tariff plans
    #[command(alias = "ls")]
    List,
}

#[derive(Debug, Args)]
pub struct SubscriptionsArgs {
    #[command(subcommand)]
    pub command: SubscriptionsCommand,
}

#[derive(Debug, Subcommand)]
pub enum SubscriptionsCommand {
    /// List billing subscriptions
    #[command(alias = "ls")]
    List {
        /// Filter by billing-side user ID
        #[arg(long)]
        user: Option<i64>,

        /// Filter by status
        #[arg(long)]
        status: Option<String>,
    },

    /// Get subscription details
    Get {
        /// Subscription ID
        id: i64,
    },
}

#[derive(Debug, Args)]
pub struct ServerArgs {
    #[command(subcommand)]
    pub command: ServerCommand,
}

#[derive(Debug, Subcommand)]
pub enum ServerCommand {
    /// Reboot a backend server by address
    Reboot {
        /// Server IP address
        ip: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current resolved configuration (secrets redacted)
    Show,

    /// Print the config file path
    Path,

    /// Store a panel token in the system keyring
    SetToken {
        /// Profile name
        #[arg(long)]
        profile: Option<String>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
