use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "grantstore")]
#[command(about = "Inspect and revoke OAuth 2.0 clients, codes and tokens stored in Redis")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (defaults to ./grantstore.toml)
    #[arg(short, long, global = true, env = "GRANTSTORE_CONFIG")]
    pub config: Option<String>,

    /// Redis URL (overrides the configuration file)
    #[arg(long, global = true)]
    pub redis_url: Option<String>,

    /// Output format
    #[arg(short, long, global = true)]
    pub format: Option<OutputFormat>,
}

#[derive(Clone, Copy, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Text,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage client registrations
    Client(ClientArgs),
    /// Inspect or revoke authorization codes
    Authorize(RecordArgs),
    /// Inspect or revoke access tokens
    Token(RecordArgs),
    /// Inspect or revoke refresh tokens
    Refresh(RecordArgs),
    /// Check Redis connectivity
    Status,
    /// Print the effective configuration
    Config,
}

#[derive(clap::Args)]
pub struct ClientArgs {
    #[command(subcommand)]
    pub command: ClientCommands,
}

#[derive(Subcommand)]
pub enum ClientCommands {
    /// Register a client
    Create(ClientCreateArgs),
    /// Show a client
    Get(IdArgs),
    /// Change a client's secret, redirect URI or data
    Update(ClientUpdateArgs),
    /// Delete a client
    Remove(IdArgs),
}

#[derive(clap::Args)]
pub struct ClientCreateArgs {
    /// Client ID
    pub id: String,
    /// Client secret
    #[arg(long)]
    pub secret: String,
    /// Registered redirect URI
    #[arg(long)]
    pub redirect_uri: String,
    /// Opaque data stored with the client
    #[arg(long)]
    pub data: Option<String>,
}

#[derive(clap::Args)]
pub struct ClientUpdateArgs {
    /// Client ID
    pub id: String,
    /// New client secret
    #[arg(long)]
    pub secret: Option<String>,
    /// New redirect URI
    #[arg(long)]
    pub redirect_uri: Option<String>,
    /// Replacement opaque data
    #[arg(long)]
    pub data: Option<String>,
}

#[derive(clap::Args)]
pub struct IdArgs {
    /// Client ID, code or token
    pub id: String,
}

#[derive(clap::Args)]
pub struct RecordArgs {
    #[command(subcommand)]
    pub command: RecordCommands,
}

#[derive(Subcommand)]
pub enum RecordCommands {
    /// Load and print the record with everything it references
    Show(IdArgs),
    /// Delete the record
    Remove(IdArgs),
}
