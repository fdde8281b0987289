mod cli;
mod commands;
mod output;

use anyhow::{Context, Result};
use clap::Parser;

use grantstore_cli::{AppConfig, load_config, observability};
use grantstore_kv::KvGrantStorage;
use grantstore_redis::RedisKeyValueStore;

use cli::{Cli, ClientCommands, Commands};
use output::{print_error, print_value};

#[tokio::main]
async fn main() {
    // Load .env file if present (before anything else)
    if let Err(e) = dotenvy::dotenv() {
        if !matches!(e, dotenvy::Error::Io(ref io_err) if io_err.kind() == std::io::ErrorKind::NotFound) {
            eprintln!("Warning: Failed to load .env file: {e}");
        }
    }

    if let Err(e) = run().await {
        print_error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let format = cli.format.unwrap_or_default();

    let mut cfg = load_config(cli.config.as_deref())?;
    if let Some(url) = &cli.redis_url {
        cfg.redis.url.clone_from(url);
    }
    observability::init_tracing_with_level(&cfg.logging.level);

    if let Commands::Config = cli.command {
        return print_value(&cfg, format);
    }

    let store = connect(&cfg).await?;
    if let Commands::Status = cli.command {
        return commands::server::status(&store, &cfg.redis).await;
    }

    let storage = KvGrantStorage::new(store, cfg.storage.clone())?;
    match &cli.command {
        Commands::Client(args) => match &args.command {
            ClientCommands::Create(create) => {
                commands::client::create(&storage, create, format).await?;
            }
            ClientCommands::Get(id) => {
                commands::client::get(&storage, &id.id, format).await?;
            }
            ClientCommands::Update(update) => {
                commands::client::update(&storage, update, format).await?;
            }
            ClientCommands::Remove(id) => {
                commands::client::remove(&storage, &id.id).await?;
            }
        },
        Commands::Authorize(args) => {
            commands::token::authorize(&storage, &args.command, format).await?;
        }
        Commands::Token(args) => {
            commands::token::access(&storage, &args.command, format).await?;
        }
        Commands::Refresh(args) => {
            commands::token::refresh(&storage, &args.command, format).await?;
        }
        Commands::Status | Commands::Config => {}
    }

    Ok(())
}

async fn connect(cfg: &AppConfig) -> Result<RedisKeyValueStore> {
    RedisKeyValueStore::connect(&cfg.redis)
        .await
        .with_context(|| format!("Failed to connect to Redis at {}", cfg.redis.url))
}
