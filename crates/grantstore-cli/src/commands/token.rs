use anyhow::Result;
use colored::Colorize;

use grantstore_core::{AccessStorage, AuthorizeStorage, KeyValueStore, RefreshStorage};
use grantstore_kv::KvGrantStorage;

use crate::cli::{OutputFormat, RecordCommands};
use crate::output::{print_success, print_value, print_warning};

pub async fn authorize<S: KeyValueStore>(
    storage: &KvGrantStorage<S>,
    command: &RecordCommands,
    format: OutputFormat,
) -> Result<()> {
    match command {
        RecordCommands::Show(args) => {
            let data = storage.load_authorize(&args.id).await?;
            print_value(&data, format)?;
        }
        RecordCommands::Remove(args) => {
            storage.remove_authorize(&args.id).await?;
            print_success(&format!("Removed authorization code {}", args.id.cyan()));
        }
    }
    Ok(())
}

pub async fn access<S: KeyValueStore>(
    storage: &KvGrantStorage<S>,
    command: &RecordCommands,
    format: OutputFormat,
) -> Result<()> {
    match command {
        RecordCommands::Show(args) => {
            let data = storage.load_access(&args.id).await?;
            print_value(&data, format)?;
            report_dropped_references(storage);
        }
        RecordCommands::Remove(args) => {
            storage.remove_access(&args.id).await?;
            print_success(&format!("Removed access token {}", args.id.cyan()));
        }
    }
    Ok(())
}

pub async fn refresh<S: KeyValueStore>(
    storage: &KvGrantStorage<S>,
    command: &RecordCommands,
    format: OutputFormat,
) -> Result<()> {
    match command {
        RecordCommands::Show(args) => {
            let data = storage.load_refresh(&args.id).await?;
            print_value(&data, format)?;
            report_dropped_references(storage);
        }
        RecordCommands::Remove(args) => {
            storage.remove_refresh(&args.id).await?;
            print_success(&format!("Removed refresh token {}", args.id.cyan()));
        }
    }
    Ok(())
}

fn report_dropped_references<S: KeyValueStore>(storage: &KvGrantStorage<S>) {
    let stats = storage.stats().snapshot();
    if stats.authorize_discarded > 0 {
        print_warning(&format!(
            "{} authorization code reference(s) could not be loaded",
            stats.authorize_discarded
        ));
    }
    if stats.previous_discarded > 0 {
        print_warning(&format!(
            "{} previous token reference(s) could not be loaded",
            stats.previous_discarded
        ));
    }
    if stats.chains_truncated + stats.cycles_detected > 0 {
        print_warning(&format!(
            "token history cut short (max_chain_depth = {})",
            storage.config().max_chain_depth
        ));
    }
}
