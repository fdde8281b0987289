use anyhow::{Context, Result};
use colored::Colorize;

use grantstore_core::{Client, ClientStorage, UserData};

use crate::cli::{ClientCreateArgs, ClientUpdateArgs, OutputFormat};
use crate::output::{print_success, print_value};

pub async fn create<S: ClientStorage>(
    storage: &S,
    args: &ClientCreateArgs,
    format: OutputFormat,
) -> Result<()> {
    let mut client = Client::new(&args.id, &args.secret, &args.redirect_uri);
    if let Some(data) = &args.data {
        client = client.with_user_data(UserData::raw(data));
    }
    storage
        .create_client(&client)
        .await
        .with_context(|| format!("Failed to create client {}", args.id))?;
    print_success(&format!("Created client {}", args.id.cyan()));
    print_value(&client, format)
}

pub async fn get<S: ClientStorage>(storage: &S, id: &str, format: OutputFormat) -> Result<()> {
    let client = storage.get_client(id).await?;
    print_value(&client, format)
}

/// Rewrites a client, keeping whatever was not given on the command line.
pub async fn update<S: ClientStorage>(
    storage: &S,
    args: &ClientUpdateArgs,
    format: OutputFormat,
) -> Result<()> {
    let mut client = storage.get_client(&args.id).await?;
    if let Some(secret) = &args.secret {
        client.secret.clone_from(secret);
    }
    if let Some(redirect_uri) = &args.redirect_uri {
        client.redirect_uri.clone_from(redirect_uri);
    }
    if let Some(data) = &args.data {
        client.user_data = UserData::raw(data);
    }
    storage.update_client(&client).await?;
    print_success(&format!("Updated client {}", args.id.cyan()));
    print_value(&client, format)
}

pub async fn remove<S: ClientStorage>(storage: &S, id: &str) -> Result<()> {
    storage.remove_client(id).await?;
    print_success(&format!("Removed client {}", id.cyan()));
    Ok(())
}
