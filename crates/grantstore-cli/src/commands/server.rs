use anyhow::{Context, Result};
use colored::Colorize;

use grantstore_redis::{RedisConfig, RedisKeyValueStore};

use crate::output::print_success;

pub async fn status(store: &RedisKeyValueStore, config: &RedisConfig) -> Result<()> {
    store
        .ping()
        .await
        .with_context(|| format!("Redis at {} is not answering", config.url))?;
    let pool = store.pool().status();
    print_success(&format!("Redis at {} is reachable", config.url.cyan()));
    println!(
        "{}: {}/{} connections in use",
        "Pool".cyan(),
        pool.size.saturating_sub(pool.available),
        pool.max_size
    );
    Ok(())
}
