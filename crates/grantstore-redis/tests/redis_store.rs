//! Integration tests for the Redis key-value backend.
//!
//! Tests use testcontainers to spin up a real Redis instance, so they need a
//! Docker daemon and are ignored by default:
//!
//! ```text
//! cargo test -p grantstore-redis -- --ignored
//! ```

use grantstore_core::kv::{Batch, KeyValueStore};
use grantstore_redis::{RedisConfig, RedisKeyValueStore};
use redis::AsyncCommands;
use testcontainers::{ContainerAsync, runners::AsyncRunner};
use testcontainers_modules::redis::Redis;
use time::{Duration, OffsetDateTime};
use tokio::sync::OnceCell;

// Shared Redis container for all tests
static SHARED_REDIS: OnceCell<(ContainerAsync<Redis>, String)> = OnceCell::const_new();

/// Get or create the shared Redis container
async fn get_redis_url() -> String {
    let (_, url) = SHARED_REDIS
        .get_or_init(|| async {
            let container = Redis::default()
                .start()
                .await
                .expect("start redis container");

            let host_port = container.get_host_port_ipv4(6379).await.expect("get port");
            let url = format!("redis://127.0.0.1:{}", host_port);

            (container, url)
        })
        .await;

    url.clone()
}

async fn connect() -> RedisKeyValueStore {
    let config = RedisConfig {
        url: get_redis_url().await,
        pool_size: 5,
        timeout_ms: 5000,
    };
    RedisKeyValueStore::connect(&config).await.expect("connect")
}

fn fields(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

async fn ttl_of(store: &RedisKeyValueStore, key: &str) -> i64 {
    let mut conn = store.pool().get().await.unwrap();
    conn.ttl(key).await.unwrap()
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_hash_round_trip() {
    let store = connect().await;
    store
        .hash_set("c:rt-app", &fields(&[("secret", "s3"), ("redirect_uri", "https://a/cb")]))
        .await
        .unwrap();

    let all = store.hash_get_all("c:rt-app").await.unwrap();
    assert_eq!(all.get("secret").map(String::as_str), Some("s3"));
    assert_eq!(all.get("redirect_uri").map(String::as_str), Some("https://a/cb"));

    let picked = store
        .hash_multi_get("c:rt-app", &["secret", "missing"])
        .await
        .unwrap();
    assert_eq!(picked, vec![Some("s3".to_string()), None]);

    store.delete("c:rt-app").await.unwrap();
    assert!(store.hash_get_all("c:rt-app").await.unwrap().is_empty());
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_expire_at_sets_ttl() {
    let store = connect().await;
    store
        .hash_set("a:ttl-code", &fields(&[("client", "app")]))
        .await
        .unwrap();

    let at = OffsetDateTime::now_utc() + Duration::minutes(10);
    assert!(store.expire_at("a:ttl-code", at).await.unwrap());

    let ttl = ttl_of(&store, "a:ttl-code").await;
    assert!((590..=600).contains(&ttl), "unexpected ttl {ttl}");

    assert!(!store.expire_at("a:never-written", at).await.unwrap());
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_past_expiry_removes_key() {
    let store = connect().await;
    store
        .hash_set("a:stale-code", &fields(&[("client", "app")]))
        .await
        .unwrap();

    let past = OffsetDateTime::now_utc() - Duration::minutes(1);
    store.expire_at("a:stale-code", past).await.unwrap();
    assert!(store.hash_get_all("a:stale-code").await.unwrap().is_empty());
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_batches_apply_every_command() {
    let store = connect().await;
    let at = OffsetDateTime::now_utc() + Duration::days(7);

    for (atomic, token) in [(false, "piped"), (true, "multi")] {
        let mut batch = if atomic { Batch::atomic() } else { Batch::new() };
        let refresh_key = format!("r:{token}-ref");
        let access_key = format!("t:{token}-tok");
        batch
            .hash_set(refresh_key.clone(), fields(&[("access", token)]))
            .expire_at(refresh_key.clone(), at)
            .hash_set(access_key.clone(), fields(&[("client", "app")]))
            .expire_at(access_key.clone(), at);
        store.execute(batch).await.unwrap();

        let access = store.hash_multi_get(&refresh_key, &["access"]).await.unwrap();
        assert_eq!(access, vec![Some(token.to_string())]);
        assert!(ttl_of(&store, &access_key).await > 0);
    }
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_connect_fails_for_unreachable_server() {
    let config = RedisConfig {
        url: "redis://127.0.0.1:1".to_string(),
        pool_size: 1,
        timeout_ms: 500,
    };
    let err = RedisKeyValueStore::connect(&config).await.unwrap_err();
    assert!(err.is_transport());
}
