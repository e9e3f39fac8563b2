//! Integration Tests for the Cacher
//!
//! Runs the public API end to end against the in-process executor. The
//! `live_*` tests repeat the same scenarios against a real server; they are
//! ignored by default and read their connection from `CACHER_*` variables:
//!
//! ```text
//! CACHER_ADDR=127.0.0.1:6379 cargo test -- --ignored
//! ```

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use redis_cacher::{
    CacheError, Cacher, Command, Executor, KeyType, MemoryExecutor, Options, Reply,
    TransportError,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
struct User {
    name: String,
    age: i64,
}

// == Helper Functions ==

/// Installs a log subscriber once per test binary; `RUST_LOG` overrides
/// the default filter.
fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "redis_cacher=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_test_writer())
        .try_init();
}

fn test_options() -> Options {
    init_tracing();
    Options::default().with_prefix("zengate_")
}

fn memory_cacher() -> Cacher {
    Cacher::in_memory(&test_options())
}

async fn live_cacher() -> Cacher {
    init_tracing();
    let options = Options::from_env().with_prefix("zengate_");
    Cacher::connect(&options)
        .await
        .expect("live tests need a reachable server")
}

// == Scenarios ==
// Shared by the memory and live variants below.

async fn scenario_get_set(c: &Cacher) {
    c.set("age", "23", 30).await.unwrap();
    assert_eq!(c.get_int("age").await.unwrap(), 23);

    c.set("name", "corel", 30).await.unwrap();
    assert_eq!(c.get_string("name").await.unwrap(), "corel");

    c.set("subscribe", true, 30).await.unwrap();
    assert!(c.get_bool("subscribe").await.unwrap());

    let user = User {
        name: "corel".to_string(),
        age: 23,
    };
    c.set_object("user", &user, 30).await.unwrap();
    let mut read = User::default();
    c.get_object_into("user", &mut read).await.unwrap();
    assert_eq!(read.name, "corel");
    assert_eq!(read.age, 23);
}

async fn scenario_incr_decr(c: &Cacher) {
    c.del(&["seq"]).await.unwrap();
    assert_eq!(c.incr("seq").await.unwrap(), 1);
    assert_eq!(c.incr("seq").await.unwrap(), 2);
    assert_eq!(c.incr_by("seq", 5).await.unwrap(), 7);
    assert_eq!(c.decr("seq").await.unwrap(), 6);
    assert_eq!(c.decr_by("seq", 5).await.unwrap(), 1);
}

async fn scenario_hkeys(c: &Cacher) {
    c.del(&["hKeyTest"]).await.unwrap();
    c.hset("hKeyTest", "field1", "foo").await.unwrap();
    c.hset("hKeyTest", "field2", "bar").await.unwrap();
    assert_eq!(
        c.hkeys("hKeyTest").await.unwrap(),
        vec!["field1".to_string(), "field2".to_string()]
    );
}

async fn scenario_expire(c: &Cacher) {
    c.set("name", "corel", 1).await.unwrap();
    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert!(c.get_string("name").await.unwrap_err().is_not_found());
}

async fn scenario_hash(c: &Cacher) {
    let mut fields = HashMap::new();
    fields.insert("name", json!("corel"));
    fields.insert("age", json!(23));
    c.hmset("huser", fields, 10).await.unwrap();

    assert_eq!(c.hget_int("huser", "age").await.unwrap(), 23);
    assert_eq!(c.hget_string("huser", "name").await.unwrap(), "corel");

    c.hset("huser", "1", "haha").await.unwrap();
    assert_eq!(c.hdel("huser", &["1"]).await.unwrap(), 1);
}

async fn scenario_sorted_set(c: &Cacher) {
    c.del(&["scores", "hNum"]).await.unwrap();
    c.zadd("scores", 82, "corel").await.unwrap();
    c.zadd("scores", 86, "zen").await.unwrap();
    assert_eq!(c.zscore("scores", "corel").await.unwrap(), 82);

    assert_eq!(c.zincr_by("hNum", "num", 1).await.unwrap(), 1);
    assert_eq!(c.zcard("hNum").await.unwrap(), 1);
}

async fn scenario_hincr_by(c: &Cacher) {
    c.del(&["hnum"]).await.unwrap();
    assert_eq!(c.hincr_by("hnum", "num", 1).await.unwrap(), 1);
}

async fn scenario_type(c: &Cacher) {
    let keys = [
        "typeTestString",
        "typeTestList",
        "typeTestHash",
        "typeTestZset",
        "typeTestNone",
    ];
    c.del(&keys).await.unwrap();

    c.set("typeTestString", "hello", 30).await.unwrap();
    assert_eq!(c.key_type("typeTestString").await.unwrap(), KeyType::String);

    c.lpush("typeTestList", "world").await.unwrap();
    assert_eq!(c.key_type("typeTestList").await.unwrap(), KeyType::List);

    c.hset("typeTestHash", "field", "value").await.unwrap();
    assert_eq!(c.key_type("typeTestHash").await.unwrap(), KeyType::Hash);

    c.zadd("typeTestZset", 1, "member1").await.unwrap();
    assert_eq!(c.key_type("typeTestZset").await.unwrap(), KeyType::ZSet);

    assert_eq!(c.key_type("typeTestNone").await.unwrap(), KeyType::None);

    c.del(&keys).await.unwrap();
}

// == In-Memory Tests ==

#[tokio::test]
async fn test_get_set() {
    scenario_get_set(&memory_cacher()).await;
}

#[tokio::test]
async fn test_incr_decr() {
    scenario_incr_decr(&memory_cacher()).await;
}

#[tokio::test]
async fn test_hkeys() {
    scenario_hkeys(&memory_cacher()).await;
}

#[tokio::test]
async fn test_expire() {
    scenario_expire(&memory_cacher()).await;
}

#[tokio::test]
async fn test_hash() {
    scenario_hash(&memory_cacher()).await;
}

#[tokio::test]
async fn test_sorted_set() {
    scenario_sorted_set(&memory_cacher()).await;
}

#[tokio::test]
async fn test_hincr_by() {
    scenario_hincr_by(&memory_cacher()).await;
}

#[tokio::test]
async fn test_type() {
    scenario_type(&memory_cacher()).await;
}

// == Error Translation ==

#[tokio::test]
async fn test_missing_key_is_not_found() {
    let c = memory_cacher();
    let err = c.get_int("nobody").await.unwrap_err();
    assert!(matches!(err, CacheError::KeyNotFound(_)));
}

#[tokio::test]
async fn test_wrong_kind_is_type_mismatch() {
    let c = memory_cacher();
    c.hset("huser", "name", "corel").await.unwrap();

    assert!(matches!(
        c.get_string("huser").await,
        Err(CacheError::TypeMismatch(_))
    ));
    assert!(matches!(
        c.incr("huser").await,
        Err(CacheError::TypeMismatch(_))
    ));
}

#[tokio::test]
async fn test_bad_payload_is_decode_error() {
    let c = memory_cacher();
    c.set("user", "plain text", 0).await.unwrap();

    let result: Result<User, _> = c.get_object("user").await;
    assert!(matches!(result, Err(CacheError::Decode(_))));
}

struct DownExecutor;

#[async_trait]
impl Executor for DownExecutor {
    async fn execute(&self, _command: Command) -> Result<Reply, TransportError> {
        Err(TransportError::new("connection reset by peer"))
    }
}

#[tokio::test]
async fn test_unreachable_store_is_transport_error() {
    let c = Cacher::with_executor(&test_options(), Arc::new(DownExecutor));

    let err = c.get_string("name").await.unwrap_err();
    assert!(err.is_transport());
    assert!(err.to_string().contains("connection reset by peer"));
    assert!(c.hkeys("hKeyTest").await.unwrap_err().is_transport());
    assert!(c.zscore("scores", "corel").await.unwrap_err().is_transport());
}

// == Namespacing ==

#[tokio::test]
async fn test_prefixes_share_a_store_without_colliding() {
    let executor: Arc<dyn Executor> = Arc::new(MemoryExecutor::new());
    let zengate = Cacher::with_executor(&test_options(), executor.clone());
    let other = Cacher::with_executor(&Options::default().with_prefix("other_"), executor.clone());
    let raw = Cacher::with_executor(&Options::default(), executor);

    zengate.set("name", "corel", 0).await.unwrap();
    other.set("name", "zen", 0).await.unwrap();

    assert_eq!(zengate.get_string("name").await.unwrap(), "corel");
    assert_eq!(other.get_string("name").await.unwrap(), "zen");
    assert_eq!(raw.get_string("zengate_name").await.unwrap(), "corel");

    assert_eq!(zengate.keys("*").await.unwrap(), vec!["name".to_string()]);
    assert_eq!(raw.keys("*").await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_clones_are_usable_across_tasks() {
    let c = memory_cacher();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let c = c.clone();
            tokio::spawn(async move {
                for _ in 0..25 {
                    c.incr("hits").await.unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(c.get_int("hits").await.unwrap(), 200);
}

// == Live Server Tests ==

#[tokio::test]
#[ignore]
async fn live_get_set() {
    scenario_get_set(&live_cacher().await).await;
}

#[tokio::test]
#[ignore]
async fn live_incr_decr() {
    scenario_incr_decr(&live_cacher().await).await;
}

#[tokio::test]
#[ignore]
async fn live_hkeys() {
    scenario_hkeys(&live_cacher().await).await;
}

#[tokio::test]
#[ignore]
async fn live_expire() {
    scenario_expire(&live_cacher().await).await;
}

#[tokio::test]
#[ignore]
async fn live_hash() {
    scenario_hash(&live_cacher().await).await;
}

#[tokio::test]
#[ignore]
async fn live_sorted_set() {
    scenario_sorted_set(&live_cacher().await).await;
}

#[tokio::test]
#[ignore]
async fn live_hincr_by() {
    scenario_hincr_by(&live_cacher().await).await;
}

#[tokio::test]
#[ignore]
async fn live_type() {
    scenario_type(&live_cacher().await).await;
}
