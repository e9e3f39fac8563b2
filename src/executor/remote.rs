//! Redis Executor
//!
//! Runs commands against a Redis server over a `ConnectionManager`, which
//! multiplexes one connection across callers and reconnects on failure.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{Client, RedisError, Value};
use tracing::{debug, info};

use super::{Command, Executor, Reply};
use crate::config::Options;
use crate::error::TransportError;

/// Executor backed by a Redis server.
#[derive(Clone)]
pub struct RedisExecutor {
    connection: ConnectionManager,
}

impl RedisExecutor {
    /// Connects using the given options.
    ///
    /// Authentication and database selection happen during the handshake,
    /// driven by the connection URL.
    pub async fn connect(options: &Options) -> Result<Self, TransportError> {
        let client = Client::open(options.connection_url())?;
        let connection = ConnectionManager::new(client).await?;

        info!(
            "Connected to store: network={}, addr={}, database={}",
            options.network, options.addr, options.database
        );

        Ok(Self { connection })
    }

    /// Converts a `redis` value into a raw reply.
    fn convert(value: Value) -> Reply {
        match value {
            Value::Nil => Reply::Nil,
            Value::Int(n) => Reply::Int(n),
            Value::BulkString(bytes) => Reply::Bulk(bytes),
            Value::SimpleString(s) => Reply::Status(s),
            Value::Okay => Reply::ok(),
            Value::Array(items) | Value::Set(items) => {
                Reply::Array(items.into_iter().map(Self::convert).collect())
            }
            Value::Map(entries) => Reply::Array(
                entries
                    .into_iter()
                    .flat_map(|(k, v)| [Self::convert(k), Self::convert(v)])
                    .collect(),
            ),
            Value::Double(d) => Reply::Bulk(d.to_string().into_bytes()),
            Value::Boolean(b) => Reply::Int(i64::from(b)),
            other => Reply::Error(format!("ERR unsupported reply: {:?}", other)),
        }
    }

    /// Splits a `redis` error into a server error reply or a transport failure.
    fn convert_error(err: RedisError) -> Result<Reply, TransportError> {
        match err.code() {
            Some(code) => {
                let message = match err.detail() {
                    Some(detail) => format!("{} {}", code, detail),
                    None => code.to_string(),
                };
                Ok(Reply::Error(message))
            }
            None => Err(err.into()),
        }
    }
}

#[async_trait]
impl Executor for RedisExecutor {
    async fn execute(&self, command: Command) -> Result<Reply, TransportError> {
        let mut conn = self.connection.clone();
        let (name, args) = command.into_parts();

        let mut cmd = redis::cmd(name);
        for arg in &args {
            cmd.arg(arg.as_slice());
        }

        let result: Result<Value, RedisError> = cmd.query_async(&mut conn).await;
        match result {
            Ok(value) => Ok(Self::convert(value)),
            Err(err) => {
                debug!("{} failed: {}", name, err);
                Self::convert_error(err)
            }
        }
    }
}
