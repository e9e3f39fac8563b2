//! Configuration Module
//!
//! Connection and namespacing options for a `Cacher`, loadable from
//! environment variables or any serde source.

use std::env;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::codec::Format;

// == Network ==
/// Transport used to reach the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    /// TCP socket, `addr` is `host:port`
    #[default]
    Tcp,
    /// Unix domain socket, `addr` is a filesystem path
    Unix,
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Network::Tcp => write!(f, "tcp"),
            Network::Unix => write!(f, "unix"),
        }
    }
}

impl FromStr for Network {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tcp" | "tcp4" | "tcp6" => Ok(Network::Tcp),
            "unix" => Ok(Network::Unix),
            _ => Err(format!("Unknown network: {}", s)),
        }
    }
}

// == Options ==
/// Client configuration.
///
/// Captured once when a `Cacher` is built and never mutated afterwards.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Options {
    /// Transport kind
    #[serde(default)]
    pub network: Network,

    /// `host:port` for TCP, socket path for Unix
    #[serde(default = "default_addr")]
    pub addr: String,

    /// Store password (optional)
    #[serde(default)]
    pub password: Option<String>,

    /// Logical database number
    #[serde(default)]
    pub database: i64,

    /// Prepended to every logical key
    #[serde(default)]
    pub prefix: String,

    /// Format for structured values
    #[serde(default)]
    pub format: Format,
}

fn default_addr() -> String {
    "127.0.0.1:6379".to_string()
}

impl Options {
    /// Creates a new Options by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHER_NETWORK` - `tcp` or `unix` (default: tcp)
    /// - `CACHER_ADDR` - Store address (default: 127.0.0.1:6379)
    /// - `CACHER_PASSWORD` - Store password (default: none)
    /// - `CACHER_DATABASE` - Database number (default: 0)
    /// - `CACHER_PREFIX` - Key prefix (default: empty)
    /// - `CACHER_FORMAT` - `msgpack` or `json` (default: msgpack)
    pub fn from_env() -> Self {
        Self {
            network: env::var("CACHER_NETWORK")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_default(),
            addr: env::var("CACHER_ADDR").unwrap_or_else(|_| default_addr()),
            password: env::var("CACHER_PASSWORD").ok().filter(|v| !v.is_empty()),
            database: env::var("CACHER_DATABASE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(0),
            prefix: env::var("CACHER_PREFIX").unwrap_or_default(),
            format: env::var("CACHER_FORMAT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_default(),
        }
    }

    /// Sets the key prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Sets the structured value format.
    pub fn with_format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    // == Connection URL ==
    /// Generates the connection URL understood by the `redis` crate.
    pub fn connection_url(&self) -> String {
        let password = self.password.as_deref().filter(|p| !p.is_empty());
        match self.network {
            Network::Tcp => {
                let auth = match password {
                    Some(pwd) => format!(":{}@", urlencoding::encode(pwd)),
                    None => String::new(),
                };
                format!("redis://{}{}/{}", auth, self.addr, self.database)
            }
            Network::Unix => {
                let mut url = format!("redis+unix://{}?db={}", self.addr, self.database);
                if let Some(pwd) = password {
                    url.push_str("&pass=");
                    url.push_str(&urlencoding::encode(pwd));
                }
                url
            }
        }
    }
}

impl Default for Options {
    fn default() -> Self {
        Self {
            network: Network::default(),
            addr: default_addr(),
            password: None,
            database: 0,
            prefix: String::new(),
            format: Format::default(),
        }
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("network", &self.network)
            .field("addr", &self.addr)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("database", &self.database)
            .field("prefix", &self.prefix)
            .field("format", &self.format)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_default() {
        let options = Options::default();
        assert_eq!(options.network, Network::Tcp);
        assert_eq!(options.addr, "127.0.0.1:6379");
        assert!(options.password.is_none());
        assert_eq!(options.database, 0);
        assert_eq!(options.prefix, "");
        assert_eq!(options.format, Format::MsgPack);
    }

    #[test]
    fn test_options_from_env_defaults() {
        // Clear any existing env vars to test defaults
        env::remove_var("CACHER_NETWORK");
        env::remove_var("CACHER_ADDR");
        env::remove_var("CACHER_PASSWORD");
        env::remove_var("CACHER_DATABASE");
        env::remove_var("CACHER_PREFIX");
        env::remove_var("CACHER_FORMAT");

        let options = Options::from_env();
        assert_eq!(options, Options::default());
    }

    #[test]
    fn test_options_deserialize_with_defaults() {
        let json = r#"{"addr": "cache:6380", "password": "20190604", "prefix": "zengate_"}"#;
        let options: Options = serde_json::from_str(json).unwrap();
        assert_eq!(options.network, Network::Tcp);
        assert_eq!(options.addr, "cache:6380");
        assert_eq!(options.password.as_deref(), Some("20190604"));
        assert_eq!(options.prefix, "zengate_");
        assert_eq!(options.format, Format::MsgPack);
    }

    #[test]
    fn test_network_from_str() {
        assert_eq!("TCP".parse::<Network>().unwrap(), Network::Tcp);
        assert_eq!("unix".parse::<Network>().unwrap(), Network::Unix);
        assert!("udp".parse::<Network>().is_err());
    }

    #[test]
    fn test_connection_url_tcp() {
        let options = Options::default();
        assert_eq!(options.connection_url(), "redis://127.0.0.1:6379/0");

        let options = Options {
            password: Some("20190604".to_string()),
            database: 2,
            ..Options::default()
        };
        assert_eq!(options.connection_url(), "redis://:20190604@127.0.0.1:6379/2");
    }

    #[test]
    fn test_connection_url_escapes_password() {
        let options = Options {
            password: Some("p@ss/word".to_string()),
            ..Options::default()
        };
        assert_eq!(
            options.connection_url(),
            "redis://:p%40ss%2Fword@127.0.0.1:6379/0"
        );
    }

    #[test]
    fn test_connection_url_keeps_unreserved_password_chars() {
        let options = Options {
            password: Some("Abc-1.2_3~ x".to_string()),
            database: 2,
            ..Options::default()
        };
        assert_eq!(
            options.connection_url(),
            "redis://:Abc-1.2_3~%20x@127.0.0.1:6379/2"
        );
    }

    #[test]
    fn test_connection_url_unix() {
        let options = Options {
            network: Network::Unix,
            addr: "/var/run/redis.sock".to_string(),
            password: Some("secret".to_string()),
            ..Options::default()
        };
        assert_eq!(
            options.connection_url(),
            "redis+unix:///var/run/redis.sock?db=0&pass=secret"
        );
    }

    #[test]
    fn test_debug_redacts_password() {
        let options = Options {
            password: Some("secret".to_string()),
            ..Options::default()
        };
        let debug = format!("{:?}", options);
        assert!(!debug.contains("secret"));
        assert!(debug.contains("<redacted>"));
    }
}
