//! Remote Mirror Module
//!
//! Optional external key-value service mirrored by the cache manager.
//! The mirror is reached once at startup; when it is unreachable the manager
//! simply runs without it.

use std::time::Duration;

use parking_lot::Mutex;
use redis::Commands;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::Result;

// == Remote Mirror Trait ==
/// A best-effort secondary cache layer.
///
/// Payloads are JSON text. Implementations must bound every call with a
/// timeout; errors are reported, never retried here.
pub trait RemoteMirror: Send + Sync {
    /// Fetches the payload stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `payload` under `key`, expiring after `ttl_seconds`.
    fn set_with_expiry(&self, key: &str, payload: &str, ttl_seconds: u64) -> Result<()>;

    /// Removes `key`; missing keys are not an error.
    fn delete(&self, key: &str) -> Result<()>;

    /// Drops everything in the mirror's namespace.
    fn flush_namespace(&self) -> Result<()>;
}

// == Redis Mirror ==
/// Redis-backed mirror over a single synchronous connection.
///
/// Read and write timeouts are set on the socket, so a stalled server blocks a
/// caller for at most the configured timeout.
pub struct RedisMirror {
    conn: Mutex<redis::Connection>,
}

impl RedisMirror {
    /// Opens a connection to `url` and checks it with a PING.
    pub fn connect(url: &str, timeout: Duration) -> Result<Self> {
        // A zero socket timeout is rejected by the OS layer.
        let timeout = timeout.max(Duration::from_millis(1));

        let client = redis::Client::open(url)?;
        let mut conn = client.get_connection_with_timeout(timeout)?;
        conn.set_read_timeout(Some(timeout))?;
        conn.set_write_timeout(Some(timeout))?;
        let _: String = redis::cmd("PING").query(&mut conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

impl RemoteMirror for RedisMirror {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.conn.lock();
        let payload: Option<String> = conn.get(key)?;
        Ok(payload)
    }

    fn set_with_expiry(&self, key: &str, payload: &str, ttl_seconds: u64) -> Result<()> {
        let mut conn = self.conn.lock();
        let _: () = conn.set_ex(key, payload, ttl_seconds)?;
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        let mut conn = self.conn.lock();
        let _: () = conn.del(key)?;
        Ok(())
    }

    fn flush_namespace(&self) -> Result<()> {
        let mut conn = self.conn.lock();
        let _: () = redis::cmd("FLUSHDB").query(&mut *conn)?;
        Ok(())
    }
}

// == Connect ==
/// Builds the remote mirror described by `config`, if any.
///
/// Returns `None` when no URL is configured or the server cannot be reached;
/// neither case is an error for the cache.
pub fn connect_remote(config: &Config) -> Option<Box<dyn RemoteMirror>> {
    let url = match config.redis_url.as_deref() {
        Some(url) => url,
        None => {
            debug!("No REDIS_URL configured, using local cache only");
            return None;
        }
    };

    match RedisMirror::connect(url, config.redis_timeout()) {
        Ok(mirror) => {
            info!("Connected to remote mirror");
            Some(Box::new(mirror))
        }
        Err(err) => {
            warn!("Remote mirror unavailable ({}), using local cache only", err);
            None
        }
    }
}
