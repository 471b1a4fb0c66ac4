use std::sync::Arc;

use docfetch_core::Config;

use crate::connection::{ClientOptions, ConnectionContext};
use crate::scope::Database;
use crate::Result;

/// Data API client
///
/// Holds the resolved connection context; clones share it. All validation
/// happens here, so a client that exists is ready to send requests.
#[derive(Debug, Clone)]
pub struct Client {
    ctx: Arc<ConnectionContext>,
}

impl Client {
    /// Create a new client from options. Fails on invalid endpoint, auth or
    /// headers, or when no transport is available.
    pub fn new(options: ClientOptions) -> Result<Self> {
        let ctx = ConnectionContext::new(options)?;
        Ok(Self { ctx: Arc::new(ctx) })
    }

    /// Create a client from a loaded [`Config`]
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(ClientOptions::try_from(config)?)
    }

    /// Create a client from `DOCFETCH_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_config(&Config::from_env()?)
    }

    /// Select a database
    pub fn db(&self, name: impl Into<String>) -> Database {
        Database::new(Arc::clone(&self.ctx), name.into())
    }

    pub fn context(&self) -> &ConnectionContext {
        &self.ctx
    }
}
