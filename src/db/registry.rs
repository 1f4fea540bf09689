//! Named connection registry.
//!
//! A [`Registry`] is populated once at process startup and read concurrently
//! afterwards: `register` is the only writer, `resolve`/`get` take a shared
//! read lock and never contend with each other. The name `"default"` is the
//! distinguished alias returned by [`Registry::resolve`] when no name is
//! given.
//!
//! The registry is an explicit object to be constructed and injected by the
//! application, not an ambient process-wide singleton; scope one instance to
//! the process if that is what the application wants.

use crate::builder::{SqlBuilder, Statement};
use crate::config::{ConnectionConfig, Settings};
use crate::db::exec;
use crate::db::pool::DbPool;
use crate::dialect::Dialect;
use crate::error::{Error, Result};
use futures_util::future::try_join_all;
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

/// The distinguished alias resolved when no handle name is given.
pub const DEFAULT_NAME: &str = "default";

/// An opened, pool-tuned connection handle with its resolved dialect.
///
/// Lives for the process lifetime once registered; [`Registry::close_all`]
/// is the only teardown path.
#[derive(Debug)]
pub struct Database {
    name: String,
    dialect: Dialect,
    pool: DbPool,
}

impl Database {
    /// The name this handle was registered under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The handle's resolved dialect.
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// The underlying pool.
    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    /// A fresh statement builder bound to this handle's dialect.
    pub fn builder(&self) -> SqlBuilder {
        SqlBuilder::new(self.dialect)
    }

    /// Execute a finalized statement on this handle.
    pub async fn execute(&self, stmt: &Statement) -> Result<u64> {
        exec::execute(&self.pool, stmt).await
    }
}

/// Name-keyed store of opened connection handles.
#[derive(Debug, Default)]
pub struct Registry {
    handles: RwLock<HashMap<String, Arc<Database>>>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate, dial, tune and store a connection under `name`.
    ///
    /// The driver string is validated against the dialect set before any
    /// connection is attempted, and the DSN scheme must agree with it.
    /// Registering under [`DEFAULT_NAME`] is what makes a handle the
    /// default. One independent call per name may run concurrently; a name
    /// collision is detected again after dialing so the loser's fresh pool
    /// is closed rather than leaked.
    pub async fn register(&self, name: &str, config: &ConnectionConfig) -> Result<Arc<Database>> {
        config.validate()?;
        let dialect = Dialect::from_str(&config.driver)?;
        if let Some(scheme_dialect) = Dialect::from_dsn(&config.dsn) {
            if scheme_dialect != dialect {
                return Err(Error::config(format!(
                    "dsn scheme implies {scheme_dialect} but driver is {dialect}: {}",
                    config.masked_dsn()
                )));
            }
        }

        {
            let handles = self.handles.read().await;
            if handles.contains_key(name) {
                return Err(Error::DuplicateHandle {
                    name: name.to_string(),
                });
            }
        }

        let pool = DbPool::open(dialect, config).await?;
        let server_version = pool.server_version().await;

        let db = Arc::new(Database {
            name: name.to_string(),
            dialect,
            pool,
        });

        // Re-check after the dial to close the race between two concurrent
        // registrations of the same name.
        let clashed = {
            let mut handles = self.handles.write().await;
            if handles.contains_key(name) {
                true
            } else {
                handles.insert(name.to_string(), Arc::clone(&db));
                false
            }
        };
        if clashed {
            db.pool.close().await;
            return Err(Error::DuplicateHandle {
                name: name.to_string(),
            });
        }

        info!(
            name = %name,
            dialect = %dialect,
            server_version = ?server_version,
            dsn = %config.masked_dsn(),
            "db handle registered"
        );
        Ok(db)
    }

    /// Register every connection in `settings`, one registration per name
    /// running concurrently, returning once all have completed.
    pub async fn init_from_settings(&self, settings: &Settings) -> Result<()> {
        try_join_all(
            settings
                .db
                .iter()
                .map(|(name, config)| async move { self.register(name, config).await }),
        )
        .await?;
        Ok(())
    }

    /// Resolve a handle: by name, or the default when `None`.
    pub async fn resolve(&self, name: Option<&str>) -> Result<Arc<Database>> {
        match name {
            Some(name) => self.get(name).await,
            None => self.default_db().await,
        }
    }

    /// Get the handle registered under `name`.
    pub async fn get(&self, name: &str) -> Result<Arc<Database>> {
        self.handles
            .read()
            .await
            .get(name)
            .cloned()
            .ok_or_else(|| Error::UnknownHandle {
                name: name.to_string(),
            })
    }

    /// Get the default handle.
    pub async fn default_db(&self) -> Result<Arc<Database>> {
        self.handles
            .read()
            .await
            .get(DEFAULT_NAME)
            .cloned()
            .ok_or(Error::UnconfiguredDefault)
    }

    /// Registered handle names.
    pub async fn names(&self) -> Vec<String> {
        self.handles.read().await.keys().cloned().collect()
    }

    /// Number of registered handles.
    pub async fn len(&self) -> usize {
        self.handles.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.handles.read().await.is_empty()
    }

    /// Close every pool and clear the registry.
    pub async fn close_all(&self) {
        let mut handles = self.handles.write().await;
        for (name, db) in handles.drain() {
            info!(name = %name, "closing db handle");
            db.pool.close().await;
        }
    }
}
