use std::sync::Arc;

use uuid::Uuid;

use crate::{connection::{Connection, ConnectionRef, RowSet}, error::{QueryError, Result}, Config};

/// A compile-only session: it renders SQL but cannot run it.
#[derive(Debug, Clone, PartialEq)]
pub struct OfflineConnection {
    session_id: Uuid,
    config: Config,
}

impl OfflineConnection {
    pub fn new() -> ConnectionRef {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> ConnectionRef {
        Arc::new(Self { session_id: Uuid::new_v4(), config })
    }
}

impl Connection for OfflineConnection {
    fn session_id(&self) -> Uuid {
        self.session_id
    }

    fn config(&self) -> &Config {
        &self.config
    }

    fn execute(&self, sql: &str) -> Result<RowSet> {
        tracing::debug!(sql, "offline session refused to execute");
        Err(QueryError::NotConnected)
    }
}
