use std::{fmt::Debug, sync::Arc};

use uuid::Uuid;

use crate::{connection::RowSet, error::Result, Config};

/// The database session a query expression belongs to.
///
/// The compiler only needs identity (to refuse combining expressions from
/// different sessions) and configuration. `execute` is used by the output
/// layer once SQL has been rendered.
pub trait Connection: Debug + Send + Sync {
    fn session_id(&self) -> Uuid;
    fn config(&self) -> &Config;
    fn execute(&self, sql: &str) -> Result<RowSet>;
}

pub type ConnectionRef = Arc<dyn Connection>;

pub trait SameSession {
    fn same_session(&self, other: &ConnectionRef) -> bool;
}

impl SameSession for ConnectionRef {
    fn same_session(&self, other: &ConnectionRef) -> bool {
        self.session_id() == other.session_id()
    }
}
