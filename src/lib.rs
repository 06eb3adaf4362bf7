pub mod error;
pub use error::{QueryError, Result};

pub mod config;
pub use config::Config;

pub mod heading;
pub use heading::{Attribute, AttributeType, Heading, TableDefinition};

pub mod connection;
pub use connection::{Connection, ConnectionRef, OfflineConnection, Row, RowSet};

pub mod condition;
pub use condition::{AndList, CondResult, Literal, Restriction};

pub mod expression;
pub use expression::{AttrSpec, CompileContext, QueryExpression, UniversalSet};
