pub mod row;
pub use row::*;

#[allow(clippy::module_inception)]
pub mod connection;
pub use connection::*;

pub mod offline_connection;
pub use offline_connection::*;
