pub mod compile_context;
pub use compile_context::*;

pub mod attr_spec;
pub use attr_spec::*;

pub mod node;
pub use node::*;

pub mod query_expression;
pub use query_expression::*;

pub mod table;
pub use table::*;

pub mod subquery;
pub use subquery::*;

pub mod join;
pub use join::*;

pub mod projection;
pub use projection::*;

pub mod group_by;
pub use group_by::*;

pub mod union;
pub use union::*;

pub mod universal_set;
pub use universal_set::*;

#[cfg(test)]
mod _tests;
#[cfg(test)]
pub use _tests::fixtures;
