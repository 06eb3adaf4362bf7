pub mod attribute_type;
pub use attribute_type::*;

pub mod attribute;
pub use attribute::*;

#[allow(clippy::module_inception)]
pub mod heading;
pub use heading::*;

pub mod table_definition;
pub use table_definition::*;
