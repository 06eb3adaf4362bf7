pub mod literal;
pub use literal::*;

pub mod cond_result;
pub use cond_result::*;

pub mod and_list;
pub use and_list::*;

pub mod restriction;
pub use restriction::*;

pub mod column_extractor;
pub use column_extractor::*;

pub mod value_encoder;
pub use value_encoder::*;

pub mod compatibility;
pub use compatibility::*;

pub mod condition_compiler;
pub use condition_compiler::*;
