mod base_entity;
mod column;
mod conjunct_relation;
mod relation;
mod transformer;
mod writer;

pub use base_entity::*;
pub use column::*;
pub use conjunct_relation::*;
pub use relation::*;
pub use transformer::*;
pub use writer::*;
