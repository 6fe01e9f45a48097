mod field;
mod model;
mod relation;

pub use field::*;
pub use model::*;
pub use relation::*;
