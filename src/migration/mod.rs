mod plan;
mod writer;

pub use plan::*;
pub use writer::*;
