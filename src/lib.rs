mod entity;
mod error;
mod generator;
mod migration;
pub mod naming;
mod schema;
mod structure;
mod util;

pub use entity::*;
pub use error::*;
pub use generator::*;
pub use migration::*;
pub use schema::*;
pub use structure::*;
