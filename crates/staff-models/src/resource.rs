//! Resource model and its occupation history

pub mod model;
pub mod occupation;

pub use model::*;
pub use occupation::*;
