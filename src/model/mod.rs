//! Core data model types for pathgraph

mod data;
mod hash;
mod number;

pub use data::Data;
pub use hash::Hash;
pub use number::Number;
