//! Text forms of structured values
//!
//! Two encodings are provided:
//! - [`json`]: the canonical form every translator's default text encoding uses
//! - [`tagged`]: an element-per-variant form that keeps numeric widths intact

pub mod json;
pub mod tagged;

#[cfg(test)]
pub(crate) mod proptests;
