//! Serialization helpers.
//!
//! - merged dataset CSV encode/decode (`dataset`)
//! - presentation CSV (`presentation`)

pub mod dataset;
pub mod presentation;

pub use dataset::*;
pub use presentation::*;
