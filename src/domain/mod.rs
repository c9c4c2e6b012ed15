//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - per-currency observations (`RatePoint`) and merged rows (`MergedRecord`)
//! - the requested calendar window (`DateRange`)
//! - stored blobs (`StoredArtifact`) and their storage keys

pub mod types;

pub use types::*;
