//! `uah-rates` library crate.
//!
//! The binary (`rates`) is a thin wrapper around this library so that:
//!
//! - both pipeline stages are testable with in-memory collaborators
//! - the data source, the store and the renderer sit behind small traits
//!
//! Stages:
//!
//! - `acquire`: NBU API -> merged dataset CSV in storage
//! - `report`: stored dataset -> console table, presentation CSV, PNG chart

pub mod acquire;
pub mod app;
pub mod cli;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod messages;
pub mod plot;
pub mod report;
pub mod storage;
