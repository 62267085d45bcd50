//! Core types shared across the atelier workspace.
//!
//! This crate provides the rootcause-based `Result` alias and the
//! identifiers used to correlate a single orchestration run in logs.

pub mod error;
pub mod id;

pub use error::Result;
pub use id::RunId;
