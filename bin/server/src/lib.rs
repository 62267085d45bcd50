//! atelier HTTP server.
//!
//! Exposes the agent pipeline as `POST /orchestrate` plus a `GET /health`
//! check.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
