//! Single-user book recommendation and reading preference engine.
//!
//! Profiles and the catalog are JSON documents loaded and saved whole. The scoring,
//! recommendation, feed and analysis services are pure functions over those documents.

pub mod api;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod services;
