//! linkboard - a self-hosted link dashboard
//!
//! Stores bookmarks with an optional category, colour and icon, renders them
//! grouped by category as htmx fragments, counts clicks, and hides the edit
//! affordances behind a shared PIN.
//!
//! # Architecture
//! - `storage`: the `LinkStore` contract and its SeaORM backend
//! - `services`: link aggregation and the dashboard service
//! - `api`: middleware, route handlers and HTML rendering
//! - `cli`: command-line arguments
//! - `config`: TOML + environment configuration
//! - `runtime`: startup, serving and graceful shutdown
//! - `system`: logging and signal handling

pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
