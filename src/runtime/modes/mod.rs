//! Execution modes. Only the HTTP server exists.

pub mod server;

pub use server::run_server;
