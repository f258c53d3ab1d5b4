//! Static configuration
//!
//! Loaded once at startup from an optional `config.toml` and `LB__*`
//! environment variables, then handed to the components that need it.
//! Nothing here is global; the loaded value is passed down explicitly.

mod structs;

pub use structs::*;
