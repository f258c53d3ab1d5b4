//! HTTP layer: middleware, handlers and the HTML fragment renderer.

pub mod middleware;
pub mod render;
pub mod services;
