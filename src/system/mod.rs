//! Process-level plumbing: logging setup and termination signals.

pub mod logging;
pub mod signal;

pub use logging::init_logging;
pub use signal::wait_for_termination;
