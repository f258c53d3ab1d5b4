//! Application lifecycle
//!
//! `Starting → Migrating → Serving → ShuttingDown → Stopped`. A failure while
//! starting or migrating goes straight to `Stopped` and the process exits
//! non-zero. The store is closed on every path that opened it.

use std::fmt;

use tracing::info;

pub mod lifetime;
pub mod modes;

pub use modes::run_server;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Starting,
    Migrating,
    Serving,
    ShuttingDown,
    Stopped,
}

impl LifecycleState {
    /// Log the transition into this state.
    pub fn enter(self) {
        info!(state = %self, "lifecycle transition");
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LifecycleState::Starting => "starting",
            LifecycleState::Migrating => "migrating",
            LifecycleState::Serving => "serving",
            LifecycleState::ShuttingDown => "shutting_down",
            LifecycleState::Stopped => "stopped",
        };
        f.write_str(name)
    }
}
