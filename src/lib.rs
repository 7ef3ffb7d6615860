//! CampusHub
//!
//! Event and registration consistency engine for a campus events app.
//! Admins publish, edit, postpone and cancel events; students register,
//! unregister and mark interest. Seat counts stay consistent with the
//! registration log across restarts of a locally persisted store.

pub mod config;
pub mod engine;
pub mod models;
pub mod persistence;
pub mod services;
pub mod utils;
pub mod validation;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{CampusHubError, PersistenceError, Result};

// Re-export main components for easy access
pub use engine::{Ledger, LifecycleManager, ParticipantRoster, StoreChange};
pub use persistence::{build_gateway, PersistenceGateway};
pub use services::CampusHub;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
