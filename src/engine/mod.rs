//! Event/registration consistency engine
//!
//! Owns event and registration records, enforces capacity and status
//! invariants, and serializes every mutation through one writer.

pub mod capacity;
pub mod event_store;
pub mod interest;
pub mod ledger;
pub mod lifecycle;
pub mod registration_log;
pub mod roster;
pub mod schedule;
pub mod students;

pub use event_store::EventStore;
pub use interest::InterestRegistry;
pub use ledger::{Ledger, ReconcileReport, SnapshotDocuments};
pub use lifecycle::{BulkCancelOutcome, LifecycleAction, LifecycleManager, StoreChange};
pub use registration_log::RegistrationLog;
pub use roster::ParticipantRoster;
pub use students::StudentDirectory;
