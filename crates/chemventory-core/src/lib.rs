//! # Chemventory Core
//!
//! Core library for Chemventory - a small laboratory inventory for chemical
//! stock, with an optional hosted backend and a local cache fallback.
//!
//! This crate provides the domain model, storage abstractions and the sync
//! façade independent of the CLI interface.
//!
//! ## Architecture
//!
//! - **model**: Chemical records, patches and audit entries
//! - **local**: Key-value slots and the `chemicals_v1` record cache
//! - **remote**: Hosted table client and its live change feed
//! - **backend**: Local-only and remote-backed storage backends
//! - **store**: The sync façade every caller goes through
//! - **notify**: Change events delivered to subscribers
//! - **csv**, **filter**, **dashboard**: Import/export, search and stock alerts
//! - **session**, **users**: Sign-in state and the user directory

pub mod backend;
pub mod csv;
pub mod dashboard;
pub mod error;
pub mod filter;
pub mod fs;
pub mod ids;
pub mod local;
pub mod model;
pub mod notify;
pub mod remote;
pub mod samples;
pub mod session;
pub mod store;
pub mod users;

pub use backend::{select_backend, BackendMode, StorageBackend};
pub use dashboard::StockAlerts;
pub use error::{ChemventoryError, Result};
pub use filter::RecordFilter;
pub use local::{FileStore, KeyValueStore, MemoryStore, RecordCache};
pub use model::{ChemicalPatch, ChemicalRecord, NewChemical, PhysicalState, SafetyClass};
pub use notify::{ChangeEvent, Subscription};
pub use remote::{RemoteChange, RemoteConfig};
pub use session::{Session, SessionManager, User};
pub use store::ChemicalStore;
pub use users::{UserDirectory, UserEntry};

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
