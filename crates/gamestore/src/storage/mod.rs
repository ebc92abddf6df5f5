//! Storage backend implementations.
//!
//! Concrete implementations of `gamestore_core::storage::Repository`,
//! selected at compile time via feature flags.
//!
//! # Feature Flags
//!
//! - `inmemory` (default): `BTreeMap`-backed repositories, nothing persisted
//! - `sqlite`: SQLite storage using `rusqlite` and `tokio-rusqlite`
//!
//! These features are mutually exclusive.
//!
//! # Examples
//!
//! Build with SQLite:
//! ```bash
//! cargo build -p gamestore --no-default-features --features sqlite,memory
//! ```

#[cfg(all(feature = "sqlite", feature = "inmemory"))]
compile_error!(
    "Features 'sqlite' and 'inmemory' are mutually exclusive. \
    Enable only one storage backend at a time."
);

#[cfg(not(any(feature = "sqlite", feature = "inmemory")))]
compile_error!(
    "No storage backend selected. Enable 'inmemory' or 'sqlite' feature. \
    Example: cargo build -p gamestore --features sqlite"
);

// Service and handler tests always run against the in-memory store.
#[cfg(any(feature = "inmemory", test))]
pub mod inmemory;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(any(feature = "inmemory", test))]
pub use inmemory::InMemoryRepository;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteRepository;
