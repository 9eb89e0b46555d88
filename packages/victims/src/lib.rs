#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Victim tribute storage.
//!
//! Tributes live in a single `DuckDB` table behind [`store::VictimStore`].
//! The connection is guarded by a mutex so the store can be shared across
//! HTTP workers.

pub mod seed;
pub mod store;

use memorial_victims_models::ValidationError;

pub use store::VictimStore;

/// Errors that can occur during tribute storage operations.
#[derive(Debug, thiserror::Error)]
pub enum VictimsError {
    /// `DuckDB` error.
    #[error("Database error: {0}")]
    Database(#[from] duckdb::Error),

    /// I/O error (creating the database directory).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The submission failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No tribute with this id.
    #[error("Victim not found: {id}")]
    NotFound {
        /// The id that was looked up.
        id: String,
    },

    /// A stored value could not be read back.
    #[error("Corrupt row for {id}: {message}")]
    Corrupt {
        /// Row id.
        id: String,
        /// Description of what went wrong.
        message: String,
    },

    /// Another thread panicked while holding the connection.
    #[error("Database connection lock poisoned")]
    LockPoisoned,
}
