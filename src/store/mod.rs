//! Storage boundary for user records.
//!
//! - [`MemoryUserStore`]: process-local map, used for development and tests
//! - [`PgUserStore`]: PostgreSQL through a [`crate::pool::PgPool`]

pub mod memory;
pub mod postgres;

pub use memory::MemoryUserStore;
pub use postgres::PgUserStore;

use std::fmt;

use crate::executor::ExecError;
use crate::model::{ModelError, NewUser, User, UserColumn};
use crate::patch::UpdateMapping;

/// Storage error type
#[derive(Debug)]
pub enum StoreError {
    /// No record with this id
    NotFound(i64),
    /// Unique constraint violated (email)
    Conflict(String),
    /// Query failed
    Exec(ExecError),
    /// Stored data or an update did not fit the record
    Model(ModelError),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::NotFound(id) => write!(f, "User {} not found", id),
            StoreError::Conflict(s) => write!(f, "Conflict: {}", s),
            StoreError::Exec(e) => write!(f, "{}", e),
            StoreError::Model(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<ExecError> for StoreError {
    fn from(err: ExecError) -> Self {
        StoreError::Exec(err)
    }
}

impl From<ModelError> for StoreError {
    fn from(err: ModelError) -> Self {
        StoreError::Model(err)
    }
}

/// Persistence operations needed by the user handlers
pub trait UserStore: Send + Sync {
    /// # Errors
    ///
    /// `StoreError::NotFound` when no record has this id.
    fn find_by_id(&self, id: i64) -> Result<User, StoreError>;

    /// Every user, ordered by id
    ///
    /// # Errors
    ///
    /// Returns `StoreError` when the read fails.
    fn list(&self) -> Result<Vec<User>, StoreError>;

    /// Insert a record and return it with its assigned id
    ///
    /// # Errors
    ///
    /// `StoreError::Conflict` when the email is already taken.
    fn insert(&self, user: &NewUser) -> Result<User, StoreError>;

    /// Apply `mapping` to the record `id` in one write
    ///
    /// Returns the number of rows affected: 0 when the record does not exist.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` when the write fails.
    fn update_columns(&self, id: i64, mapping: &UpdateMapping<UserColumn>) -> Result<u64, StoreError>;
}
