//! Fixed-size connection pool with round-robin dispatch.
//!
//! Every slot is a persistent `may_postgres` client opened at startup.
//! Clients are multiplexed, so a slot is never checked out: each call simply
//! goes to the next slot.

use std::sync::atomic::{AtomicUsize, Ordering};

use may_postgres::types::ToSql;
use may_postgres::Row;

use crate::connection::{connect, ConnectionError};
use crate::executor::{ExecError, MayPostgresExecutor, SqlExecutor};

pub struct PgPool {
    slots: Vec<MayPostgresExecutor>,
    next: AtomicUsize,
}

impl PgPool {
    /// Open `size` connections (at least one) to `url`
    ///
    /// # Errors
    ///
    /// Returns the first `ConnectionError`; connections already opened are
    /// dropped.
    pub fn connect(url: &str, size: usize) -> Result<Self, ConnectionError> {
        let size = size.max(1);
        let mut slots = Vec::with_capacity(size);
        for _ in 0..size {
            slots.push(MayPostgresExecutor::new(connect(url)?));
        }
        log::info!("Opened {} PostgreSQL connection(s)", size);
        Ok(Self::from_executors(slots))
    }

    fn from_executors(slots: Vec<MayPostgresExecutor>) -> Self {
        Self {
            slots,
            next: AtomicUsize::new(0),
        }
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.slots.len()
    }

    fn slot(&self) -> &MayPostgresExecutor {
        let i = self.next.fetch_add(1, Ordering::Relaxed) % self.slots.len();
        &self.slots[i]
    }

    /// Health of every slot, in slot order
    pub fn check_health(&self) -> Vec<Result<bool, ExecError>> {
        self.slots.iter().map(MayPostgresExecutor::check_health).collect()
    }
}

impl SqlExecutor for PgPool {
    fn execute(&self, query: &str, params: &[&dyn ToSql]) -> Result<u64, ExecError> {
        self.slot().execute(query, params)
    }

    fn query_one(&self, query: &str, params: &[&dyn ToSql]) -> Result<Row, ExecError> {
        self.slot().query_one(query, params)
    }

    fn query_all(&self, query: &str, params: &[&dyn ToSql]) -> Result<Vec<Row>, ExecError> {
        self.slot().query_all(query, params)
    }
}
