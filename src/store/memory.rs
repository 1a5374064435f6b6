//! In-memory `UserStore`.

use std::collections::BTreeMap;
use std::sync::Mutex;

use super::{StoreError, UserStore};
use crate::model::{NewUser, User, UserColumn};
use crate::patch::UpdateMapping;

#[derive(Default)]
struct Inner {
    users: BTreeMap<i64, User>,
    next_id: i64,
}

/// Mutex-guarded map keyed by id; ids start at 1
#[derive(Default)]
pub struct MemoryUserStore {
    inner: Mutex<Inner>,
}

impl MemoryUserStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // Writes are applied to a copy first; a poisoned map is still consistent.
        self.inner.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl UserStore for MemoryUserStore {
    fn find_by_id(&self, id: i64) -> Result<User, StoreError> {
        self.lock()
            .users
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    fn list(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.lock().users.values().cloned().collect())
    }

    fn insert(&self, user: &NewUser) -> Result<User, StoreError> {
        let mut inner = self.lock();
        if inner.users.values().any(|u| u.email == user.email) {
            return Err(StoreError::Conflict(format!(
                "email {} is already registered",
                user.email
            )));
        }
        inner.next_id += 1;
        let stored = user.clone().into_user(inner.next_id);
        inner.users.insert(stored.id, stored.clone());
        Ok(stored)
    }

    fn update_columns(&self, id: i64, mapping: &UpdateMapping<UserColumn>) -> Result<u64, StoreError> {
        let mut inner = self.lock();
        let Some(current) = inner.users.get(&id) else {
            return Ok(0);
        };
        let mut updated = current.clone();
        for (column, value) in mapping.values() {
            updated.set(column, value)?;
        }
        inner.users.insert(id, updated);
        Ok(1)
    }
}
