//! User operations: the tri-state PATCH flow plus plain CRUD.

pub mod error;

pub use error::ApiError;

use std::sync::Arc;

use crate::model::{CreateUserRequest, PatchUserRequest, ReplaceUserRequest, User};
use crate::patch::PatchRequest;
use crate::store::UserStore;
use crate::validation::{register_patch_validators, SchemaError, Validator};

/// Validator with the patch rules installed and every request schema checked
///
/// # Errors
///
/// Returns the first `SchemaError` found in a request type's rule tags.
pub fn build_validator() -> Result<Validator, SchemaError> {
    let mut validator = Validator::new();
    register_patch_validators(&mut validator);
    validator.check_schema::<PatchUserRequest>()?;
    validator.check_schema::<CreateUserRequest>()?;
    validator.check_schema::<ReplaceUserRequest>()?;
    Ok(validator)
}

/// Request handlers, independent of the transport
#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn UserStore>,
    validator: Arc<Validator>,
}

impl UserService {
    pub fn new(store: Arc<dyn UserStore>, validator: Arc<Validator>) -> Self {
        Self { store, validator }
    }

    /// # Errors
    ///
    /// `ApiError::NotFound` for an unknown id.
    pub fn get_user(&self, id: i64) -> Result<User, ApiError> {
        Ok(self.store.find_by_id(id)?)
    }

    /// # Errors
    ///
    /// `ApiError::StorageFailure` when the read fails.
    pub fn list_users(&self) -> Result<Vec<User>, ApiError> {
        Ok(self.store.list()?)
    }

    /// Decode, validate and insert a new user
    ///
    /// # Errors
    ///
    /// `MalformedInput`, `ValidationFailed`, or `Conflict` for a taken email.
    pub fn create_user(&self, body: &[u8]) -> Result<User, ApiError> {
        let request = CreateUserRequest::from_slice(body)?;
        self.validator.validate(&request)?;
        let user = self.store.insert(&request.into_new_user())?;
        log::info!("Created user {}", user.id);
        Ok(user)
    }

    /// Rewrite every mutable column of an existing user
    ///
    /// # Errors
    ///
    /// `MalformedInput`, `ValidationFailed`, or `NotFound` when no row was
    /// written.
    pub fn replace_user(&self, id: i64, body: &[u8]) -> Result<User, ApiError> {
        let request = ReplaceUserRequest::from_slice(body)?;
        self.validator.validate(&request)?;
        if self.store.update_columns(id, &request.update_mapping())? == 0 {
            return Err(ApiError::NotFound);
        }
        log::info!("Replaced user {}", id);
        self.get_user(id)
    }

    /// Apply a tri-state partial update
    ///
    /// 1. the user must exist (checked before the body is looked at)
    /// 2. decode every field as unset, null or value
    /// 3. validate; rules only see fields that carry a value
    /// 4. build the sparse update mapping; nothing present is an error
    /// 5. write the mapping in one conditional update
    /// 6. re-read and return the stored record
    ///
    /// # Errors
    ///
    /// `NotFound`, `MalformedInput`, `ValidationFailed`, `EmptyPatch` or
    /// `StorageFailure`. The record is unchanged on every error.
    pub fn patch_user(&self, id: i64, body: &[u8]) -> Result<User, ApiError> {
        self.store.find_by_id(id)?;

        let request = PatchUserRequest::from_slice(body)?;
        self.validator.validate(&request)?;
        let mapping = request.update_mapping()?;

        log::debug!(
            "Patching user {}: {}",
            id,
            mapping.columns().collect::<Vec<_>>().join(", ")
        );
        if self.store.update_columns(id, &mapping)? == 0 {
            log::warn!("User {} disappeared before the patch was written", id);
            return Err(ApiError::NotFound);
        }
        self.get_user(id)
    }
}
