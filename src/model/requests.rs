//! Request bodies accepted by the user handlers.

use serde::Deserialize;
use serde_json::{Map, Value as JsonValue};

use super::user::{NewUser, UserColumn};
use crate::patch::{Optional, PatchError, PatchRequest, UpdateMapping};
use crate::validation::{FieldRef, Validate};

const DEFAULT_ROLE: &str = "user";

/// Partial update of a user; every field is tri-state
///
/// `id` and `email` have no field: they can never be patched, and keys for
/// them in a body are ignored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatchUserRequest {
    pub name: Optional<String>,
    pub age: Optional<i32>,
    pub phone: Optional<String>,
    pub active: Optional<bool>,
    pub bio: Optional<String>,
    pub role: Optional<String>,
    pub score: Optional<f64>,
}

const PATCH_FIELDS: [&str; 7] = ["name", "age", "phone", "active", "bio", "role", "score"];

impl PatchUserRequest {
    /// Decode a raw request body
    ///
    /// # Errors
    ///
    /// Returns `PatchError::Malformed` when the body is not a JSON object or a
    /// present field does not decode as its type.
    pub fn from_slice(body: &[u8]) -> Result<Self, PatchError> {
        let value: JsonValue =
            serde_json::from_slice(body).map_err(|e| PatchError::malformed(None, e.to_string()))?;
        Self::from_json(&value)
    }

    /// Decode an already parsed JSON document
    ///
    /// # Errors
    ///
    /// See [`PatchUserRequest::from_slice`].
    pub fn from_json(value: &JsonValue) -> Result<Self, PatchError> {
        let object = value
            .as_object()
            .ok_or_else(|| PatchError::malformed(None, "request body must be a JSON object"))?;
        log_ignored_keys(object);
        Ok(Self {
            name: Optional::from_field(object, "name")?,
            age: Optional::from_field(object, "age")?,
            phone: Optional::from_field(object, "phone")?,
            active: Optional::from_field(object, "active")?,
            bio: Optional::from_field(object, "bio")?,
            role: Optional::from_field(object, "role")?,
            score: Optional::from_field(object, "score")?,
        })
    }
}

fn log_ignored_keys(object: &Map<String, JsonValue>) {
    for key in object.keys() {
        if !PATCH_FIELDS.contains(&key.as_str()) {
            log::debug!("Ignoring non-patchable key {} in patch body", key);
        }
    }
}

impl Validate for PatchUserRequest {
    fn rules() -> &'static [(&'static str, &'static str)] {
        &[
            ("name", "opt=min=2;max=100,nonull"),
            ("age", "opt=gte=0;lte=150"),
            ("phone", "opt=min=10;max=20"),
            ("active", "opt"),
            ("bio", "opt=max=500"),
            ("role", "opt=oneof=admin user guest"),
            ("score", "opt=gte=0;lte=100"),
        ]
    }

    fn field(&self, name: &str) -> Option<FieldRef<'_>> {
        match name {
            "name" => Some(FieldRef::tristate(&self.name)),
            "age" => Some(FieldRef::tristate(&self.age)),
            "phone" => Some(FieldRef::tristate(&self.phone)),
            "active" => Some(FieldRef::tristate(&self.active)),
            "bio" => Some(FieldRef::tristate(&self.bio)),
            "role" => Some(FieldRef::tristate(&self.role)),
            "score" => Some(FieldRef::tristate(&self.score)),
            _ => None,
        }
    }
}

impl PatchRequest for PatchUserRequest {
    type Column = UserColumn;

    fn collect_updates(&self, mapping: &mut UpdateMapping<UserColumn>) {
        mapping.set_update(UserColumn::Name, &self.name);
        mapping.set_update(UserColumn::Age, &self.age);
        mapping.set_update(UserColumn::Phone, &self.phone);
        mapping.set_update(UserColumn::Active, &self.active);
        mapping.set_update(UserColumn::Bio, &self.bio);
        mapping.set_update(UserColumn::Role, &self.role);
        mapping.set_update(UserColumn::Score, &self.score);
    }
}

/// Body of `POST /users`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub age: Option<i32>,
    pub phone: Option<String>,
    pub active: Option<bool>,
    pub bio: String,
    pub role: String,
    pub score: f64,
}

impl CreateUserRequest {
    /// Decode a raw request body
    ///
    /// # Errors
    ///
    /// Returns `PatchError::Malformed` when the body is not a JSON object of
    /// the expected shape.
    pub fn from_slice(body: &[u8]) -> Result<Self, PatchError> {
        decode_object(body)
    }

    /// The record to insert, with defaults applied (`active` true, role `user`)
    #[must_use]
    pub fn into_new_user(self) -> NewUser {
        NewUser {
            name: self.name,
            email: self.email,
            age: self.age.unwrap_or_default(),
            phone: self.phone,
            active: self.active.unwrap_or(true),
            bio: self.bio,
            role: if self.role.is_empty() {
                DEFAULT_ROLE.to_string()
            } else {
                self.role
            },
            score: self.score,
        }
    }
}

impl Validate for CreateUserRequest {
    fn rules() -> &'static [(&'static str, &'static str)] {
        &[
            ("name", "required,min=2,max=100"),
            ("email", "required,email"),
            ("age", "required,gte=0,lte=150"),
            ("phone", "omitempty,min=10,max=20"),
            ("bio", "omitempty,max=500"),
            ("role", "omitempty,oneof=admin user guest"),
            ("score", "omitempty,gte=0,lte=100"),
        ]
    }

    fn field(&self, name: &str) -> Option<FieldRef<'_>> {
        match name {
            "name" => Some(FieldRef::value_of(&self.name)),
            "email" => Some(FieldRef::value_of(&self.email)),
            "age" => Some(FieldRef::nullable(&self.age)),
            "phone" => Some(FieldRef::nullable(&self.phone)),
            "bio" => Some(FieldRef::value_of(&self.bio)),
            "role" => Some(FieldRef::value_of(&self.role)),
            "score" => Some(FieldRef::value_of(&self.score)),
            _ => None,
        }
    }
}

/// Body of `PUT /users/{id}`: every mutable column is rewritten
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ReplaceUserRequest {
    pub name: String,
    pub age: Option<i32>,
    pub phone: Option<String>,
    pub active: Option<bool>,
    pub bio: String,
    pub role: String,
    pub score: Option<f64>,
}

impl ReplaceUserRequest {
    /// Decode a raw request body
    ///
    /// # Errors
    ///
    /// Returns `PatchError::Malformed` when the body is not a JSON object of
    /// the expected shape.
    pub fn from_slice(body: &[u8]) -> Result<Self, PatchError> {
        decode_object(body)
    }

    /// Assignments for every mutable column
    ///
    /// A field left out of the body writes its zero value.
    #[must_use]
    pub fn update_mapping(&self) -> UpdateMapping<UserColumn> {
        let mut mapping = UpdateMapping::new();
        mapping.set(UserColumn::Name, self.name.clone());
        mapping.set(UserColumn::Age, self.age.unwrap_or_default());
        mapping.set(UserColumn::Phone, sea_query::Value::String(self.phone.clone()));
        mapping.set(UserColumn::Active, self.active.unwrap_or_default());
        mapping.set(UserColumn::Bio, self.bio.clone());
        mapping.set(UserColumn::Role, self.role.clone());
        mapping.set(UserColumn::Score, self.score.unwrap_or_default());
        mapping
    }
}

impl Validate for ReplaceUserRequest {
    fn rules() -> &'static [(&'static str, &'static str)] {
        &[
            ("name", "required,min=2,max=100"),
            ("age", "required,gte=0,lte=150"),
            ("phone", "omitempty,min=10,max=20"),
            ("bio", "omitempty,max=500"),
            ("role", "required,oneof=admin user guest"),
            ("score", "required,gte=0,lte=100"),
        ]
    }

    fn field(&self, name: &str) -> Option<FieldRef<'_>> {
        match name {
            "name" => Some(FieldRef::value_of(&self.name)),
            "age" => Some(FieldRef::nullable(&self.age)),
            "phone" => Some(FieldRef::nullable(&self.phone)),
            "bio" => Some(FieldRef::value_of(&self.bio)),
            "role" => Some(FieldRef::value_of(&self.role)),
            "score" => Some(FieldRef::nullable(&self.score)),
            _ => None,
        }
    }
}

fn decode_object<T: serde::de::DeserializeOwned>(body: &[u8]) -> Result<T, PatchError> {
    let value: JsonValue =
        serde_json::from_slice(body).map_err(|e| PatchError::malformed(None, e.to_string()))?;
    if !value.is_object() {
        return Err(PatchError::malformed(None, "request body must be a JSON object"));
    }
    serde_json::from_value(value).map_err(|e| PatchError::malformed(None, e.to_string()))
}
