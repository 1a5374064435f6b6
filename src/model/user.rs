//! The `users` table: stored record, column identifiers, row mapping.

use sea_query::{Iden, Value};
use serde::{Deserialize, Serialize};

use crate::patch::PatchColumn;

/// Table identifier for `users`
#[derive(Copy, Clone, Debug)]
pub struct Users;

impl Iden for Users {
    fn unquoted(&self) -> &str {
        "users"
    }
}

/// Columns of the `users` table
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum UserColumn {
    Id,
    Name,
    Email,
    Age,
    Phone,
    Active,
    Bio,
    Role,
    Score,
}

impl UserColumn {
    /// Every column, in table order
    pub const ALL: [UserColumn; 9] = [
        UserColumn::Id,
        UserColumn::Name,
        UserColumn::Email,
        UserColumn::Age,
        UserColumn::Phone,
        UserColumn::Active,
        UserColumn::Bio,
        UserColumn::Role,
        UserColumn::Score,
    ];

    /// Columns a client may change after creation
    pub const MUTABLE: [UserColumn; 7] = [
        UserColumn::Name,
        UserColumn::Age,
        UserColumn::Phone,
        UserColumn::Active,
        UserColumn::Bio,
        UserColumn::Role,
        UserColumn::Score,
    ];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            UserColumn::Id => "id",
            UserColumn::Name => "name",
            UserColumn::Email => "email",
            UserColumn::Age => "age",
            UserColumn::Phone => "phone",
            UserColumn::Active => "active",
            UserColumn::Bio => "bio",
            UserColumn::Role => "role",
            UserColumn::Score => "score",
        }
    }
}

impl Iden for UserColumn {
    fn unquoted(&self) -> &str {
        self.as_str()
    }
}

impl PatchColumn for UserColumn {
    fn name(&self) -> &'static str {
        self.as_str()
    }

    fn is_mutable(&self) -> bool {
        !matches!(self, UserColumn::Id | UserColumn::Email)
    }

    fn is_nullable(&self) -> bool {
        matches!(self, UserColumn::Phone)
    }

    fn zero_value(&self) -> Value {
        match self {
            UserColumn::Id => Value::BigInt(Some(0)),
            UserColumn::Age => Value::Int(Some(0)),
            UserColumn::Active => Value::Bool(Some(false)),
            UserColumn::Score => Value::Double(Some(0.0)),
            UserColumn::Name | UserColumn::Email | UserColumn::Phone | UserColumn::Bio | UserColumn::Role => {
                Value::String(Some(String::new()))
            }
        }
    }

    fn null_value(&self) -> Value {
        match self {
            UserColumn::Id => Value::BigInt(None),
            UserColumn::Age => Value::Int(None),
            UserColumn::Active => Value::Bool(None),
            UserColumn::Score => Value::Double(None),
            UserColumn::Name | UserColumn::Email | UserColumn::Phone | UserColumn::Bio | UserColumn::Role => {
                Value::String(None)
            }
        }
    }
}

/// Error type for column-level access to a [`User`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// Value does not fit the column
    InvalidValueType {
        column: String,
        expected: String,
        actual: String,
    },
}

impl std::fmt::Display for ModelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelError::InvalidValueType {
                column,
                expected,
                actual,
            } => write!(
                f,
                "Invalid value type for column {}: expected {}, got {}",
                column, expected, actual
            ),
        }
    }
}

impl std::error::Error for ModelError {}

/// A stored user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub age: i32,
    /// Nullable: `null` in JSON when cleared
    pub phone: Option<String>,
    pub active: bool,
    pub bio: String,
    pub role: String,
    pub score: f64,
}

impl User {
    /// Value of one column
    #[must_use]
    pub fn get(&self, column: UserColumn) -> Value {
        match column {
            UserColumn::Id => Value::BigInt(Some(self.id)),
            UserColumn::Name => Value::String(Some(self.name.clone())),
            UserColumn::Email => Value::String(Some(self.email.clone())),
            UserColumn::Age => Value::Int(Some(self.age)),
            UserColumn::Phone => Value::String(self.phone.clone()),
            UserColumn::Active => Value::Bool(Some(self.active)),
            UserColumn::Bio => Value::String(Some(self.bio.clone())),
            UserColumn::Role => Value::String(Some(self.role.clone())),
            UserColumn::Score => Value::Double(Some(self.score)),
        }
    }

    /// Overwrite one column
    ///
    /// # Errors
    ///
    /// Returns `ModelError::InvalidValueType` when the value has the wrong
    /// type or is `NULL` for a non-nullable column; the record is unchanged.
    pub fn set(&mut self, column: UserColumn, value: Value) -> Result<(), ModelError> {
        match (column, value) {
            (UserColumn::Id, Value::BigInt(Some(v))) => self.id = v,
            (UserColumn::Name, Value::String(Some(v))) => self.name = v,
            (UserColumn::Email, Value::String(Some(v))) => self.email = v,
            (UserColumn::Age, Value::Int(Some(v))) => self.age = v,
            (UserColumn::Phone, Value::String(v)) => self.phone = v,
            (UserColumn::Active, Value::Bool(Some(v))) => self.active = v,
            (UserColumn::Bio, Value::String(Some(v))) => self.bio = v,
            (UserColumn::Role, Value::String(Some(v))) => self.role = v,
            (UserColumn::Score, Value::Double(Some(v))) => self.score = v,
            (column, other) => {
                return Err(ModelError::InvalidValueType {
                    column: column.as_str().to_string(),
                    expected: expected_type(column).to_string(),
                    actual: format!("{:?}", other),
                })
            }
        }
        Ok(())
    }

    /// Build a user from a `SELECT`/`RETURNING` row
    ///
    /// # Errors
    ///
    /// Returns the driver error when a column is missing or has the wrong type.
    pub fn from_row(row: &may_postgres::Row) -> Result<Self, may_postgres::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            age: row.try_get("age")?,
            phone: row.try_get("phone")?,
            active: row.try_get("active")?,
            bio: row.try_get("bio")?,
            role: row.try_get("role")?,
            score: row.try_get("score")?,
        })
    }
}

fn expected_type(column: UserColumn) -> &'static str {
    match column {
        UserColumn::Id => "BIGINT",
        UserColumn::Age => "INTEGER",
        UserColumn::Active => "BOOLEAN",
        UserColumn::Score => "DOUBLE PRECISION",
        UserColumn::Phone => "VARCHAR(20) or NULL",
        UserColumn::Name | UserColumn::Email | UserColumn::Bio | UserColumn::Role => "TEXT",
    }
}

/// Fields of a user about to be inserted
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub age: i32,
    pub phone: Option<String>,
    pub active: bool,
    pub bio: String,
    pub role: String,
    pub score: f64,
}

impl NewUser {
    /// Column/value pairs for an `INSERT`, in table order
    #[must_use]
    pub fn values(&self) -> Vec<(UserColumn, Value)> {
        vec![
            (UserColumn::Name, Value::String(Some(self.name.clone()))),
            (UserColumn::Email, Value::String(Some(self.email.clone()))),
            (UserColumn::Age, Value::Int(Some(self.age))),
            (UserColumn::Phone, Value::String(self.phone.clone())),
            (UserColumn::Active, Value::Bool(Some(self.active))),
            (UserColumn::Bio, Value::String(Some(self.bio.clone()))),
            (UserColumn::Role, Value::String(Some(self.role.clone()))),
            (UserColumn::Score, Value::Double(Some(self.score))),
        ]
    }

    /// The stored record once an id has been assigned
    #[must_use]
    pub fn into_user(self, id: i64) -> User {
        User {
            id,
            name: self.name,
            email: self.email,
            age: self.age,
            phone: self.phone,
            active: self.active,
            bio: self.bio,
            role: self.role,
            score: self.score,
        }
    }
}
