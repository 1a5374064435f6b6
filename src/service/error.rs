//! Handler-level errors and their HTTP rendering.

use serde::Serialize;
use serde_json::json;

use crate::patch::PatchError;
use crate::store::StoreError;
use crate::validation::{FieldError, ValidationError, ValidationErrors};

/// Error returned by every `UserService` operation
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// Path id is not a positive integer
    InvalidId(String),
    /// Body is not JSON of the expected shape; validation never ran
    MalformedInput {
        field: Option<String>,
        message: String,
    },
    /// One or more fields failed their rules
    ValidationFailed(ValidationErrors),
    /// Patch body had no recognized field
    EmptyPatch,
    NotFound,
    /// Email already registered
    Conflict(String),
    StorageFailure(String),
    /// A request type's rule tags could not be evaluated
    InvalidSchema(String),
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: String,
    errors: &'a [FieldError],
}

impl ApiError {
    #[must_use]
    pub fn status(&self) -> u16 {
        match self {
            ApiError::InvalidId(_)
            | ApiError::MalformedInput { .. }
            | ApiError::ValidationFailed(_)
            | ApiError::EmptyPatch => 400,
            ApiError::NotFound => 404,
            ApiError::Conflict(_) => 409,
            ApiError::StorageFailure(_) | ApiError::InvalidSchema(_) => 500,
        }
    }

    /// Short label used for metrics and logs
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::InvalidId(_) => "invalid_id",
            ApiError::MalformedInput { .. } => "malformed_input",
            ApiError::ValidationFailed(_) => "validation_failed",
            ApiError::EmptyPatch => "empty_patch",
            ApiError::NotFound => "not_found",
            ApiError::Conflict(_) => "conflict",
            ApiError::StorageFailure(_) => "storage_failure",
            ApiError::InvalidSchema(_) => "invalid_schema",
        }
    }

    /// `{"error": <summary>, "errors": [{field, rule, message}, ...]}`
    #[must_use]
    pub fn body(&self) -> serde_json::Value {
        let field_errors: Vec<FieldError> = match self {
            ApiError::ValidationFailed(errors) => errors.0.clone(),
            ApiError::MalformedInput {
                field: Some(field),
                message,
            } => vec![FieldError {
                field: field.clone(),
                rule: "type".to_string(),
                param: String::new(),
                message: message.clone(),
            }],
            ApiError::EmptyPatch => vec![FieldError {
                field: String::new(),
                rule: "empty".to_string(),
                param: String::new(),
                message: self.summary(),
            }],
            _ => Vec::new(),
        };
        serde_json::to_value(ErrorBody {
            error: self.summary(),
            errors: &field_errors,
        })
        .unwrap_or_else(|_| json!({ "error": self.summary(), "errors": [] }))
    }

    fn summary(&self) -> String {
        match self {
            ApiError::InvalidId(raw) => format!("Invalid user ID: {}", raw),
            ApiError::MalformedInput { field: None, message } => {
                format!("Invalid request body: {}", message)
            }
            ApiError::MalformedInput { field: Some(field), .. } => {
                format!("Invalid request body: field {} has the wrong type", field)
            }
            ApiError::ValidationFailed(_) => "Validation failed".to_string(),
            ApiError::EmptyPatch => "No fields to update".to_string(),
            ApiError::NotFound => "User not found".to_string(),
            ApiError::Conflict(message) => message.clone(),
            ApiError::StorageFailure(message) => format!("Storage failure: {}", message),
            ApiError::InvalidSchema(message) => format!("Invalid validation schema: {}", message),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::ValidationFailed(errors) => write!(f, "{}", errors),
            other => write!(f, "{}", other.summary()),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<PatchError> for ApiError {
    fn from(err: PatchError) -> Self {
        match err {
            PatchError::Malformed { field, message } => ApiError::MalformedInput { field, message },
            PatchError::Empty => ApiError::EmptyPatch,
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::Failed(errors) => ApiError::ValidationFailed(errors),
            ValidationError::Schema(e) => {
                log::error!("Rule schema error: {}", e);
                ApiError::InvalidSchema(e.to_string())
            }
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => ApiError::NotFound,
            StoreError::Conflict(message) => ApiError::Conflict(message),
            other => {
                log::error!("Storage failure: {}", other);
                ApiError::StorageFailure(other.to_string())
            }
        }
    }
}
