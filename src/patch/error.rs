//! Error types for decoding and applying partial updates.

/// Error type for patch decoding and mapping
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchError {
    /// Body is not a JSON object, or a field failed to decode
    Malformed {
        /// Offending field, `None` when the body itself is unusable
        field: Option<String>,
        message: String,
    },
    /// Every field was absent; there is nothing to write
    Empty,
}

impl PatchError {
    pub(crate) fn malformed(field: Option<&str>, message: impl Into<String>) -> Self {
        PatchError::Malformed {
            field: field.map(str::to_string),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for PatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PatchError::Malformed {
                field: Some(field),
                message,
            } => write!(f, "Malformed field {}: {}", field, message),
            PatchError::Malformed { field: None, message } => {
                write!(f, "Malformed request body: {}", message)
            }
            PatchError::Empty => write!(f, "No fields to update"),
        }
    }
}

impl std::error::Error for PatchError {}
