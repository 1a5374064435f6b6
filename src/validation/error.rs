//! Validation failures and schema errors.

use serde::Serialize;

use super::value::ValueKind;

/// A rule that rejected a value
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    /// Name of the failing rule (for `opt`, the failing inner rule)
    pub rule: String,
    pub param: String,
    /// Kind of the rejected value, if there was one
    pub kind: Option<ValueKind>,
}

impl Violation {
    pub fn new(rule: impl Into<String>, param: impl Into<String>, kind: Option<ValueKind>) -> Self {
        Self {
            rule: rule.into(),
            param: param.into(),
            kind,
        }
    }
}

/// One failing field, as reported to clients
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub rule: String,
    #[serde(skip)]
    pub param: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, violation: &Violation) -> Self {
        Self {
            field: field.to_string(),
            rule: violation.rule.clone(),
            param: violation.param.clone(),
            message: message_for(field, violation),
        }
    }
}

/// User-facing message for a rule violation
fn message_for(field: &str, violation: &Violation) -> String {
    let p = &violation.param;
    let unit = match violation.kind {
        Some(ValueKind::Str) => " characters",
        _ => "",
    };
    match violation.rule.as_str() {
        "required" => format!("{field} is required"),
        "email" => format!("{field} must be a valid email address"),
        "min" => format!("{field} must be at least {p}{unit}"),
        "max" => format!("{field} must be at most {p}{unit}"),
        "gte" => format!("{field} must be greater than or equal to {p}"),
        "lte" => format!("{field} must be less than or equal to {p}"),
        "gt" => format!("{field} must be greater than {p}"),
        "lt" => format!("{field} must be less than {p}"),
        "oneof" => format!("{field} must be one of [{p}]"),
        "nonull" => format!("{field} cannot be null"),
        _ => format!("{field} is invalid"),
    }
}

/// Every failing field of one request
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// First error reported for `field`
    #[must_use]
    pub fn field(&self, field: &str) -> Option<&FieldError> {
        self.0.iter().find(|e| e.field == field)
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let messages: Vec<&str> = self.0.iter().map(|e| e.message.as_str()).collect();
        write!(f, "Validation failed: {}", messages.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// A rule tag that cannot be evaluated
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// Rule name neither built in nor registered
    UnknownRule(String),
    /// Missing or unparsable parameter
    InvalidParam { rule: String, param: String },
    /// Custom rule used inside `opt=...`
    NestedCustomRule(String),
    /// Rule tag names a field the request type does not expose
    UnknownField(String),
}

impl std::fmt::Display for SchemaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SchemaError::UnknownRule(name) => write!(f, "Unknown validation rule: {}", name),
            SchemaError::InvalidParam { rule, param } => {
                write!(f, "Invalid parameter '{}' for rule {}", param, rule)
            }
            SchemaError::NestedCustomRule(name) => {
                write!(f, "Rule {} cannot be used inside opt", name)
            }
            SchemaError::UnknownField(name) => write!(f, "Unknown field in rule schema: {}", name),
        }
    }
}

impl std::error::Error for SchemaError {}

/// Outcome of a rule evaluation that did not pass
#[derive(Debug, Clone, PartialEq)]
pub enum RuleError {
    Violation(Violation),
    Schema(SchemaError),
}

impl From<Violation> for RuleError {
    fn from(v: Violation) -> Self {
        RuleError::Violation(v)
    }
}

impl From<SchemaError> for RuleError {
    fn from(e: SchemaError) -> Self {
        RuleError::Schema(e)
    }
}

/// Error returned by `Validator::validate`
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// One or more fields failed their rules
    Failed(ValidationErrors),
    /// The request type's rule tags are broken
    Schema(SchemaError),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Failed(errors) => write!(f, "{}", errors),
            ValidationError::Schema(e) => write!(f, "Schema error: {}", e),
        }
    }
}

impl std::error::Error for ValidationError {}

impl From<SchemaError> for ValidationError {
    fn from(e: SchemaError) -> Self {
        ValidationError::Schema(e)
    }
}
