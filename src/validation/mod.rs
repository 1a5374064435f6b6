//! Request validation.
//!
//! Rules are declared per field as tags (`required,min=2`) and evaluated by a
//! [`Validator`]. Tri-state fields use the `opt` and `nonull` rules installed
//! by [`register_patch_validators`], which validate a field's content only
//! when it actually carries a value.

pub mod error;
pub mod patch_rules;
pub mod rule;
pub mod validator;
pub mod value;

pub use error::{FieldError, RuleError, SchemaError, ValidationError, ValidationErrors, Violation};
pub use patch_rules::register_patch_validators;
pub use rule::Rule;
pub use validator::{CustomRule, RuleContext, Validate, Validator};
pub use value::{AsRuleValue, FieldRef, RuleValue, ValueKind};
