//! The `Validator`: built-in rules plus a registry of named custom rules.
//!
//! Request types describe their rules as `(field, tag)` pairs through
//! [`Validate`] and hand out type-erased [`FieldRef`]s, so one validator
//! instance can check any request type. Build it once at startup and share it.

use std::collections::HashMap;
use std::sync::Arc;

use super::error::{FieldError, RuleError, SchemaError, ValidationError, ValidationErrors, Violation};
use super::rule::{parse_tag, Rule};
use super::value::FieldRef;

/// A request type the validator can check
pub trait Validate {
    /// `(field name, rule tag)` pairs in declared field order
    fn rules() -> &'static [(&'static str, &'static str)];

    /// Type-erased access to one field, `None` for unknown names
    fn field(&self, name: &str) -> Option<FieldRef<'_>>;
}

/// Input of a custom rule
pub struct RuleContext<'a> {
    pub field: &'a str,
    pub value: &'a FieldRef<'a>,
    pub param: &'a str,
}

/// A rule registered under a name
pub trait CustomRule: Send + Sync {
    /// Check the tag parameter; called before every evaluation and by
    /// [`Validator::check_schema`]
    ///
    /// # Errors
    ///
    /// Returns `SchemaError` when the parameter cannot be used.
    fn check_param(&self, _param: &str) -> Result<(), SchemaError> {
        Ok(())
    }

    /// Evaluate the rule against one field
    ///
    /// # Errors
    ///
    /// Returns `RuleError::Violation` when the value is rejected.
    fn validate(&self, validator: &Validator, ctx: &RuleContext<'_>) -> Result<(), RuleError>;
}

/// Rule evaluator shared by all request handlers
#[derive(Default, Clone)]
pub struct Validator {
    custom: HashMap<String, Arc<dyn CustomRule>>,
}

impl std::fmt::Debug for Validator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&str> = self.custom.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("Validator").field("custom", &names).finish()
    }
}

impl Validator {
    /// Validator with only the built-in rules
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) a custom rule under `name`
    pub fn register_validation(&mut self, name: &str, rule: impl CustomRule + 'static) {
        log::debug!("Registering validation rule {}", name);
        self.custom.insert(name.to_string(), Arc::new(rule));
    }

    #[must_use]
    pub fn has_rule(&self, name: &str) -> bool {
        self.custom.contains_key(name)
    }

    /// Check that every rule tag of `T` parses and refers to known rules
    ///
    /// # Errors
    ///
    /// Returns the first `SchemaError` found.
    pub fn check_schema<T: Validate>(&self) -> Result<(), SchemaError> {
        for (_, tag) in T::rules() {
            for rule in parse_tag(tag)? {
                if let Rule::Custom { name, param } = &rule {
                    self.custom_rule(name)?.check_param(param)?;
                }
            }
        }
        Ok(())
    }

    /// Validate every declared field of `input`, collecting all failures
    ///
    /// Each field reports at most its first failing rule.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::Failed` with every failing field, or
    /// `ValidationError::Schema` when a rule tag is broken.
    pub fn validate<T: Validate>(&self, input: &T) -> Result<(), ValidationError> {
        let mut errors = Vec::new();
        for (name, tag) in T::rules() {
            let rules = parse_tag(tag)?;
            let value = input
                .field(name)
                .ok_or_else(|| SchemaError::UnknownField((*name).to_string()))?;
            match self.apply_rules(name, &value, &rules) {
                Ok(()) => {}
                Err(RuleError::Violation(v)) => errors.push(FieldError::new(name, &v)),
                Err(RuleError::Schema(e)) => return Err(ValidationError::Schema(e)),
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            log::debug!("Validation rejected {} field(s)", errors.len());
            Err(ValidationError::Failed(ValidationErrors(errors)))
        }
    }

    /// Evaluate `rules` in order against one field; the first failure wins
    ///
    /// # Errors
    ///
    /// Returns the first `RuleError` produced.
    pub fn apply_rules(&self, field: &str, value: &FieldRef<'_>, rules: &[Rule]) -> Result<(), RuleError> {
        for rule in rules {
            match rule {
                Rule::OmitEmpty => {
                    if value.is_missing() {
                        return Ok(());
                    }
                }
                Rule::Custom { name, param } => {
                    let custom = self.custom_rule(name)?;
                    custom.check_param(param)?;
                    custom.validate(
                        self,
                        &RuleContext {
                            field,
                            value,
                            param,
                        },
                    )?;
                }
                builtin => {
                    if !builtin.check(value) {
                        return Err(Violation::new(builtin.name(), builtin.param(), value.kind()).into());
                    }
                }
            }
        }
        Ok(())
    }

    fn custom_rule(&self, name: &str) -> Result<&Arc<dyn CustomRule>, SchemaError> {
        self.custom
            .get(name)
            .ok_or_else(|| SchemaError::UnknownRule(name.to_string()))
    }
}
