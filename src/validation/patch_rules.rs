//! `opt` and `nonull`: presence-aware rules for tri-state fields.
//!
//! `opt=<inner rules>`
//! - unset => valid
//! - null  => valid (add `nonull` to forbid null)
//! - value => inner rules applied to the value
//!
//! Inner rules are semicolon-separated, e.g. `opt=min=2;max=100`.
//!
//! `nonull`
//! - unset => valid
//! - null  => invalid
//! - value => valid
//!
//! Both rules pass for fields that are not tri-state.

use super::error::{RuleError, SchemaError, Violation};
use super::rule::parse_inner;
use super::validator::{CustomRule, RuleContext, Validator};
use super::value::FieldRef;

/// Register `opt` and `nonull` on `validator`
pub fn register_patch_validators(validator: &mut Validator) {
    validator.register_validation("opt", OptRule);
    validator.register_validation("nonull", NoNullRule);
}

struct OptRule;

impl CustomRule for OptRule {
    fn check_param(&self, param: &str) -> Result<(), SchemaError> {
        parse_inner(param).map(drop)
    }

    fn validate(&self, validator: &Validator, ctx: &RuleContext<'_>) -> Result<(), RuleError> {
        let FieldRef::Tristate(field) = ctx.value else {
            return Ok(());
        };
        let Some(value) = field.any() else {
            return Ok(());
        };
        let rules = parse_inner(ctx.param)?;
        validator.apply_rules(ctx.field, &FieldRef::Value(value), &rules)
    }
}

struct NoNullRule;

impl CustomRule for NoNullRule {
    fn validate(&self, _validator: &Validator, ctx: &RuleContext<'_>) -> Result<(), RuleError> {
        match ctx.value {
            FieldRef::Tristate(field) if field.is_null() => Err(Violation::new("nonull", "", None).into()),
            _ => Ok(()),
        }
    }
}
