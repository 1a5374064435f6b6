//! Rule tags and the built-in rules.
//!
//! A rule tag is a comma-separated list of rules, each either a bare name
//! (`required`) or `name=param` (`min=2`). `oneof` takes a space-separated
//! list (`oneof=admin user guest`). Names the parser does not know become
//! [`Rule::Custom`] and are resolved against the validator's registry.

use once_cell::sync::Lazy;
use regex::Regex;

use super::error::SchemaError;
use super::value::{FieldRef, RuleValue};

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is a valid regex")
});

/// One parsed rule
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    /// Value must be present and non-zero
    Required,
    /// Skip the remaining rules when the value is missing
    OmitEmpty,
    /// Value must look like an email address
    Email,
    /// Length (strings) or value (numbers) at least `n`
    Min(f64),
    /// Length (strings) or value (numbers) at most `n`
    Max(f64),
    Gte(f64),
    Lte(f64),
    Gt(f64),
    Lt(f64),
    /// Value must be one of the listed words
    OneOf(Vec<String>),
    /// Rule registered on the validator
    Custom { name: String, param: String },
}

impl Rule {
    /// Name as written in the tag
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Rule::Required => "required",
            Rule::OmitEmpty => "omitempty",
            Rule::Email => "email",
            Rule::Min(_) => "min",
            Rule::Max(_) => "max",
            Rule::Gte(_) => "gte",
            Rule::Lte(_) => "lte",
            Rule::Gt(_) => "gt",
            Rule::Lt(_) => "lt",
            Rule::OneOf(_) => "oneof",
            Rule::Custom { name, .. } => name,
        }
    }

    /// Parameter as written in the tag, empty for bare rules
    #[must_use]
    pub fn param(&self) -> String {
        match self {
            Rule::Required | Rule::OmitEmpty | Rule::Email => String::new(),
            Rule::Min(n) | Rule::Max(n) | Rule::Gte(n) | Rule::Lte(n) | Rule::Gt(n) | Rule::Lt(n) => {
                n.to_string()
            }
            Rule::OneOf(words) => words.join(" "),
            Rule::Custom { param, .. } => param.clone(),
        }
    }

    /// Evaluate a built-in rule
    ///
    /// Rules other than `required` pass when there is no value to inspect.
    /// `omitempty` and custom rules are handled by the validator and always
    /// pass here.
    #[must_use]
    pub fn check(&self, field: &FieldRef<'_>) -> bool {
        if let Rule::Required = self {
            return !field.is_missing();
        }
        match field.value() {
            Some(value) => self.check_value(value),
            None => true,
        }
    }

    fn check_value(&self, value: RuleValue<'_>) -> bool {
        let bound = |n: &f64, cmp: fn(f64, f64) -> bool| match value.measure() {
            Some(m) => cmp(m, *n),
            None => true,
        };
        match self {
            Rule::Required | Rule::OmitEmpty | Rule::Custom { .. } => true,
            Rule::Email => match value {
                RuleValue::Str(s) => EMAIL_RE.is_match(s),
                _ => false,
            },
            Rule::Min(n) | Rule::Gte(n) => bound(n, |m, n| m >= n),
            Rule::Max(n) | Rule::Lte(n) => bound(n, |m, n| m <= n),
            Rule::Gt(n) => bound(n, |m, n| m > n),
            Rule::Lt(n) => bound(n, |m, n| m < n),
            Rule::OneOf(words) => {
                let text = value.to_text();
                words.iter().any(|w| *w == text)
            }
        }
    }
}

/// Parse a top-level rule tag
///
/// # Errors
///
/// Returns `SchemaError::InvalidParam` when a built-in rule has a missing or
/// unparsable parameter.
pub fn parse_tag(tag: &str) -> Result<Vec<Rule>, SchemaError> {
    tag.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(parse_rule)
        .collect()
}

/// Parse the semicolon-separated inner rules of `opt=...`
///
/// Only built-in rules are allowed inside.
///
/// # Errors
///
/// Returns `SchemaError::NestedCustomRule` for a non-built-in rule, or
/// `SchemaError::InvalidParam` for a bad parameter.
pub fn parse_inner(param: &str) -> Result<Vec<Rule>, SchemaError> {
    let rules = parse_tag(&param.replace(';', ","))?;
    if let Some(Rule::Custom { name, .. }) = rules.iter().find(|r| matches!(r, Rule::Custom { .. })) {
        return Err(SchemaError::NestedCustomRule(name.clone()));
    }
    Ok(rules)
}

fn parse_rule(part: &str) -> Result<Rule, SchemaError> {
    let (name, param) = match part.split_once('=') {
        Some((name, param)) => (name.trim(), param.trim()),
        None => (part, ""),
    };
    let number = || {
        param.parse::<f64>().map_err(|_| SchemaError::InvalidParam {
            rule: name.to_string(),
            param: param.to_string(),
        })
    };
    let rule = match name {
        "required" => Rule::Required,
        "omitempty" => Rule::OmitEmpty,
        "email" => Rule::Email,
        "min" => Rule::Min(number()?),
        "max" => Rule::Max(number()?),
        "gte" => Rule::Gte(number()?),
        "lte" => Rule::Lte(number()?),
        "gt" => Rule::Gt(number()?),
        "lt" => Rule::Lt(number()?),
        "oneof" => {
            let words: Vec<String> = param.split_whitespace().map(str::to_string).collect();
            if words.is_empty() {
                return Err(SchemaError::InvalidParam {
                    rule: name.to_string(),
                    param: param.to_string(),
                });
            }
            Rule::OneOf(words)
        }
        _ => Rule::Custom {
            name: name.to_string(),
            param: param.to_string(),
        },
    };
    Ok(rule)
}
