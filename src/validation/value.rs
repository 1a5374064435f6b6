//! Untyped field values as seen by validation rules.

use crate::patch::OptionalAny;

/// A field value stripped of its static type
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RuleValue<'a> {
    Str(&'a str),
    Int(i64),
    Float(f64),
    Bool(bool),
}

/// Broad value category, used to phrase messages ("characters" vs plain numbers)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Str,
    Number,
    Bool,
}

impl RuleValue<'_> {
    /// Go-style zero value: `""`, `0`, `0.0`, `false`
    #[must_use]
    pub fn is_zero(&self) -> bool {
        match self {
            RuleValue::Str(s) => s.is_empty(),
            RuleValue::Int(i) => *i == 0,
            RuleValue::Float(f) => *f == 0.0,
            RuleValue::Bool(b) => !*b,
        }
    }

    #[must_use]
    pub fn kind(&self) -> ValueKind {
        match self {
            RuleValue::Str(_) => ValueKind::Str,
            RuleValue::Int(_) | RuleValue::Float(_) => ValueKind::Number,
            RuleValue::Bool(_) => ValueKind::Bool,
        }
    }

    /// Magnitude compared by bound rules: character count for strings,
    /// the number itself otherwise
    #[must_use]
    pub fn measure(&self) -> Option<f64> {
        match self {
            RuleValue::Str(s) => Some(s.chars().count() as f64),
            RuleValue::Int(i) => Some(*i as f64),
            RuleValue::Float(f) => Some(*f),
            RuleValue::Bool(_) => None,
        }
    }

    /// Textual form compared by `oneof`
    #[must_use]
    pub fn to_text(&self) -> String {
        match self {
            RuleValue::Str(s) => (*s).to_string(),
            RuleValue::Int(i) => i.to_string(),
            RuleValue::Float(f) => f.to_string(),
            RuleValue::Bool(b) => b.to_string(),
        }
    }
}

/// Types that can be handed to validation rules
pub trait AsRuleValue {
    fn as_rule_value(&self) -> RuleValue<'_>;
}

impl AsRuleValue for String {
    fn as_rule_value(&self) -> RuleValue<'_> {
        RuleValue::Str(self)
    }
}

impl AsRuleValue for i32 {
    fn as_rule_value(&self) -> RuleValue<'_> {
        RuleValue::Int(i64::from(*self))
    }
}

impl AsRuleValue for i64 {
    fn as_rule_value(&self) -> RuleValue<'_> {
        RuleValue::Int(*self)
    }
}

impl AsRuleValue for f64 {
    fn as_rule_value(&self) -> RuleValue<'_> {
        RuleValue::Float(*self)
    }
}

impl AsRuleValue for bool {
    fn as_rule_value(&self) -> RuleValue<'_> {
        RuleValue::Bool(*self)
    }
}

/// One request field, as handed to the validator
pub enum FieldRef<'a> {
    /// Plain value; "missing" means the zero value
    Value(RuleValue<'a>),
    /// Plain `Option`; "missing" means `None`
    Nullable(Option<RuleValue<'a>>),
    /// Tri-state field
    Tristate(&'a dyn OptionalAny),
}

impl<'a> FieldRef<'a> {
    pub fn value_of<T: AsRuleValue>(value: &'a T) -> Self {
        FieldRef::Value(value.as_rule_value())
    }

    pub fn nullable<T: AsRuleValue>(value: &'a Option<T>) -> Self {
        FieldRef::Nullable(value.as_ref().map(AsRuleValue::as_rule_value))
    }

    pub fn tristate(value: &'a dyn OptionalAny) -> Self {
        FieldRef::Tristate(value)
    }

    /// The value rules are evaluated against, if there is one
    #[must_use]
    pub fn value(&self) -> Option<RuleValue<'_>> {
        match self {
            FieldRef::Value(v) => Some(*v),
            FieldRef::Nullable(v) => *v,
            FieldRef::Tristate(t) => t.any(),
        }
    }

    /// What `required` rejects and `omitempty` skips
    #[must_use]
    pub fn is_missing(&self) -> bool {
        match self {
            FieldRef::Value(v) => v.is_zero(),
            FieldRef::Nullable(v) => v.is_none(),
            FieldRef::Tristate(t) => t.any().is_none(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> Option<ValueKind> {
        self.value().map(|v| v.kind())
    }
}
