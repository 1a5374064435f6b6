//! `Optional` tri-state field container.
//!
//! A PATCH body has to tell three situations apart for every field: the key
//! was left out (keep the stored value), the key was sent as `null` (clear the
//! stored value), or the key carries a value (overwrite). `Option<T>` can only
//! express two of these, so request types use [`Optional`] instead.
//!
//! # Example
//!
//! ```
//! use userpatch::patch::Optional;
//!
//! let body: serde_json::Value = serde_json::json!({ "name": "Ada", "phone": null });
//! let object = body.as_object().unwrap();
//!
//! let name = Optional::<String>::from_field(object, "name").unwrap();
//! let phone = Optional::<String>::from_field(object, "phone").unwrap();
//! let bio = Optional::<String>::from_field(object, "bio").unwrap();
//!
//! assert_eq!(name.value().map(String::as_str), Some("Ada"));
//! assert!(phone.is_null());
//! assert!(bio.is_unset());
//! ```

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value as JsonValue};

use super::error::PatchError;
use crate::validation::{AsRuleValue, RuleValue};

/// Tri-state wrapper for a single request field.
///
/// - `Unset`: the key did not appear in the JSON object
/// - `Null`: the key appeared with a literal `null`
/// - `Value(v)`: the key appeared with a value that decoded as `T`
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Optional<T> {
    /// Field absent from the request
    #[default]
    Unset,
    /// Field present and explicitly `null`
    Null,
    /// Field present with a value
    Value(T),
}

impl<T> Optional<T> {
    /// `true` when the key appeared in the request, including as `null`
    #[must_use]
    pub fn is_present(&self) -> bool {
        !matches!(self, Optional::Unset)
    }

    /// `true` only when the key appeared with a literal `null`
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Optional::Null)
    }

    /// `true` when the key was absent
    #[must_use]
    pub fn is_unset(&self) -> bool {
        matches!(self, Optional::Unset)
    }

    /// The carried value, `Some` only in the `Value` state
    #[must_use]
    pub fn value(&self) -> Option<&T> {
        match self {
            Optional::Value(v) => Some(v),
            Optional::Unset | Optional::Null => None,
        }
    }

    /// Consume the container, returning the carried value if any
    #[must_use]
    pub fn into_value(self) -> Option<T> {
        match self {
            Optional::Value(v) => Some(v),
            Optional::Unset | Optional::Null => None,
        }
    }
}

impl<T: Default + Clone> Optional<T> {
    /// The carried value, or the type's zero value for `Null` and `Unset`
    ///
    /// A `Null` field stands for "reset to zero" on columns that cannot hold
    /// SQL `NULL`; this is the value written in that case.
    #[must_use]
    pub fn value_or_zero(&self) -> T {
        self.value().cloned().unwrap_or_default()
    }
}

impl<T: DeserializeOwned> Optional<T> {
    /// Decode the field `key` of a JSON object
    ///
    /// # Errors
    ///
    /// Returns `PatchError::Malformed` naming `key` when the value is present,
    /// not `null`, and does not decode as `T`.
    pub fn from_field(object: &Map<String, JsonValue>, key: &str) -> Result<Self, PatchError> {
        match object.get(key) {
            None => Ok(Optional::Unset),
            Some(raw) => Optional::<T>::deserialize(raw)
                .map_err(|e| PatchError::malformed(Some(key), e.to_string())),
        }
    }
}

impl<T> From<Option<T>> for Optional<T> {
    /// `None` becomes `Null`: an `Option` can only come from a present key.
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Optional::Value(v),
            None => Optional::Null,
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Optional<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Only reached when the key is present; an absent key falls back to
        // `Default` (`Unset`) through `#[serde(default)]`.
        Option::<T>::deserialize(deserializer).map(Optional::from)
    }
}

impl<T: Serialize> Serialize for Optional<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Optional::Value(v) => serializer.serialize_some(v),
            Optional::Unset | Optional::Null => serializer.serialize_none(),
        }
    }
}

impl<T: fmt::Debug> fmt::Display for Optional<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Optional::Unset => write!(f, "unset"),
            Optional::Null => write!(f, "null"),
            Optional::Value(v) => write!(f, "value({v:?})"),
        }
    }
}

/// Type-erased view of an [`Optional`], used by the validator
///
/// Validation rules are declared per field name and evaluated without knowing
/// the field's static type; this trait exposes the presence state and the
/// carried value in a form the rules can inspect.
pub trait OptionalAny {
    /// Field present in the request (including as `null`)
    fn is_set(&self) -> bool;
    /// Field present and `null`
    fn is_null(&self) -> bool;
    /// The carried value, `None` for `Unset` and `Null`
    fn any(&self) -> Option<RuleValue<'_>>;
}

impl<T: AsRuleValue> OptionalAny for Optional<T> {
    fn is_set(&self) -> bool {
        self.is_present()
    }

    fn is_null(&self) -> bool {
        Optional::is_null(self)
    }

    fn any(&self) -> Option<RuleValue<'_>> {
        self.value().map(AsRuleValue::as_rule_value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Default, Deserialize, Serialize)]
    struct Body {
        #[serde(default, skip_serializing_if = "Optional::is_unset")]
        name: Optional<String>,
        #[serde(default, skip_serializing_if = "Optional::is_unset")]
        age: Optional<i32>,
    }

    fn object(value: JsonValue) -> Map<String, JsonValue> {
        value.as_object().cloned().expect("test body must be an object")
    }

    #[test]
    fn test_absent_key_is_unset() {
        let obj = object(json!({}));
        let name = Optional::<String>::from_field(&obj, "name").unwrap();
        assert!(name.is_unset());
        assert!(!name.is_present());
        assert!(!name.is_null());
        assert_eq!(name.value(), None);
    }

    #[test]
    fn test_null_key_is_null_with_zero_value() {
        let obj = object(json!({ "age": null }));
        let age = Optional::<i32>::from_field(&obj, "age").unwrap();
        assert!(age.is_present());
        assert!(age.is_null());
        assert_eq!(age.value(), None);
        assert_eq!(age.value_or_zero(), 0);
    }

    #[test]
    fn test_value_key_carries_value() {
        let obj = object(json!({ "age": 42 }));
        let age = Optional::<i32>::from_field(&obj, "age").unwrap();
        assert!(age.is_present());
        assert!(!age.is_null());
        assert_eq!(age.value(), Some(&42));
        assert_eq!(age.into_value(), Some(42));
    }

    #[test]
    fn test_decode_failure_names_the_field() {
        let obj = object(json!({ "age": "forty" }));
        let err = Optional::<i32>::from_field(&obj, "age").unwrap_err();
        match err {
            PatchError::Malformed { field, .. } => assert_eq!(field.as_deref(), Some("age")),
            other => panic!("expected Malformed, got {other:?}"),
        }
    }

    #[test]
    fn test_fractional_number_is_not_an_integer() {
        let obj = object(json!({ "age": 30.5 }));
        assert!(Optional::<i32>::from_field(&obj, "age").is_err());
    }

    #[test]
    fn test_serde_derive_distinguishes_states() {
        let body: Body = serde_json::from_value(json!({ "name": null })).unwrap();
        assert!(body.name.is_null());
        assert!(body.age.is_unset());

        let body: Body = serde_json::from_value(json!({ "age": 7 })).unwrap();
        assert!(body.name.is_unset());
        assert_eq!(body.age, Optional::Value(7));
    }

    #[test]
    fn test_serialize_skips_unset_and_keeps_null() {
        let body = Body {
            name: Optional::Null,
            age: Optional::Unset,
        };
        assert_eq!(serde_json::to_value(&body).unwrap(), json!({ "name": null }));
    }

    #[test]
    fn test_optional_any_hides_value_for_null() {
        let null: Optional<String> = Optional::Null;
        assert!(OptionalAny::is_set(&null));
        assert!(OptionalAny::is_null(&null));
        assert!(null.any().is_none());

        let unset: Optional<String> = Optional::Unset;
        assert!(!unset.is_set());
        assert!(unset.any().is_none());

        let value = Optional::Value("abc".to_string());
        assert_eq!(value.any(), Some(RuleValue::Str("abc")));
    }

    #[test]
    fn test_display() {
        assert_eq!(Optional::<i32>::Unset.to_string(), "unset");
        assert_eq!(Optional::<i32>::Null.to_string(), "null");
        assert_eq!(Optional::Value(3).to_string(), "value(3)");
    }
}
