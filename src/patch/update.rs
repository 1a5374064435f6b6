//! Sparse column updates built from tri-state request fields.
//!
//! [`UpdateMapping`] is the change-set of one partial update: only columns
//! whose field was present in the request appear in it, in the request's
//! declared field order. It is consumed immediately by the storage write and
//! never persisted.

use sea_query::{Iden, Value};

use super::error::PatchError;
use super::optional::Optional;

/// Column metadata needed to turn a tri-state field into an assignment
pub trait PatchColumn: Iden + Copy + PartialEq + std::fmt::Debug + 'static {
    /// Column name as stored
    fn name(&self) -> &'static str;

    /// `false` for identity and creation-only columns
    fn is_mutable(&self) -> bool;

    /// Whether the column accepts SQL `NULL`
    fn is_nullable(&self) -> bool;

    /// Value written when a non-nullable column receives an explicit `null`
    fn zero_value(&self) -> Value;

    /// Typed SQL `NULL` for this column
    fn null_value(&self) -> Value;
}

/// New content of one column
#[derive(Debug, Clone, PartialEq)]
pub enum Assignment {
    /// Store SQL `NULL`
    Null,
    /// Store this value
    Set(Value),
}

/// Ordered column → assignment map for one record
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateMapping<C: PatchColumn> {
    entries: Vec<(C, Assignment)>,
}

impl<C: PatchColumn> Default for UpdateMapping<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: PatchColumn> UpdateMapping<C> {
    #[must_use]
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Record the update implied by one tri-state field
    ///
    /// - `Unset` leaves the mapping untouched
    /// - `Null` stores `NULL`, or the zero value when the column is not nullable
    /// - `Value(v)` stores `v`
    ///
    /// Immutable columns are never recorded.
    pub fn set_update<T>(&mut self, column: C, field: &Optional<T>)
    where
        T: Clone + Into<Value>,
    {
        let assignment = match field {
            Optional::Unset => return,
            Optional::Null if column.is_nullable() => Assignment::Null,
            Optional::Null => Assignment::Set(column.zero_value()),
            Optional::Value(v) => Assignment::Set(v.clone().into()),
        };
        self.insert(column, assignment);
    }

    /// Unconditionally assign a value, as a full-record replace does
    pub fn set(&mut self, column: C, value: impl Into<Value>) {
        self.insert(column, Assignment::Set(value.into()));
    }

    fn insert(&mut self, column: C, assignment: Assignment) {
        if !column.is_mutable() {
            log::warn!("Refusing to update immutable column {}", column.name());
            return;
        }
        match self.entries.iter_mut().find(|(c, _)| *c == column) {
            Some(entry) => entry.1 = assignment,
            None => self.entries.push((column, assignment)),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Assignment recorded for `column`, if any
    #[must_use]
    pub fn get(&self, column: C) -> Option<&Assignment> {
        self.entries
            .iter()
            .find(|(c, _)| *c == column)
            .map(|(_, a)| a)
    }

    #[must_use]
    pub fn contains(&self, column: C) -> bool {
        self.get(column).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(C, Assignment)> {
        self.entries.iter()
    }

    /// Column names in assignment order
    pub fn columns(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(c, _)| c.name())
    }

    /// Assignments resolved to bindable values (`Null` becomes a typed `NULL`)
    pub fn values(&self) -> impl Iterator<Item = (C, Value)> + '_ {
        self.entries.iter().map(|(c, a)| {
            let value = match a {
                Assignment::Null => c.null_value(),
                Assignment::Set(v) => v.clone(),
            };
            (*c, value)
        })
    }
}

/// A decoded partial-update request
pub trait PatchRequest {
    type Column: PatchColumn;

    /// Add one entry per present field, in declared field order
    fn collect_updates(&self, mapping: &mut UpdateMapping<Self::Column>);

    /// Build the update mapping for this request
    ///
    /// # Errors
    ///
    /// Returns `PatchError::Empty` when no field was present.
    fn update_mapping(&self) -> Result<UpdateMapping<Self::Column>, PatchError> {
        let mut mapping = UpdateMapping::new();
        self.collect_updates(&mut mapping);
        if mapping.is_empty() {
            return Err(PatchError::Empty);
        }
        Ok(mapping)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Copy, Clone, Debug, PartialEq)]
    enum TestColumn {
        Id,
        Title,
        Note,
        Count,
    }

    impl Iden for TestColumn {
        fn unquoted(&self) -> &str {
            self.name()
        }
    }

    impl PatchColumn for TestColumn {
        fn name(&self) -> &'static str {
            match self {
                TestColumn::Id => "id",
                TestColumn::Title => "title",
                TestColumn::Note => "note",
                TestColumn::Count => "count",
            }
        }

        fn is_mutable(&self) -> bool {
            !matches!(self, TestColumn::Id)
        }

        fn is_nullable(&self) -> bool {
            matches!(self, TestColumn::Note)
        }

        fn zero_value(&self) -> Value {
            match self {
                TestColumn::Id | TestColumn::Count => Value::Int(Some(0)),
                TestColumn::Title | TestColumn::Note => Value::String(Some(String::new())),
            }
        }

        fn null_value(&self) -> Value {
            match self {
                TestColumn::Id | TestColumn::Count => Value::Int(None),
                TestColumn::Title | TestColumn::Note => Value::String(None),
            }
        }
    }

    struct TestPatch {
        title: Optional<String>,
        note: Optional<String>,
        count: Optional<i32>,
    }

    impl PatchRequest for TestPatch {
        type Column = TestColumn;

        fn collect_updates(&self, mapping: &mut UpdateMapping<TestColumn>) {
            mapping.set_update(TestColumn::Title, &self.title);
            mapping.set_update(TestColumn::Note, &self.note);
            mapping.set_update(TestColumn::Count, &self.count);
        }
    }

    #[test]
    fn test_unset_is_omitted() {
        let mut mapping = UpdateMapping::new();
        mapping.set_update(TestColumn::Title, &Optional::<String>::Unset);
        assert!(mapping.is_empty());
    }

    #[test]
    fn test_null_on_nullable_column_is_null() {
        let mut mapping = UpdateMapping::new();
        mapping.set_update(TestColumn::Note, &Optional::<String>::Null);
        assert_eq!(mapping.get(TestColumn::Note), Some(&Assignment::Null));
        let values: Vec<_> = mapping.values().collect();
        assert_eq!(values, vec![(TestColumn::Note, Value::String(None))]);
    }

    #[test]
    fn test_null_on_non_nullable_column_is_zero() {
        let mut mapping = UpdateMapping::new();
        mapping.set_update(TestColumn::Count, &Optional::<i32>::Null);
        assert_eq!(
            mapping.get(TestColumn::Count),
            Some(&Assignment::Set(Value::Int(Some(0))))
        );
    }

    #[test]
    fn test_value_is_stored_verbatim() {
        let mut mapping = UpdateMapping::new();
        mapping.set_update(TestColumn::Title, &Optional::Value("X".to_string()));
        assert_eq!(
            mapping.get(TestColumn::Title),
            Some(&Assignment::Set(Value::String(Some("X".to_string()))))
        );
    }

    #[test]
    fn test_immutable_column_is_never_recorded() {
        let mut mapping = UpdateMapping::new();
        mapping.set_update(TestColumn::Id, &Optional::Value(5));
        mapping.set(TestColumn::Id, 6);
        assert!(mapping.is_empty());
        assert!(!mapping.contains(TestColumn::Id));
    }

    #[test]
    fn test_mapping_follows_declared_order() {
        let patch = TestPatch {
            title: Optional::Value("T".to_string()),
            note: Optional::Unset,
            count: Optional::Value(3),
        };
        let mapping = patch.update_mapping().unwrap();
        let columns: Vec<_> = mapping.columns().collect();
        assert_eq!(columns, vec!["title", "count"]);
        assert_eq!(mapping.len(), 2);
    }

    #[test]
    fn test_all_unset_is_empty_patch() {
        let patch = TestPatch {
            title: Optional::Unset,
            note: Optional::Unset,
            count: Optional::Unset,
        };
        assert_eq!(patch.update_mapping(), Err(PatchError::Empty));
    }

    #[test]
    fn test_reassigning_a_column_replaces_the_entry() {
        let mut mapping = UpdateMapping::new();
        mapping.set(TestColumn::Count, 1);
        mapping.set(TestColumn::Count, 2);
        assert_eq!(mapping.len(), 1);
        assert_eq!(
            mapping.get(TestColumn::Count),
            Some(&Assignment::Set(Value::Int(Some(2))))
        );
    }
}
