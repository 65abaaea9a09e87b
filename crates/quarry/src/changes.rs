//! Ordered change sets for INSERT and UPDATE statements.

use crate::value::Value;
use std::collections::HashMap;

/// One column modification.
#[derive(Debug, Clone, PartialEq)]
pub enum Change {
    /// `field = value`
    Set { field: String, value: Value },
    /// `field = field + value`
    Increment { field: String, value: Value },
    /// `field = field - value`
    Decrement { field: String, value: Value },
    /// Raw SQL spliced as-is, with its arguments.
    ///
    /// In an INSERT the text is used as a column entry and the arguments each
    /// get a placeholder in the VALUES tuple; in an UPDATE the text is a full
    /// assignment and must carry its own placeholders.
    Fragment { sql: String, args: Vec<Value> },
}

impl Change {
    /// The column this change targets; `None` for fragments.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Set { field, .. }
            | Self::Increment { field, .. }
            | Self::Decrement { field, .. } => Some(field),
            Self::Fragment { .. } => None,
        }
    }
}

/// Changes in the order they were declared.
///
/// Declaring a second change for a field replaces the first one in place, so
/// the rendered column order is the order of first declaration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Changes {
    changes: Vec<Change>,
    fields: HashMap<String, usize>,
}

impl Changes {
    /// Create an empty change set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a change.
    pub fn push(&mut self, change: Change) -> &mut Self {
        let existing = change
            .field()
            .and_then(|field| self.fields.get(field).copied());
        match existing {
            Some(index) => self.changes[index] = change,
            None => {
                if let Some(field) = change.field() {
                    self.fields.insert(field.to_string(), self.changes.len());
                }
                self.changes.push(change);
            }
        }
        self
    }

    /// `field = value`
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push(Change::Set {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    /// `field = field + value`
    pub fn increment(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push(Change::Increment {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    /// `field = field - value`
    pub fn decrement(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push(Change::Decrement {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    /// Raw SQL change, see [`Change::Fragment`].
    pub fn fragment(mut self, sql: impl Into<String>, args: Vec<Value>) -> Self {
        self.push(Change::Fragment {
            sql: sql.into(),
            args,
        });
        self
    }

    /// The change declared for `field`, if any.
    pub fn get(&self, field: &str) -> Option<&Change> {
        self.fields.get(field).map(|&index| &self.changes[index])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Change> {
        self.changes.iter()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

impl<'a> IntoIterator for &'a Changes {
    type Item = &'a Change;
    type IntoIter = std::slice::Iter<'a, Change>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.iter()
    }
}

impl FromIterator<Change> for Changes {
    fn from_iter<I: IntoIterator<Item = Change>>(iter: I) -> Self {
        let mut changes = Self::new();
        for change in iter {
            changes.push(change);
        }
        changes
    }
}
