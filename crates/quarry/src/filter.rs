//! Filter trees for WHERE/HAVING clauses.
//!
//! [`FilterQuery`] is a closed sum type: every node kind carries exactly the
//! data it renders. An `And` node without children is the empty filter and
//! contributes neither SQL nor arguments.
//!
//! # Example
//! ```ignore
//! use quarry::FilterQuery;
//!
//! let filter = FilterQuery::eq("status", "active")
//!     .and(FilterQuery::gt("age", 18))
//!     .and(FilterQuery::eq("role", "admin").or(FilterQuery::nil("deleted_at")));
//! ```

use crate::value::Value;

/// Comparison operators for leaf predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOp {
    Eq,
    Ne,
    Lt,
    Lte,
    Gt,
    Gte,
}

impl ComparisonOp {
    /// SQL operator symbol.
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "<>",
            Self::Lt => "<",
            Self::Lte => "<=",
            Self::Gt => ">",
            Self::Gte => ">=",
        }
    }
}

/// A node of a filter tree.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterQuery {
    /// All children must hold. No children: the empty filter.
    And(Vec<FilterQuery>),
    /// At least one child must hold.
    Or(Vec<FilterQuery>),
    /// `NOT` applied to the children joined with `AND`.
    Not(Vec<FilterQuery>),
    /// `field <op> value`
    Compare {
        field: String,
        op: ComparisonOp,
        value: Value,
    },
    /// `field IS NULL`
    Nil { field: String },
    /// `field IS NOT NULL`
    NotNil { field: String },
    /// `field [NOT] IN (values...)`
    In {
        field: String,
        values: Vec<Value>,
        negated: bool,
    },
    /// `field [NOT] LIKE pattern`
    Like {
        field: String,
        pattern: Value,
        negated: bool,
    },
    /// Raw SQL with its arguments.
    ///
    /// Neither quoted nor checked: the text must carry exactly one placeholder
    /// per argument in the configured dialect's style, otherwise the rendered
    /// statement is malformed or its arguments misaligned.
    Fragment { sql: String, args: Vec<Value> },
}

impl Default for FilterQuery {
    fn default() -> Self {
        Self::none()
    }
}

impl FilterQuery {
    /// The empty filter.
    pub fn none() -> Self {
        Self::And(Vec::new())
    }

    /// Whether this is the empty filter.
    pub fn is_none(&self) -> bool {
        matches!(self, Self::And(inner) if inner.is_empty())
    }

    /// AND group over `filters`; empty filters are dropped.
    pub fn and_all(filters: impl IntoIterator<Item = FilterQuery>) -> Self {
        Self::And(filters.into_iter().filter(|f| !f.is_none()).collect())
    }

    /// OR group over `filters`; empty filters are dropped.
    pub fn or_all(filters: impl IntoIterator<Item = FilterQuery>) -> Self {
        let inner: Vec<_> = filters.into_iter().filter(|f| !f.is_none()).collect();
        if inner.is_empty() {
            return Self::none();
        }
        Self::Or(inner)
    }

    /// Negate `filter`.
    pub fn not(filter: FilterQuery) -> Self {
        if filter.is_none() {
            return filter;
        }
        Self::Not(vec![filter])
    }

    /// Combine with `other` using AND, extending an existing AND group.
    pub fn and(self, other: FilterQuery) -> Self {
        if other.is_none() {
            return self;
        }
        match self {
            Self::And(mut inner) => {
                inner.push(other);
                Self::And(inner)
            }
            current => Self::And(vec![current, other]),
        }
    }

    /// Combine with `other` using OR, extending an existing OR group.
    pub fn or(self, other: FilterQuery) -> Self {
        if other.is_none() {
            return self;
        }
        match self {
            current if current.is_none() => other,
            Self::Or(mut inner) => {
                inner.push(other);
                Self::Or(inner)
            }
            current => Self::Or(vec![current, other]),
        }
    }

    fn compare(field: impl Into<String>, op: ComparisonOp, value: impl Into<Value>) -> Self {
        Self::Compare {
            field: field.into(),
            op,
            value: value.into(),
        }
    }

    /// `field = value`
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(field, ComparisonOp::Eq, value)
    }

    /// `field <> value`
    pub fn ne(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(field, ComparisonOp::Ne, value)
    }

    /// `field < value`
    pub fn lt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(field, ComparisonOp::Lt, value)
    }

    /// `field <= value`
    pub fn lte(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(field, ComparisonOp::Lte, value)
    }

    /// `field > value`
    pub fn gt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(field, ComparisonOp::Gt, value)
    }

    /// `field >= value`
    pub fn gte(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(field, ComparisonOp::Gte, value)
    }

    /// `field IS NULL`
    pub fn nil(field: impl Into<String>) -> Self {
        Self::Nil {
            field: field.into(),
        }
    }

    /// `field IS NOT NULL`
    pub fn not_nil(field: impl Into<String>) -> Self {
        Self::NotNil {
            field: field.into(),
        }
    }

    /// `field IN (values...)`
    pub fn in_list<V: Into<Value>>(
        field: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        Self::In {
            field: field.into(),
            values: values.into_iter().map(Into::into).collect(),
            negated: false,
        }
    }

    /// `field NOT IN (values...)`
    pub fn not_in<V: Into<Value>>(
        field: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        Self::In {
            field: field.into(),
            values: values.into_iter().map(Into::into).collect(),
            negated: true,
        }
    }

    /// `field LIKE pattern`
    pub fn like(field: impl Into<String>, pattern: impl Into<Value>) -> Self {
        Self::Like {
            field: field.into(),
            pattern: pattern.into(),
            negated: false,
        }
    }

    /// `field NOT LIKE pattern`
    pub fn not_like(field: impl Into<String>, pattern: impl Into<Value>) -> Self {
        Self::Like {
            field: field.into(),
            pattern: pattern.into(),
            negated: true,
        }
    }

    /// Raw SQL with arguments, see [`FilterQuery::Fragment`].
    pub fn fragment(sql: impl Into<String>, args: Vec<Value>) -> Self {
        Self::Fragment {
            sql: sql.into(),
            args,
        }
    }
}
