//! Structured, dialect-neutral description of a SELECT query.

use crate::filter::FilterQuery;
use crate::value::Value;

/// Selected fields. No fields selects `*`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectQuery {
    pub fields: Vec<String>,
    pub only_distinct: bool,
}

/// `<mode> <collection> ON <from>=<to>`
#[derive(Debug, Clone, PartialEq)]
pub struct JoinQuery {
    /// Join keyword(s), `JOIN` by default.
    pub mode: String,
    pub collection: String,
    pub from: String,
    pub to: String,
    /// Bound before any WHERE argument.
    pub arguments: Vec<Value>,
}

impl JoinQuery {
    /// Plain `JOIN`.
    pub fn new(
        collection: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
    ) -> Self {
        Self {
            mode: "JOIN".to_string(),
            collection: collection.into(),
            from: from.into(),
            to: to.into(),
            arguments: Vec::new(),
        }
    }

    /// Override the join keyword (`LEFT JOIN`, `INNER JOIN`, ...).
    pub fn mode(mut self, mode: impl Into<String>) -> Self {
        self.mode = mode.into();
        self
    }

    /// Attach static arguments to this join.
    pub fn arguments(mut self, arguments: Vec<Value>) -> Self {
        self.arguments = arguments;
        self
    }
}

/// `GROUP BY` fields plus an optional `HAVING` filter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupQuery {
    pub fields: Vec<String>,
    pub filter: FilterQuery,
}

/// One `ORDER BY` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortQuery {
    pub field: String,
    pub ascending: bool,
}

impl SortQuery {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            ascending: true,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            ascending: false,
        }
    }
}

/// A complete SELECT description.
///
/// # Example
/// ```ignore
/// use quarry::{FilterQuery, Query};
///
/// let query = Query::new("users")
///     .select(["id", "name"])
///     .filter(FilterQuery::eq("status", "active"))
///     .sort_desc("created_at")
///     .limit(20);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub collection: String,
    pub select: SelectQuery,
    pub joins: Vec<JoinQuery>,
    pub filter: FilterQuery,
    pub group: GroupQuery,
    pub sort: Vec<SortQuery>,
    pub limit: Option<u64>,
    /// Only rendered together with a limit.
    pub offset: u64,
    /// Raw lock clause, e.g. `FOR UPDATE`.
    pub lock: Option<String>,
}

impl Query {
    /// Query over `collection`.
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            ..Self::default()
        }
    }

    /// Replace the selected fields.
    pub fn select<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.select.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// `SELECT DISTINCT`
    pub fn distinct(mut self) -> Self {
        self.select.only_distinct = true;
        self
    }

    /// Append a join.
    pub fn join(mut self, join: JoinQuery) -> Self {
        self.joins.push(join);
        self
    }

    /// Append a plain `JOIN collection ON from=to`.
    pub fn join_on(
        self,
        collection: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
    ) -> Self {
        self.join(JoinQuery::new(collection, from, to))
    }

    /// AND `filter` into the WHERE clause.
    pub fn filter(mut self, filter: FilterQuery) -> Self {
        self.filter = std::mem::take(&mut self.filter).and(filter);
        self
    }

    /// Replace the GROUP BY fields.
    pub fn group<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.group.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// AND `filter` into the HAVING clause.
    pub fn having(mut self, filter: FilterQuery) -> Self {
        self.group.filter = std::mem::take(&mut self.group.filter).and(filter);
        self
    }

    pub fn sort_asc(mut self, field: impl Into<String>) -> Self {
        self.sort.push(SortQuery::asc(field));
        self
    }

    pub fn sort_desc(mut self, field: impl Into<String>) -> Self {
        self.sort.push(SortQuery::desc(field));
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = offset;
        self
    }

    /// Append a raw lock clause.
    pub fn lock(mut self, lock: impl Into<String>) -> Self {
        self.lock = Some(lock.into());
        self
    }
}
