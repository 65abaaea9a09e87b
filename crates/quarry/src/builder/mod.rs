//! Statement compiler.
//!
//! A [`Builder`] renders exactly one statement: every render method consumes
//! it, so the placeholder counter can never leak into another statement.
//! Arguments are collected in the same left-to-right order their placeholders
//! are written, which keeps fixed (`?`) and numbered (`$n`) markers aligned
//! with [`Statement::args`].
//!
//! # Example
//! ```ignore
//! use quarry::{Builder, Config, FilterQuery, Query};
//!
//! let config = Config::postgres();
//! let stmt = Builder::new(&config).find(
//!     &Query::new("users").filter(FilterQuery::eq("id", 10)).limit(1),
//! );
//! assert_eq!(stmt.sql, r#"SELECT * FROM "users" WHERE "id"=$1 LIMIT 1;"#);
//! ```

mod filter;
mod insert;
mod select;
mod update;

use crate::config::Config;
use crate::escape::escape;
use crate::value::Value;
use std::borrow::Cow;

/// Rendered SQL and its arguments, in placeholder order.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub args: Vec<Value>,
}

impl Statement {
    /// Number of parameter markers in `sql` under `config`.
    ///
    /// Markers inside fragment text are counted too, as long as they use the
    /// configured style.
    pub fn placeholder_count(&self, config: &Config) -> usize {
        if config.placeholder.is_empty() {
            return 0;
        }
        self.sql
            .match_indices(config.placeholder.as_str())
            .filter(|(at, token)| {
                !config.ordinal
                    || self.sql[at + token.len()..]
                        .starts_with(|c: char| c.is_ascii_digit())
            })
            .count()
    }
}

/// Single-use statement compiler.
#[derive(Debug)]
pub struct Builder<'a> {
    config: &'a Config,
    return_field: Option<String>,
    count: usize,
    buffer: String,
    args: Vec<Value>,
}

impl<'a> Builder<'a> {
    /// Create a builder for one statement.
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            return_field: None,
            count: 0,
            buffer: String::new(),
            args: Vec::new(),
        }
    }

    /// Append `RETURNING <field>` to INSERT statements.
    pub fn returning(mut self, field: impl Into<String>) -> Self {
        self.return_field = Some(field.into());
        self
    }

    /// Next parameter marker.
    ///
    /// Fixed mode always yields the configured token; ordinal mode appends a
    /// counter that starts at 1 and runs across the whole statement.
    pub fn next_placeholder(&mut self) -> Cow<'a, str> {
        if self.config.ordinal {
            self.count += 1;
            Cow::Owned(format!("{}{}", self.config.placeholder, self.count))
        } else {
            Cow::Borrowed(self.config.placeholder.as_str())
        }
    }

    fn push_placeholder(&mut self) {
        let placeholder = self.next_placeholder();
        self.buffer.push_str(&placeholder);
    }

    /// Write a placeholder and record its argument.
    fn push_bind(&mut self, value: &Value) {
        self.push_placeholder();
        self.args.push(value.clone());
    }

    fn push_escaped(&mut self, field: &str) {
        let escaped = escape(&self.config.escape_char, field);
        self.buffer.push_str(&escaped);
    }

    /// Wrap a collection or column name in quotes without splitting it.
    fn push_quoted(&mut self, name: &str) {
        self.buffer.push_str(&self.config.escape_char);
        self.buffer.push_str(name);
        self.buffer.push_str(&self.config.escape_char);
    }

    fn push_escaped_list<S: AsRef<str>>(&mut self, fields: &[S]) {
        for (i, field) in fields.iter().enumerate() {
            if i > 0 {
                self.buffer.push(',');
            }
            self.push_escaped(field.as_ref());
        }
    }

    fn push_returning(&mut self) {
        if let Some(field) = self.return_field.take() {
            self.buffer.push_str(" RETURNING ");
            self.push_escaped(&field);
        }
    }

    fn finish(mut self, kind: &'static str) -> Statement {
        self.buffer.push(';');

        tracing::debug!(
            target: "quarry.sql",
            statement = kind,
            sql = %self.buffer,
            args = self.args.len(),
            "compiled statement"
        );

        Statement {
            sql: self.buffer,
            args: self.args,
        }
    }
}

#[cfg(test)]
mod tests;
