//! Filter tree rendering.

use super::{Builder, Statement};
use crate::filter::FilterQuery;

impl Builder<'_> {
    /// Render a filter tree on its own, without statement terminator.
    ///
    /// The empty filter renders as an empty string with no arguments.
    pub fn compile_filter(mut self, filter: &FilterQuery) -> Statement {
        if !filter.is_none() {
            self.write_filter(filter);
        }
        Statement {
            sql: self.buffer,
            args: self.args,
        }
    }

    pub(super) fn write_where(&mut self, filter: &FilterQuery) {
        if filter.is_none() {
            return;
        }
        self.buffer.push_str(" WHERE ");
        self.write_filter(filter);
    }

    pub(super) fn write_having(&mut self, filter: &FilterQuery) {
        if filter.is_none() {
            return;
        }
        self.buffer.push_str(" HAVING ");
        self.write_filter(filter);
    }

    fn write_filter(&mut self, filter: &FilterQuery) {
        match filter {
            FilterQuery::And(inner) => self.write_group("AND", inner),
            FilterQuery::Or(inner) => self.write_group("OR", inner),
            FilterQuery::Not(inner) => {
                self.buffer.push_str("NOT ");
                self.write_group("AND", inner);
            }
            FilterQuery::Compare { field, op, value } => {
                self.push_escaped(field);
                self.buffer.push_str(op.as_sql());
                self.push_bind(value);
            }
            FilterQuery::Nil { field } => {
                self.push_escaped(field);
                self.buffer.push_str(" IS NULL");
            }
            FilterQuery::NotNil { field } => {
                self.push_escaped(field);
                self.buffer.push_str(" IS NOT NULL");
            }
            FilterQuery::In {
                field,
                values,
                negated,
            } => {
                self.push_escaped(field);
                self.buffer
                    .push_str(if *negated { " NOT IN (" } else { " IN (" });
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        self.buffer.push(',');
                    }
                    self.push_bind(value);
                }
                self.buffer.push(')');
            }
            FilterQuery::Like {
                field,
                pattern,
                negated,
            } => {
                self.push_escaped(field);
                self.buffer
                    .push_str(if *negated { " NOT LIKE " } else { " LIKE " });
                self.push_bind(pattern);
            }
            FilterQuery::Fragment { sql, args } => {
                self.buffer.push_str(sql);
                self.args.extend(args.iter().cloned());
            }
        }
    }

    /// Children joined by `op`; parenthesized only with two or more children.
    fn write_group(&mut self, op: &str, inner: &[FilterQuery]) {
        let wrap = inner.len() > 1;
        if wrap {
            self.buffer.push('(');
        }
        for (i, child) in inner.iter().enumerate() {
            if i > 0 {
                self.buffer.push(' ');
                self.buffer.push_str(op);
                self.buffer.push(' ');
            }
            self.write_filter(child);
        }
        if wrap {
            self.buffer.push(')');
        }
    }
}
