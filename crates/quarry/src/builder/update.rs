//! UPDATE and DELETE rendering.

use super::{Builder, Statement};
use crate::changes::{Change, Changes};
use crate::filter::FilterQuery;
use crate::value::Value;

impl Builder<'_> {
    /// `UPDATE <collection> SET ... [WHERE ...]`
    ///
    /// SET placeholders are numbered before WHERE placeholders.
    pub fn update(mut self, collection: &str, changes: &Changes, filter: &FilterQuery) -> Statement {
        self.buffer.push_str("UPDATE ");
        self.push_quoted(collection);
        self.buffer.push_str(" SET ");

        for (i, change) in changes.iter().enumerate() {
            if i > 0 {
                self.buffer.push(',');
            }
            match change {
                Change::Set { field, value } => {
                    self.push_escaped(field);
                    self.buffer.push('=');
                    self.push_bind(value);
                }
                Change::Increment { field, value } => self.push_step(field, '+', value),
                Change::Decrement { field, value } => self.push_step(field, '-', value),
                Change::Fragment { sql, args } => {
                    self.buffer.push_str(sql);
                    self.args.extend(args.iter().cloned());
                }
            }
        }

        self.write_where(filter);
        self.finish("update")
    }

    /// `DELETE FROM <collection> [WHERE ...]`
    pub fn delete(mut self, collection: &str, filter: &FilterQuery) -> Statement {
        self.buffer.push_str("DELETE FROM ");
        self.push_quoted(collection);
        self.write_where(filter);
        self.finish("delete")
    }

    // field=field<sign>?
    fn push_step(&mut self, field: &str, sign: char, value: &Value) {
        self.push_escaped(field);
        self.buffer.push('=');
        self.push_escaped(field);
        self.buffer.push(sign);
        self.push_bind(value);
    }
}
