//! INSERT rendering.

use super::{Builder, Statement};
use crate::changes::{Change, Changes};

impl Builder<'_> {
    /// Single-row INSERT.
    ///
    /// Only `Set` and `Fragment` changes produce columns; increments and
    /// decrements have no meaning for a new row and are skipped.
    pub fn insert(mut self, collection: &str, changes: &Changes) -> Statement {
        self.buffer.push_str("INSERT INTO ");
        self.push_escaped(collection);

        let mut columns = Vec::with_capacity(changes.len());
        for change in changes {
            match change {
                Change::Set { field, value } => {
                    columns.push(self.quoted(field));
                    self.args.push(value.clone());
                }
                Change::Fragment { sql, args } => {
                    columns.push(sql.clone());
                    self.args.extend(args.iter().cloned());
                }
                Change::Increment { .. } | Change::Decrement { .. } => {}
            }
        }

        if columns.is_empty() && self.config.insert_default_values {
            self.buffer.push_str(" DEFAULT VALUES");
        } else {
            self.buffer.push_str(" (");
            self.buffer.push_str(&columns.join(","));
            self.buffer.push_str(") VALUES (");
            for i in 0..self.args.len() {
                if i > 0 {
                    self.buffer.push(',');
                }
                self.push_placeholder();
            }
            self.buffer.push(')');
        }

        self.push_returning();
        self.finish("insert")
    }

    /// Multi-row INSERT over a fixed column list.
    ///
    /// A row gets a placeholder for every column it sets and `DEFAULT`
    /// everywhere else.
    pub fn insert_all<S: AsRef<str>>(
        mut self,
        collection: &str,
        fields: &[S],
        rows: &[Changes],
    ) -> Statement {
        self.buffer.push_str("INSERT INTO ");
        self.push_quoted(collection);

        self.buffer.push_str(" (");
        for (i, field) in fields.iter().enumerate() {
            if i > 0 {
                self.buffer.push(',');
            }
            self.push_quoted(field.as_ref());
        }
        self.buffer.push_str(") VALUES ");

        for (i, changes) in rows.iter().enumerate() {
            if i > 0 {
                self.buffer.push(',');
            }
            self.buffer.push('(');
            for (j, field) in fields.iter().enumerate() {
                if j > 0 {
                    self.buffer.push(',');
                }
                match changes.get(field.as_ref()) {
                    Some(Change::Set { value, .. }) => self.push_bind(value),
                    _ => self.buffer.push_str("DEFAULT"),
                }
            }
            self.buffer.push(')');
        }

        self.push_returning();
        self.finish("insert_all")
    }

    fn quoted(&self, name: &str) -> String {
        let quote = &self.config.escape_char;
        format!("{quote}{name}{quote}")
    }
}
