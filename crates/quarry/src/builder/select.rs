//! SELECT and aggregate rendering.

use super::{Builder, Statement};
use crate::query::{JoinQuery, Query, SortQuery};

impl Builder<'_> {
    /// `SELECT ... FROM ...` for `query`.
    pub fn find(mut self, query: &Query) -> Statement {
        self.write_fields(query.select.only_distinct, &query.select.fields);
        self.write_tail(query);
        self.finish("select")
    }

    /// Group fields plus `<mode>(<field>) AS <mode>` over `query`.
    ///
    /// ```ignore
    /// Builder::new(&config).aggregate(&Query::new("users"), "COUNT", "id");
    /// // SELECT COUNT(`id`) AS COUNT FROM `users`;
    /// ```
    pub fn aggregate(mut self, query: &Query, mode: &str, field: &str) -> Statement {
        let mut fields = query.group.fields.clone();
        fields.push(format!("{mode}({field}) AS {mode}"));

        self.write_fields(false, &fields);
        self.write_tail(query);
        self.finish("aggregate")
    }

    fn write_fields(&mut self, distinct: bool, fields: &[String]) {
        self.buffer.push_str("SELECT ");
        if distinct {
            self.buffer.push_str("DISTINCT ");
        }
        if fields.is_empty() {
            self.buffer.push('*');
        } else {
            self.push_escaped_list(fields);
        }
    }

    /// Everything after the field list, shared by `find` and `aggregate`.
    fn write_tail(&mut self, query: &Query) {
        self.buffer.push_str(" FROM ");
        self.push_quoted(&query.collection);

        self.write_joins(&query.joins);
        self.write_where(&query.filter);

        if !query.group.fields.is_empty() {
            self.buffer.push_str(" GROUP BY ");
            self.push_escaped_list(&query.group.fields);
            self.write_having(&query.group.filter);
        }

        self.write_order_by(&query.sort);

        if let Some(limit) = query.limit {
            self.buffer.push_str(" LIMIT ");
            self.buffer.push_str(&limit.to_string());

            if query.offset > 0 {
                self.buffer.push_str(" OFFSET ");
                self.buffer.push_str(&query.offset.to_string());
            }
        }

        if let Some(lock) = &query.lock {
            self.buffer.push(' ');
            self.buffer.push_str(lock);
        }
    }

    fn write_joins(&mut self, joins: &[JoinQuery]) {
        for join in joins {
            self.buffer.push(' ');
            self.buffer.push_str(&join.mode);
            self.buffer.push(' ');
            self.push_quoted(&join.collection);
            self.buffer.push_str(" ON ");
            self.push_escaped(&join.from);
            self.buffer.push('=');
            self.push_escaped(&join.to);

            self.args.extend(join.arguments.iter().cloned());
        }
    }

    fn write_order_by(&mut self, sort: &[SortQuery]) {
        if sort.is_empty() {
            return;
        }
        self.buffer.push_str(" ORDER BY");
        for (i, order) in sort.iter().enumerate() {
            if i > 0 {
                self.buffer.push(',');
            }
            self.buffer.push(' ');
            self.push_escaped(&order.field);
            self.buffer
                .push_str(if order.ascending { " ASC" } else { " DESC" });
        }
    }
}
