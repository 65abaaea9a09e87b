//! Sequential row cursors.

use crate::error::{OrmError, OrmResult};
use crate::scan::{Discard, Scanner};
use crate::value::Value;
use std::collections::VecDeque;
use std::ops::{Deref, DerefMut};

/// A forward-only result set.
///
/// `next` advances to the following row; `scan` decodes the current row into
/// one target per column and may be called more than once for the same row.
pub trait Cursor {
    /// Column names, in result order.
    fn fields(&mut self) -> OrmResult<Vec<String>>;

    /// Advance to the next row. `false` once exhausted.
    fn next(&mut self) -> bool;

    /// Decode the current row, one target per column.
    fn scan(&mut self, targets: &mut [&mut dyn Scanner]) -> OrmResult<()>;

    /// Release the underlying result set.
    fn close(&mut self) -> OrmResult<()>;

    /// Target for columns nobody maps.
    fn nop_scanner(&self) -> Box<dyn Scanner> {
        Box::new(Discard)
    }
}

/// Closes the wrapped cursor when dropped, on every exit path.
///
/// A close failure cannot be returned from `drop`; it is logged instead.
pub struct CursorGuard<'c, C: Cursor + ?Sized> {
    cursor: &'c mut C,
}

impl<'c, C: Cursor + ?Sized> CursorGuard<'c, C> {
    pub fn new(cursor: &'c mut C) -> Self {
        Self { cursor }
    }
}

impl<C: Cursor + ?Sized> Deref for CursorGuard<'_, C> {
    type Target = C;

    fn deref(&self) -> &C {
        self.cursor
    }
}

impl<C: Cursor + ?Sized> DerefMut for CursorGuard<'_, C> {
    fn deref_mut(&mut self) -> &mut C {
        self.cursor
    }
}

impl<C: Cursor + ?Sized> Drop for CursorGuard<'_, C> {
    fn drop(&mut self) {
        if let Err(err) = self.cursor.close() {
            tracing::warn!(target: "quarry.cursor", error = %err, "failed to close cursor");
        }
    }
}

/// How often each [`Cursor`] method was called on a [`MemoryCursor`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub fields: usize,
    pub next: usize,
    pub scan: usize,
    pub close: usize,
}

/// In-memory cursor over prepared rows.
///
/// Useful to exercise row mapping without a database. Failures can be
/// injected for `fields`, for the n-th `scan` call, and for `close`.
///
/// ```ignore
/// use quarry::{MemoryCursor, Value};
///
/// let mut cursor = MemoryCursor::new(["id", "name"])
///     .row(vec![Value::Int(1), Value::from("alice")])
///     .row(vec![Value::Int(2), Value::from("bob")]);
/// ```
#[derive(Debug, Default)]
pub struct MemoryCursor {
    fields: Vec<String>,
    rows: VecDeque<Vec<Value>>,
    current: Option<Vec<Value>>,
    fields_error: Option<String>,
    scan_error: Option<(usize, String)>,
    close_error: Option<String>,
    calls: CallCounts,
}

impl MemoryCursor {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Append a row.
    pub fn row(mut self, values: Vec<Value>) -> Self {
        self.rows.push_back(values);
        self
    }

    /// Make `fields` fail with `message`.
    pub fn fail_fields(mut self, message: impl Into<String>) -> Self {
        self.fields_error = Some(message.into());
        self
    }

    /// Make the `call`-th `scan` (1-based) fail with `message`.
    pub fn fail_scan_at(mut self, call: usize, message: impl Into<String>) -> Self {
        self.scan_error = Some((call, message.into()));
        self
    }

    /// Make `close` fail with `message`.
    pub fn fail_close(mut self, message: impl Into<String>) -> Self {
        self.close_error = Some(message.into());
        self
    }

    pub fn calls(&self) -> CallCounts {
        self.calls
    }

    pub fn is_closed(&self) -> bool {
        self.calls.close > 0
    }
}

impl Cursor for MemoryCursor {
    fn fields(&mut self) -> OrmResult<Vec<String>> {
        self.calls.fields += 1;
        match &self.fields_error {
            Some(message) => Err(OrmError::cursor(message.clone())),
            None => Ok(self.fields.clone()),
        }
    }

    fn next(&mut self) -> bool {
        self.calls.next += 1;
        self.current = self.rows.pop_front();
        self.current.is_some()
    }

    fn scan(&mut self, targets: &mut [&mut dyn Scanner]) -> OrmResult<()> {
        self.calls.scan += 1;
        if let Some((call, message)) = &self.scan_error {
            if *call == self.calls.scan {
                return Err(OrmError::cursor(message.clone()));
            }
        }

        let row = self
            .current
            .as_ref()
            .ok_or_else(|| OrmError::cursor("scan called without a current row"))?;
        if targets.len() != row.len() {
            return Err(OrmError::cursor(format!(
                "expected {} scan targets, got {}",
                row.len(),
                targets.len()
            )));
        }

        for ((target, value), column) in targets.iter_mut().zip(row).zip(&self.fields) {
            target.scan(value.clone()).map_err(|err| err.at(column))?;
        }
        Ok(())
    }

    fn close(&mut self) -> OrmResult<()> {
        self.calls.close += 1;
        self.current = None;
        match &self.close_error {
            Some(message) => Err(OrmError::cursor(message.clone())),
            None => Ok(()),
        }
    }
}
