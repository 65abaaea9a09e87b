//! Cursor-to-container mapping.
//!
//! Every function here takes ownership of the cursor's lifecycle: the cursor
//! is closed before returning, on success and on every error path.

use crate::cursor::{Cursor, CursorGuard};
use crate::error::{OrmError, OrmResult};
use crate::scan::{Collection, Document, Scanner};
use std::collections::HashMap;
use std::hash::Hash;

enum ScanTarget<'a> {
    Field(&'a mut dyn Scanner),
    Discard(Box<dyn Scanner>),
}

impl ScanTarget<'_> {
    fn as_scanner(&mut self) -> &mut dyn Scanner {
        match self {
            Self::Field(scanner) => &mut **scanner,
            Self::Discard(scanner) => scanner.as_mut(),
        }
    }
}

/// Decode the current row into `doc`. Columns `doc` does not map are read
/// into the cursor's discard target.
fn scan_row<C: Cursor + ?Sized>(
    cursor: &mut C,
    fields: &[String],
    doc: &mut dyn Document,
) -> OrmResult<()> {
    let mut resolved = doc.scanners(fields).into_iter();
    let mut targets: Vec<ScanTarget<'_>> = fields
        .iter()
        .map(|_| match resolved.next().flatten() {
            Some(scanner) => ScanTarget::Field(scanner),
            None => ScanTarget::Discard(cursor.nop_scanner()),
        })
        .collect();

    let mut scanners: Vec<&mut dyn Scanner> =
        targets.iter_mut().map(ScanTarget::as_scanner).collect();
    cursor.scan(&mut scanners)
}

/// Decode the first row into `doc`.
///
/// Returns `false` when the cursor has no rows; `doc` is left untouched.
pub fn scan_one<C: Cursor + ?Sized>(cursor: &mut C, doc: &mut dyn Document) -> OrmResult<bool> {
    let mut cursor = CursorGuard::new(cursor);

    let fields = cursor.fields()?;
    if !cursor.next() {
        tracing::trace!(target: "quarry.cursor", rows = 0, "scan_one");
        return Ok(false);
    }

    scan_row(&mut *cursor, &fields, doc)?;
    tracing::trace!(target: "quarry.cursor", rows = 1, "scan_one");
    Ok(true)
}

/// Append one document per row to `collection`, in row order.
///
/// Returns the number of rows decoded. On a decode error the document for the
/// failing row stays appended, partially filled.
pub fn scan_all<C: Cursor + ?Sized>(
    cursor: &mut C,
    collection: &mut dyn Collection,
) -> OrmResult<usize> {
    let mut cursor = CursorGuard::new(cursor);

    let fields = cursor.fields()?;
    let mut rows = 0;
    while cursor.next() {
        scan_row(&mut *cursor, &fields, collection.add())?;
        rows += 1;
    }

    tracing::trace!(target: "quarry.cursor", rows, "scan_all");
    Ok(rows)
}

/// Fan one result stream out into several collections keyed by `key_field`.
///
/// For every row the key column is decoded into a `K`; each collection
/// registered under that key then receives its own, separately decoded copy
/// of the row. Rows whose key is not registered are skipped.
///
/// Returns the number of rows read. Fails with [`OrmError::MissingKeyField`]
/// when `key_field` is not one of the result columns.
///
/// ```ignore
/// let mut first: Vec<User> = Vec::new();
/// let mut second: Vec<User> = Vec::new();
/// let mut targets: HashMap<i64, Vec<&mut dyn Collection>> = HashMap::new();
/// targets.insert(10, vec![&mut first, &mut second]);
///
/// scan_multi(&mut cursor, "user_id", &mut targets)?;
/// ```
pub fn scan_multi<C, K>(
    cursor: &mut C,
    key_field: &str,
    collections: &mut HashMap<K, Vec<&mut dyn Collection>>,
) -> OrmResult<usize>
where
    C: Cursor + ?Sized,
    K: Scanner + Default + Eq + Hash,
{
    let mut cursor = CursorGuard::new(cursor);

    let fields = cursor.fields()?;
    let key_index = fields
        .iter()
        .position(|field| field == key_field)
        .ok_or_else(|| OrmError::MissingKeyField(key_field.to_string()))?;

    let mut rows = 0;
    while cursor.next() {
        rows += 1;

        let mut key = K::default();
        {
            let mut targets: Vec<ScanTarget<'_>> = fields
                .iter()
                .map(|_| ScanTarget::Discard(cursor.nop_scanner()))
                .collect();
            targets[key_index] = ScanTarget::Field(&mut key);

            let mut scanners: Vec<&mut dyn Scanner> =
                targets.iter_mut().map(ScanTarget::as_scanner).collect();
            cursor.scan(&mut scanners)?;
        }

        let Some(destinations) = collections.get_mut(&key) else {
            continue;
        };
        for collection in destinations.iter_mut() {
            scan_row(&mut *cursor, &fields, collection.add())?;
        }
    }

    tracing::trace!(target: "quarry.cursor", rows, "scan_multi");
    Ok(rows)
}
