//! Identifier quoting.
//!
//! [`escape`] quotes column and table references with the configured quote
//! string. Results are memoized in a process-wide table keyed by
//! `(escape_char, field)`; the table only grows and lives for the whole
//! process. The cache never changes output, only how often it is computed.

use std::collections::HashMap;
use std::sync::{OnceLock, PoisonError, RwLock};

/// A field starting with this character is emitted verbatim (minus the marker).
///
/// ```ignore
/// assert_eq!(escape("`", "^COUNT(*) AS total"), "COUNT(*) AS total");
/// ```
pub const UNESCAPE_CHARACTER: char = '^';

type FieldCache = RwLock<HashMap<String, HashMap<String, String>>>;

static FIELD_CACHE: OnceLock<FieldCache> = OnceLock::new();

fn field_cache() -> &'static FieldCache {
    FIELD_CACHE.get_or_init(|| RwLock::new(HashMap::new()))
}

/// Quote `field` with `escape_char`.
///
/// - empty `escape_char` or a bare `*`: returned unchanged
/// - `^raw`: `raw`, unquoted
/// - `fn(inner)`: only `inner` is quoted
/// - `table.*`: only `table` is quoted
/// - `table.col` / `col`: each part quoted
pub fn escape(escape_char: &str, field: &str) -> String {
    if escape_char.is_empty() || field == "*" {
        return field.to_string();
    }

    // Fast path: already cached.
    if let Some(cached) = field_cache()
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(escape_char)
        .and_then(|fields| fields.get(field))
    {
        return cached.clone();
    }

    // Don't hold the lock while computing, function arguments recurse into `escape`.
    let escaped = quote(escape_char, field);

    field_cache()
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .entry(escape_char.to_string())
        .or_default()
        .entry(field.to_string())
        .or_insert(escaped)
        .clone()
}

fn quote(escape_char: &str, field: &str) -> String {
    if let Some(raw) = field.strip_prefix(UNESCAPE_CHARACTER) {
        return raw.to_string();
    }

    if let (Some(start), Some(end)) = (field.find('('), field.find(')')) {
        if end > start {
            let mut out = String::with_capacity(field.len() + 2 * escape_char.len());
            out.push_str(&field[..=start]);
            out.push_str(&escape(escape_char, &field[start + 1..end]));
            out.push_str(&field[end..]);
            return out;
        }
    }

    if field.ends_with('*') {
        let qualifier_end = format!("{escape_char}.");
        return format!("{escape_char}{}", field.replacen('.', &qualifier_end, 1));
    }

    let separator = format!("{escape_char}.{escape_char}");
    format!(
        "{escape_char}{}{escape_char}",
        field.replacen('.', &separator, 1)
    )
}
