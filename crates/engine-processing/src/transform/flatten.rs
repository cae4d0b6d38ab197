use crate::transform::error::TransformError;
use model::{
    core::locale::LocaleMap,
    records::flat::{FlatRecord, union_columns},
};
use serde_json::Value;

/// Separator between values merged from several referenced entries.
pub const MERGE_SEPARATOR: &str = ", ";

/// Column name for one locale of a locale-bearing field: `{prefix}_{locale}`.
pub fn prefixed(prefix: &str, locale: &str) -> String {
    format!("{prefix}_{locale}")
}

/// Flattens a whole locale-map into `{prefix}_{locale}` columns, one per
/// locale, rendering each value with `render(locale, value)`.
pub fn flatten_locale_map<F>(
    locales: &LocaleMap,
    prefix: &str,
    mut render: F,
) -> Result<FlatRecord, TransformError>
where
    F: FnMut(&str, &Value) -> Result<String, TransformError>,
{
    locales
        .iter()
        .map(|(locale, value)| Ok((prefixed(prefix, locale), render(locale, value)?)))
        .collect()
}

/// Merges records column by column.
///
/// The result holds the union of all columns. Each column joins, in input
/// order, every record's value for it; a record without a value for that
/// column contributes its first value instead (empty text if the record has
/// no columns at all).
pub fn concat_with_fallback(records: &[FlatRecord]) -> FlatRecord {
    union_columns(records)
        .into_iter()
        .map(|column| {
            let joined = records
                .iter()
                .map(|record| match record.get(&column) {
                    Some(value) if !value.is_empty() => value,
                    _ => record.first_value().unwrap_or(""),
                })
                .collect::<Vec<_>>()
                .join(MERGE_SEPARATOR);
            (column, joined)
        })
        .collect()
}

/// Replaces every line feed with a single space.
pub fn replace_newlines(text: &str) -> String {
    text.replace('\n', " ")
}
