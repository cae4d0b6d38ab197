//! Flattening of product entries into feed rows.
//!
//! A product row carries `MFC` and `size_class` taken from the representative
//! locale, every locale of `name`, `description` and `details`, and every
//! locale of the names of its categories and colors. Column names are
//! `{prefix}_{locale}`.

use crate::transform::{
    error::TransformError,
    flatten::{concat_with_fallback, flatten_locale_map, replace_newlines},
    pipeline::Transform,
    rich_text,
};
use model::{
    core::{
        locale::{LocaleMap, LocaleSelection},
        value::{is_truthy, scalar_text, type_name},
    },
    records::{
        entry::{Entry, fields_of},
        flat::FlatRecord,
    },
};
use serde_json::{Map, Value};

pub const MFC_COLUMN: &str = "MFC";
pub const SIZE_CLASS_COLUMN: &str = "size_class";

const MFC: &str = "mfc";
const VARIANTS: &str = "variants";
const SIZE_CLASS: &str = "sizeClass";
const NAME: &str = "name";
const DESCRIPTION: &str = "description";
const DETAILS: &str = "details";
const CATEGORY: &str = "category";
const MICRO_COLOR: &str = "microColor";
const MACRO_COLOR: &str = "macroColor";

const MICRO_CATEGORY_PREFIX: &str = "micro_category";
const MICRO_COLOR_PREFIX: &str = "micro_color";
const MACRO_COLOR_PREFIX: &str = "macro_color";

/// Builds one feed row per product entry.
#[derive(Debug, Clone, Default)]
pub struct FeedItemTransformer {
    locale: LocaleSelection,
}

impl FeedItemTransformer {
    pub fn new(locale: LocaleSelection) -> Self {
        Self { locale }
    }

    pub fn locale(&self) -> &LocaleSelection {
        &self.locale
    }

    fn representative<'a>(
        &self,
        locales: &'a LocaleMap,
        path: &str,
    ) -> Result<&'a Value, TransformError> {
        self.locale
            .value(locales)
            .ok_or_else(|| TransformError::EmptyLocaleMap {
                path: path.to_string(),
            })
    }

    /// Representative value of an optional reference field. `None` when the
    /// field is absent or its representative value is falsy.
    fn optional<'a>(
        &self,
        fields: &'a Map<String, Value>,
        name: &str,
    ) -> Result<Option<&'a Value>, TransformError> {
        match fields.get(name) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => {
                let locales = as_locale_map(value, &format!("fields.{name}"))?;
                Ok(self.locale.value(locales).filter(|v| is_truthy(v)))
            }
        }
    }
}

impl Transform for FeedItemTransformer {
    fn apply(&self, entry: &Entry) -> Result<FlatRecord, TransformError> {
        let fields = &entry.fields;

        let variants_path = "fields.variants";
        let variants =
            self.representative(locale_map(fields, VARIANTS, variants_path)?, variants_path)?;
        let variant = variants
            .as_array()
            .ok_or_else(|| unexpected(variants_path, "a list", variants))?
            .first()
            .ok_or_else(|| TransformError::EmptyList {
                path: variants_path.to_string(),
            })?;
        let variant_fields = referenced_fields(variant, "fields.variants[0]")?;

        let size_class_path = "fields.variants[0].fields.sizeClass";
        let size_class = self.representative(
            locale_map(variant_fields, SIZE_CLASS, size_class_path)?,
            size_class_path,
        )?;

        let mfc_path = "fields.mfc";
        let mfc = self.representative(locale_map(fields, MFC, mfc_path)?, mfc_path)?;

        let mut record = FlatRecord::new();
        record.insert(MFC_COLUMN, as_text(mfc, mfc_path)?);
        record.insert(SIZE_CLASS_COLUMN, as_text(size_class, size_class_path)?);

        record.extend(flatten_locale_map(
            locale_map(fields, NAME, "fields.name")?,
            NAME,
            |locale, value| as_text(value, &format!("fields.name.{locale}")),
        )?);

        record.extend(flatten_locale_map(
            locale_map(fields, DESCRIPTION, "fields.description")?,
            DESCRIPTION,
            |_, value| Ok(rich_text::to_plain_text(value)),
        )?);

        record.extend(flatten_locale_map(
            locale_map(fields, DETAILS, "fields.details")?,
            DETAILS,
            |locale, value| {
                let path = format!("fields.details.{locale}");
                let text = value
                    .as_str()
                    .ok_or_else(|| unexpected(&path, "text", value))?;
                Ok(replace_newlines(text))
            },
        )?);

        if let Some(categories) = self.optional(fields, CATEGORY)? {
            let categories = categories
                .as_array()
                .ok_or_else(|| unexpected("fields.category", "a list", categories))?;
            let per_category = categories
                .iter()
                .enumerate()
                .map(|(i, category)| {
                    name_columns(category, MICRO_CATEGORY_PREFIX, &format!("fields.category[{i}]"))
                })
                .collect::<Result<Vec<_>, _>>()?;
            record.extend(concat_with_fallback(&per_category));
        }

        for (field, prefix) in [
            (MICRO_COLOR, MICRO_COLOR_PREFIX),
            (MACRO_COLOR, MACRO_COLOR_PREFIX),
        ] {
            if let Some(color) = self.optional(fields, field)? {
                record.extend(name_columns(color, prefix, &format!("fields.{field}"))?);
            }
        }

        Ok(record)
    }
}

fn unexpected(path: &str, expected: &'static str, found: &Value) -> TransformError {
    TransformError::UnexpectedType {
        path: path.to_string(),
        expected,
        found: type_name(found),
    }
}

fn as_locale_map<'a>(value: &'a Value, path: &str) -> Result<&'a LocaleMap, TransformError> {
    value
        .as_object()
        .ok_or_else(|| unexpected(path, "a locale map", value))
}

fn locale_map<'a>(
    fields: &'a Map<String, Value>,
    name: &str,
    path: &str,
) -> Result<&'a LocaleMap, TransformError> {
    let value = fields
        .get(name)
        .ok_or_else(|| TransformError::missing(path))?;
    as_locale_map(value, path)
}

fn as_text(value: &Value, path: &str) -> Result<String, TransformError> {
    scalar_text(value).ok_or_else(|| unexpected(path, "text", value))
}

fn referenced_fields<'a>(
    entry: &'a Value,
    path: &str,
) -> Result<&'a Map<String, Value>, TransformError> {
    if !entry.is_object() {
        return Err(unexpected(path, "an entry", entry));
    }
    fields_of(entry).ok_or_else(|| TransformError::missing(format!("{path}.fields")))
}

/// Every locale of a referenced entry's `name`, as `{prefix}_{locale}`.
fn name_columns(entry: &Value, prefix: &str, path: &str) -> Result<FlatRecord, TransformError> {
    let fields = referenced_fields(entry, path)?;
    let name_path = format!("{path}.fields.name");
    let names = locale_map(fields, NAME, &name_path)?;
    flatten_locale_map(names, prefix, |locale, value| {
        as_text(value, &format!("{name_path}.{locale}"))
    })
}
