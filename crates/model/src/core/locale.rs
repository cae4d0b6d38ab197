use serde_json::{Map, Value};
use std::fmt;

/// A locale-map: locale code -> value, in the order the API delivered it.
pub type LocaleMap = Map<String, Value>;

/// Decides which locale stands in for a field when a single value is needed
/// (variant lists, category lists, colors, scalar codes).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LocaleSelection {
    /// The first locale key listed in the locale-map.
    #[default]
    FirstListed,

    /// A named locale, falling back to the first listed one when the
    /// locale-map has no value for it.
    Preferred(String),
}

impl LocaleSelection {
    /// Builds a selection from an optional locale code. Blank codes mean
    /// "first listed".
    pub fn from_code(code: Option<&str>) -> Self {
        match code.map(str::trim) {
            Some(code) if !code.is_empty() => LocaleSelection::Preferred(code.to_string()),
            _ => LocaleSelection::FirstListed,
        }
    }

    /// Returns the representative `(locale, value)` pair of a locale-map, or
    /// `None` when the map is empty.
    pub fn select<'a>(&self, locales: &'a LocaleMap) -> Option<(&'a str, &'a Value)> {
        if let LocaleSelection::Preferred(code) = self
            && let Some((locale, value)) = locales.get_key_value(code.as_str())
        {
            return Some((locale.as_str(), value));
        }

        first_entry(locales)
    }

    /// Shorthand for [`LocaleSelection::select`] that drops the locale code.
    pub fn value<'a>(&self, locales: &'a LocaleMap) -> Option<&'a Value> {
        self.select(locales).map(|(_, value)| value)
    }
}

impl fmt::Display for LocaleSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocaleSelection::FirstListed => f.write_str("first listed locale"),
            LocaleSelection::Preferred(code) => write!(f, "{code} (fallback: first listed)"),
        }
    }
}

/// First `(locale, value)` pair in iteration order.
pub fn first_entry(locales: &LocaleMap) -> Option<(&str, &Value)> {
    locales
        .iter()
        .next()
        .map(|(locale, value)| (locale.as_str(), value))
}
