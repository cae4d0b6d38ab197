use std::collections::HashSet;

/// One denormalized output row: string columns in insertion order.
///
/// Column names are unique; inserting an existing column replaces its value
/// in place and keeps its position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlatRecord {
    columns: Vec<(String, String)>,
}

impl FlatRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<String>) {
        let column = column.into();
        let value = value.into();
        match self.columns.iter_mut().find(|(name, _)| *name == column) {
            Some((_, existing)) => *existing = value,
            None => self.columns.push((column, value)),
        }
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }

    /// Value of the first column, in insertion order.
    pub fn first_value(&self) -> Option<&str> {
        self.columns.first().map(|(_, value)| value.as_str())
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.columns
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl Extend<(String, String)> for FlatRecord {
    fn extend<I: IntoIterator<Item = (String, String)>>(&mut self, iter: I) {
        for (column, value) in iter {
            self.insert(column, value);
        }
    }
}

impl FromIterator<(String, String)> for FlatRecord {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut record = FlatRecord::new();
        record.extend(iter);
        record
    }
}

impl IntoIterator for FlatRecord {
    type Item = (String, String);
    type IntoIter = std::vec::IntoIter<(String, String)>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.into_iter()
    }
}

/// Union of the column names of `records`, ordered by first appearance.
pub fn union_columns(records: &[FlatRecord]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut columns = Vec::new();
    for column in records.iter().flat_map(FlatRecord::columns) {
        if seen.insert(column) {
            columns.push(column.to_string());
        }
    }
    columns
}
