use crate::transform::error::TransformError;
use model::{
    core::identifiers::EntryId,
    records::{entry::Entry, flat::FlatRecord},
};
use rayon::prelude::*;
use tracing::warn;

/// Turns one raw entry into one flat record, or refuses it.
pub trait Transform: Send + Sync {
    fn apply(&self, entry: &Entry) -> Result<FlatRecord, TransformError>;
}

/// An entry left out of the output, with the reason.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedEntry {
    pub id: EntryId,
    pub reason: TransformError,
}

#[derive(Debug, Default)]
pub struct TransformOutcome {
    /// Records of the transformed entries, in input order.
    pub records: Vec<FlatRecord>,
    pub skipped: Vec<SkippedEntry>,
}

/// Applies `transform` to every entry in parallel. Entries that fail are
/// logged and left out; the remaining records keep the input order.
pub fn transform_all<T>(transform: &T, entries: &[Entry]) -> TransformOutcome
where
    T: Transform + ?Sized,
{
    let results: Vec<Result<FlatRecord, SkippedEntry>> = entries
        .par_iter()
        .map(|entry| {
            transform.apply(entry).map_err(|reason| SkippedEntry {
                id: entry.id().clone(),
                reason,
            })
        })
        .collect();

    let mut outcome = TransformOutcome::default();
    for result in results {
        match result {
            Ok(record) => outcome.records.push(record),
            Err(skipped) => {
                warn!(
                    entry_id = %skipped.id,
                    reason = %skipped.reason,
                    "Skipping entry \"{}\": it probably has some fields missing",
                    skipped.id
                );
                outcome.skipped.push(skipped);
            }
        }
    }
    outcome
}
