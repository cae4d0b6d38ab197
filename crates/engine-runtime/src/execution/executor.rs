use crate::error::ExportError;
use connectors::{
    file::csv::writer::{CsvFeedWriter, WriteSummary},
    source::EntrySource,
};
use engine_processing::{
    producer::{EntryProducer, ProducerConfig},
    transform::{
        feed_item::FeedItemTransformer,
        pipeline::{SkippedEntry, transform_all},
    },
};
use model::core::locale::LocaleSelection;
use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};
use tracing::info;

/// Default destination of the feed, relative to the working directory.
pub const DEFAULT_OUTPUT_PATH: &str = "./products.csv";

/// What to export and where to write it.
#[derive(Debug, Clone)]
pub struct ExportPlan {
    pub producer: ProducerConfig,
    pub locale: LocaleSelection,
    pub output: PathBuf,
}

impl Default for ExportPlan {
    fn default() -> Self {
        Self {
            producer: ProducerConfig::default(),
            locale: LocaleSelection::default(),
            output: PathBuf::from(DEFAULT_OUTPUT_PATH),
        }
    }
}

/// Outcome of a completed export.
#[derive(Debug, Clone)]
pub struct ExportSummary {
    pub output: PathBuf,
    pub fetched: usize,
    pub written: usize,
    pub columns: usize,
    pub skipped: Vec<SkippedEntry>,
    pub duration: Duration,
}

/// Fetches every entry, flattens each one and writes the feed once at the
/// end. A fetch failure aborts before anything is written; entries that
/// cannot be flattened are left out.
pub async fn run(
    source: Arc<dyn EntrySource>,
    plan: ExportPlan,
) -> Result<ExportSummary, ExportError> {
    ExportExecutor::new(source, plan).execute().await
}

struct ExportExecutor {
    producer: EntryProducer,
    transformer: FeedItemTransformer,
    writer: CsvFeedWriter,
}

impl ExportExecutor {
    fn new(source: Arc<dyn EntrySource>, plan: ExportPlan) -> Self {
        Self {
            producer: EntryProducer::new(source, plan.producer),
            transformer: FeedItemTransformer::new(plan.locale),
            writer: CsvFeedWriter::new(plan.output),
        }
    }

    async fn execute(self) -> Result<ExportSummary, ExportError> {
        let start_time = std::time::Instant::now();
        info!(
            content_type = %self.producer.config().content_type,
            locale = %self.transformer.locale(),
            output = %self.writer.path().display(),
            "Starting export"
        );

        let entries = self.producer.fetch_all().await?;
        let fetched = entries.len();

        let ExportExecutor {
            transformer,
            writer,
            ..
        } = self;

        let (skipped, written, output) = tokio::task::spawn_blocking(move || {
            let outcome = transform_all(&transformer, &entries);
            let summary: WriteSummary = writer.write(&outcome.records)?;
            Ok::<_, ExportError>((outcome.skipped, summary, writer.path().to_path_buf()))
        })
        .await??;

        let summary = ExportSummary {
            output,
            fetched,
            written: written.rows,
            columns: written.columns,
            skipped,
            duration: start_time.elapsed(),
        };

        info!(
            fetched = summary.fetched,
            written = summary.written,
            skipped = summary.skipped.len(),
            columns = summary.columns,
            "Export completed in {:.2}s",
            summary.duration.as_secs_f64()
        );
        Ok(summary)
    }
}

impl ExportSummary {
    pub fn output(&self) -> &Path {
        &self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use connectors::error::SourceError;
    use engine_processing::error::ProducerError;
    use model::{
        pagination::page::{EntryPage, PageRequest},
        records::entry::Entry,
    };
    use serde_json::{Value, json};

    /// Serves fixed entries from memory, `limit` at a time.
    struct StaticSource {
        entries: Vec<Entry>,
        fail: bool,
    }

    #[async_trait]
    impl EntrySource for StaticSource {
        async fn fetch_page(&self, request: &PageRequest) -> Result<EntryPage, SourceError> {
            if self.fail {
                return Err(SourceError::Status {
                    status: 401,
                    body: "unauthorized".into(),
                });
            }
            let items = self
                .entries
                .iter()
                .skip(request.skip)
                .take(request.limit)
                .cloned()
                .collect();
            Ok(EntryPage {
                items,
                total: self.entries.len(),
                took_ms: 0,
            })
        }
    }

    fn doc(text: &str) -> Value {
        json!({
            "nodeType": "document",
            "content": [{
                "nodeType": "paragraph",
                "content": [{ "nodeType": "text", "value": text }]
            }]
        })
    }

    fn product(id: &str, mfc: &str, micro_color: Option<&str>) -> Entry {
        let mut fields = json!({
            "mfc": { "en": mfc },
            "variants": { "en": [{ "sys": { "id": "v" }, "fields": { "sizeClass": { "en": "regular" } } }] },
            "name": { "en": format!("Name {id}"), "fr": format!("Nom {id}") },
            "description": { "en": doc("Soft.") },
            "details": { "en": "a\nb" }
        });
        if let Some(color) = micro_color {
            fields["microColor"] = json!({ "en": { "sys": { "id": "c" }, "fields": { "name": { "en": color } } } });
        }
        Entry::from_json(json!({ "sys": { "id": id }, "fields": fields })).unwrap()
    }

    fn broken(id: &str) -> Entry {
        Entry::from_json(json!({ "sys": { "id": id }, "fields": { "mfc": { "en": "X" } } })).unwrap()
    }

    fn plan(output: PathBuf, page_size: usize) -> ExportPlan {
        ExportPlan {
            producer: ProducerConfig::default().with_page_size(page_size),
            output,
            ..Default::default()
        }
    }

    fn read_csv(path: &Path) -> (Vec<String>, Vec<Vec<String>>) {
        let mut reader = csv::Reader::from_path(path).unwrap();
        let header = reader.headers().unwrap().iter().map(String::from).collect();
        let rows = reader
            .records()
            .map(|r| r.unwrap().iter().map(String::from).collect())
            .collect();
        (header, rows)
    }

    #[tokio::test]
    async fn test_export_skips_broken_entries() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("products.csv");
        let source = Arc::new(StaticSource {
            entries: vec![
                product("p1", "M-1", None),
                broken("p2"),
                product("p3", "M-3", Some("Navy")),
                broken("p4"),
                product("p5", "M-5", None),
            ],
            fail: false,
        });

        let summary = run(source, plan(output.clone(), 2)).await.unwrap();

        assert_eq!(summary.fetched, 5);
        assert_eq!(summary.written, 3);
        let skipped: Vec<_> = summary.skipped.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(skipped, vec!["p2", "p4"]);

        let (header, rows) = read_csv(&output);
        assert_eq!(
            header,
            vec![
                "MFC",
                "size_class",
                "name_en",
                "name_fr",
                "description_en",
                "details_en",
                "micro_color_en"
            ]
        );
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], vec!["M-1", "regular", "Name p1", "Nom p1", "Soft.", "a b", ""]);
        assert_eq!(rows[1][0], "M-3");
        assert_eq!(rows[1][6], "Navy");
        assert_eq!(rows[2][0], "M-5");
    }

    #[tokio::test]
    async fn test_fetch_failure_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("products.csv");
        let source = Arc::new(StaticSource {
            entries: vec![product("p1", "M-1", None)],
            fail: true,
        });

        let err = run(source, plan(output.clone(), 100)).await.unwrap_err();

        assert!(matches!(
            err,
            ExportError::Producer(ProducerError::Fetch { .. })
        ));
        assert!(!output.exists());
    }

    #[tokio::test]
    async fn test_output_is_replaced_on_rerun() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("products.csv");
        let first = Arc::new(StaticSource {
            entries: vec![product("p1", "M-1", None), product("p2", "M-2", None)],
            fail: false,
        });
        let second = Arc::new(StaticSource {
            entries: vec![product("p3", "M-3", None)],
            fail: false,
        });

        run(first, plan(output.clone(), 100)).await.unwrap();
        let summary = run(second, plan(output.clone(), 100)).await.unwrap();

        assert_eq!(summary.output(), output.as_path());
        let (_, rows) = read_csv(&output);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0][0], "M-3");
    }
}
