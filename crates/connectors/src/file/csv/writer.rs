use crate::file::csv::error::FileError;
use model::records::flat::{FlatRecord, union_columns};
use std::{
    fs, io,
    path::{Path, PathBuf},
};
use tempfile::NamedTempFile;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteSummary {
    pub rows: usize,
    pub columns: usize,
}

/// Writes flat records to a CSV file whose header is the union of every
/// record's columns.
#[derive(Debug, Clone)]
pub struct CsvFeedWriter {
    path: PathBuf,
}

impl CsvFeedWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes all records in one pass and replaces the destination file.
    /// Missing parent directories are created.
    pub fn write(&self, records: &[FlatRecord]) -> Result<WriteSummary, FileError> {
        let summary = self.replace_with(|out| write_records(out, records))?;

        info!(
            path = %self.path.display(),
            rows = summary.rows,
            columns = summary.columns,
            "CSV feed written"
        );
        Ok(summary)
    }

    /// Runs `fill` against a temporary file next to the destination and moves
    /// it into place only when `fill` succeeds. On failure the previous
    /// destination file is left untouched.
    fn replace_with<T, F>(&self, fill: F) -> Result<T, FileError>
    where
        F: FnOnce(&mut NamedTempFile) -> Result<T, FileError>,
    {
        let io_err = |source| FileError::Io {
            path: self.path.display().to_string(),
            source,
        };

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).map_err(io_err)?;

        let mut tmp = NamedTempFile::new_in(dir).map_err(io_err)?;
        let value = fill(&mut tmp)?;
        tmp.persist(&self.path)
            .map_err(|err| FileError::Persist {
                path: self.path.display().to_string(),
                source: err.error,
            })?;
        Ok(value)
    }
}

/// Writes the header and one row per record to `out`; absent columns become
/// empty cells. Nothing is written for an empty record set.
pub fn write_records<W: io::Write>(
    out: W,
    records: &[FlatRecord],
) -> Result<WriteSummary, FileError> {
    if records.is_empty() {
        return Ok(WriteSummary {
            rows: 0,
            columns: 0,
        });
    }

    let columns = union_columns(records);
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(&columns)?;
    for record in records {
        writer.write_record(columns.iter().map(|column| record.get(column).unwrap_or("")))?;
    }
    writer.flush()?;

    Ok(WriteSummary {
        rows: records.len(),
        columns: columns.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pairs: &[(&str, &str)]) -> FlatRecord {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_missing_columns_are_empty_cells() {
        let records = vec![
            record(&[("MFC", "1"), ("name_en", "Shirt")]),
            record(&[("MFC", "2"), ("micro_color_en", "Red")]),
        ];
        let mut out = Vec::new();
        let summary = write_records(&mut out, &records).unwrap();

        assert_eq!(summary, WriteSummary { rows: 2, columns: 3 });
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "MFC,name_en,micro_color_en\n1,Shirt,\n2,,Red\n"
        );
    }

    #[test]
    fn test_values_are_quoted_when_needed() {
        let records = vec![record(&[("micro_category_en", "Tops, Basics"), ("q", "say \"hi\"")])];
        let mut out = Vec::new();
        write_records(&mut out, &records).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "micro_category_en,q\n\"Tops, Basics\",\"say \"\"hi\"\"\"\n"
        );
    }

    #[test]
    fn test_empty_record_set_writes_nothing() {
        let mut out = Vec::new();
        let summary = write_records(&mut out, &[]).unwrap();
        assert_eq!(summary.rows, 0);
        assert!(out.is_empty());
    }

    #[test]
    fn test_write_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("feed").join("products.csv");
        let writer = CsvFeedWriter::new(&path);

        writer.write(&[record(&[("MFC", "1")])]).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "MFC\n1\n");
    }

    #[test]
    fn test_write_truncates_previous_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("products.csv");
        std::fs::write(&path, "stale,data\n1,2\n3,4\n").unwrap();

        CsvFeedWriter::new(&path)
            .write(&[record(&[("MFC", "9")])])
            .unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "MFC\n9\n");
    }

    #[test]
    fn test_failed_write_keeps_previous_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("products.csv");
        std::fs::write(&path, "MFC\n1\n").unwrap();
        let writer = CsvFeedWriter::new(&path);

        let result: Result<(), FileError> = writer.replace_with(|out| {
            io::Write::write_all(out, b"MFC\n2\n")?;
            Err(FileError::Flush(io::Error::other("disk full")))
        });

        assert!(result.is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "MFC\n1\n");
        let leftovers: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(leftovers, vec![std::ffi::OsString::from("products.csv")]);
    }
}
