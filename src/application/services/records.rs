//! Specimen record ingestion
//!
//! Reads the CSV export of the specimen spreadsheet into a `RecordTable`.

use std::io;
use std::path::Path;
use std::sync::{Arc, LazyLock};

use regex::Regex;
use tracing::{debug, info};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{parse_taxon, Rank, RecordTable, TaxonRecord};
use crate::infrastructure::traits::FileSystem;

/// Spreadsheet exports name index columns `Unnamed: 0`, `Unnamed: 1`, ...
const UNNAMED_PREFIX: &str = "unnamed";

/// Everything a normalised header may not contain.
static HEADER_NOISE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9_]").expect("static header pattern"));

/// Service for loading specimen records from CSV files.
pub struct RecordService {
    fs: Arc<dyn FileSystem>,
}

impl RecordService {
    /// Create a new record service.
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Load and normalise the records in `path`.
    pub fn load(&self, path: &Path) -> ApplicationResult<RecordTable> {
        debug!("load: path={}", path.display());
        if !self.fs.exists(path) {
            return Err(ApplicationError::InputNotFound(path.to_path_buf()));
        }
        if !self.fs.is_file(path) {
            return Err(ApplicationError::Io {
                context: format!("read records: {}", path.display()),
                source: io::Error::new(io::ErrorKind::InvalidInput, "not a regular file"),
            });
        }
        let content = self
            .fs
            .read_to_string(path)
            .with_path_context("read records", path)?;
        let table = parse_records(&content, path)?;
        info!("loaded {} records from {}", table.len(), path.display());
        Ok(table)
    }
}

/// Parse CSV `content` into records.
///
/// Header names are lowercased and stripped of everything but `[a-z0-9_]`,
/// so `Sub Family` matches `subfamily`. `unnamed*` columns are ignored.
/// Short rows are padded with the sentinel.
pub fn parse_records(content: &str, origin: &Path) -> ApplicationResult<RecordTable> {
    let csv_err = |source: csv::Error| ApplicationError::Csv {
        path: origin.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers: Vec<(usize, String)> = reader
        .headers()
        .map_err(csv_err)?
        .iter()
        .map(|h| HEADER_NOISE.replace_all(&h.to_lowercase(), "").into_owned())
        .enumerate()
        .filter(|(_, h)| !h.starts_with(UNNAMED_PREFIX))
        .collect();
    debug!("parse_records: headers={:?}", headers);

    let mut columns = Vec::with_capacity(Rank::ALL.len());
    for rank in Rank::ALL {
        let (position, _) = headers
            .iter()
            .find(|(_, h)| h == rank.as_str())
            .ok_or_else(|| ApplicationError::MissingColumn {
                path: origin.to_path_buf(),
                column: rank.to_string(),
            })?;
        columns.push((rank, *position));
    }

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(csv_err)?;
        let mut row = TaxonRecord::default();
        for &(rank, position) in &columns {
            row.set(rank, parse_taxon(record.get(position).unwrap_or("")));
        }
        rows.push(row);
    }
    Ok(RecordTable::new(rows))
}
