//! CSV file dataset adapter.
//!
//! The header row names the columns; a file may carry more columns than the
//! table declares, but never fewer.

use crate::domain::column::{CellValue, ColumnDescriptor, ValueKind};
use crate::domain::dataset::{Dataset, RowRecord};
use crate::domain::error::FundviewError;
use crate::ports::dataset_port::DatasetPort;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

pub struct CsvDatasetAdapter {
    base_path: PathBuf,
}

impl CsvDatasetAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, source: &str) -> PathBuf {
        self.base_path.join(source)
    }
}

impl DatasetPort for CsvDatasetAdapter {
    fn load(&self, source: &str, columns: &[ColumnDescriptor]) -> Result<Dataset, FundviewError> {
        let path = self.csv_path(source);
        let file = path.display().to_string();
        let data_err = |reason: String| FundviewError::Data {
            file: file.clone(),
            reason,
        };

        let content = fs::read_to_string(&path)
            .map_err(|e| data_err(format!("failed to read: {}", e)))?;

        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());

        let headers = rdr
            .headers()
            .map_err(|e| data_err(format!("CSV header error: {}", e)))?
            .clone();

        let mut positions = Vec::with_capacity(columns.len());
        for col in columns {
            let idx = headers
                .iter()
                .position(|h| h == col.key)
                .ok_or_else(|| data_err(format!("missing column {}", col.key)))?;
            positions.push(idx);
        }

        let mut rows = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| data_err(format!("CSV parse error: {}", e)))?;
            let line = record.position().map(|p| p.line()).unwrap_or(0);

            let mut row = RowRecord::new();
            for (col, &idx) in columns.iter().zip(&positions) {
                let raw = record
                    .get(idx)
                    .ok_or_else(|| data_err(format!("line {}: missing {}", line, col.key)))?;
                let value = match col.kind {
                    ValueKind::Numeric => {
                        CellValue::Number(parse_number(raw).ok_or_else(|| {
                            data_err(format!(
                                "line {}: invalid {} value {:?}",
                                line, col.key, raw
                            ))
                        })?)
                    }
                    ValueKind::Text => CellValue::Text(raw.to_string()),
                    ValueKind::Enumerated => CellValue::Category(raw.to_string()),
                };
                row.insert(&col.key, value);
            }
            rows.push(row);
        }

        debug!(file = %file, rows = rows.len(), "dataset loaded");
        Ok(Dataset::new(columns.to_vec(), rows)?)
    }

    fn list_sources(&self) -> Result<Vec<String>, FundviewError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| FundviewError::Data {
            file: self.base_path.display().to_string(),
            reason: format!("failed to read directory: {}", e),
        })?;

        let mut sources = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| FundviewError::Data {
                file: self.base_path.display().to_string(),
                reason: format!("directory entry error: {}", e),
            })?;

            let name = entry.file_name();
            let name_str = name.to_string_lossy();
            if name_str.ends_with(".csv") {
                sources.push(name_str.to_string());
            }
        }

        sources.sort();
        Ok(sources)
    }
}

/// Numbers may carry a trailing `%` or thousands separators.
fn parse_number(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .trim_end_matches('%')
        .chars()
        .filter(|c| *c != ',' && *c != '_')
        .collect();
    cleaned.trim().parse().ok()
}
