#![allow(dead_code)]

use fundview::domain::column::ColumnDescriptor;
use fundview::domain::dataset::{Dataset, RowRecord};
use fundview::domain::error::FundviewError;
use fundview::ports::dataset_port::DatasetPort;
use std::collections::HashMap;

pub struct MockDatasetPort {
    pub data: HashMap<String, Vec<RowRecord>>,
    pub errors: HashMap<String, String>,
}

impl MockDatasetPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_rows(mut self, source: &str, rows: Vec<RowRecord>) -> Self {
        self.data.insert(source.to_string(), rows);
        self
    }

    pub fn with_error(mut self, source: &str, reason: &str) -> Self {
        self.errors.insert(source.to_string(), reason.to_string());
        self
    }
}

impl DatasetPort for MockDatasetPort {
    fn load(&self, source: &str, columns: &[ColumnDescriptor]) -> Result<Dataset, FundviewError> {
        if let Some(reason) = self.errors.get(source) {
            return Err(FundviewError::Data {
                file: source.to_string(),
                reason: reason.clone(),
            });
        }
        let rows = self.data.get(source).cloned().unwrap_or_default();
        Ok(Dataset::new(columns.to_vec(), rows)?)
    }

    fn list_sources(&self) -> Result<Vec<String>, FundviewError> {
        let mut sources: Vec<String> = self.data.keys().cloned().collect();
        sources.sort();
        Ok(sources)
    }
}

pub fn company(name: &str, points: f64) -> RowRecord {
    RowRecord::new().with("company", name).with("points", points)
}

/// `[B(5), A(5), C(9)]`, the tie-breaking fixture.
pub fn tied_companies() -> Vec<RowRecord> {
    vec![company("B", 5.0), company("A", 5.0), company("C", 9.0)]
}

pub fn fund(name: &str, sector: &str, return_1y: f64, risk: &str, aum: f64) -> RowRecord {
    RowRecord::new()
        .with("fundName", name)
        .with("sector", sector)
        .with("return1Year", return_1y)
        .with("riskLevel", risk)
        .with("aum", aum)
}

pub fn sample_funds() -> Vec<RowRecord> {
    vec![
        fund("Yapay Zeka Fonu", "Technology", 45.2, "High", 1420.0),
        fund("Altin Fonu", "Commodities", 38.7, "Medium", 2850.0),
        fund("Temettu Fonu", "Finance", 22.1, "Low", 980.0),
        fund("Enerji Fonu", "Energy", 38.7, "High", 610.0),
    ]
}

pub fn fund_columns() -> Vec<ColumnDescriptor> {
    vec![
        ColumnDescriptor::text("fundName", "Fund"),
        ColumnDescriptor::text("sector", "Sector"),
        ColumnDescriptor::numeric("return1Year", "1Y Return", 1),
        ColumnDescriptor::enumerated("riskLevel", "Risk", &["Low", "Medium", "High"]),
        ColumnDescriptor::numeric("aum", "AUM", 0),
    ]
}

pub fn risk_row(name: &str, rm1: f64, rm2: f64, rm3: f64) -> RowRecord {
    RowRecord::new()
        .with("fundName", name)
        .with("rm1", rm1)
        .with("rm2", rm2)
        .with("rm3", rm3)
}

pub fn sample_risk() -> Vec<RowRecord> {
    vec![
        risk_row("Atlas", 7.8, 5.2, 4.0),
        risk_row("Deniz", 6.1, 4.6, 5.6),
        risk_row("Yapi Kredi", 4.3, 7.1, 6.6),
    ]
}

pub fn performance_row(name: &str, m1: f64, m6: f64, y1: f64) -> RowRecord {
    RowRecord::new()
        .with("company", name)
        .with("1m", m1)
        .with("6m", m6)
        .with("1y", y1)
}

pub fn sample_performance() -> Vec<RowRecord> {
    vec![
        performance_row("Atlas", 2.1, 18.4, 31.0),
        performance_row("Deniz", 3.4, 9.2, 40.5),
        performance_row("Yapi Kredi", 1.2, 12.0, 22.8),
    ]
}
