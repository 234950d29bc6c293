//! Dataset source port trait.

use crate::domain::column::ColumnDescriptor;
use crate::domain::dataset::Dataset;
use crate::domain::error::FundviewError;

pub trait DatasetPort {
    /// Load the dataset named `source`, keeping only `columns`.
    fn load(&self, source: &str, columns: &[ColumnDescriptor]) -> Result<Dataset, FundviewError>;

    /// Names of the datasets this source can load.
    fn list_sources(&self) -> Result<Vec<String>, FundviewError>;
}
