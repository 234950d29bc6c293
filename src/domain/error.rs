//! Domain error types.

/// A table instance was set up with columns and rows that do not agree.
///
/// Raised while a [`Dataset`](crate::domain::dataset::Dataset) or a view is
/// being constructed, never while sorting or selecting.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("duplicate column key: {0}")]
    DuplicateColumn(String),

    #[error("column key must not be empty")]
    EmptyColumnKey,

    #[error("unknown column: {0}")]
    UnknownColumn(String),

    #[error("row {row} has no value for column {key}")]
    MissingCell { row: usize, key: String },

    #[error("row {row}, column {key}: expected {expected} value")]
    KindMismatch {
        row: usize,
        key: String,
        expected: &'static str,
    },

    #[error("row {row}, column {key}: {value:?} is not a declared level")]
    UnknownLevel {
        row: usize,
        key: String,
        value: String,
    },

    #[error("no row with id {0}")]
    UnknownRow(usize),

    #[error("invalid color scale: {reason}")]
    ColorScale { reason: String },

    #[error("unknown option: {0}")]
    UnknownOption(String),
}

/// Top-level error type for fundview.
#[derive(Debug, thiserror::Error)]
pub enum FundviewError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error("data error in {file}: {reason}")]
    Data { file: String, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&FundviewError> for std::process::ExitCode {
    fn from(err: &FundviewError) -> Self {
        let code: u8 = match err {
            FundviewError::Io(_) => 1,
            FundviewError::ConfigParse { .. }
            | FundviewError::ConfigMissing { .. }
            | FundviewError::ConfigInvalid { .. } => 2,
            FundviewError::Configuration(_) => 3,
            FundviewError::Data { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_error_messages_name_the_column() {
        let err = ConfigurationError::MissingCell {
            row: 3,
            key: "points".into(),
        };
        assert_eq!(err.to_string(), "row 3 has no value for column points");

        let err = ConfigurationError::UnknownColumn("budget".into());
        assert_eq!(err.to_string(), "unknown column: budget");
    }

    #[test]
    fn configuration_error_converts_transparently() {
        let err: FundviewError = ConfigurationError::DuplicateColumn("aum".into()).into();
        assert_eq!(err.to_string(), "duplicate column key: aum");
        assert!(matches!(err, FundviewError::Configuration(_)));
    }

    #[test]
    fn config_errors_render_section_and_key() {
        let err = FundviewError::ConfigInvalid {
            section: "table".into(),
            key: "selection".into(),
            reason: "expected row_click, row_hover or cell_click".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid config value [table] selection: expected row_click, row_hover or cell_click"
        );
    }
}
