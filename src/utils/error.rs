use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Spreadsheet read error: {0}")]
    SpreadsheetError(#[from] calamine::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Workbook write error: {0}")]
    XlsxError(#[from] rust_xlsxwriter::XlsxError),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Unsupported input format: {extension}")]
    UnsupportedFormatError { extension: String },

    #[error("Input read error: {message}")]
    InputReadError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Config,
    Output,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn input(message: impl Into<String>) -> Self {
        EtlError::InputReadError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::SpreadsheetError(_)
            | EtlError::CsvError(_)
            | EtlError::UnsupportedFormatError { .. }
            | EtlError::InputReadError { .. } => ErrorCategory::Input,
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::MissingConfigError { .. } => ErrorCategory::Config,
            EtlError::XlsxError(_) | EtlError::SerializationError(_) => ErrorCategory::Output,
            EtlError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input => ErrorSeverity::High,
            ErrorCategory::Config => ErrorSeverity::High,
            ErrorCategory::Output => ErrorSeverity::Critical,
            ErrorCategory::System => match self {
                EtlError::IoError(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    ErrorSeverity::High
                }
                _ => ErrorSeverity::Critical,
            },
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            EtlError::UnsupportedFormatError { .. } => {
                "Upload an .xlsx, .xls, .ods or .csv export of the order collector"
            }
            EtlError::SpreadsheetError(_) | EtlError::InputReadError { .. } => {
                "Re-export the order list from the collector and make sure the first row holds the column headers"
            }
            EtlError::CsvError(_) => "Check that the CSV file is UTF-8 encoded and properly quoted",
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::MissingConfigError { .. } => {
                "Fix the configuration file or command line flags and run again"
            }
            EtlError::XlsxError(_) | EtlError::SerializationError(_) => {
                "Report this failure together with the input file"
            }
            EtlError::IoError(_) => "Check that the input file exists and the output directory is writable",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            EtlError::UnsupportedFormatError { extension } => {
                format!("'{}' files cannot be converted", extension)
            }
            EtlError::SpreadsheetError(_) | EtlError::InputReadError { .. } | EtlError::CsvError(_) => {
                format!("The uploaded file could not be read: {}", self)
            }
            EtlError::IoError(e) => format!("File access failed: {}", e),
            _ => self.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_errors_are_categorized_as_input() {
        let err = EtlError::input("no header row");
        assert_eq!(err.category(), ErrorCategory::Input);
        assert_eq!(err.severity(), ErrorSeverity::High);

        let err = EtlError::UnsupportedFormatError {
            extension: "pdf".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Input);
        assert!(err.user_friendly_message().contains("pdf"));
    }

    #[test]
    fn test_missing_file_is_not_critical() {
        let err = EtlError::IoError(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "orders.xlsx",
        ));
        assert_eq!(err.category(), ErrorCategory::System);
        assert_eq!(err.severity(), ErrorSeverity::High);

        let err = EtlError::IoError(std::io::Error::other("disk full"));
        assert_eq!(err.severity(), ErrorSeverity::Critical);
    }
}
