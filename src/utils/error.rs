use thiserror::Error;

#[derive(Error, Debug)]
pub enum SantaError {
    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Spreadsheet error: {0}")]
    SpreadsheetError(#[from] calamine::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Input file not found: {path}")]
    InputNotFound { path: String },

    #[error("Table '{table}' is missing required column '{column}'")]
    MissingColumn { table: String, column: String },

    #[error("Table '{table}' line {row}: {reason}")]
    InvalidRecord {
        table: String,
        row: usize,
        reason: String,
    },

    #[error("Participant '{id}' appears more than once in the roster")]
    DuplicateParticipant { id: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Data,
    Configuration,
    Output,
    Internal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl SantaError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            SantaError::InputNotFound { .. } | SantaError::SpreadsheetError(_) => {
                ErrorCategory::Input
            }
            SantaError::CsvError(_)
            | SantaError::MissingColumn { .. }
            | SantaError::InvalidRecord { .. }
            | SantaError::DuplicateParticipant { .. } => ErrorCategory::Data,
            SantaError::ConfigError { .. }
            | SantaError::ConfigValidationError { .. }
            | SantaError::InvalidConfigValueError { .. }
            | SantaError::MissingConfigError { .. } => ErrorCategory::Configuration,
            SantaError::IoError(_) | SantaError::SerializationError(_) => ErrorCategory::Output,
            SantaError::ProcessingError { .. } => ErrorCategory::Internal,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input | ErrorCategory::Data | ErrorCategory::Configuration => {
                ErrorSeverity::High
            }
            ErrorCategory::Output => ErrorSeverity::Medium,
            ErrorCategory::Internal => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            SantaError::InputNotFound { path } => {
                format!("Check that '{}' exists relative to the working directory", path)
            }
            SantaError::MissingColumn { column, .. } => {
                format!("Add a '{}' header to the first row of the table", column)
            }
            SantaError::InvalidRecord { .. } => {
                "Fill in or remove the offending row and run again".to_string()
            }
            SantaError::DuplicateParticipant { .. } => {
                "Each Employee_EmailID must appear only once in the roster".to_string()
            }
            SantaError::SpreadsheetError(_) => {
                "Make sure the spreadsheet opens correctly and the sheet name is right".to_string()
            }
            SantaError::CsvError(_) => "Check the CSV file for malformed quoting".to_string(),
            SantaError::ConfigError { .. }
            | SantaError::ConfigValidationError { .. }
            | SantaError::InvalidConfigValueError { .. }
            | SantaError::MissingConfigError { .. } => {
                "Review the configuration flags or TOML file".to_string()
            }
            SantaError::IoError(_) => {
                "Check that the output directory is writable".to_string()
            }
            SantaError::SerializationError(_) | SantaError::ProcessingError { .. } => {
                "Re-run with --verbose and report the log output".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Input => match self {
                SantaError::InputNotFound { .. } => "Error: Input file not found.".to_string(),
                other => format!("Error: could not read input: {}", other),
            },
            ErrorCategory::Data | ErrorCategory::Configuration => format!("Error: {}", self),
            ErrorCategory::Output | ErrorCategory::Internal => {
                format!("An unexpected error occurred: {}", self)
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, SantaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_input_has_distinct_message() {
        let err = SantaError::InputNotFound {
            path: "Employee-list.xlsx".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Input);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert_eq!(err.user_friendly_message(), "Error: Input file not found.");
        assert!(err.recovery_suggestion().contains("Employee-list.xlsx"));
    }

    #[test]
    fn test_other_failures_are_reported_generically() {
        let err = SantaError::ProcessingError {
            message: "boom".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert!(err
            .user_friendly_message()
            .starts_with("An unexpected error occurred:"));
    }
}
