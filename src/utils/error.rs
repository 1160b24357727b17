use thiserror::Error;

/// A malformed input row, or a header that does not describe the expected dialect.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{file}:{row}: {reason}")]
pub struct ParseError {
    pub file: String,
    pub row: u64,
    pub reason: String,
}

impl ParseError {
    pub fn new(file: impl Into<String>, row: u64, reason: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            row,
            reason: reason.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum CodeplugError {
    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Cannot read {path}: {source}")]
    InputError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Parse error: {0}")]
    ParseError(#[from] ParseError),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
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
    Configuration,
    Input,
    Output,
    Internal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    High,
    Critical,
}

impl CodeplugError {
    /// An IO failure while reading the conversion's input.
    pub fn input(path: impl Into<String>, source: std::io::Error) -> Self {
        CodeplugError::InputError {
            path: path.into(),
            source,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            CodeplugError::ConfigError { .. }
            | CodeplugError::InvalidConfigValueError { .. }
            | CodeplugError::MissingConfigError { .. } => ErrorCategory::Configuration,
            CodeplugError::CsvError(_)
            | CodeplugError::ParseError(_)
            | CodeplugError::InputError { .. } => ErrorCategory::Input,
            CodeplugError::IoError(_) | CodeplugError::SerializationError(_) => {
                ErrorCategory::Output
            }
            CodeplugError::ProcessingError { .. } => ErrorCategory::Internal,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Configuration | ErrorCategory::Input | ErrorCategory::Output => {
                ErrorSeverity::High
            }
            ErrorCategory::Internal => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            CodeplugError::ParseError(_) | CodeplugError::CsvError(_) => {
                "Check the header row of the named file against the K7ABD column names"
            }
            CodeplugError::InputError { .. } => {
                "Check that the input directory exists and its files are readable"
            }
            CodeplugError::IoError(_) => "Check that the output directory is writable",
            CodeplugError::InvalidConfigValueError { .. } => {
                "Use --radio 878|890|both and --sort alpha|repeaters-first|analog-first"
            }
            CodeplugError::MissingConfigError { .. } | CodeplugError::ConfigError { .. } => {
                "Pass INPUT_DIR and OUTPUT_DIR on the command line or in the --config file"
            }
            CodeplugError::SerializationError(_) | CodeplugError::ProcessingError { .. } => {
                "Re-run with --verbose and report the log output"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            CodeplugError::ParseError(e) => {
                format!("Could not read {} (row {}): {}", e.file, e.row, e.reason)
            }
            CodeplugError::MissingConfigError { field } => {
                format!("No {} was given", field.replace('_', " "))
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CodeplugError>;
