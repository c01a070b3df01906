use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatingError {
    #[error("Invalid gestational age {field}={value}: {reason}")]
    InvalidGestationalAge {
        field: String,
        value: i64,
        reason: String,
    },

    #[error("Ultrasound inconsistency: {message}")]
    UltrasoundInconsistency { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

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

    #[error("Record {row} could not be processed: {message}")]
    RecordError { row: usize, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    DataEntry,
    DataQuality,
    Configuration,
    Io,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl DatingError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            DatingError::InvalidGestationalAge { .. } => ErrorCategory::DataEntry,
            DatingError::UltrasoundInconsistency { .. } | DatingError::RecordError { .. } => {
                ErrorCategory::DataQuality
            }
            DatingError::ConfigError { .. }
            | DatingError::ConfigValidationError { .. }
            | DatingError::InvalidConfigValueError { .. }
            | DatingError::MissingConfigError { .. } => ErrorCategory::Configuration,
            DatingError::IoError(_)
            | DatingError::CsvError(_)
            | DatingError::SerializationError(_) => ErrorCategory::Io,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::DataQuality => ErrorSeverity::Medium,
            ErrorCategory::DataEntry | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Io => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            DatingError::InvalidGestationalAge { .. } => {
                "Enter ultrasound GA as 1-39 weeks and 0-6 days; carry 7+ days into weeks"
            }
            DatingError::UltrasoundInconsistency { .. } => {
                "Review the ultrasound report: the recorded EDD does not match the recorded GA"
            }
            DatingError::RecordError { .. } => {
                "Fix the listed record or set error_handling.on_invalid_record = \"report\""
            }
            DatingError::ConfigError { .. }
            | DatingError::ConfigValidationError { .. }
            | DatingError::InvalidConfigValueError { .. }
            | DatingError::MissingConfigError { .. } => {
                "Check the configuration file or command-line arguments"
            }
            DatingError::IoError(_) => "Check that the input file exists and the output path is writable",
            DatingError::CsvError(_) => "Check the input CSV header and column values",
            DatingError::SerializationError(_) => "Check the output data for unsupported values",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            DatingError::InvalidGestationalAge { field, value, .. } => {
                format!("The ultrasound {} value {} is out of range", field, value)
            }
            DatingError::UltrasoundInconsistency { message } => {
                format!("The ultrasound record needs review: {}", message)
            }
            DatingError::RecordError { row, message } => {
                format!("Row {} was rejected: {}", row, message)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DatingError>;
