use thiserror::Error;

/// 模型呼叫失敗的原因，僅在單一比對內使用，不會中斷整個執行
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("network error: {0}")]
    Network(String),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed response: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for ModelError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ModelError::Malformed(e.to_string())
        } else {
            ModelError::Network(e.to_string())
        }
    }
}

#[derive(Error, Debug)]
pub enum AuditError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("TSV export error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Model call failed: {0}")]
    ModelError(#[from] ModelError),

    #[error("Document error in {path}: {message}")]
    DocumentError { path: String, message: String },

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
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
    Configuration,
    Document,
    Model,
    Output,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl AuditError {
    pub fn document(path: impl Into<String>, message: impl Into<String>) -> Self {
        AuditError::DocumentError {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            AuditError::ConfigValidationError { .. }
            | AuditError::InvalidConfigValueError { .. }
            | AuditError::MissingConfigError { .. } => ErrorCategory::Configuration,
            AuditError::ZipError(_) | AuditError::DocumentError { .. } => ErrorCategory::Document,
            AuditError::ModelError(_) => ErrorCategory::Model,
            AuditError::IoError(_)
            | AuditError::SerializationError(_)
            | AuditError::CsvError(_) => ErrorCategory::Output,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 逐對比對中的模型失敗會轉為判定結果，不會中止執行
            AuditError::ModelError(_) => ErrorSeverity::Medium,
            AuditError::ConfigValidationError { .. }
            | AuditError::InvalidConfigValueError { .. }
            | AuditError::MissingConfigError { .. }
            | AuditError::DocumentError { .. }
            | AuditError::ZipError(_) => ErrorSeverity::High,
            AuditError::IoError(_)
            | AuditError::SerializationError(_)
            | AuditError::CsvError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Configuration => "Check the TOML config file and command line flags",
            ErrorCategory::Document => {
                "Make sure the document exists and is a valid DOCX or UTF-8 text file"
            }
            ErrorCategory::Model => "Make sure the local completion server is running",
            ErrorCategory::Output => "Check file permissions and free disk space",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::Document => format!("Could not load document: {}", self),
            ErrorCategory::Model => format!("Language model unavailable: {}", self),
            ErrorCategory::Output => format!("Could not read or write files: {}", self),
        }
    }

    /// 對應 CLI 結束碼
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, AuditError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_errors_are_high_severity() {
        let err = AuditError::document("zmluva.docx", "missing word/document.xml");
        assert_eq!(err.category(), ErrorCategory::Document);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert_eq!(err.exit_code(), 1);
        assert!(err.to_string().contains("zmluva.docx"));
    }

    #[test]
    fn test_io_errors_map_to_critical_exit_code() {
        let err: AuditError =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied").into();
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn test_model_error_display() {
        let err = ModelError::Status {
            status: 503,
            body: "busy".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 503: busy");
        assert_eq!(AuditError::from(err).exit_code(), 2);
    }

    #[test]
    fn test_every_error_exits_non_zero() {
        let errors = vec![
            AuditError::MissingConfigError {
                field: "model.endpoint".to_string(),
            },
            AuditError::document("zakon.docx", "missing"),
            AuditError::from(ModelError::Network("refused".to_string())),
            AuditError::from(std::io::Error::other("disk full")),
        ];
        for err in errors {
            assert_ne!(err.exit_code(), 0, "{} must not exit successfully", err);
        }
    }
}
