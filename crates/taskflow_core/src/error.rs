use crate::validation::ValidationErrors;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AppError {
    #[error("invalid_input - {0}")]
    InvalidInput(String),
    #[error("invalid_data - {0}")]
    InvalidData(String),
    #[error("io_error - {0}")]
    Io(String),
    #[error("validation_failed - {0}")]
    Validation(ValidationErrors),
    #[error("not_found - task not found: {0}")]
    NotFound(String),
    #[error("out_of_range - position {index} is outside 0..{len}")]
    OutOfRange { index: usize, len: usize },
}

impl AppError {
    pub fn invalid_input<M: Into<String>>(message: M) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn invalid_data<M: Into<String>>(message: M) -> Self {
        Self::InvalidData(message.into())
    }

    pub fn io<M: Into<String>>(message: M) -> Self {
        Self::Io(message.into())
    }

    pub fn not_found<M: Into<String>>(id: M) -> Self {
        Self::NotFound(id.into())
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::InvalidData(_) => "invalid_data",
            Self::Io(_) => "io_error",
            Self::Validation(_) => "validation_failed",
            Self::NotFound(_) => "not_found",
            Self::OutOfRange { .. } => "out_of_range",
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::InvalidInput(message) | Self::InvalidData(message) | Self::Io(message) => {
                message.clone()
            }
            Self::Validation(errors) => errors.to_string(),
            Self::NotFound(id) => format!("task not found: {id}"),
            Self::OutOfRange { index, len } => {
                format!("position {index} is outside 0..{len}")
            }
        }
    }

    /// Field errors carried by a rejected draft, if this is one.
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
