use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("{0} is required for submissions")]
    MissingRequiredField(&'static str),

    #[error("System error: {0}")]
    System(String),

    #[error("Sandbox error: {0}")]
    Sandbox(String),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("{0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Request-validation failures are returned to the caller as-is; every
    /// other error is folded into an `ExecutionResult`.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Error::UnsupportedLanguage(_) | Error::MissingRequiredField(_)
        )
    }
}
