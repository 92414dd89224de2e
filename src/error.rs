#[derive(thiserror::Error, Debug)]
pub enum ScheduleError {
    #[error("Invalid departure time '{input}': {reason}")]
    FormatError { input: String, reason: &'static str },
    #[error("Unknown stop: {0}")]
    UnknownStopError(String),
    #[error("I/O failure: {0}")]
    StorageError(#[from] std::io::Error),
    #[error("Stored schedule could not be (de)serialized: {0}")]
    SerializationError(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    ConfigError(String),
}

impl ScheduleError {
    /// Errors caused by user input or configuration rather than by the environment
    pub fn is_rejection(&self) -> bool {
        matches!(self, ScheduleError::FormatError { .. } | ScheduleError::UnknownStopError(_) | ScheduleError::ConfigError(_))
    }
}
