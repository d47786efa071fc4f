pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("task join error: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("invalid duration `{input}`: {source}")]
    InvalidDuration {
        input: String,
        #[source]
        source: humantime::DurationError,
    },

    #[error("`duration` must be greater than zero (got `{0}`)")]
    NonPositiveDuration(String),

    #[error("`concurrency` must be a positive integer")]
    InvalidConcurrency,

    #[error("`rate` must be a positive number of requests per second")]
    InvalidRate,
}

impl Error {
    /// Whether the error was caused by the run configuration rather than the run itself.
    #[must_use]
    pub fn is_config_error(&self) -> bool {
        !matches!(self, Self::Join(_))
    }
}
