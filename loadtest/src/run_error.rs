use crate::exit_codes::ExitCode;

/// Failure of the `run` command, classified by the exit code it maps to.
#[derive(Debug)]
pub enum RunError {
    InvalidInput(anyhow::Error),
    RuntimeError(anyhow::Error),
}

impl RunError {
    #[must_use]
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::InvalidInput(_) => ExitCode::InvalidInput,
            Self::RuntimeError(_) => ExitCode::RuntimeError,
        }
    }

    fn inner(&self) -> &anyhow::Error {
        match self {
            Self::InvalidInput(e) | Self::RuntimeError(e) => e,
        }
    }
}

impl From<loadtest_core::Error> for RunError {
    fn from(err: loadtest_core::Error) -> Self {
        if err.is_config_error() {
            Self::InvalidInput(anyhow::Error::new(err).context("invalid run configuration"))
        } else {
            Self::RuntimeError(anyhow::Error::new(err).context("load test failed"))
        }
    }
}

impl std::fmt::Display for RunError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#}", self.inner())
    }
}

impl std::error::Error for RunError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.inner().as_ref())
    }
}
