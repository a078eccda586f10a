use crate::error::AppError;
use crate::infrastructure::process::ProcessError;

#[derive(Debug, thiserror::Error)]
pub enum TtsServiceError {
    #[error("{0}")]
    Invalid(String),
    #[error(transparent)]
    Process(#[from] ProcessError),
    #[error("failed to prepare audio output: {0}")]
    Io(#[from] std::io::Error),
}

impl From<TtsServiceError> for AppError {
    fn from(err: TtsServiceError) -> Self {
        match err {
            TtsServiceError::Invalid(msg) => AppError::BadRequest(msg),
            TtsServiceError::Process(e) => AppError::SynthesisFailed(e.to_string()),
            TtsServiceError::Io(e) => AppError::SynthesisFailed(e.to_string()),
        }
    }
}
