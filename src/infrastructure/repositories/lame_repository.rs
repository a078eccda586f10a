use super::speech_repository::EncoderRepository;
use crate::domain::tts::voice_mapping::encoder_args;
use crate::infrastructure::process::{self, Invocation, ProcessError};
use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;

/// Command-line mp3 encoder speaking the lame flag set
pub struct LameRepository {
    program: String,
    timeout: Duration,
}

impl LameRepository {
    pub fn new(program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }

    pub fn invocation(&self, input: &Path, output: &Path) -> Invocation {
        Invocation::new(self.program.clone(), encoder_args(input, output))
    }
}

#[async_trait]
impl EncoderRepository for LameRepository {
    fn id(&self) -> &str {
        &self.program
    }

    async fn encode(&self, input: &Path, output: &Path) -> Result<(), ProcessError> {
        let invocation = self.invocation(input, output);

        tracing::debug!(
            program = %invocation.program,
            input = %input.display(),
            output = %output.display(),
            "Running encoder"
        );

        process::run(&invocation, self.timeout).await
    }
}
