use super::speech_repository::SynthesizerRepository;
use crate::domain::tts::{voice_mapping::synthesizer_args, VoiceParameters, VoiceTag};
use crate::infrastructure::process::{self, Invocation, ProcessError};
use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;

/// Command-line synthesizer speaking the espeak-ng flag set
pub struct EspeakRepository {
    program: String,
    timeout: Duration,
}

impl EspeakRepository {
    pub fn new(program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }

    pub fn invocation(
        &self,
        text: &str,
        voice_tag: &VoiceTag,
        parameters: &VoiceParameters,
        output: &Path,
    ) -> Invocation {
        Invocation::new(
            self.program.clone(),
            synthesizer_args(output, voice_tag, parameters, text),
        )
    }
}

#[async_trait]
impl SynthesizerRepository for EspeakRepository {
    fn id(&self) -> &str {
        &self.program
    }

    async fn synthesize(
        &self,
        text: &str,
        voice_tag: &VoiceTag,
        parameters: &VoiceParameters,
        output: &Path,
    ) -> Result<(), ProcessError> {
        let invocation = self.invocation(text, voice_tag, parameters, output);

        tracing::debug!(
            program = %invocation.program,
            voice = %voice_tag,
            speed = parameters.speed,
            pitch = parameters.pitch,
            amplitude = parameters.amplitude,
            output = %output.display(),
            "Running synthesizer"
        );

        process::run(&invocation, self.timeout).await
    }
}
