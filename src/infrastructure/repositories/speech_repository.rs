use crate::domain::tts::{VoiceParameters, VoiceTag};
use crate::infrastructure::process::ProcessError;
use async_trait::async_trait;
use std::path::Path;

/// Repository for speech synthesis.
/// Abstracts the external synthesizer (espeak-ng or a compatible tool).
#[async_trait]
pub trait SynthesizerRepository: Send + Sync {
    /// Short tool name for logs and health reporting
    fn id(&self) -> &str;

    /// Render `text` with the given voice into a wav file at `output`
    ///
    /// # Errors
    /// Returns error if the tool cannot be started, exits non-zero or times out
    async fn synthesize(
        &self,
        text: &str,
        voice_tag: &VoiceTag,
        parameters: &VoiceParameters,
        output: &Path,
    ) -> Result<(), ProcessError>;
}

/// Repository for audio re-encoding.
/// Abstracts the external encoder (lame or a compatible tool).
#[async_trait]
pub trait EncoderRepository: Send + Sync {
    fn id(&self) -> &str;

    /// Convert the wav file at `input` into compressed audio at `output`
    async fn encode(&self, input: &Path, output: &Path) -> Result<(), ProcessError>;
}
