use super::dto::{VoiceCatalogResponse, VoiceDefaultsDto};
use super::error::TtsServiceError;
use super::model::{
    AudioFormat, Gender, SynthesisDefaults, SynthesisRequest, SynthesizedAudio, Tone,
};
use super::voice_mapping::{resolve_voice_parameters, resolve_voice_tag, supported_accents};
use crate::infrastructure::repositories::{EncoderRepository, SynthesizerRepository};
use crate::infrastructure::temp::TempAudioArtifact;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

/// Voice presets offered per gender. The preset is informational only.
const VOICE_PRESETS: [&str; 1] = ["default"];

pub struct TtsService {
    synthesizer: Arc<dyn SynthesizerRepository>,
    encoder: Arc<dyn EncoderRepository>,
    temp_dir: PathBuf,
    temp_file_prefix: String,
    defaults: SynthesisDefaults,
}

impl TtsService {
    pub fn new(
        synthesizer: Arc<dyn SynthesizerRepository>,
        encoder: Arc<dyn EncoderRepository>,
        temp_dir: PathBuf,
        temp_file_prefix: String,
        defaults: SynthesisDefaults,
    ) -> Self {
        Self {
            synthesizer,
            encoder,
            temp_dir,
            temp_file_prefix,
            defaults,
        }
    }

    pub fn defaults(&self) -> &SynthesisDefaults {
        &self.defaults
    }
}

#[async_trait]
pub trait TtsServiceApi: Send + Sync {
    /// Synthesize a resolved request into audio
    ///
    /// This operation:
    /// - Maps tone/intensity and gender/accent onto synthesizer parameters
    /// - Allocates per-request temporary files
    /// - Runs the synthesizer, then the encoder when the format needs it
    ///
    /// Temporary files are removed on every failure path. On success they are
    /// owned by the returned audio and removed once it is streamed or dropped.
    async fn synthesize(
        &self,
        request: SynthesisRequest,
    ) -> Result<SynthesizedAudio, TtsServiceError>;

    /// Options a client can choose from
    fn voice_catalog(&self) -> VoiceCatalogResponse;
}

#[async_trait]
impl TtsServiceApi for TtsService {
    async fn synthesize(
        &self,
        request: SynthesisRequest,
    ) -> Result<SynthesizedAudio, TtsServiceError> {
        let started = Instant::now();
        let job_id = Uuid::new_v4();

        // 1. Map voice descriptors
        let parameters = resolve_voice_parameters(request.tone, request.intensity);
        let voice_tag = resolve_voice_tag(request.gender, &request.accent);
        let char_count = request.text.char_count();

        tracing::info!(
            job_id = %job_id,
            voice_tag = %voice_tag,
            voice = %request.voice,
            tone = %request.tone,
            intensity = request.intensity,
            age = request.age,
            pitch = parameters.pitch,
            speed = parameters.speed,
            format = %request.format,
            text_length = char_count,
            "TTS synthesis request"
        );

        // 2. Allocate temporary files; they are removed if anything below fails
        let raw = TempAudioArtifact::create(
            &self.temp_dir,
            &self.temp_file_prefix,
            job_id,
            AudioFormat::Wav.extension(),
        )
        .await?;
        let encoded = if request.format.needs_encoding() {
            Some(
                TempAudioArtifact::create(
                    &self.temp_dir,
                    &self.temp_file_prefix,
                    job_id,
                    request.format.extension(),
                )
                .await?,
            )
        } else {
            None
        };

        // 3. Synthesize raw audio
        self.synthesizer
            .synthesize(request.text.as_str(), &voice_tag, &parameters, raw.path())
            .await?;

        // 4. Re-encode when a compressed format was requested
        if let Some(encoded) = &encoded {
            self.encoder.encode(raw.path(), encoded.path()).await?;
        }

        let mut artifacts = vec![raw];
        artifacts.extend(encoded);

        tracing::info!(
            job_id = %job_id,
            synthesizer = self.synthesizer.id(),
            encoded = request.format.needs_encoding(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "TTS synthesis completed"
        );

        Ok(SynthesizedAudio::new(
            request.format,
            voice_tag,
            parameters,
            char_count,
            artifacts,
        ))
    }

    fn voice_catalog(&self) -> VoiceCatalogResponse {
        let voices: BTreeMap<String, Vec<String>> = Gender::ALL
            .iter()
            .map(|gender| {
                (
                    gender.to_string(),
                    VOICE_PRESETS.iter().map(|preset| preset.to_string()).collect(),
                )
            })
            .collect();

        VoiceCatalogResponse {
            voices,
            tones: Tone::ALL.iter().map(|tone| tone.to_string()).collect(),
            accents: supported_accents()
                .into_iter()
                .map(|accent| accent.to_string())
                .collect(),
            formats: AudioFormat::ALL
                .iter()
                .map(|format| format.to_string())
                .collect(),
            defaults: VoiceDefaultsDto::from(&self.defaults),
        }
    }
}
