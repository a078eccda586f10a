use std::fmt;
use std::path::{Path, PathBuf};

use super::error::TtsServiceError;
use crate::infrastructure::temp::TempAudioArtifact;

/// Texts longer than this are truncated before synthesis
pub const MAX_TEXT_CHARS: usize = 5000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub const ALL: [Gender; 2] = [Gender::Male, Gender::Female];

    /// Case-insensitive parse; `None` for anything unrecognized
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "male" => Some(Gender::Male),
            "female" => Some(Gender::Female),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }

    /// Synthesizer voice variant appended to the accent
    pub fn variant(&self) -> &'static str {
        match self {
            Gender::Male => "m1",
            Gender::Female => "f3",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Linear pitch/speed offsets of a tone: `base + per_intensity * intensity`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneCurve {
    pub pitch_base: f64,
    pub pitch_per_intensity: f64,
    pub speed_base: f64,
    pub speed_per_intensity: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Normal,
    Happy,
    Angry,
    Sad,
    Surprised,
    Fear,
    Playful,
}

impl Tone {
    pub const ALL: [Tone; 7] = [
        Tone::Normal,
        Tone::Happy,
        Tone::Angry,
        Tone::Sad,
        Tone::Surprised,
        Tone::Fear,
        Tone::Playful,
    ];

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "normal" => Some(Tone::Normal),
            "happy" => Some(Tone::Happy),
            "angry" => Some(Tone::Angry),
            "sad" => Some(Tone::Sad),
            "surprised" => Some(Tone::Surprised),
            "fear" => Some(Tone::Fear),
            "playful" => Some(Tone::Playful),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Normal => "normal",
            Tone::Happy => "happy",
            Tone::Angry => "angry",
            Tone::Sad => "sad",
            Tone::Surprised => "surprised",
            Tone::Fear => "fear",
            Tone::Playful => "playful",
        }
    }

    pub fn curve(&self) -> ToneCurve {
        let (pitch_base, pitch_per_intensity, speed_base, speed_per_intensity) = match self {
            Tone::Happy => (10.0, 40.0, 0.0, 18.0),
            Tone::Angry => (-8.0, -30.0, 20.0, 40.0),
            Tone::Sad => (-12.0, -30.0, -20.0, -20.0),
            Tone::Surprised => (20.0, 50.0, 10.0, 20.0),
            Tone::Fear => (8.0, 30.0, 25.0, 30.0),
            Tone::Playful => (12.0, 30.0, 8.0, 18.0),
            Tone::Normal => (0.0, 6.0, 0.0, 8.0),
        };

        ToneCurve {
            pitch_base,
            pitch_per_intensity,
            speed_base,
            speed_per_intensity,
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    Wav,
    Mp3,
}

impl AudioFormat {
    pub const ALL: [AudioFormat; 2] = [AudioFormat::Mp3, AudioFormat::Wav];

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "wav" => Some(AudioFormat::Wav),
            "mp3" => Some(AudioFormat::Mp3),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            AudioFormat::Wav => "wav",
            AudioFormat::Mp3 => "mp3",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            AudioFormat::Wav => "audio/wav",
            AudioFormat::Mp3 => "audio/mpeg",
        }
    }

    /// The synthesizer only writes wav; anything else goes through the encoder
    pub fn needs_encoding(&self) -> bool {
        !matches!(self, AudioFormat::Wav)
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// Trimmed, non-empty text of at most [`MAX_TEXT_CHARS`] characters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisText(String);

impl SynthesisText {
    pub fn parse(raw: &str) -> Result<Self, TtsServiceError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TtsServiceError::Invalid("text is required".to_string()));
        }

        let text = match trimmed.char_indices().nth(MAX_TEXT_CHARS) {
            Some((cut, _)) => trimmed[..cut].to_string(),
            None => trimmed.to_string(),
        };

        Ok(Self(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn char_count(&self) -> usize {
        self.0.chars().count()
    }
}

/// A synthesis request with every field resolved
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisRequest {
    pub text: SynthesisText,
    pub gender: Gender,
    /// Carried for future prosody tuning; does not affect the voice today
    pub age: u32,
    pub tone: Tone,
    pub intensity: f64,
    pub voice: String,
    pub accent: String,
    pub format: AudioFormat,
}

/// Values used for every field the caller leaves out
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisDefaults {
    pub gender: Gender,
    pub age: u32,
    pub tone: Tone,
    pub intensity: f64,
    pub voice: String,
    pub accent: String,
    pub format: AudioFormat,
}

impl Default for SynthesisDefaults {
    fn default() -> Self {
        Self {
            gender: Gender::Male,
            age: 25,
            tone: Tone::Normal,
            intensity: 0.6,
            voice: "default".to_string(),
            accent: "en-us".to_string(),
            format: AudioFormat::Mp3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoiceParameters {
    pub pitch: u8,
    pub speed: u16,
    pub amplitude: u16,
}

/// Synthesizer voice selector, rendered as `<accent>+<variant>`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoiceTag {
    pub accent: &'static str,
    pub gender: Gender,
}

impl fmt::Display for VoiceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}+{}", self.accent, self.gender.variant())
    }
}

/// Audio produced for one request, still backed by its temporary files
#[derive(Debug)]
pub struct SynthesizedAudio {
    pub format: AudioFormat,
    pub voice_tag: VoiceTag,
    pub parameters: VoiceParameters,
    pub char_count: usize,
    artifacts: Vec<TempAudioArtifact>,
}

impl SynthesizedAudio {
    pub(crate) fn new(
        format: AudioFormat,
        voice_tag: VoiceTag,
        parameters: VoiceParameters,
        char_count: usize,
        artifacts: Vec<TempAudioArtifact>,
    ) -> Self {
        Self {
            format,
            voice_tag,
            parameters,
            char_count,
            artifacts,
        }
    }

    /// File holding the final audio (the last artifact written)
    pub fn output_path(&self) -> Option<&Path> {
        self.artifacts.last().map(|artifact| artifact.path())
    }

    pub fn artifact_paths(&self) -> Vec<PathBuf> {
        self.artifacts
            .iter()
            .map(|artifact| artifact.path().to_path_buf())
            .collect()
    }

    pub fn into_artifacts(self) -> Vec<TempAudioArtifact> {
        self.artifacts
    }
}
