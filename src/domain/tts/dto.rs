use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use super::error::TtsServiceError;
use super::model::{AudioFormat, Gender, SynthesisDefaults, SynthesisRequest, SynthesisText, Tone};

/// Request for POST /api/synthesize
///
/// Every field except `text` is optional. Values that cannot be understood
/// fall back to the defaults instead of failing the request.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SynthesizeRequestDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tone: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intensity: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice: Option<Value>,
    /// Older clients send the preset as `voiceType`; `voice` wins when both are present
    #[serde(default, rename = "voiceType", skip_serializing_if = "Option::is_none")]
    pub voice_type: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accent: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<Value>,
}

impl SynthesizeRequestDto {
    /// Merge the caller's fields over `defaults` and validate the text
    pub fn resolve(self, defaults: &SynthesisDefaults) -> Result<SynthesisRequest, TtsServiceError> {
        let raw_text = match self.text {
            Some(Value::String(text)) => text,
            _ => return Err(TtsServiceError::Invalid("text is required".to_string())),
        };
        let text = SynthesisText::parse(&raw_text)?;

        let gender = lenient_str(&self.gender)
            .and_then(Gender::parse)
            .unwrap_or(defaults.gender);
        let tone = lenient_str(&self.tone)
            .and_then(Tone::parse)
            .unwrap_or(defaults.tone);
        let format = lenient_str(&self.format)
            .and_then(AudioFormat::parse)
            .unwrap_or(defaults.format);

        let intensity = self
            .intensity
            .as_ref()
            .and_then(lenient_number)
            .unwrap_or(defaults.intensity);
        let age = self
            .age
            .as_ref()
            .and_then(lenient_number)
            .filter(|age| *age >= 0.0)
            .map(|age| age.round() as u32)
            .unwrap_or(defaults.age);

        let voice = non_blank(&self.voice)
            .or_else(|| non_blank(&self.voice_type))
            .unwrap_or_else(|| defaults.voice.clone());
        let accent = non_blank(&self.accent).unwrap_or_else(|| defaults.accent.clone());

        Ok(SynthesisRequest {
            text,
            gender,
            age,
            tone,
            intensity,
            voice,
            accent,
            format,
        })
    }
}

/// Finite number from a JSON number or a numeric string
fn lenient_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;

    number.is_finite().then_some(number)
}

/// String content of a JSON value; any other JSON type counts as absent
fn lenient_str(value: &Option<Value>) -> Option<&str> {
    value.as_ref().and_then(Value::as_str)
}

fn non_blank(value: &Option<Value>) -> Option<String> {
    lenient_str(value)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Response for GET /api/voices
#[derive(Debug, Serialize, Deserialize)]
pub struct VoiceCatalogResponse {
    pub voices: BTreeMap<String, Vec<String>>,
    pub tones: Vec<String>,
    pub accents: Vec<String>,
    pub formats: Vec<String>,
    pub defaults: VoiceDefaultsDto,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VoiceDefaultsDto {
    pub gender: String,
    pub age: u32,
    pub tone: String,
    pub intensity: f64,
    pub voice: String,
    pub accent: String,
    pub format: String,
}

impl From<&SynthesisDefaults> for VoiceDefaultsDto {
    fn from(defaults: &SynthesisDefaults) -> Self {
        Self {
            gender: defaults.gender.to_string(),
            age: defaults.age,
            tone: defaults.tone.to_string(),
            intensity: defaults.intensity,
            voice: defaults.voice.clone(),
            accent: defaults.accent.clone(),
            format: defaults.format.to_string(),
        }
    }
}
