pub mod dto;
pub mod error;
pub mod model;
pub mod service;
pub mod voice_mapping;

pub use dto::{SynthesizeRequestDto, VoiceCatalogResponse, VoiceDefaultsDto};
pub use error::TtsServiceError;
pub use model::{
    AudioFormat, Gender, SynthesisDefaults, SynthesisRequest, SynthesisText, SynthesizedAudio,
    Tone, VoiceParameters, VoiceTag, MAX_TEXT_CHARS,
};
pub use service::{TtsService, TtsServiceApi};
pub use voice_mapping::{resolve_voice_parameters, resolve_voice_tag};
