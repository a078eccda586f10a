use axum::{
    body::Body,
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    Extension, Json,
};
use std::sync::Arc;

use crate::{
    domain::tts::{SynthesizeRequestDto, TtsService, TtsServiceApi, VoiceCatalogResponse},
    error::{AppError, AppResult},
    infrastructure::{http::RequestId, temp::stream_last},
};

pub struct TtsController {
    tts_service: Arc<TtsService>,
}

impl TtsController {
    pub fn new(tts_service: Arc<TtsService>) -> Self {
        Self { tts_service }
    }

    /// POST /api/synthesize - Convert text to speech
    pub async fn synthesize(
        State(controller): State<Arc<TtsController>>,
        Extension(request_id): Extension<RequestId>,
        payload: Result<Json<SynthesizeRequestDto>, JsonRejection>,
    ) -> AppResult<(StatusCode, HeaderMap, Body)> {
        // Malformed bodies are validation failures like a missing text
        let Json(dto) = payload.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

        let request = dto.resolve(controller.tts_service.defaults())?;

        tracing::info!(
            request_id = %request_id.0,
            text_length = request.text.char_count(),
            format = %request.format,
            "Synthesis requested"
        );

        let audio = controller.tts_service.synthesize(request).await?;

        let format = audio.format;
        let voice_tag = audio.voice_tag.to_string();
        let char_count = audio.char_count;

        // The body owns the temporary files; they go away when it is done or dropped
        let stream = stream_last(audio.into_artifacts())
            .await
            .map_err(|e| AppError::SynthesisFailed(format!("unable to read audio output: {}", e)))?;

        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(format.content_type()),
        );
        headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
        if let Ok(value) = HeaderValue::from_str(&voice_tag) {
            headers.insert("x-voice-tag", value);
        }
        headers.insert("x-character-count", HeaderValue::from(char_count));

        Ok((StatusCode::OK, headers, Body::from_stream(stream)))
    }

    /// GET /api/voices - Options the front-end can offer
    pub async fn list_voices(
        State(controller): State<Arc<TtsController>>,
    ) -> Json<VoiceCatalogResponse> {
        Json(controller.tts_service.voice_catalog())
    }
}
