use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tts_gateway::controllers::tts::TtsController;
use tts_gateway::domain::tts::{SynthesisDefaults, TtsService};
use tts_gateway::infrastructure::config::{Config, LogFormat};
use tts_gateway::infrastructure::http::start_http_server;
use tts_gateway::infrastructure::process::is_available;
use tts_gateway::infrastructure::repositories::{EspeakRepository, LameRepository};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    init_logging(&config);

    tracing::info!(
        "Starting TTS Gateway on {}:{}",
        config.host,
        config.port
    );

    // Report external tools up front; requests fail with 500 while they are missing
    for (role, program) in [
        ("synthesizer", &config.synthesizer_bin),
        ("encoder", &config.encoder_bin),
    ] {
        if is_available(program) {
            tracing::info!(role, program = %program, "External tool found");
        } else {
            tracing::warn!(role, program = %program, "External tool not found on PATH");
        }
    }

    tracing::info!(
        temp_dir = %config.temp_dir.display(),
        timeout_secs = config.process_timeout_secs,
        "Temporary audio files and process timeout configured"
    );

    let config = Arc::new(config);

    // === DEPENDENCY INJECTION SETUP ===
    // 1. Instantiate repositories (external tools)
    let synthesizer = Arc::new(EspeakRepository::new(
        config.synthesizer_bin.clone(),
        config.process_timeout(),
    ));
    let encoder = Arc::new(LameRepository::new(
        config.encoder_bin.clone(),
        config.process_timeout(),
    ));

    // 2. Instantiate services
    let tts_service = Arc::new(TtsService::new(
        synthesizer,
        encoder,
        config.temp_dir.clone(),
        config.temp_file_prefix.clone(),
        SynthesisDefaults::default(),
    ));

    // 3. Instantiate controllers
    let tts_controller = Arc::new(TtsController::new(tts_service));

    // Start HTTP server with all routes
    start_http_server(config, tts_controller).await?;

    Ok(())
}

fn init_logging(config: &Config) {
    let default_filter = if config.is_development() {
        "tts_gateway=debug,tower_http=debug"
    } else {
        "tts_gateway=info,tower_http=info"
    };

    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| default_filter.into()),
            )
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| default_filter.into()),
            )
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
