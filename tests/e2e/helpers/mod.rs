use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use test_context::AsyncTestContext;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tts_gateway::controllers::tts::TtsController;
use tts_gateway::domain::tts::{SynthesisDefaults, TtsService};
use tts_gateway::infrastructure::config::{Config, Environment, LogFormat};
use tts_gateway::infrastructure::http::build_router;
use tts_gateway::infrastructure::repositories::{EspeakRepository, LameRepository};

pub mod fake_tools;

use api_client::TestClient;
pub use fake_tools::{FakeTool, FakeTools, FAKE_MP3_SUFFIX, FAKE_WAV};

/// How long the server may take to drop a finished response body
pub const CLEANUP_GRACE: Duration = Duration::from_secs(5);

pub struct TestOptions {
    pub synthesizer: FakeTool,
    pub encoder: FakeTool,
    pub process_timeout_secs: u64,
}

impl Default for TestOptions {
    fn default() -> Self {
        Self {
            synthesizer: FakeTool::Working,
            encoder: FakeTool::Working,
            process_timeout_secs: 10,
        }
    }
}

pub struct TestContext {
    pub client: TestClient,
    #[allow(dead_code)]
    pub config: Config,
    pub tools: FakeTools,
    server: JoinHandle<()>,
}

impl TestContext {
    pub async fn new() -> Result<Self> {
        Self::with_options(TestOptions::default()).await
    }

    pub async fn with_options(options: TestOptions) -> Result<Self> {
        let tools = FakeTools::install(options.synthesizer, options.encoder)?;

        let config = Config {
            host: "127.0.0.1".to_string(),
            port: 0, // Will be assigned by the OS
            environment: Environment::Development,
            log_format: LogFormat::Pretty,
            synthesizer_bin: path_string(&tools.synthesizer_bin),
            encoder_bin: path_string(&tools.encoder_bin),
            process_timeout_secs: options.process_timeout_secs,
            temp_dir: tools.audio_dir(),
            temp_file_prefix: "tts_e2e_".to_string(),
            static_dir: None,
            body_limit_bytes: 200 * 1024,
        };

        let app = create_app(config.clone());

        // Start server
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let base_url = format!("http://{}", addr);

        let server = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Ok(Self {
            client: TestClient::new(&base_url),
            config,
            tools,
            server,
        })
    }
}

impl AsyncTestContext for TestContext {
    fn setup() -> impl std::future::Future<Output = Self> + Send {
        async {
            TestContext::new()
                .await
                .expect("Failed to start test server")
        }
    }

    fn teardown(self) -> impl std::future::Future<Output = ()> + Send {
        async move {
            self.server.abort();
        }
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        self.server.abort();
    }
}

fn create_app(config: Config) -> axum::Router {
    let config = Arc::new(config);

    let synthesizer = Arc::new(EspeakRepository::new(
        config.synthesizer_bin.clone(),
        config.process_timeout(),
    ));
    let encoder = Arc::new(LameRepository::new(
        config.encoder_bin.clone(),
        config.process_timeout(),
    ));
    let tts_service = Arc::new(TtsService::new(
        synthesizer,
        encoder,
        config.temp_dir.clone(),
        config.temp_file_prefix.clone(),
        SynthesisDefaults::default(),
    ));
    let tts_controller = Arc::new(TtsController::new(tts_service));

    build_router(config, tts_controller)
}

fn path_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
