use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tts_batch_backend::controllers::{batch::BatchController, health::HealthState};
use tts_batch_backend::domain::{archive::ArchiveService, synthesis::SynthesisService};
use tts_batch_backend::infrastructure::config::{Config, LogFormat, TtsProvider};
use tts_batch_backend::infrastructure::http::{build_router, start_http_server};
use tts_batch_backend::infrastructure::repositories::{
    ArtifactStore, BatchRepository, EdgeTtsRepository, OpenAiTtsRepository, PollyTtsRepository,
    TtsRepository,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    init_logging(&config);

    tracing::info!(
        "Starting TTS batch backend on {}:{}",
        config.host,
        config.port
    );

    // Open the artifact store
    let store = Arc::new(ArtifactStore::open(&config.artifact_dir).await?);
    tracing::info!(path = %store.root().display(), "Artifact store opened");

    if config.purge_artifacts_on_start {
        let removed = store.purge().await?;
        tracing::info!(removed, "Leftover artifacts purged");
    }

    // Create the TTS engine
    let tts_repo = create_tts_repository(&config).await?;
    tracing::info!(provider = tts_repo.provider(), "TTS engine initialized");

    let config = Arc::new(config);

    // === DEPENDENCY INJECTION SETUP ===
    // 1. Repositories
    let batch_repo = Arc::new(BatchRepository::new(Duration::from_secs(
        config.artifact_retention_minutes * 60,
    )));

    // 2. Services
    let synthesis_service = Arc::new(SynthesisService::new(
        tts_repo.clone(),
        store.clone(),
        config.synthesis_max_concurrency,
    ));
    let archive_service = Arc::new(ArchiveService::new(store.clone()));

    // 3. Controllers
    let batch_controller = Arc::new(BatchController::new(
        synthesis_service,
        archive_service,
        batch_repo,
        store.clone(),
    ));
    let health_state = Arc::new(HealthState {
        store,
        provider: tts_repo.provider(),
    });

    // Start HTTP server with all routes
    let app = build_router(batch_controller, health_state, config.is_development());
    start_http_server(config, app).await?;

    Ok(())
}

async fn create_tts_repository(
    config: &Config,
) -> Result<Arc<dyn TtsRepository>, Box<dyn std::error::Error>> {
    let repo: Arc<dyn TtsRepository> = match config.tts_provider {
        TtsProvider::Edge => Arc::new(EdgeTtsRepository::new(Duration::from_secs(
            config.edge_tts_timeout_secs,
        ))),
        TtsProvider::Polly => {
            tracing::info!("Initializing AWS Polly client with region: {}", config.aws_region);
            let aws_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
                .region(aws_config::Region::new(config.aws_region.clone()))
                .load()
                .await;
            let polly_client = aws_sdk_polly::Client::new(&aws_config);
            Arc::new(PollyTtsRepository::new(Arc::new(polly_client)))
        }
        TtsProvider::OpenAi => {
            let api_key = config
                .openai_api_key
                .clone()
                .ok_or("OPENAI_API_KEY is required for the openai provider")?;
            let client = async_openai::Client::with_config(
                async_openai::config::OpenAIConfig::new().with_api_key(api_key),
            );
            Arc::new(OpenAiTtsRepository::new(
                Arc::new(client),
                config.openai_tts_model.clone(),
            ))
        }
    };
    Ok(repo)
}

fn init_logging(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "tts_batch_backend=debug,tower_http=debug".into());

    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
