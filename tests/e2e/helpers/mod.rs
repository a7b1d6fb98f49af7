use axum::Router;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use test_context::AsyncTestContext;
use tokio::net::TcpListener;
use tts_batch_backend::controllers::{batch::BatchController, health::HealthState};
use tts_batch_backend::domain::{archive::ArchiveService, synthesis::SynthesisService};
use tts_batch_backend::infrastructure::http::build_router;
use tts_batch_backend::infrastructure::repositories::{ArtifactStore, BatchRepository};

pub mod api_client;
pub mod fake_tts;

use api_client::{ApiResponse, TestClient};
use fake_tts::FakeTtsEngine;

const TEST_MAX_CONCURRENCY: usize = 4;

pub struct TestContext {
    pub client: TestClient,
    pub engine: Arc<FakeTtsEngine>,
    pub store_dir: PathBuf,
    _store: TempDir,
}

impl AsyncTestContext for TestContext {
    fn setup() -> impl std::future::Future<Output = Self> + Send {
        async {
            let store_dir = tempfile::tempdir().expect("Failed to create temp dir");
            let engine = Arc::new(FakeTtsEngine::default());

            let app = create_app(store_dir.path(), engine.clone())
                .await
                .expect("Failed to create app");

            // Start server
            let listener = TcpListener::bind("127.0.0.1:0")
                .await
                .expect("Failed to bind listener");
            let addr = listener.local_addr().expect("Failed to get local addr");
            let base_url = format!("http://{}", addr);

            tokio::spawn(async move {
                axum::serve(listener, app).await.unwrap();
            });

            // Wait for server to be ready
            tokio::time::sleep(Duration::from_millis(50)).await;

            Self {
                client: TestClient::new(&base_url),
                engine,
                store_dir: store_dir.path().to_path_buf(),
                _store: store_dir,
            }
        }
    }

    fn teardown(self) -> impl std::future::Future<Output = ()> + Send {
        async {
            // The temporary store is removed when TempDir drops
        }
    }
}

async fn create_app(store_dir: &Path, engine: Arc<FakeTtsEngine>) -> anyhow::Result<Router> {
    let store = Arc::new(ArtifactStore::open(store_dir).await?);
    let batch_repo = Arc::new(BatchRepository::new(Duration::from_secs(60 * 60)));

    let synthesis_service = Arc::new(SynthesisService::new(
        engine,
        store.clone(),
        TEST_MAX_CONCURRENCY,
    ));
    let archive_service = Arc::new(ArchiveService::new(store.clone()));

    let batch_controller = Arc::new(BatchController::new(
        synthesis_service,
        archive_service,
        batch_repo,
        store.clone(),
    ));
    let health_state = Arc::new(HealthState {
        store,
        provider: "fake",
    });

    Ok(build_router(batch_controller, health_state, false))
}

impl TestContext {
    /// Create a batch and return the response
    pub async fn create_batch(
        &self,
        text: &str,
        voices: &[&str],
        repeat_count: i64,
    ) -> ApiResponse {
        self.client
            .post(
                "/api/batches",
                &json!({
                    "text": text,
                    "voices": voices,
                    "repeat_count": repeat_count
                }),
            )
            .await
            .unwrap()
    }

    /// Number of files currently in the artifact store
    pub fn stored_files(&self) -> usize {
        std::fs::read_dir(&self.store_dir).unwrap().count()
    }
}

// Helper to pull the batch id out of a create/get response
pub fn batch_id(body: &Value) -> String {
    body.get("id")
        .and_then(|v| v.as_str())
        .expect("Missing batch id")
        .to_string()
}
