//! Test server harness.

use docent::config::Config;
use docent::gateway::{HandlerState, create_router_with_state};
use docent::storage::FsDocumentArchive;
use docent::synthesis::SynthesisMode;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

const STARTUP_WAIT_TIMEOUT_SECS: u64 = 5;
const STARTUP_POLL_INTERVAL_MS: u64 = 50;

#[derive(Debug, Clone)]
pub struct TestServerConfig {
    pub port: u16,
    /// Archive directory. A fresh temporary directory when `None`.
    pub storage_path: Option<PathBuf>,
    pub synthesis: SynthesisMode,
    pub max_upload_bytes: Option<usize>,
}

impl Default for TestServerConfig {
    fn default() -> Self {
        Self {
            port: 0,
            storage_path: None,
            synthesis: SynthesisMode::Extractive,
            max_upload_bytes: None,
        }
    }
}

impl TestServerConfig {
    pub fn with_storage_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.storage_path = Some(path.into());
        self
    }

    pub fn generative(mut self) -> Self {
        self.synthesis = SynthesisMode::Generative;
        self
    }
}

pub struct TestServer {
    pub addr: SocketAddr,
    _server_handle: JoinHandle<()>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    _temp_dir: Option<TempDir>,
}

impl TestServer {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

pub async fn find_available_port() -> std::io::Result<u16> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    Ok(addr.port())
}

pub async fn wait_for_server_ready(
    addr: SocketAddr,
    timeout: Duration,
    interval: Duration,
) -> Result<(), ServerStartupError> {
    let start = std::time::Instant::now();

    loop {
        if start.elapsed() > timeout {
            return Err(ServerStartupError::Timeout);
        }

        match tokio::net::TcpStream::connect(addr).await {
            Ok(_) => return Ok(()),
            Err(_) => {
                tokio::time::sleep(interval).await;
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ServerStartupError {
    #[error("Server failed to start within timeout")]
    Timeout,
    #[error("Failed to bind to address: {0}")]
    BindError(#[from] std::io::Error),
    #[error("Server startup failed: {0}")]
    StartupFailed(String),
}

/// Spawns a server backed by a filesystem archive, with the mock generator
/// standing in for the chat model.
///
/// Startup mirrors the binary: the archive is hydrated into the corpus
/// before the listener accepts requests, so pointing two servers at the same
/// `storage_path` one after the other simulates a restart.
///
/// # Example
///
/// ```ignore
/// let server = spawn_test_server(TestServerConfig::default()).await?;
/// let client = TestClient::new(server.url());
/// let health = client.health().await?;
/// assert_eq!(health.status, "ok");
/// ```
pub async fn spawn_test_server(config: TestServerConfig) -> Result<TestServer, ServerStartupError> {
    let port = if config.port == 0 {
        find_available_port().await?
    } else {
        config.port
    };

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = TcpListener::bind(addr).await?;
    let local_addr = listener.local_addr()?;

    let (storage_path, _temp_dir) = if let Some(path) = config.storage_path {
        (path, None)
    } else {
        let temp_dir =
            TempDir::new().map_err(|e| ServerStartupError::StartupFailed(e.to_string()))?;
        (temp_dir.path().to_path_buf(), Some(temp_dir))
    };

    let defaults = Config::default();
    let server_config = Config {
        storage_path: storage_path.clone(),
        synthesis: config.synthesis,
        mock_provider: true,
        max_upload_bytes: config.max_upload_bytes.unwrap_or(defaults.max_upload_bytes),
        ..defaults
    };
    server_config
        .validate()
        .map_err(|e| ServerStartupError::StartupFailed(e.to_string()))?;

    let archive = Arc::new(FsDocumentArchive::new(&storage_path));
    let state = HandlerState::from_config(&server_config, archive);
    state
        .ingest
        .hydrate()
        .await
        .map_err(|e| ServerStartupError::StartupFailed(e.to_string()))?;

    let app = create_router_with_state(state);

    let (shutdown_tx, shutdown_rx) = oneshot::channel();

    let server_handle = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await
            .unwrap();
    });

    wait_for_server_ready(
        local_addr,
        Duration::from_secs(STARTUP_WAIT_TIMEOUT_SECS),
        Duration::from_millis(STARTUP_POLL_INTERVAL_MS),
    )
    .await?;

    Ok(TestServer {
        addr: local_addr,
        _server_handle: server_handle,
        shutdown_tx: Some(shutdown_tx),
        _temp_dir,
    })
}
