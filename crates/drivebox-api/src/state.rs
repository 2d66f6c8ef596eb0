//! Application state shared across all handlers.

use std::sync::Arc;

use drivebox_auth::directory::UserDirectory;
use drivebox_auth::jwt::decoder::JwtDecoder;
use drivebox_auth::jwt::encoder::JwtEncoder;
use drivebox_core::config::AppConfig;
use drivebox_core::result::AppResult;
use drivebox_registry::{FileRegistry, InMemoryRegistry};
use drivebox_service::file::FileService;
use drivebox_service::ingest::UploadIngestor;
use drivebox_service::share::ShareService;
use drivebox_service::stats::StatsService;
use drivebox_storage::{BlobManager, LocalBlobProvider};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,

    /// User directory
    pub directory: Arc<UserDirectory>,
    /// JWT token encoder
    pub jwt_encoder: Arc<JwtEncoder>,
    /// JWT token decoder and validator
    pub jwt_decoder: Arc<JwtDecoder>,

    /// Blob storage; the upload handler spools multipart fields through it.
    pub blobs: BlobManager,
    /// Upload ingestor
    pub ingestor: Arc<UploadIngestor>,
    /// File listing/download/delete service
    pub file_service: Arc<FileService>,
    /// Share minting and public access service
    pub share_service: Arc<ShareService>,
    /// Stats aggregation service
    pub stats_service: Arc<StatsService>,
}

impl AppState {
    /// Wires up the full dependency graph from configuration.
    ///
    /// Creates the blob storage root directory if it does not exist yet.
    pub async fn build(config: AppConfig) -> AppResult<Self> {
        let provider = LocalBlobProvider::new(&config.storage.root_path).await?;
        let blobs = BlobManager::new(Arc::new(provider), &config.storage);
        let registry: Arc<dyn FileRegistry> = Arc::new(InMemoryRegistry::new());

        let state = Self {
            directory: Arc::new(UserDirectory::new()),
            jwt_encoder: Arc::new(JwtEncoder::new(&config.auth)),
            jwt_decoder: Arc::new(JwtDecoder::new(&config.auth)),
            ingestor: Arc::new(UploadIngestor::new(
                Arc::clone(&registry),
                blobs.clone(),
                config.upload.clone(),
            )),
            file_service: Arc::new(FileService::new(Arc::clone(&registry), blobs.clone())),
            share_service: Arc::new(ShareService::new(Arc::clone(&registry), blobs.clone())),
            stats_service: Arc::new(StatsService::new(registry, config.stats.clone())),
            blobs,
            config: Arc::new(config),
        };
        Ok(state)
    }

    /// Absolute URL a shared file is reachable under.
    pub fn share_url(&self, token: &str) -> String {
        format!(
            "{}/shared/{token}",
            self.config.server.public_base_url.trim_end_matches('/')
        )
    }
}
