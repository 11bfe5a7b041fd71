//! Wiring: builds every collaborator once from `AppConfig` and hands them
//! to the classifier and the retagger explicitly.

use crate::classifier::Classifier;
use crate::config::AppConfig;
use crate::objectstore::{ContentFetcher, NoopObjectStore, ObjectStore, S3ObjectStore};
use crate::retag::Retagger;
use crate::store::{FileStore, SqliteFileStore};
use anyhow::Context;
use providers::gemini::{self, GeminiConfig, GeminiProvider};
use providers::inference::InferenceClient;
use providers::noop::NoopProvider;
use providers::openai::{self, OpenAiConfig, OpenAiProvider};
use providers::s3::{S3Client, S3Config};
use providers::ProviderRegistry;
use std::sync::Arc;
use storage::{connect, migrate};
use tracing::{info, warn};

pub struct Vault {
    pub files: SqliteFileStore,
    pub objects: Arc<dyn ObjectStore>,
    pub classifier: Arc<Classifier>,
    pub retagger: Retagger,
}

pub async fn open(config: &AppConfig) -> anyhow::Result<Vault> {
    let pool = connect(&config.database.path).await.context("db connect")?;
    migrate(&pool).await.context("db migrate")?;
    let files = SqliteFileStore::new(pool);

    let registry = build_registry(config);
    let llm = registry
        .llm(None)
        .with_context(|| format!("inference provider {:?}", config.inference.provider))?;
    let inference = InferenceClient::new(llm);
    info!(
        provider = inference.provider_name(),
        model = %config.inference.model,
        "inference provider ready"
    );

    let (fetcher, objects) = build_object_store(config)?;
    let store: Arc<dyn FileStore> = Arc::new(files.clone());

    let classifier = Arc::new(Classifier::new(inference, fetcher, store.clone()));
    let retagger = Retagger::new(classifier.clone(), store);

    Ok(Vault {
        files,
        objects,
        classifier,
        retagger,
    })
}

/// Registers every known provider. API keys are read here but only checked
/// when a provider is first called.
pub fn build_registry(config: &AppConfig) -> ProviderRegistry {
    let gemini = GeminiProvider::new(GeminiConfig {
        api_key: std::env::var(gemini::API_KEY_VAR).ok(),
        base_url: config
            .inference
            .base_url
            .clone()
            .unwrap_or_else(|| gemini::DEFAULT_BASE_URL.to_string()),
        model: config.inference.model.clone(),
    });
    let openai = OpenAiProvider::new(OpenAiConfig {
        api_key: std::env::var(openai::API_KEY_VAR).ok(),
        base_url: config
            .inference
            .base_url
            .clone()
            .or_else(|| std::env::var("OPENAI_BASE_URL").ok())
            .unwrap_or_else(|| "https://api.openai.com".to_string()),
        chat_model: config.inference.model.clone(),
    });

    ProviderRegistry::new()
        .with_llm("gemini", Arc::new(gemini))
        .with_llm("openai", Arc::new(openai))
        .with_llm("noop", Arc::new(NoopProvider))
        .set_preferred_llm(&config.inference.provider)
}

pub fn build_object_store(
    config: &AppConfig,
) -> anyhow::Result<(Arc<dyn ContentFetcher>, Arc<dyn ObjectStore>)> {
    let storage = &config.storage;
    let creds = (
        std::env::var("AWS_ACCESS_KEY_ID"),
        std::env::var("AWS_SECRET_ACCESS_KEY"),
    );
    match (storage.bucket.is_empty(), creds) {
        (false, (Ok(access_key_id), Ok(secret_access_key))) => {
            let client = S3Client::new(S3Config {
                bucket: storage.bucket.clone(),
                region: storage.region.clone(),
                access_key_id,
                secret_access_key,
                endpoint: storage.endpoint.clone(),
                path_style: storage.path_style,
            })?;
            let store = Arc::new(S3ObjectStore::new(client, storage.presign_expiry_secs));
            let fetcher: Arc<dyn ContentFetcher> = store.clone();
            let objects: Arc<dyn ObjectStore> = store;
            Ok((fetcher, objects))
        }
        _ => {
            warn!("object storage not configured; image classification and deletes will fail");
            let fetcher: Arc<dyn ContentFetcher> = Arc::new(NoopObjectStore);
            let objects: Arc<dyn ObjectStore> = Arc::new(NoopObjectStore);
            Ok((fetcher, objects))
        }
    }
}
