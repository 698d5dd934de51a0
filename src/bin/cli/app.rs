use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use phrasebook_lib::config::ClientConfig;
use phrasebook_lib::notify::ToastKind;
use phrasebook_lib::repository::HttpVocabularyRepository;
use phrasebook_lib::store::VocabularyStore;

/// Shared application state for CLI commands
pub struct App {
    pub config: ClientConfig,
    pub config_path: PathBuf,
    pub store: VocabularyStore<HttpVocabularyRepository>,
}

impl App {
    /// Load config and build the backend client
    pub fn new(config_path: Option<&Path>, api_url: Option<String>) -> Result<Self> {
        let config_path = match config_path {
            Some(p) => p.to_path_buf(),
            None => ClientConfig::default_path().context("Failed to get config directory")?,
        };

        let mut config = ClientConfig::load(Some(&config_path))
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?;
        config.apply_overrides(api_url, None);

        let repository = HttpVocabularyRepository::new(&config)
            .context("Failed to create backend client")?;

        Ok(Self {
            config,
            config_path,
            store: VocabularyStore::new(repository),
        })
    }

    /// Fetch the full vocabulary list into the store
    pub async fn load(&mut self) -> Result<()> {
        self.store
            .load_vocabulary()
            .await
            .context("Failed to load vocabulary")
    }

    /// Print toasts raised by the last operation to stderr, then clear them
    pub fn flush_notifications(&mut self) {
        for toast in self.store.notifications().iter() {
            let label = match toast.kind {
                ToastKind::Success => "ok",
                ToastKind::Error => "error",
                ToastKind::Info => "info",
            };
            eprintln!("[{}] {}", label, toast.message);
        }
        self.store.notifications_mut().clear();
    }

    /// Persist a freshly issued token
    pub fn store_token(&mut self, token: String) -> Result<()> {
        self.config.token = Some(token);
        self.config
            .save(&self.config_path)
            .with_context(|| format!("Failed to write {}", self.config_path.display()))
    }
}
