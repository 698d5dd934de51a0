//! Access to the vocabulary backend
//!
//! `VocabularyRepository` is the seam between the store and the transport;
//! `HttpVocabularyRepository` implements it over the backend's JSON API.

mod client;

use async_trait::async_trait;
use thiserror::Error;

use crate::vocabulary::{
    DelayResult, LanguageTranslation, NewVocabulary, ReviewResult, ScheduleRecord, UserSettings,
    VocabularyId, VocabularyItem, VocabularyUpdate,
};

pub use client::{GeneratedAudio, HttpVocabularyRepository};

#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Authentication failed")]
    AuthFailed,
    #[error("Resource not found: {0}")]
    NotFound(String),
    #[error("Server error: {status} - {message}")]
    Server { status: u16, message: String },
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, RepositoryError>;

/// Backend operations on a user's vocabulary
#[async_trait]
pub trait VocabularyRepository: Send + Sync {
    /// Every vocabulary pair of the user
    async fn list_vocabulary(&self) -> Result<Vec<VocabularyItem>>;

    /// Mark an item reviewed, advancing its stage
    async fn review(&self, id: VocabularyId) -> Result<ReviewResult>;

    /// Push due dates back by `days`
    async fn delay(&self, ids: &[VocabularyId], days: i64) -> Result<Vec<DelayResult>>;

    async fn reset(&self, ids: &[VocabularyId]) -> Result<Vec<ScheduleRecord>>;

    async fn restart(&self, ids: &[VocabularyId]) -> Result<Vec<ScheduleRecord>>;

    async fn delete(&self, ids: &[VocabularyId]) -> Result<()>;

    async fn create(&self, vocabulary: &NewVocabulary) -> Result<VocabularyItem>;

    async fn update(&self, update: &VocabularyUpdate) -> Result<VocabularyItem>;

    async fn language_translations(&self) -> Result<Vec<LanguageTranslation>>;

    async fn user_settings(&self) -> Result<UserSettings>;

    /// Machine translation of a phrase between two locale codes
    async fn translate_phrase(&self, phrase: &str, source: &str, target: &str) -> Result<String>;

    /// Example phrase built around `text`
    async fn generate_phrase(&self, text: &str, locale: &str) -> Result<String>;
}
