//! Phrasebook: bilingual vocabulary flashcards reviewed on a spaced repetition
//! schedule, backed by a remote vocabulary service.

pub mod audio;
pub mod config;
pub mod notify;
pub mod repository;
pub mod store;
pub mod vocabulary;

pub use repository::{HttpVocabularyRepository, RepositoryError, VocabularyRepository};
pub use store::{StoreError, VocabularyStore};
