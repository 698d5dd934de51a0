//! Vocabulary flashcards for Phrasebook
//!
//! This module provides:
//! - Vocabulary records and backend payloads
//! - Review bucket classification for the dashboard
//! - Reconciliation of confirmed mutations into the local list

pub mod classify;
pub mod models;
pub mod reconcile;
pub mod timestamp;

pub use classify::{classify, classify_now, BucketCounts, VocabularyBuckets};
pub use models::*;
pub use reconcile::Mutation;
