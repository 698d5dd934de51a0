//! Client-side vocabulary state
//!
//! `VocabularyStore` owns the flat vocabulary list plus account data and form
//! state. Mutations go through the repository first; only a confirmed response
//! is reconciled into the list, a failure leaves it exactly as it was and
//! raises an error toast. Bucket views are recomputed on demand.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::notify::Notifications;
use crate::repository::{RepositoryError, VocabularyRepository};
use crate::vocabulary::reconcile::{self, Mutation};
use crate::vocabulary::{
    classify, LanguageTranslation, NewVocabulary, UserSettings, VocabularyBuckets, VocabularyId,
    VocabularyItem, VocabularyUpdate,
};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("Vocabulary not found: {0}")]
    VocabularyNotFound(VocabularyId),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Vocabulary list, account data and UI state for one signed-in user
pub struct VocabularyStore<R> {
    repository: R,
    source_vocabulary: Vec<VocabularyItem>,
    loading: bool,
    error: Option<String>,
    language_translations: Vec<LanguageTranslation>,
    user_settings: Option<UserSettings>,
    is_vocabulary_form_open: bool,
    vocabulary_to_edit: Option<VocabularyItem>,
    notifications: Notifications,
}

impl<R: VocabularyRepository> VocabularyStore<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository,
            source_vocabulary: Vec::new(),
            loading: false,
            error: None,
            language_translations: Vec::new(),
            user_settings: None,
            is_vocabulary_form_open: false,
            vocabulary_to_edit: None,
            notifications: Notifications::new(),
        }
    }

    // ==================== Accessors ====================

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn source_vocabulary(&self) -> &[VocabularyItem] {
        &self.source_vocabulary
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn language_translations(&self) -> &[LanguageTranslation] {
        &self.language_translations
    }

    pub fn user_settings(&self) -> Option<&UserSettings> {
        self.user_settings.as_ref()
    }

    pub fn is_vocabulary_form_open(&self) -> bool {
        self.is_vocabulary_form_open
    }

    pub fn vocabulary_to_edit(&self) -> Option<&VocabularyItem> {
        self.vocabulary_to_edit.as_ref()
    }

    pub fn notifications(&self) -> &Notifications {
        &self.notifications
    }

    pub fn notifications_mut(&mut self) -> &mut Notifications {
        &mut self.notifications
    }

    /// Dashboard buckets as of now
    pub fn vocabulary(&self) -> VocabularyBuckets<'_> {
        self.vocabulary_at(Utc::now())
    }

    pub fn vocabulary_at(&self, now: DateTime<Utc>) -> VocabularyBuckets<'_> {
        classify(&self.source_vocabulary, now)
    }

    // ==================== Loading ====================

    /// Load account data and the vocabulary list after login
    pub async fn initialize_app_data(&mut self) -> Result<()> {
        let (translations, settings) = tokio::join!(
            self.repository.language_translations(),
            self.repository.user_settings()
        );

        match (translations, settings) {
            (Ok(translations), Ok(settings)) => {
                self.language_translations = translations;
                self.user_settings = Some(settings);
                self.error = None;
            }
            (Err(err), _) | (_, Err(err)) => {
                self.notifications
                    .error(format!("Error loading app data: {}", err));
            }
        }

        self.load_vocabulary().await
    }

    /// Replace the list with the backend's full copy
    pub async fn load_vocabulary(&mut self) -> Result<()> {
        self.loading = true;

        match self.repository.list_vocabulary().await {
            Ok(vocabulary) => {
                log::info!("Loaded {} vocabulary items", vocabulary.len());
                self.source_vocabulary = vocabulary;
                self.loading = false;
                self.error = None;
                Ok(())
            }
            Err(err) => {
                log::warn!("Failed to load vocabulary: {}", err);
                self.loading = false;
                self.error = Some(err.to_string());
                Err(err.into())
            }
        }
    }

    /// Swap in a list obtained elsewhere (e.g. an exported file)
    pub fn replace_vocabulary(&mut self, vocabulary: Vec<VocabularyItem>) {
        self.source_vocabulary = vocabulary;
    }

    // ==================== Mutations ====================

    /// Reconcile a mutation the backend already confirmed
    pub fn apply(&mut self, mutation: Mutation) {
        reconcile::apply(&mut self.source_vocabulary, mutation);
    }

    pub async fn review(&mut self, id: VocabularyId) -> Result<()> {
        match self.repository.review(id).await {
            Ok(result) => {
                self.apply(Mutation::Reviewed { id, result });
                self.notifications
                    .success(format!("Vocabulary {} marked as reviewed", id));
                Ok(())
            }
            Err(err) => {
                self.notifications
                    .error(format!("Error reviewing vocabulary {}: {}", id, err));
                Err(err.into())
            }
        }
    }

    pub async fn delay(&mut self, ids: &[VocabularyId], days: i64) -> Result<()> {
        match self.repository.delay(ids, days).await {
            Ok(results) => {
                self.apply(Mutation::Delayed { results });
                Ok(())
            }
            Err(err) => {
                self.notifications.error(format!(
                    "Error delaying vocabulary {} by {} day(s): {}",
                    join_ids(ids),
                    days,
                    err
                ));
                Err(err.into())
            }
        }
    }

    pub async fn reset(&mut self, ids: &[VocabularyId]) -> Result<()> {
        match self.repository.reset(ids).await {
            Ok(records) => {
                self.apply(Mutation::Reset { records });
                Ok(())
            }
            Err(err) => {
                self.notifications.error(format!(
                    "Error resetting vocabulary {}: {}",
                    join_ids(ids),
                    err
                ));
                Err(err.into())
            }
        }
    }

    pub async fn restart(&mut self, ids: &[VocabularyId]) -> Result<()> {
        match self.repository.restart(ids).await {
            Ok(records) => {
                self.apply(Mutation::Restarted { records });
                Ok(())
            }
            Err(err) => {
                self.notifications.error(format!(
                    "Error restarting vocabulary {}: {}",
                    join_ids(ids),
                    err
                ));
                Err(err.into())
            }
        }
    }

    pub async fn delete(&mut self, ids: &[VocabularyId]) -> Result<()> {
        match self.repository.delete(ids).await {
            Ok(()) => {
                self.apply(Mutation::Deleted { ids: ids.to_vec() });
                self.notifications
                    .success(format!("Deleted {} vocab item(s)", ids.len()));
                Ok(())
            }
            Err(err) => {
                self.notifications.error(format!(
                    "Error deleting vocabulary {}: {}",
                    join_ids(ids),
                    err
                ));
                Err(err.into())
            }
        }
    }

    /// Create a pair and return the backend's copy of it
    pub async fn create(&mut self, vocabulary: &NewVocabulary) -> Result<VocabularyItem> {
        match self.repository.create(vocabulary).await {
            Ok(item) => {
                self.apply(Mutation::Created { item: item.clone() });
                self.notifications.success("Vocabulary created successfully");
                Ok(item)
            }
            Err(err) => {
                self.notifications
                    .error(format!("Error creating vocabulary: {}", err));
                Err(err.into())
            }
        }
    }

    pub async fn update(&mut self, update: &VocabularyUpdate) -> Result<VocabularyItem> {
        match self.repository.update(update).await {
            Ok(item) => {
                self.apply(Mutation::Updated { item: item.clone() });
                self.notifications.success("Vocabulary updated successfully");
                Ok(item)
            }
            Err(err) => {
                self.notifications
                    .error(format!("Error updating vocabulary: {}", err));
                Err(err.into())
            }
        }
    }

    // ==================== Form State ====================

    pub fn open_vocabulary_form(&mut self) {
        self.is_vocabulary_form_open = true;
    }

    pub fn close_vocabulary_form(&mut self) {
        self.is_vocabulary_form_open = false;
        self.vocabulary_to_edit = None;
    }

    /// Open the form prefilled with an existing item
    pub fn edit_vocabulary(&mut self, id: VocabularyId) -> Result<&VocabularyItem> {
        let item = self
            .source_vocabulary
            .iter()
            .find(|v| v.id == id)
            .cloned()
            .ok_or(StoreError::VocabularyNotFound(id))?;

        self.is_vocabulary_form_open = true;
        Ok(self.vocabulary_to_edit.insert(item))
    }
}

fn join_ids(ids: &[VocabularyId]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::ToastKind;
    use crate::repository;
    use crate::vocabulary::timestamp;
    use crate::vocabulary::{
        DelayResult, Locale, NewPhrase, Phrase, ReviewResult, ScheduleRecord,
    };
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};

    /// Backend double answering from canned data
    struct FakeRepository {
        items: Vec<VocabularyItem>,
        fail: AtomicBool,
    }

    impl FakeRepository {
        fn new(items: Vec<VocabularyItem>) -> Self {
            Self {
                items,
                fail: AtomicBool::new(false),
            }
        }

        fn check(&self) -> repository::Result<()> {
            if self.fail.load(Ordering::SeqCst) {
                Err(RepositoryError::Server {
                    status: 500,
                    message: "boom".to_string(),
                })
            } else {
                Ok(())
            }
        }
    }

    fn ts(raw: &str) -> DateTime<Utc> {
        timestamp::parse(raw).unwrap()
    }

    fn locale(id: i64, code: &str) -> Locale {
        Locale {
            id,
            locale_code: code.to_string(),
        }
    }

    fn item(id: i64, sr_stage: u32) -> VocabularyItem {
        let phrase = |pid: i64, audio: &str| Phrase {
            id: pid,
            text: format!("text {}", pid),
            audio_url: Some(audio.to_string()),
            locale: None,
        };
        VocabularyItem {
            id,
            original: phrase(id * 2, "a.mp3"),
            translated: phrase(id * 2 + 1, ""),
            sr_stage,
            review_date: ts("2025-01-10"),
            modified_at: ts("2025-01-01"),
            priority: 1,
            learned: false,
        }
    }

    fn schedule(id: i64) -> ScheduleRecord {
        ScheduleRecord {
            id,
            phrase_id: None,
            translated_phrase_id: None,
            learned: Some(false),
            sr_stage: 0,
            review_date: ts("2025-01-15"),
            modified_at: ts("2025-01-15"),
            priority: Some(2),
        }
    }

    #[async_trait]
    impl VocabularyRepository for FakeRepository {
        async fn list_vocabulary(&self) -> repository::Result<Vec<VocabularyItem>> {
            self.check()?;
            Ok(self.items.clone())
        }

        async fn review(&self, _id: VocabularyId) -> repository::Result<ReviewResult> {
            self.check()?;
            Ok(ReviewResult {
                sr_stage: 3,
                review_date: ts("2025-01-20"),
                modified_at: ts("2025-01-15"),
                learned: false,
            })
        }

        async fn delay(&self, ids: &[VocabularyId], days: i64) -> repository::Result<Vec<DelayResult>> {
            self.check()?;
            Ok(ids
                .iter()
                .map(|&id| DelayResult {
                    id,
                    review_date: ts("2025-01-10") + chrono::Duration::days(days),
                    modified_at: ts("2025-01-15"),
                })
                .collect())
        }

        async fn reset(&self, ids: &[VocabularyId]) -> repository::Result<Vec<ScheduleRecord>> {
            self.check()?;
            Ok(ids.iter().map(|&id| schedule(id)).collect())
        }

        async fn restart(&self, ids: &[VocabularyId]) -> repository::Result<Vec<ScheduleRecord>> {
            self.check()?;
            Ok(ids
                .iter()
                .map(|&id| ScheduleRecord {
                    sr_stage: 1,
                    ..schedule(id)
                })
                .collect())
        }

        async fn delete(&self, _ids: &[VocabularyId]) -> repository::Result<()> {
            self.check()
        }

        async fn create(&self, vocabulary: &NewVocabulary) -> repository::Result<VocabularyItem> {
            self.check()?;
            let mut created = item(99, 0);
            created.original.text = vocabulary.original_phrase.text.clone();
            created.priority = vocabulary.priority;
            Ok(created)
        }

        async fn update(&self, update: &VocabularyUpdate) -> repository::Result<VocabularyItem> {
            self.check()?;
            let mut updated = item(update.vocabulary_id, 2);
            updated.original.text = update.original_phrase.text.clone();
            Ok(updated)
        }

        async fn language_translations(&self) -> repository::Result<Vec<LanguageTranslation>> {
            self.check()?;
            Ok(vec![LanguageTranslation {
                id: 1,
                locale_code: "de-DE".to_string(),
                name: Some("German".to_string()),
            }])
        }

        async fn user_settings(&self) -> repository::Result<UserSettings> {
            self.check()?;
            Ok(UserSettings {
                origin_lang: locale(1, "de-DE"),
                learning_lang: locale(2, "en-US"),
            })
        }

        async fn translate_phrase(&self, phrase: &str, _source: &str, _target: &str) -> repository::Result<String> {
            self.check()?;
            Ok(phrase.to_uppercase())
        }

        async fn generate_phrase(&self, text: &str, _locale: &str) -> repository::Result<String> {
            self.check()?;
            Ok(format!("{} example", text))
        }
    }

    async fn loaded_store(items: Vec<VocabularyItem>) -> VocabularyStore<FakeRepository> {
        let mut store = VocabularyStore::new(FakeRepository::new(items));
        store.initialize_app_data().await.unwrap();
        store
    }

    fn fail_next(store: &VocabularyStore<FakeRepository>) {
        store.repository().fail.store(true, Ordering::SeqCst);
    }

    #[tokio::test]
    async fn test_initialize_loads_everything() {
        let store = loaded_store(vec![item(1, 0), item(2, 2)]).await;

        assert_eq!(store.source_vocabulary().len(), 2);
        assert_eq!(store.language_translations().len(), 1);
        assert_eq!(store.user_settings().unwrap().learning_lang.locale_code, "en-US");
        assert!(!store.loading());
        assert!(store.error().is_none());
    }

    #[tokio::test]
    async fn test_failed_load_records_error() {
        let mut store = VocabularyStore::new(FakeRepository::new(vec![item(1, 0)]));
        fail_next(&store);

        assert!(store.initialize_app_data().await.is_err());
        assert!(!store.loading());
        assert!(store.error().unwrap().contains("boom"));
        assert!(store.source_vocabulary().is_empty());
        assert!(store
            .notifications()
            .iter()
            .any(|n| n.message.starts_with("Error loading app data")));
    }

    #[tokio::test]
    async fn test_review_moves_item_and_toasts() {
        let mut store = loaded_store(vec![item(1, 2), item(2, 2)]).await;

        store.review(1).await.unwrap();

        let reviewed = &store.source_vocabulary()[0];
        assert_eq!(reviewed.sr_stage, 3);
        assert_eq!(reviewed.modified_at, ts("2025-01-15"));
        assert_eq!(store.source_vocabulary()[1], item(2, 2));

        let buckets = store.vocabulary_at(ts("2025-01-15T12:00:00Z"));
        assert_eq!(buckets.reviewed_today.len(), 1);
        assert_eq!(buckets.rest.len(), 1);

        let toast = store.notifications().last().unwrap();
        assert_eq!(toast.kind, ToastKind::Success);
        assert_eq!(toast.message, "Vocabulary 1 marked as reviewed");
    }

    #[tokio::test]
    async fn test_failed_mutation_leaves_state_untouched() {
        let mut store = loaded_store(vec![item(1, 2), item(2, 2)]).await;
        let before = store.source_vocabulary().to_vec();
        fail_next(&store);

        assert!(store.delay(&[1, 2], 3).await.is_err());
        assert!(store.reset(&[1]).await.is_err());
        assert!(store.delete(&[2]).await.is_err());

        assert_eq!(store.source_vocabulary(), before.as_slice());
        let messages: Vec<_> = store.notifications().iter().map(|n| n.message.clone()).collect();
        assert!(messages.contains(&"Error delaying vocabulary 1, 2 by 3 day(s): Server error: 500 - boom".to_string()));
        assert!(messages.contains(&"Error resetting vocabulary 1: Server error: 500 - boom".to_string()));
        assert!(messages.contains(&"Error deleting vocabulary 2: Server error: 500 - boom".to_string()));
    }

    #[tokio::test]
    async fn test_delay_reset_restart() {
        let mut store = loaded_store(vec![item(1, 2), item(2, 2), item(3, 4)]).await;

        store.delay(&[1], 5).await.unwrap();
        store.reset(&[2]).await.unwrap();
        store.restart(&[3]).await.unwrap();

        let items = store.source_vocabulary();
        assert_eq!(items[0].review_date, ts("2025-01-15"));
        assert_eq!(items[0].sr_stage, 2);
        assert_eq!((items[1].sr_stage, items[1].priority), (0, 2));
        assert_eq!(items[2].sr_stage, 1);
    }

    #[tokio::test]
    async fn test_delete_create_update() {
        let mut store = loaded_store(vec![item(1, 2), item(2, 2)]).await;

        store.delete(&[1]).await.unwrap();
        assert_eq!(store.notifications().last().unwrap().message, "Deleted 1 vocab item(s)");

        let created = store
            .create(&NewVocabulary {
                original_phrase: NewPhrase {
                    text: "Katze".to_string(),
                    audio_url: "katze.mp3".to_string(),
                    locale_id: Some(1),
                },
                translated_phrase: NewPhrase {
                    text: "cat".to_string(),
                    audio_url: String::new(),
                    locale_id: Some(2),
                },
                review_date: None,
                priority: 4,
            })
            .await
            .unwrap();
        assert_eq!(created.id, 99);

        let mut update = VocabularyUpdate::from_item(&store.source_vocabulary()[0]);
        update.original_phrase.text = "edited".to_string();
        store.update(&update).await.unwrap();

        let ids: Vec<_> = store.source_vocabulary().iter().map(|v| v.id).collect();
        assert_eq!(ids, vec![2, 99]);
        assert_eq!(store.source_vocabulary()[0].original.text, "edited");
        assert_eq!(store.source_vocabulary()[1].original.text, "Katze");
    }

    #[tokio::test]
    async fn test_edit_form_state() {
        let mut store = loaded_store(vec![item(1, 2)]).await;

        assert_eq!(store.edit_vocabulary(1).unwrap().id, 1);
        assert!(store.is_vocabulary_form_open());

        store.close_vocabulary_form();
        assert!(!store.is_vocabulary_form_open());
        assert!(store.vocabulary_to_edit().is_none());

        assert!(matches!(
            store.edit_vocabulary(7),
            Err(StoreError::VocabularyNotFound(7))
        ));
        assert!(!store.is_vocabulary_form_open());

        store.open_vocabulary_form();
        assert!(store.is_vocabulary_form_open());
        assert!(store.vocabulary_to_edit().is_none());
    }

    #[tokio::test]
    async fn test_stale_delete_response_is_harmless() {
        let mut store = loaded_store(vec![item(1, 2), item(2, 2)]).await;

        store.delete(&[1]).await.unwrap();
        store.apply(Mutation::Deleted { ids: vec![1] });

        assert_eq!(store.source_vocabulary().len(), 1);
    }
}
