//! Data models for vocabulary flashcards

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::timestamp;

/// Backend identifier of a vocabulary pair
pub type VocabularyId = i64;

/// A language locale as configured on the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locale {
    pub id: i64,
    pub locale_code: String,
}

/// One side of a flashcard: text, optional audio and its locale
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phrase {
    pub id: i64,
    pub text: String,
    /// Audio filename on the backend; empty means no audio
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<Locale>,
}

impl Phrase {
    pub fn has_audio(&self) -> bool {
        matches!(&self.audio_url, Some(url) if !url.is_empty())
    }
}

/// A bilingual flashcard pair with its spaced repetition state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyItem {
    pub id: VocabularyId,
    pub original: Phrase,
    pub translated: Phrase,
    /// Spaced repetition stage, 0 until the first review
    #[serde(rename = "sr_stage_id")]
    pub sr_stage: u32,
    /// When the item next becomes due
    #[serde(with = "timestamp")]
    pub review_date: DateTime<Utc>,
    /// Last review, delay, reset or restart
    #[serde(with = "timestamp")]
    pub modified_at: DateTime<Utc>,
    /// Ordering hint for new items, lower first
    #[serde(default)]
    pub priority: i32,
    /// Retired from the review cycle for good
    #[serde(default, with = "learned_flag")]
    pub learned: bool,
}

impl VocabularyItem {
    /// Never reviewed yet
    pub fn is_unstarted(&self) -> bool {
        self.sr_stage == 0
    }

    /// At least one side carries an audio file
    pub fn has_audio(&self) -> bool {
        self.original.has_audio() || self.translated.has_audio()
    }

    /// Audio filenames attached to this item
    pub fn audio_files(&self) -> Vec<&str> {
        [&self.original, &self.translated]
            .into_iter()
            .filter_map(|phrase| phrase.audio_url.as_deref())
            .filter(|url| !url.is_empty())
            .collect()
    }
}

// ==================== Mutation Results ====================

/// Scheduling fields returned after reviewing a single item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewResult {
    #[serde(rename = "sr_stage_id")]
    pub sr_stage: u32,
    #[serde(with = "timestamp")]
    pub review_date: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub modified_at: DateTime<Utc>,
    #[serde(default, with = "learned_flag")]
    pub learned: bool,
}

/// New due date for one delayed item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayResult {
    pub id: VocabularyId,
    #[serde(with = "timestamp")]
    pub review_date: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub modified_at: DateTime<Utc>,
}

/// Scheduling record returned by reset and restart
///
/// `learned` and `priority` are only present when the backend sends them; a
/// missing field leaves the local value as it is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRecord {
    pub id: VocabularyId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phrase_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translated_phrase_id: Option<i64>,
    #[serde(default, with = "learned_flag::option", skip_serializing_if = "Option::is_none")]
    pub learned: Option<bool>,
    #[serde(rename = "sr_stage_id")]
    pub sr_stage: u32,
    #[serde(with = "timestamp")]
    pub review_date: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub modified_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,
}

// ==================== Request Payloads ====================

/// One side of a vocabulary pair being created
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPhrase {
    pub text: String,
    #[serde(default)]
    pub audio_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale_id: Option<i64>,
}

/// Payload for creating a vocabulary pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewVocabulary {
    pub original_phrase: NewPhrase,
    pub translated_phrase: NewPhrase,
    #[serde(default, with = "timestamp::option")]
    pub review_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub priority: i32,
}

/// Editable text and audio of one side
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhraseEdit {
    pub text: String,
    #[serde(default)]
    pub audio_url: String,
}

/// Payload for editing an existing vocabulary pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabularyUpdate {
    pub vocabulary_id: VocabularyId,
    pub original_phrase: PhraseEdit,
    pub translated_phrase: PhraseEdit,
    #[serde(with = "timestamp::option")]
    pub review_date: Option<DateTime<Utc>>,
    pub priority: i32,
}

impl VocabularyUpdate {
    /// Prefill an update from the item currently being edited
    pub fn from_item(item: &VocabularyItem) -> Self {
        let edit = |phrase: &Phrase| PhraseEdit {
            text: phrase.text.clone(),
            audio_url: phrase.audio_url.clone().unwrap_or_default(),
        };
        Self {
            vocabulary_id: item.id,
            original_phrase: edit(&item.original),
            translated_phrase: edit(&item.translated),
            review_date: Some(item.review_date),
            priority: item.priority,
        }
    }
}

// ==================== Account Data ====================

/// A language the backend can translate between
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageTranslation {
    pub id: i64,
    pub locale_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Per-user language pairing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSettings {
    pub origin_lang: Locale,
    pub learning_lang: Locale,
}

/// Serde adapter for the backend's 0/1 `learned` column
mod learned_flag {
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawFlag {
        Int(i64),
        Bool(bool),
    }

    pub fn serialize<S>(learned: &bool, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u8(u8::from(*learned))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<bool, D::Error>
    where
        D: Deserializer<'de>,
    {
        from_raw(RawFlag::deserialize(deserializer)?)
    }

    fn from_raw<E: serde::de::Error>(raw: RawFlag) -> Result<bool, E> {
        match raw {
            RawFlag::Int(0) | RawFlag::Bool(false) => Ok(false),
            RawFlag::Int(1) | RawFlag::Bool(true) => Ok(true),
            RawFlag::Int(other) => Err(E::custom(format!(
                "learned flag must be 0 or 1, got {}",
                other
            ))),
        }
    }

    pub mod option {
        use serde::{Deserialize, Deserializer, Serializer};

        use super::RawFlag;

        pub fn serialize<S>(learned: &Option<bool>, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            match learned {
                Some(learned) => super::serialize(learned, serializer),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
        where
            D: Deserializer<'de>,
        {
            Option::<RawFlag>::deserialize(deserializer)?
                .map(super::from_raw)
                .transpose()
        }
    }
}
