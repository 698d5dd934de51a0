use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{RepositoryError, Result, VocabularyRepository};
use crate::audio::AudioUrlCache;
use crate::config::ClientConfig;
use crate::vocabulary::{
    DelayResult, LanguageTranslation, NewVocabulary, ReviewResult, ScheduleRecord, UserSettings,
    VocabularyId, VocabularyItem, VocabularyUpdate,
};

/// HTTP client for the vocabulary backend
pub struct HttpVocabularyRepository {
    client: Client,
    base_url: String,
    token: Option<String>,
    audio_cache: Mutex<AudioUrlCache>,
}

/// Response of the audio generation endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedAudio {
    pub filename: String,
}

#[derive(Deserialize)]
struct LoginResponse {
    access_token: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TranslateResponse {
    translated_phrase: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    generated_phrase: String,
}

#[derive(Deserialize)]
struct DeleteAudiosResponse {
    #[serde(default)]
    deleted: Vec<String>,
}

impl HttpVocabularyRepository {
    /// Create a client from the configured base URL and token
    pub fn new(config: &ClientConfig) -> Result<Self> {
        // Normalize URL - ensure no trailing slash
        let base_url = config.api_base_url.trim_end_matches('/').to_string();

        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(RepositoryError::InvalidUrl(
                "URL must start with http:// or https://".to_string(),
            ));
        }

        let audio_cache = AudioUrlCache::with_ttl_secs(config.audio_cache_secs).ok_or_else(|| {
            RepositoryError::InvalidConfig(format!(
                "audio_cache_secs out of range: {}",
                config.audio_cache_secs
            ))
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            base_url,
            token: config.token.clone(),
            audio_cache: Mutex::new(audio_cache),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    /// Build full URL for a path
    fn url(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        if path.is_empty() {
            self.base_url.clone()
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// URL of a single audio file, with the filename encoded as one path segment
    fn audio_file_url(&self, filename: &str) -> Result<Url> {
        let mut url = Url::parse(&self.url("audio"))
            .map_err(|e| RepositoryError::InvalidUrl(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| RepositoryError::InvalidUrl(self.base_url.clone()))?
            .push(filename);
        Ok(url)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.authorize(self.client.request(method, self.url(path)))
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send a request and return the body of a successful response
    async fn send(&self, builder: RequestBuilder, path: &str) -> Result<String> {
        let response = builder.send().await?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(RepositoryError::AuthFailed);
            }
            StatusCode::NOT_FOUND => {
                return Err(RepositoryError::NotFound(path.to_string()));
            }
            status if !status.is_success() => {
                let body = response.text().await.unwrap_or_default();
                return Err(RepositoryError::Server {
                    status: status.as_u16(),
                    message: server_message(&body),
                });
            }
            _ => {}
        }

        Ok(response.text().await?)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let body = self.send(self.request(Method::GET, path), path).await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn post_json<B, T>(&self, path: &str, payload: &B) -> Result<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let builder = self.request(Method::POST, path).json(payload);
        let body = self.send(builder, path).await?;
        Ok(serde_json::from_str(&body)?)
    }

    fn audio_cache(&self) -> MutexGuard<'_, AudioUrlCache> {
        self.audio_cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Exchange credentials for an access token
    pub async fn login(&self, email: &str, password: &str) -> Result<String> {
        let response: LoginResponse = self
            .post_json("user/login", &json!({ "email": email, "password": password }))
            .await?;
        response.access_token.ok_or(RepositoryError::AuthFailed)
    }

    /// Signed URL for an audio file, reused while still fresh
    pub async fn audio_url(&self, filename: &str) -> Result<String> {
        let now = Utc::now();
        let cached = self.audio_cache().get(filename, now).map(str::to_string);
        if let Some(url) = cached {
            return Ok(url);
        }

        let file_url = self.audio_file_url(filename)?;
        let builder = self.authorize(self.client.get(file_url.clone()));
        let url = self.send(builder, file_url.path()).await?;
        let url = url.trim().to_string();
        self.audio_cache().insert(filename, url.clone(), now);
        Ok(url)
    }

    /// Synthesize speech for `text`
    pub async fn generate_audio(&self, text: &str) -> Result<GeneratedAudio> {
        self.post_json("audio/generate", &json!({ "text": text })).await
    }

    /// Delete audio files, returning the ones the backend removed
    pub async fn delete_audios(&self, filenames: &[String]) -> Result<Vec<String>> {
        let response: DeleteAudiosResponse = self
            .post_json("audio/delete", &json!({ "filenames": filenames }))
            .await?;

        let mut cache = self.audio_cache();
        for filename in &response.deleted {
            cache.remove(filename);
        }
        Ok(response.deleted)
    }
}

#[async_trait]
impl VocabularyRepository for HttpVocabularyRepository {
    async fn list_vocabulary(&self) -> Result<Vec<VocabularyItem>> {
        self.get_json("vocabulary").await
    }

    async fn review(&self, id: VocabularyId) -> Result<ReviewResult> {
        self.post_json("vocabulary/review", &json!({ "id": id })).await
    }

    async fn delay(&self, ids: &[VocabularyId], days: i64) -> Result<Vec<DelayResult>> {
        self.post_json("vocabulary/delay", &json!({ "ids": ids, "days": days }))
            .await
    }

    async fn reset(&self, ids: &[VocabularyId]) -> Result<Vec<ScheduleRecord>> {
        self.post_json("vocabulary/reset", &json!({ "ids": ids })).await
    }

    async fn restart(&self, ids: &[VocabularyId]) -> Result<Vec<ScheduleRecord>> {
        self.post_json("vocabulary/restart", &json!({ "ids": ids })).await
    }

    async fn delete(&self, ids: &[VocabularyId]) -> Result<()> {
        let path = "vocabulary/delete";
        let builder = self
            .request(Method::POST, path)
            .json(&json!({ "ids": ids }));
        self.send(builder, path).await?;
        Ok(())
    }

    async fn create(&self, vocabulary: &NewVocabulary) -> Result<VocabularyItem> {
        self.post_json("vocabulary/create", &json!({ "vocabulary": vocabulary }))
            .await
    }

    async fn update(&self, update: &VocabularyUpdate) -> Result<VocabularyItem> {
        self.post_json("vocabulary/update", &json!({ "vocabulary": update }))
            .await
    }

    async fn language_translations(&self) -> Result<Vec<LanguageTranslation>> {
        self.get_json("languages/translations").await
    }

    async fn user_settings(&self) -> Result<UserSettings> {
        self.get_json("user/settings").await
    }

    async fn translate_phrase(&self, phrase: &str, source: &str, target: &str) -> Result<String> {
        let response: TranslateResponse = self
            .post_json(
                "translate",
                &json!({
                    "phrase": phrase,
                    "sourceLanguage": source,
                    "targetLanguage": target,
                }),
            )
            .await?;
        Ok(response.translated_phrase)
    }

    async fn generate_phrase(&self, text: &str, locale: &str) -> Result<String> {
        let response: GenerateResponse = self
            .post_json(
                "vocabulary/generate",
                &json!({ "text": text, "locale": locale }),
            )
            .await?;
        Ok(response.generated_phrase)
    }
}

/// Pull the message out of an error body (`{"error": "..."}` or plain text)
fn server_message(body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        error: String,
    }

    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => parsed.error,
        Err(_) => body.trim().to_string(),
    }
}
