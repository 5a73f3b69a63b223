use crate::errors::{FetchError, RepoError, StorageError};
use crate::models::{ApiMemeTemplate, Meme, UserProfile};
use async_trait::async_trait;

/// Trait defining a flat string key-value store (the local storage stand-in).
#[async_trait]
pub trait KeyValueStorage: Send + Sync + 'static { // Send+Sync+'static required for Arc<dyn>
    /// Returns the raw value stored under `key`, or Ok(None) if absent.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replaces the value stored under `key`.
    async fn set(&self, key: &str, value: String) -> Result<(), StorageError>;
}

/// Trait defining the client-local meme records: uploads, likes, saves and
/// the profile.
///
/// Reads never fail: missing or unreadable records come back empty (or as the
/// default profile). Writes report backend failures.
#[async_trait]
pub trait MemeRepository: Send + Sync + 'static {
    async fn get_uploaded_memes(&self) -> Vec<Meme>;

    /// Creates and persists a new uploaded meme. Inputs are not validated.
    async fn upload_meme(&self, name: &str, image_url: &str, caption: &str) -> Result<Meme, RepoError>;

    async fn get_liked_memes(&self) -> Vec<String>;

    /// Flips like membership for `id`; returns whether it is now liked.
    async fn toggle_meme_like(&self, id: &str) -> Result<bool, RepoError>;

    async fn get_saved_memes(&self) -> Vec<String>;

    /// Flips save membership for `id`; returns whether it is now saved.
    async fn toggle_meme_save(&self, id: &str) -> Result<bool, RepoError>;

    async fn get_profile(&self) -> UserProfile;

    async fn save_profile(&self, profile: &UserProfile) -> Result<(), RepoError>;
}

/// Trait defining the read-only remote catalog of meme templates.
#[async_trait]
pub trait TemplateSource: Send + Sync + 'static {
    async fn fetch_templates(&self) -> Result<Vec<ApiMemeTemplate>, FetchError>;
}
