use crate::{
    domain::{KeyValueStorage, MemeRepository},
    errors::RepoError,
    models::{Meme, MemeSource, UPLOADED_ID_PREFIX, UserProfile, to_timestamp},
};
use async_trait::async_trait;
use chrono::Utc;
use serde::{Serialize, de::DeserializeOwned};
use std::sync::Arc;
use tracing::info;

pub const UPLOADED_MEMES_KEY: &str = "uploadedMemes";
pub const LIKED_MEMES_KEY: &str = "likedMemes";
pub const SAVED_MEMES_KEY: &str = "savedMemes";
pub const USER_PROFILE_KEY: &str = "user_profile";

const UPLOAD_DIMENSION: u32 = 600;

#[derive(Clone)]
pub struct LocalMemeRepository {
    storage: Arc<dyn KeyValueStorage>,
}

impl LocalMemeRepository {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        info!("Initializing LocalMemeRepository");
        Self { storage }
    }

    /// Reads and decodes `key`. Absent, unreadable or malformed values all
    /// come back as `None`.
    async fn read_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.storage.get(key).await {
            Ok(raw) => raw?,
            Err(e) => {
                tracing::warn!(key, error = %e, "Local store read failed, treating record as absent");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key, error = %e, "Malformed local record, treating it as absent");
                None
            }
        }
    }

    async fn write_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), RepoError> {
        let encoded = serde_json::to_string(value).map_err(|source| RepoError::Encode {
            key: key.to_string(),
            source,
        })?;
        self.storage.set(key, encoded).await?;
        Ok(())
    }

    /// Whole-list read-modify-write. Not atomic against other processes
    /// sharing the same store; the last writer wins.
    async fn toggle_membership(&self, key: &str, id: &str) -> Result<bool, RepoError> {
        let mut ids: Vec<String> = self.read_json(key).await.unwrap_or_default();

        let now_member = if ids.iter().any(|existing| existing == id) {
            ids.retain(|existing| existing != id);
            false
        } else {
            ids.push(id.to_string());
            true
        };

        self.write_json(key, &ids).await?;
        tracing::debug!(key, meme_id = %id, now_member, "Toggled membership");
        Ok(now_member)
    }
}

/// `user-meme-<millis>`, moved forward past any id already taken.
fn next_upload_id(existing: &[Meme], now_millis: i64) -> String {
    let mut stamp = now_millis;
    loop {
        let candidate = format!("{UPLOADED_ID_PREFIX}{stamp}");
        if !existing.iter().any(|meme| meme.id == candidate) {
            return candidate;
        }
        stamp += 1;
    }
}

#[async_trait]
impl MemeRepository for LocalMemeRepository {
    async fn get_uploaded_memes(&self) -> Vec<Meme> {
        let mut memes: Vec<Meme> = self.read_json(UPLOADED_MEMES_KEY).await.unwrap_or_default();
        for meme in &mut memes {
            meme.source = MemeSource::Uploaded;
            meme.user_uploaded = true;
        }
        memes
    }

    async fn upload_meme(&self, name: &str, image_url: &str, caption: &str) -> Result<Meme, RepoError> {
        let mut memes = self.get_uploaded_memes().await;
        let now = Utc::now();

        let meme = Meme {
            id: next_upload_id(&memes, now.timestamp_millis()),
            name: name.to_string(),
            url: image_url.to_string(),
            width: UPLOAD_DIMENSION,
            height: UPLOAD_DIMENSION,
            box_count: 0,
            likes: 0,
            comments: Vec::new(),
            date_created: Some(to_timestamp(now)),
            user_uploaded: true,
            caption: Some(caption.to_string()),
            source: MemeSource::Uploaded,
        };

        memes.push(meme.clone());
        self.write_json(UPLOADED_MEMES_KEY, &memes).await?;

        info!(meme_id = %meme.id, "Meme uploaded to local store");
        Ok(meme)
    }

    async fn get_liked_memes(&self) -> Vec<String> {
        self.read_json(LIKED_MEMES_KEY).await.unwrap_or_default()
    }

    async fn toggle_meme_like(&self, id: &str) -> Result<bool, RepoError> {
        self.toggle_membership(LIKED_MEMES_KEY, id).await
    }

    async fn get_saved_memes(&self) -> Vec<String> {
        self.read_json(SAVED_MEMES_KEY).await.unwrap_or_default()
    }

    async fn toggle_meme_save(&self, id: &str) -> Result<bool, RepoError> {
        self.toggle_membership(SAVED_MEMES_KEY, id).await
    }

    async fn get_profile(&self) -> UserProfile {
        self.read_json::<UserProfile>(USER_PROFILE_KEY)
            .await
            .unwrap_or_default()
            .normalized()
    }

    async fn save_profile(&self, profile: &UserProfile) -> Result<(), RepoError> {
        self.write_json(USER_PROFILE_KEY, profile).await?;
        info!(username = %profile.username, "Profile saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::StorageError;
    use crate::storage::MemoryStorage;

    fn repo_with(storage: Arc<MemoryStorage>) -> LocalMemeRepository {
        LocalMemeRepository::new(storage)
    }

    /// Accepts reads, rejects every write.
    struct ReadOnlyStorage;

    #[async_trait]
    impl KeyValueStorage for ReadOnlyStorage {
        async fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Ok(None)
        }

        async fn set(&self, key: &str, _value: String) -> Result<(), StorageError> {
            Err(StorageError::BackendError(anyhow::anyhow!("read-only store, refused '{key}'")))
        }
    }

    #[tokio::test]
    async fn test_upload_round_trip() {
        let repo = repo_with(Arc::new(MemoryStorage::new()));
        let before = repo.get_uploaded_memes().await;
        assert!(before.is_empty());

        let created = repo.upload_meme("Cat", "http://x/y.png", "lol").await.expect("upload");
        let after = repo.get_uploaded_memes().await;

        assert_eq!(after.len(), 1);
        let stored = &after[0];
        assert_eq!(stored, &created);
        assert!(stored.id.starts_with("user-meme-"));
        assert!(stored.user_uploaded);
        assert_eq!(stored.likes, 0);
        assert!(stored.comments.is_empty());
        assert_eq!(stored.name, "Cat");
        assert_eq!(stored.url, "http://x/y.png");
        assert_eq!(stored.caption.as_deref(), Some("lol"));
        assert_eq!((stored.width, stored.height), (600, 600));
    }

    #[tokio::test]
    async fn test_upload_accepts_empty_fields() {
        let repo = repo_with(Arc::new(MemoryStorage::new()));
        let created = repo.upload_meme("", "", "").await.expect("upload");
        assert_eq!(created.name, "");
        assert_eq!(created.caption.as_deref(), Some(""));
    }

    #[tokio::test]
    async fn test_uploads_get_distinct_ids() {
        let repo = repo_with(Arc::new(MemoryStorage::new()));
        for i in 0..5 {
            repo.upload_meme(&format!("m{i}"), "u", "c").await.expect("upload");
        }
        let memes = repo.get_uploaded_memes().await;
        let mut ids: Vec<&str> = memes.iter().map(|m| m.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 5);
    }

    #[test]
    fn test_next_upload_id_skips_taken_stamp() {
        let taken = Meme {
            id: "user-meme-100".into(),
            name: String::new(),
            url: String::new(),
            width: 600,
            height: 600,
            box_count: 0,
            likes: 0,
            comments: Vec::new(),
            date_created: None,
            user_uploaded: true,
            caption: Some(String::new()),
            source: MemeSource::Uploaded,
        };
        assert_eq!(next_upload_id(&[], 100), "user-meme-100");
        assert_eq!(next_upload_id(&[taken], 100), "user-meme-101");
    }

    #[tokio::test]
    async fn test_toggle_like_is_symmetric() {
        let repo = repo_with(Arc::new(MemoryStorage::new()));
        assert!(repo.toggle_meme_like("181913649").await.expect("toggle"));
        assert_eq!(repo.get_liked_memes().await, vec!["181913649".to_string()]);
        assert!(!repo.toggle_meme_like("181913649").await.expect("toggle"));
        assert!(repo.get_liked_memes().await.is_empty());
        assert!(repo.toggle_meme_like("181913649").await.expect("toggle"));
    }

    #[tokio::test]
    async fn test_like_and_save_lists_are_independent() {
        let repo = repo_with(Arc::new(MemoryStorage::new()));
        repo.toggle_meme_save("meme-3").await.expect("save");
        assert!(repo.get_liked_memes().await.is_empty());
        assert_eq!(repo.get_saved_memes().await, vec!["meme-3".to_string()]);
    }

    #[tokio::test]
    async fn test_toggle_off_removes_duplicates() {
        let storage = Arc::new(MemoryStorage::new());
        storage
            .set(LIKED_MEMES_KEY, r#"["a","b","a"]"#.into())
            .await
            .expect("seed");
        let repo = repo_with(storage);
        assert!(!repo.toggle_meme_like("a").await.expect("toggle"));
        assert_eq!(repo.get_liked_memes().await, vec!["b".to_string()]);
    }

    #[tokio::test]
    async fn test_malformed_values_read_as_empty() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(UPLOADED_MEMES_KEY, "{not json".into()).await.expect("seed");
        storage.set(SAVED_MEMES_KEY, "42".into()).await.expect("seed");
        storage.set(USER_PROFILE_KEY, "\"oops\"".into()).await.expect("seed");
        let repo = repo_with(storage);

        assert!(repo.get_uploaded_memes().await.is_empty());
        assert!(repo.get_saved_memes().await.is_empty());
        assert_eq!(repo.get_profile().await, UserProfile::default());
        // A malformed list is replaced on the next toggle.
        assert!(repo.toggle_meme_save("x").await.expect("toggle"));
        assert_eq!(repo.get_saved_memes().await, vec!["x".to_string()]);
    }

    #[tokio::test]
    async fn test_profile_round_trip() {
        let repo = repo_with(Arc::new(MemoryStorage::new()));
        assert_eq!(repo.get_profile().await.username, "MemeEnthusiast");

        let profile = UserProfile {
            username: "PunPirate".into(),
            avatar_url: "https://i.pravatar.cc/150?img=3".into(),
            bio: "arr".into(),
        };
        repo.save_profile(&profile).await.expect("save profile");
        assert_eq!(repo.get_profile().await, profile);
    }

    #[tokio::test]
    async fn test_write_failures_surface() {
        let repo = LocalMemeRepository::new(Arc::new(ReadOnlyStorage));
        assert!(repo.get_liked_memes().await.is_empty());
        let err = repo.upload_meme("Cat", "u", "c").await.expect_err("write refused");
        assert!(matches!(err, RepoError::Storage(StorageError::BackendError(_))));
        assert!(repo.toggle_meme_like("1").await.is_err());
    }
}
