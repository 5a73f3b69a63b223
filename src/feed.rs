//! Feed state shared by every screen: the loaded collection, the active
//! ordering, the debounced search box, and the detail and profile views.

use chrono::Utc;
use std::{sync::Arc, time::Duration};
use tokio::time::Instant;

use crate::{
    aggregator::MemeAggregator,
    comments::session_comment,
    config::DEFAULT_SEARCH_DEBOUNCE_MS,
    domain::MemeRepository,
    errors::RepoError,
    filter::{filter_memes, search_memes},
    models::{Comment, Meme, MemeFilter, MemeKey, UserProfile},
};

pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(DEFAULT_SEARCH_DEBOUNCE_MS);

/// A value that only takes effect once it has stopped changing for `delay`.
#[derive(Debug, Clone)]
pub struct Debounced<T> {
    settled: T,
    pending: Option<(T, Instant)>,
    delay: Duration,
}

impl<T: Clone> Debounced<T> {
    pub fn new(initial: T, delay: Duration) -> Self {
        Self {
            settled: initial,
            pending: None,
            delay,
        }
    }

    /// Records a new value. Restarts the delay.
    pub fn set(&mut self, value: T) {
        self.pending = Some((value, Instant::now()));
    }

    /// Most recently written value, settled or not.
    pub fn latest(&self) -> &T {
        self.pending.as_ref().map(|(value, _)| value).unwrap_or(&self.settled)
    }

    /// The value in effect now.
    pub fn current(&mut self) -> &T {
        if self.pending.as_ref().is_some_and(|(_, at)| at.elapsed() >= self.delay) {
            if let Some((value, _)) = self.pending.take() {
                self.settled = value;
            }
        }
        &self.settled
    }

    /// Waits until the pending value (if any) has settled.
    pub async fn settle(&mut self) -> &T {
        if let Some((_, at)) = &self.pending {
            tokio::time::sleep_until(*at + self.delay).await;
        }
        self.current()
    }
}

/// Orchestrates the aggregator, filter engine and local store for the UI.
pub struct FeedController {
    aggregator: Arc<MemeAggregator>,
    repo: Arc<dyn MemeRepository>,
    memes: Vec<Meme>,
    active_filter: MemeFilter,
    search: Debounced<String>,
    loaded: bool,
}

impl FeedController {
    pub fn new(aggregator: Arc<MemeAggregator>, repo: Arc<dyn MemeRepository>, search_delay: Duration) -> Self {
        Self {
            aggregator,
            repo,
            memes: Vec::new(),
            active_filter: MemeFilter::default(),
            search: Debounced::new(String::new(), search_delay),
            loaded: false,
        }
    }

    /// (Re)loads the merged feed. An empty result is not an error.
    pub async fn load(&mut self) {
        self.memes = self.aggregator.load_feed().await;
        self.loaded = true;
        tracing::info!(count = self.memes.len(), filter = %self.active_filter, "Feed loaded");
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Everything loaded, in source order.
    pub fn memes(&self) -> &[Meme] {
        &self.memes
    }

    pub fn active_filter(&self) -> MemeFilter {
        self.active_filter
    }

    pub fn set_filter(&mut self, filter: MemeFilter) {
        self.active_filter = filter;
    }

    /// Text as typed, before debouncing.
    pub fn search_query(&self) -> &str {
        self.search.latest()
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search.set(query.into());
    }

    pub async fn settle_search(&mut self) {
        self.search.settle().await;
    }

    /// The feed as it should be shown: ordered by the active filter, then
    /// narrowed by the settled search query.
    pub fn visible(&mut self) -> Vec<Meme> {
        if self.memes.is_empty() {
            return Vec::new();
        }

        let filter = self.active_filter;
        let ordered = self.aggregator.rng().with(|r| filter_memes(&self.memes, filter, r));

        let query = self.search.current();
        if query.is_empty() {
            ordered
        } else {
            search_memes(&ordered, query)
        }
    }

    /// Flips like membership and moves the in-memory like count by one.
    pub async fn toggle_like(&mut self, id: &str) -> Result<bool, RepoError> {
        let liked = self.repo.toggle_meme_like(id).await?;
        if let Some(meme) = self.memes.iter_mut().find(|meme| meme.id == id) {
            meme.likes = adjust_likes(meme.likes, liked);
        }
        Ok(liked)
    }

    pub async fn toggle_save(&self, id: &str) -> Result<bool, RepoError> {
        self.repo.toggle_meme_save(id).await
    }

    pub async fn is_liked(&self, id: &str) -> bool {
        self.repo.get_liked_memes().await.iter().any(|liked| liked == id)
    }

    pub async fn upload(&mut self, name: &str, image_url: &str, caption: &str) -> Result<Meme, RepoError> {
        let meme = self.repo.upload_meme(name, image_url, caption).await?;
        if self.loaded {
            self.memes.push(meme.clone());
        }
        Ok(meme)
    }

    /// Opens the detail view for `key`; `None` when no source knows it.
    pub async fn open_meme(&self, key: &MemeKey) -> Option<MemeDetails> {
        let meme = self.aggregator.fetch_meme_by_id(key).await?;
        let id = meme.id.clone();
        let liked = self.repo.get_liked_memes().await.contains(&id);
        let saved = self.repo.get_saved_memes().await.contains(&id);
        Some(MemeDetails::new(self.repo.clone(), meme, liked, saved))
    }

    pub async fn top_memes(&self, limit: usize) -> Vec<Meme> {
        self.aggregator.get_top_memes(limit).await
    }

    pub async fn profile_view(&self) -> ProfileView {
        let profile = self.repo.get_profile().await;
        let uploaded = self.repo.get_uploaded_memes().await;
        let liked_ids = self.repo.get_liked_memes().await;
        let saved_ids = self.repo.get_saved_memes().await;
        ProfileView {
            profile,
            uploaded,
            liked: self.aggregator.fetch_memes_by_ids(&liked_ids).await,
            saved: self.aggregator.fetch_memes_by_ids(&saved_ids).await,
        }
    }
}

fn adjust_likes(likes: u64, liked: bool) -> u64 {
    if liked { likes + 1 } else { likes.saturating_sub(1) }
}

/// One opened meme. Comments written here live only as long as the view.
pub struct MemeDetails {
    repo: Arc<dyn MemeRepository>,
    meme: Meme,
    like_count: u64,
    liked: bool,
    saved: bool,
}

impl MemeDetails {
    fn new(repo: Arc<dyn MemeRepository>, meme: Meme, liked: bool, saved: bool) -> Self {
        let like_count = meme.likes;
        Self {
            repo,
            meme,
            like_count,
            liked,
            saved,
        }
    }

    pub fn meme(&self) -> &Meme {
        &self.meme
    }

    pub fn like_count(&self) -> u64 {
        self.like_count
    }

    pub fn is_liked(&self) -> bool {
        self.liked
    }

    pub fn is_saved(&self) -> bool {
        self.saved
    }

    pub fn comments(&self) -> &[Comment] {
        &self.meme.comments
    }

    pub async fn toggle_like(&mut self) -> Result<bool, RepoError> {
        self.liked = self.repo.toggle_meme_like(&self.meme.id).await?;
        self.like_count = adjust_likes(self.like_count, self.liked);
        Ok(self.liked)
    }

    pub async fn toggle_save(&mut self) -> Result<bool, RepoError> {
        self.saved = self.repo.toggle_meme_save(&self.meme.id).await?;
        Ok(self.saved)
    }

    /// Prepends a comment by the local user. Blank text is ignored.
    pub fn add_comment(&mut self, text: &str) -> Option<&Comment> {
        if text.trim().is_empty() {
            return None;
        }
        let comment = session_comment(&self.meme.id, text, Utc::now());
        self.meme.comments.insert(0, comment);
        self.meme.comments.first()
    }
}

#[derive(Debug, Clone)]
pub struct ProfileView {
    pub profile: UserProfile,
    pub uploaded: Vec<Meme>,
    pub liked: Vec<Meme>,
    pub saved: Vec<Meme>,
}
