use chrono::Utc;
use std::{collections::HashSet, sync::Arc};

use crate::{
    comments::generate_comments,
    domain::{MemeRepository, TemplateSource},
    leaderboard::synthesize_placeholder,
    models::{Meme, MemeKey},
    random::SharedRng,
    remote::fetch_meme_templates,
};

/// Merges the remote template catalog with locally uploaded memes.
#[derive(Clone)]
pub struct MemeAggregator {
    templates: Arc<dyn TemplateSource>,
    repo: Arc<dyn MemeRepository>,
    rng: SharedRng,
}

impl MemeAggregator {
    pub fn new(templates: Arc<dyn TemplateSource>, repo: Arc<dyn MemeRepository>, rng: SharedRng) -> Self {
        Self { templates, repo, rng }
    }

    pub fn rng(&self) -> &SharedRng {
        &self.rng
    }

    /// Fresh, enriched template catalog. Empty on any fetch failure.
    pub async fn fetch_meme_templates(&self) -> Vec<Meme> {
        fetch_meme_templates(self.templates.as_ref(), &self.rng).await
    }

    /// Templates followed by uploads. A repeated id keeps its first record.
    pub async fn load_feed(&self) -> Vec<Meme> {
        let templates = self.fetch_meme_templates().await;
        let uploads = self.repo.get_uploaded_memes().await;
        tracing::debug!(templates = templates.len(), uploads = uploads.len(), "Merging feed sources");

        let mut seen = HashSet::new();
        templates
            .into_iter()
            .chain(uploads)
            .filter(|meme| {
                let fresh = seen.insert(meme.id.clone());
                if !fresh {
                    tracing::warn!(meme_id = %meme.id, "Dropping duplicate meme id from feed");
                }
                fresh
            })
            .collect()
    }

    /// Resolves one meme with a freshly generated comment thread.
    ///
    /// Uploaded ids are looked up in the local store first, then every key is
    /// tried against the template catalog, and leaderboard ids that are still
    /// unmatched get a synthesized placeholder. `None` means not found.
    pub async fn fetch_meme_by_id(&self, key: &MemeKey) -> Option<Meme> {
        if let MemeKey::Uploaded(id) = key {
            let uploaded = self.repo.get_uploaded_memes().await.into_iter().find(|meme| &meme.id == id);
            if let Some(meme) = uploaded {
                return Some(self.with_comments(meme));
            }
        }

        let id = key.id();
        let templated = self
            .fetch_meme_templates()
            .await
            .into_iter()
            .find(|meme| meme.id == id);
        if let Some(meme) = templated {
            return Some(self.with_comments(meme));
        }

        if let MemeKey::LeaderboardSynthetic(index) = key {
            let now = Utc::now();
            let placeholder = self.rng.with(|r| synthesize_placeholder(*index, r, now));
            return Some(self.with_comments(placeholder));
        }

        tracing::warn!(meme_id = %id, "Meme not found in any source");
        None
    }

    /// Resolves `ids` in order. Ids that do not resolve are left out without
    /// any indication of which ones.
    pub async fn fetch_memes_by_ids(&self, ids: &[String]) -> Vec<Meme> {
        let mut memes = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(meme) = self.fetch_meme_by_id(&MemeKey::parse(id)).await {
                memes.push(meme);
            }
        }
        memes
    }

    /// Highest-liked memes across templates and uploads.
    pub async fn get_top_memes(&self, limit: usize) -> Vec<Meme> {
        let mut memes = self.fetch_meme_templates().await;
        memes.extend(self.repo.get_uploaded_memes().await);
        memes.sort_by(|a, b| b.likes.cmp(&a.likes));
        memes.truncate(limit);
        memes
    }

    fn with_comments(&self, mut meme: Meme) -> Meme {
        let now = Utc::now();
        meme.comments = self.rng.with(|r| generate_comments(&meme.id, r, now));
        meme
    }
}
