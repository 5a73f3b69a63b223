//! Meme feed engine: merges a remote template catalog with memes uploaded to a
//! local record store, and layers likes, saves, simulated comments and
//! leaderboards on top.

pub mod aggregator;
pub mod captions;
pub mod comments;
pub mod config;
pub mod domain;
pub mod errors;
pub mod feed;
pub mod filter;
pub mod leaderboard;
pub mod models;
pub mod random;
pub mod remote;
pub mod repositories;
pub mod share;
pub mod storage;

use std::sync::Arc;

use crate::{
    aggregator::MemeAggregator,
    config::Config,
    domain::{MemeRepository, TemplateSource},
    feed::FeedController,
    random::SharedRng,
    remote::ImgflipClient,
    repositories::LocalMemeRepository,
    storage::JsonFileStorage,
};

/// Shared handles for one client session.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub repo: Arc<dyn MemeRepository>,
    pub aggregator: Arc<MemeAggregator>,
    pub rng: SharedRng,
}

impl AppState {
    /// Wires the production stack: JSON file store and the HTTP template
    /// catalog.
    pub fn from_config(config: Config) -> Self {
        let storage = Arc::new(JsonFileStorage::new(config.store_path.clone()));
        let templates: Arc<dyn TemplateSource> = Arc::new(ImgflipClient::new(config.api_base_url.clone()));
        let repo: Arc<dyn MemeRepository> = Arc::new(LocalMemeRepository::new(storage));
        let rng = SharedRng::from_seed_option(config.seed);
        Self::assemble(config, templates, repo, rng)
    }

    /// Wires arbitrary sources, e.g. in-memory ones for tests.
    pub fn assemble(
        config: Config,
        templates: Arc<dyn TemplateSource>,
        repo: Arc<dyn MemeRepository>,
        rng: SharedRng,
    ) -> Self {
        let aggregator = Arc::new(MemeAggregator::new(templates, repo.clone(), rng.clone()));
        Self {
            config,
            repo,
            aggregator,
            rng,
        }
    }

    pub fn feed(&self) -> FeedController {
        FeedController::new(self.aggregator.clone(), self.repo.clone(), self.config.search_debounce)
    }
}
