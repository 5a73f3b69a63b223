#![allow(dead_code)]

use std::sync::Arc;

use memeboard::{
    aggregator::MemeAggregator,
    domain::{KeyValueStorage, MemeRepository, TemplateSource},
    models::ApiMemeTemplate,
    random::SharedRng,
    remote::StaticTemplates,
    repositories::LocalMemeRepository,
    storage::MemoryStorage,
};

pub fn template(id: &str, name: &str) -> ApiMemeTemplate {
    ApiMemeTemplate {
        id: id.to_string(),
        name: name.to_string(),
        url: format!("https://i.imgflip.com/{id}.jpg"),
        width: 500,
        height: 500,
        box_count: 2,
    }
}

pub fn catalog() -> StaticTemplates {
    StaticTemplates::new(vec![
        template("181913649", "Drake Hotline Bling"),
        template("87743020", "Two Buttons"),
        template("112126428", "Distracted Boyfriend"),
        template("131087935", "Running Away Balloon"),
    ])
}

pub fn memory_repo() -> Arc<dyn MemeRepository> {
    Arc::new(LocalMemeRepository::new(Arc::new(MemoryStorage::new())))
}

pub fn repo_on(storage: Arc<dyn KeyValueStorage>) -> Arc<dyn MemeRepository> {
    Arc::new(LocalMemeRepository::new(storage))
}

pub fn aggregator(templates: impl TemplateSource, repo: Arc<dyn MemeRepository>) -> MemeAggregator {
    MemeAggregator::new(Arc::new(templates), repo, SharedRng::seeded(42))
}
