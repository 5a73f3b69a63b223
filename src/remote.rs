use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use rand::Rng;
use serde::Deserialize;

use crate::{
    domain::TemplateSource,
    errors::FetchError,
    models::{ApiMemeTemplate, Meme, MemeSource, to_timestamp},
    random::SharedRng,
};

pub const DEFAULT_API_BASE_URL: &str = "https://api.imgflip.com";
const MAX_TEMPLATE_LIKES: u64 = 10_000;
// Roughly 115 days.
const MAX_TEMPLATE_AGE_MILLIS: i64 = 10_000_000_000;

#[derive(Deserialize, Debug)]
struct ApiEnvelope {
    success: bool,
    #[serde(default)]
    data: Option<ApiData>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Deserialize, Debug)]
struct ApiData {
    memes: Vec<ApiMemeTemplate>,
}

/// Decodes a `get_memes` response body.
pub fn parse_envelope(body: &[u8]) -> Result<Vec<ApiMemeTemplate>, FetchError> {
    let envelope: ApiEnvelope = serde_json::from_slice(body)?;
    match (envelope.success, envelope.data) {
        (true, Some(data)) => Ok(data.memes),
        (true, None) => Err(FetchError::Unsuccessful("response carried no data".to_string())),
        (false, _) => Err(FetchError::Unsuccessful(
            envelope.error_message.unwrap_or_else(|| "success=false".to_string()),
        )),
    }
}

#[derive(Debug, Clone)]
pub struct ImgflipClient {
    client: reqwest::Client,
    base_url: String,
}

impl ImgflipClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        tracing::info!(%base_url, "Initializing meme template client");
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    pub fn endpoint(&self) -> String {
        format!("{}/get_memes", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl TemplateSource for ImgflipClient {
    /// One GET against the catalog, no retries.
    async fn fetch_templates(&self) -> Result<Vec<ApiMemeTemplate>, FetchError> {
        let url = self.endpoint();
        tracing::debug!(%url, "Fetching meme templates");

        let response = self.client.get(&url).send().await?;
        let body = response.bytes().await?;
        let templates = parse_envelope(&body)?;

        tracing::debug!(count = templates.len(), "Meme API returned templates");
        Ok(templates)
    }
}

/// Fixed in-memory catalog, or one that always fails.
#[derive(Debug, Clone, Default)]
pub struct StaticTemplates {
    templates: Option<Vec<ApiMemeTemplate>>,
}

impl StaticTemplates {
    pub fn new(templates: Vec<ApiMemeTemplate>) -> Self {
        Self {
            templates: Some(templates),
        }
    }

    pub fn unavailable() -> Self {
        Self { templates: None }
    }
}

#[async_trait]
impl TemplateSource for StaticTemplates {
    async fn fetch_templates(&self) -> Result<Vec<ApiMemeTemplate>, FetchError> {
        self.templates
            .clone()
            .ok_or_else(|| FetchError::Unsuccessful("template catalog unavailable".to_string()))
    }
}

/// Turns a catalog entry into a feed record with synthesized engagement.
pub fn enrich_template<R: Rng + ?Sized>(template: ApiMemeTemplate, rng: &mut R, now: DateTime<Utc>) -> Meme {
    let likes = rng.gen_range(0..MAX_TEMPLATE_LIKES);
    let age = TimeDelta::milliseconds(rng.gen_range(0..MAX_TEMPLATE_AGE_MILLIS));
    Meme {
        id: template.id,
        name: template.name,
        url: template.url,
        width: template.width,
        height: template.height,
        box_count: template.box_count,
        likes,
        comments: Vec::new(),
        date_created: Some(to_timestamp(now - age)),
        user_uploaded: false,
        caption: None,
        source: MemeSource::Templated,
    }
}

/// Fetches and enriches the template catalog.
///
/// Any failure is logged and yields an empty list, so an empty result may
/// mean either "no templates" or "fetch failed".
pub async fn fetch_meme_templates(source: &dyn TemplateSource, rng: &SharedRng) -> Vec<Meme> {
    match source.fetch_templates().await {
        Ok(templates) => {
            let now = Utc::now();
            rng.with(|r| {
                templates
                    .into_iter()
                    .map(|template| enrich_template(template, r, now))
                    .collect()
            })
        }
        Err(e) => {
            tracing::error!(error = %e, "Error fetching meme templates");
            Vec::new()
        }
    }
}
