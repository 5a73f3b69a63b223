use anyhow::{Context, Result};
use reqwest::Url;

use crate::models::Meme;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareLinks {
    pub twitter: String,
    pub facebook: String,
    pub linkedin: String,
    pub email: String,
}

/// Share intents for `meme` as shown at `page_url`.
pub fn share_links(meme: &Meme, page_url: &str) -> Result<ShareLinks> {
    let twitter = Url::parse_with_params(
        "https://twitter.com/intent/tweet",
        &[("text", format!("Check out this awesome meme: {}", meme.name).as_str()), ("url", page_url)],
    )
    .context("Failed to build Twitter share link")?;

    let facebook = Url::parse_with_params("https://www.facebook.com/sharer/sharer.php", &[("u", page_url)])
        .context("Failed to build Facebook share link")?;

    let linkedin = Url::parse_with_params(
        "https://www.linkedin.com/sharing/share-offsite/",
        &[("url", page_url), ("title", meme.name.as_str())],
    )
    .context("Failed to build LinkedIn share link")?;

    let mut email = Url::parse_with_params(
        "mailto:",
        &[
            ("subject", format!("Check out this meme: {}", meme.name).as_str()),
            (
                "body",
                format!("I found this awesome meme and thought you might like it: {page_url}").as_str(),
            ),
        ],
    )
    .context("Failed to build email share link")?;
    // Mail clients read `+` literally. Form encoding already escaped real
    // pluses as %2B, so every remaining `+` is a space.
    let mailto_query = email.query().map(|query| query.replace('+', "%20"));
    email.set_query(mailto_query.as_deref());

    Ok(ShareLinks {
        twitter: twitter.into(),
        facebook: facebook.into(),
        linkedin: linkedin.into(),
        email: email.into(),
    })
}

/// Detail page address for a meme under `base_url`.
pub fn meme_page_url(base_url: &str, meme_id: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), meme_id)
}
