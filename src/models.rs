use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;

/// Prefix of ids minted for memes uploaded through the local store.
pub const UPLOADED_ID_PREFIX: &str = "user-meme-";
/// Prefix of ids handed out by the simulated leaderboard.
pub const SYNTHETIC_ID_PREFIX: &str = "meme-";

/// Where a meme record came from. Set when the record is built and never
/// re-derived from the id.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum MemeSource {
    #[default]
    Templated,
    Uploaded,
    LeaderboardSynthetic,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Meme {
    pub id: String,
    pub name: String,
    pub url: String,
    pub width: u32,
    pub height: u32,
    // The template catalog uses snake_case for this one field.
    #[serde(rename = "box_count", default)]
    pub box_count: u32,
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_created: Option<String>,
    #[serde(default)]
    pub user_uploaded: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(default)]
    pub source: MemeSource,
}

impl Meme {
    /// Parsed creation time, `None` when missing or not RFC 3339.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.date_created
            .as_deref()
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// Creation time in epoch milliseconds. Missing or unparseable dates count
    /// as the epoch.
    pub fn created_at_millis(&self) -> i64 {
        self.created_at().map(|dt| dt.timestamp_millis()).unwrap_or(0)
    }

    pub fn key(&self) -> MemeKey {
        match self.source {
            MemeSource::Uploaded => MemeKey::Uploaded(self.id.clone()),
            // Synthetic records always carry a numeric suffix; fall back to the
            // generic parse if one was built by hand without it.
            MemeSource::LeaderboardSynthetic | MemeSource::Templated => MemeKey::parse(&self.id),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub text: String,
    pub username: String,
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardUser {
    pub id: String,
    pub username: String,
    pub avatar_url: String,
    pub uploads: u64,
    pub likes: u64,
    pub comments: u64,
    pub score: u64,
}

impl LeaderboardUser {
    pub fn new(id: String, username: String, avatar_url: String, uploads: u64, likes: u64, comments: u64) -> Self {
        let score = leaderboard_score(uploads, likes, comments);
        Self {
            id,
            username,
            avatar_url,
            uploads,
            likes,
            comments,
            score,
        }
    }
}

/// uploads × (likes per upload + comments per upload), which reduces to the
/// engagement total. Users without uploads score zero.
pub fn leaderboard_score(uploads: u64, likes: u64, comments: u64) -> u64 {
    if uploads == 0 {
        return 0;
    }
    likes + comments
}

pub const DEFAULT_USERNAME: &str = "MemeEnthusiast";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct UserProfile {
    pub username: String,
    pub avatar_url: String,
    pub bio: String,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            username: DEFAULT_USERNAME.to_string(),
            avatar_url: String::new(),
            bio: String::new(),
        }
    }
}

impl UserProfile {
    /// A blank username falls back to the default one.
    pub fn normalized(mut self) -> Self {
        if self.username.trim().is_empty() {
            self.username = DEFAULT_USERNAME.to_string();
        }
        self
    }
}

/// Entry as delivered by the remote template catalog.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ApiMemeTemplate {
    pub id: String,
    pub name: String,
    pub url: String,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub box_count: u32,
}

/// Identifies a meme and the backing source to resolve it from.
///
/// External ids (command line arguments, stored like/save lists) are parsed
/// into a key once; lookups dispatch on the variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MemeKey {
    Uploaded(String),
    Templated(String),
    LeaderboardSynthetic(u32),
}

impl MemeKey {
    pub fn parse(id: &str) -> Self {
        if id.starts_with(UPLOADED_ID_PREFIX) {
            return MemeKey::Uploaded(id.to_string());
        }
        // Only canonical indices ("meme-7", not "meme-007" or "meme-+7") are
        // leaderboard ids, so the key always displays as the id it came from.
        match id.strip_prefix(SYNTHETIC_ID_PREFIX).map(|suffix| (suffix, suffix.parse::<u32>())) {
            Some((suffix, Ok(index))) if index.to_string() == suffix => MemeKey::LeaderboardSynthetic(index),
            _ => MemeKey::Templated(id.to_string()),
        }
    }

    pub fn id(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for MemeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemeKey::Uploaded(id) | MemeKey::Templated(id) => f.write_str(id),
            MemeKey::LeaderboardSynthetic(index) => write!(f, "{SYNTHETIC_ID_PREFIX}{index}"),
        }
    }
}

/// Ordering applied to the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MemeFilter {
    #[default]
    Trending,
    New,
    Classic,
    Random,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown meme filter '{0}' (expected trending, new, classic or random)")]
pub struct ParseFilterError(pub String);

impl FromStr for MemeFilter {
    type Err = ParseFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trending" => Ok(MemeFilter::Trending),
            "new" => Ok(MemeFilter::New),
            "classic" => Ok(MemeFilter::Classic),
            "random" => Ok(MemeFilter::Random),
            _ => Err(ParseFilterError(s.to_string())),
        }
    }
}

impl fmt::Display for MemeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MemeFilter::Trending => "trending",
            MemeFilter::New => "new",
            MemeFilter::Classic => "classic",
            MemeFilter::Random => "random",
        };
        f.write_str(name)
    }
}

/// Timestamp format shared by every stored and generated record
/// (`2024-05-01T12:00:00.000Z`).
pub fn to_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}
