//! Simulated leaderboards. Every call draws a fresh board from the shared
//! generator; nothing is stored.

use chrono::{DateTime, TimeDelta, Utc};
use rand::Rng;

use crate::comments::random_username;
use crate::models::{LeaderboardUser, Meme, MemeSource, SYNTHETIC_ID_PREFIX, to_timestamp};

pub const BOARD_SIZE: usize = 20;
pub const PLACEHOLDER_DIMENSION: u32 = 600;
const PLACEHOLDER_BOX_COUNT: u32 = 2;
const RECENT_WINDOW_MILLIS: i64 = 30 * 86_400_000;

pub fn get_top_users<R: Rng + ?Sized>(rng: &mut R, limit: usize) -> Vec<LeaderboardUser> {
    let mut users: Vec<LeaderboardUser> = (1..=BOARD_SIZE)
        .map(|rank| {
            let uploads: u64 = rng.gen_range(1..=50);
            let likes_per_upload: u64 = rng.gen_range(100..1100);
            let comments_per_upload: u64 = rng.gen_range(20..220);
            LeaderboardUser::new(
                format!("user-{rank}"),
                random_username(rng).to_string(),
                format!("https://i.pravatar.cc/150?img={rank}"),
                uploads,
                uploads * likes_per_upload,
                uploads * comments_per_upload,
            )
        })
        .collect();

    users.sort_by(|a, b| b.score.cmp(&a.score));
    users.truncate(limit);
    users
}

pub fn get_leaderboard_top_memes<R: Rng + ?Sized>(rng: &mut R, now: DateTime<Utc>, limit: usize) -> Vec<Meme> {
    let mut memes: Vec<Meme> = (1..=BOARD_SIZE as u32)
        .map(|index| {
            let mut meme = synthesize_placeholder(index, rng, now);
            meme.name = format!("Top Meme {index}");
            meme
        })
        .collect();

    memes.sort_by(|a, b| b.likes.cmp(&a.likes));
    memes.truncate(limit);
    memes
}

/// Placeholder record for leaderboard id `meme-<index>`. The image is fixed by
/// `index`; likes and creation date are drawn fresh on every call.
pub fn synthesize_placeholder<R: Rng + ?Sized>(index: u32, rng: &mut R, now: DateTime<Utc>) -> Meme {
    let likes = rng.gen_range(1000..11_000);
    let age = TimeDelta::milliseconds(rng.gen_range(0..RECENT_WINDOW_MILLIS));
    Meme {
        id: format!("{SYNTHETIC_ID_PREFIX}{index}"),
        name: format!("Meme {index}"),
        url: format!("https://picsum.photos/600/600?random={index}"),
        width: PLACEHOLDER_DIMENSION,
        height: PLACEHOLDER_DIMENSION,
        box_count: PLACEHOLDER_BOX_COUNT,
        likes,
        comments: Vec::new(),
        date_created: Some(to_timestamp(now - age)),
        user_uploaded: false,
        caption: None,
        source: MemeSource::LeaderboardSynthetic,
    }
}
