//! Simulated comment threads.
//!
//! Nothing here is persisted: a thread is regenerated every time a meme is
//! opened, and comments the user writes live only as long as the open view.

use chrono::{DateTime, TimeDelta, Utc};
use rand::Rng;
use uuid::Uuid;

use crate::models::{Comment, to_timestamp};

pub const COMMENT_PHRASES: [&str; 15] = [
    "This meme is hilarious! 😂",
    "I can't stop laughing at this.",
    "Shared this with my friends, they loved it!",
    "This is literally me every Monday morning.",
    "I feel personally attacked by this meme.",
    "So accurate it hurts.",
    "Who made this? They deserve an award!",
    "I've never seen something so relatable.",
    "This is gold. Pure gold.",
    "My sense of humor is officially broken.",
    "I snorted my coffee. Thanks a lot!",
    "This meme speaks to my soul.",
    "Why is this so accurate though?",
    "Top tier meme content right here.",
    "I'm in this picture and I don't like it.",
];

pub const USERNAMES: [&str; 15] = [
    "MemeKing42",
    "LaughterQueen",
    "GiggleMonster",
    "FunnyBones",
    "JokeJedi",
    "HumorHero",
    "ChuckleChampion",
    "SillyGoose",
    "ComedicGenius",
    "MemeEnthusiast",
    "LaughTrack",
    "WitMaster",
    "JestJanitor",
    "PunPirate",
    "GrinGuru",
];

pub const MAX_COMMENTS: usize = 10;
pub const SESSION_USERNAME: &str = "You";
const COMMENT_WINDOW_MILLIS: i64 = 86_400_000;

pub fn random_username<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    USERNAMES[rng.gen_range(0..USERNAMES.len())]
}

fn random_phrase<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    COMMENT_PHRASES[rng.gen_range(0..COMMENT_PHRASES.len())]
}

/// Builds a thread of 1 to 10 comments for `meme_id`, each posted within the
/// 24 hours before `now`.
pub fn generate_comments<R: Rng + ?Sized>(meme_id: &str, rng: &mut R, now: DateTime<Utc>) -> Vec<Comment> {
    let count = rng.gen_range(1..=MAX_COMMENTS);
    (0..count)
        .map(|index| {
            let age = TimeDelta::milliseconds(rng.gen_range(0..COMMENT_WINDOW_MILLIS));
            Comment {
                id: format!("comment-{meme_id}-{index}"),
                text: random_phrase(rng).to_string(),
                username: random_username(rng).to_string(),
                timestamp: to_timestamp(now - age),
                avatar_url: Some(format!("https://i.pravatar.cc/150?u={meme_id}-{index}")),
            }
        })
        .collect()
}

/// A comment written by the local user during the current session.
pub fn session_comment(meme_id: &str, text: &str, now: DateTime<Utc>) -> Comment {
    Comment {
        id: format!("comment-{meme_id}-{}", Uuid::new_v4()),
        text: text.to_string(),
        username: SESSION_USERNAME.to_string(),
        timestamp: to_timestamp(now),
        avatar_url: Some(format!("https://i.pravatar.cc/150?u=you-{}", now.timestamp_millis())),
    }
}
