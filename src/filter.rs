//! Feed ordering and search. Every function returns a new vector and leaves
//! its input untouched.

use rand::{Rng, seq::SliceRandom};
use std::cmp::Reverse;

use crate::models::{Meme, MemeFilter};

/// Orders `memes` for `filter`. Sorts are stable, so ties keep their input
/// order. `Random` consumes `rng`; the other modes ignore it.
pub fn filter_memes<R: Rng + ?Sized>(memes: &[Meme], filter: MemeFilter, rng: &mut R) -> Vec<Meme> {
    let mut ordered = memes.to_vec();
    match filter {
        MemeFilter::Trending => ordered.sort_by_key(|meme| Reverse(meme.likes)),
        MemeFilter::New => ordered.sort_by_key(|meme| Reverse(meme.created_at_millis())),
        MemeFilter::Classic => ordered.sort_by(|a, b| classic_score(b).total_cmp(&classic_score(a))),
        MemeFilter::Random => ordered.shuffle(rng),
    }
    ordered
}

/// Like [`filter_memes`] but takes the mode by name. Unknown names leave the
/// order unchanged.
pub fn filter_memes_by_name<R: Rng + ?Sized>(memes: &[Meme], filter: &str, rng: &mut R) -> Vec<Meme> {
    match filter.parse::<MemeFilter>() {
        Ok(filter) => filter_memes(memes, filter, rng),
        Err(e) => {
            tracing::debug!(error = %e, "Unrecognised filter, keeping input order");
            memes.to_vec()
        }
    }
}

/// likes × (creation epoch millis / 1e12).
pub fn classic_score(meme: &Meme) -> f64 {
    meme.likes as f64 * (meme.created_at_millis() as f64 / 1e12)
}

/// Case-insensitive substring match on the meme name. An empty query keeps
/// everything.
pub fn search_memes(memes: &[Meme], query: &str) -> Vec<Meme> {
    let needle = query.to_lowercase();
    memes
        .iter()
        .filter(|meme| meme.name.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}
