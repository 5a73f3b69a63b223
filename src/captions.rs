use rand::Rng;
use std::time::Duration;

use crate::random::SharedRng;

pub const AI_CAPTIONS: [&str; 10] = [
    "When the code works on the first try",
    "Me explaining memes to my parents",
    "That moment when you realize it's only Tuesday",
    "How I look waiting for the microwave to finish",
    "Nobody: / Me at 3am with a bag of shredded cheese",
    "My brain during an important exam",
    "When someone asks if I'm productive working from home",
    "Me trying to be an adult",
    "My last brain cell trying to function",
    "When the internet goes out for 5 minutes",
];

/// Suggests a caption after a simulated model latency of `delay`.
pub async fn generate_ai_caption(rng: &SharedRng, delay: Duration) -> String {
    tracing::debug!(delay_ms = delay.as_millis() as u64, "Generating caption suggestion");
    tokio::time::sleep(delay).await;
    let caption = rng.with(|r| AI_CAPTIONS[r.gen_range(0..AI_CAPTIONS.len())]);
    caption.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn test_caption_waits_for_delay() {
        let rng = SharedRng::seeded(3);
        let started = Instant::now();
        let caption = generate_ai_caption(&rng, Duration::from_millis(1000)).await;
        assert!(started.elapsed() >= Duration::from_millis(1000));
        assert!(AI_CAPTIONS.contains(&caption.as_str()));
    }

    #[tokio::test]
    async fn test_zero_delay_returns_immediately() {
        let rng = SharedRng::seeded(3);
        let caption = generate_ai_caption(&rng, Duration::ZERO).await;
        assert!(!caption.is_empty());
    }
}
