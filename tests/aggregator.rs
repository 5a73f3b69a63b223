mod common;

use std::collections::HashSet;

use memeboard::{
    comments::MAX_COMMENTS,
    models::{MemeKey, MemeSource},
    remote::StaticTemplates,
};

use common::{aggregator, catalog, memory_repo};

#[tokio::test]
async fn test_feed_lists_templates_before_uploads() {
    let repo = memory_repo();
    let uploaded = repo
        .upload_meme("Monday again", "data:image/png;base64,AAAA", "")
        .await
        .expect("upload");
    let agg = aggregator(catalog(), repo);

    let feed = agg.load_feed().await;
    assert_eq!(feed.len(), 5);
    assert!(feed[..4].iter().all(|m| m.source == MemeSource::Templated && !m.user_uploaded));
    assert_eq!(feed[4].id, uploaded.id);
    assert!(feed[4].user_uploaded);

    // Opening a card from the feed goes through its key.
    let opened = agg.fetch_meme_by_id(&feed[4].key()).await.expect("card opens");
    assert_eq!(opened.name, "Monday again");
}

#[tokio::test]
async fn test_uploaded_key_resolves_from_store_while_remote_is_down() {
    let repo = memory_repo();
    let uploaded = repo
        .upload_meme("Offline meme", "https://example.com/a.png", "still works")
        .await
        .expect("upload");
    let agg = aggregator(StaticTemplates::unavailable(), repo);

    let meme = agg
        .fetch_meme_by_id(&MemeKey::parse(&uploaded.id))
        .await
        .expect("uploaded meme resolves");
    assert_eq!(meme.name, "Offline meme");
    assert_eq!(meme.caption.as_deref(), Some("still works"));
    assert!((1..=MAX_COMMENTS).contains(&meme.comments.len()));
}

#[tokio::test]
async fn test_unknown_upload_id_is_not_found() {
    let agg = aggregator(catalog(), memory_repo());
    assert!(agg.fetch_meme_by_id(&MemeKey::parse("user-meme-1700000000000")).await.is_none());
    assert!(agg.fetch_meme_by_id(&MemeKey::parse("no-such-template")).await.is_none());
}

#[tokio::test]
async fn test_leaderboard_id_is_synthesized() {
    let agg = aggregator(StaticTemplates::unavailable(), memory_repo());

    let meme = agg.fetch_meme_by_id(&MemeKey::parse("meme-7")).await.expect("placeholder");
    assert_eq!(meme.id, "meme-7");
    assert_eq!(meme.name, "Meme 7");
    assert_eq!(meme.url, "https://picsum.photos/600/600?random=7");
    assert_eq!(meme.source, MemeSource::LeaderboardSynthetic);
    assert!((1000..11_000).contains(&meme.likes));
    assert!(!meme.comments.is_empty());
}

#[tokio::test]
async fn test_template_id_matches_catalog_entry() {
    let agg = aggregator(catalog(), memory_repo());

    let meme = agg
        .fetch_meme_by_id(&MemeKey::parse("87743020"))
        .await
        .expect("template resolves");
    assert_eq!(meme.name, "Two Buttons");
    assert!(meme.comments.iter().all(|c| c.id.starts_with("comment-87743020-")));
}

#[tokio::test]
async fn test_fetch_by_ids_drops_unresolvable_ids() {
    let agg = aggregator(catalog(), memory_repo());
    let ids = vec![
        "112126428".to_string(),
        "user-meme-1".to_string(),
        "meme-3".to_string(),
        "missing".to_string(),
    ];

    let memes = agg.fetch_memes_by_ids(&ids).await;
    let got: Vec<&str> = memes.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(got, vec!["112126428", "meme-3"]);
}

#[tokio::test]
async fn test_top_memes_sorted_and_limited() {
    let repo = memory_repo();
    repo.upload_meme("Fresh upload", "https://example.com/b.png", "")
        .await
        .expect("upload");
    let agg = aggregator(catalog(), repo);

    let top = agg.get_top_memes(3).await;
    assert_eq!(top.len(), 3);
    assert!(top.windows(2).all(|w| w[0].likes >= w[1].likes));

    let feed_ids: HashSet<String> = agg.load_feed().await.into_iter().map(|m| m.id).collect();
    assert!(top.iter().all(|m| feed_ids.contains(&m.id)));

    let everything = agg.get_top_memes(100).await;
    assert_eq!(everything.len(), 5);
    let top_ids: HashSet<String> = everything.into_iter().map(|m| m.id).collect();
    assert_eq!(top_ids, feed_ids);
}

#[tokio::test]
async fn test_resolved_id_matches_requested_id() {
    let repo = memory_repo();
    assert!(repo.toggle_meme_like("meme-007").await.expect("like"));
    let agg = aggregator(catalog(), repo.clone());

    // Zero-padded indices are not leaderboard ids, so nothing answers for them
    // under a different id.
    assert!(agg.fetch_meme_by_id(&MemeKey::parse("meme-007")).await.is_none());
    assert!(agg.fetch_meme_by_id(&MemeKey::parse("meme-+7")).await.is_none());

    let ids = vec!["meme-12".to_string(), "meme-007".to_string(), "87743020".to_string()];
    let got: Vec<String> = agg.fetch_memes_by_ids(&ids).await.into_iter().map(|m| m.id).collect();
    assert_eq!(got, vec!["meme-12", "87743020"]);

    // The stored like stays toggleable under its own id.
    assert!(!repo.toggle_meme_like("meme-007").await.expect("unlike"));
    assert!(repo.get_liked_memes().await.is_empty());
}

#[tokio::test]
async fn test_remote_failure_degrades_to_uploads_only() {
    let repo = memory_repo();
    repo.upload_meme("Only me", "https://example.com/c.png", "")
        .await
        .expect("upload");
    let agg = aggregator(StaticTemplates::unavailable(), repo);

    assert!(agg.fetch_meme_templates().await.is_empty());
    let feed = agg.load_feed().await;
    assert_eq!(feed.len(), 1);
    assert_eq!(feed[0].name, "Only me");
}
