use clap::{Parser, Subcommand};
use std::path::PathBuf;

use memeboard::{
    AppState,
    captions::generate_ai_caption,
    errors::AppError,
    feed::ProfileView,
    leaderboard::{get_leaderboard_top_memes, get_top_users},
    models::{Meme, MemeFilter, MemeKey},
    share::{meme_page_url, share_links},
};

const DEFAULT_LIMIT: usize = 10;

#[derive(Parser, Debug)]
#[command(name = "memeboard", version, about = "Browse, upload and rate memes from the terminal")]
pub struct Cli {
    /// Record store file (overrides MEMEBOARD_STORE_PATH)
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    /// Template catalog base URL (overrides MEME_API_BASE_URL)
    #[arg(long, global = true)]
    pub api_base_url: Option<String>,

    /// Fixed seed for simulated likes, dates and comments (overrides MEMEBOARD_SEED)
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the merged feed
    Feed {
        #[arg(long, default_value = "trending")]
        filter: MemeFilter,
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Show one meme with its comments
    Show {
        id: String,
        /// Post a comment on the opened meme (not persisted)
        #[arg(long)]
        comment: Option<String>,
    },
    /// Upload a meme to the local store
    Upload {
        name: String,
        image_url: String,
        #[arg(long, default_value = "")]
        caption: String,
        /// Ask for a generated caption instead of --caption
        #[arg(long)]
        ai_caption: bool,
    },
    /// Toggle like on a meme
    Like { id: String },
    /// Toggle save on a meme
    Save { id: String },
    /// Highest-liked templates and uploads
    Top {
        #[arg(long, default_value_t = DEFAULT_LIMIT)]
        limit: usize,
    },
    /// Simulated leaderboards
    Leaderboard {
        #[command(subcommand)]
        board: Board,
    },
    /// Suggest a caption
    Caption,
    /// Show or edit the local profile
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
    /// Print share links for a meme
    Share {
        id: String,
        #[arg(long, default_value = "https://memeboard.local/meme")]
        page_base: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum Board {
    Users {
        #[arg(long, default_value_t = DEFAULT_LIMIT)]
        limit: usize,
    },
    Memes {
        #[arg(long, default_value_t = DEFAULT_LIMIT)]
        limit: usize,
    },
}

#[derive(Subcommand, Debug)]
pub enum ProfileAction {
    Show,
    Set {
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        avatar_url: Option<String>,
        #[arg(long)]
        bio: Option<String>,
    },
}

pub async fn run(command: Command, state: AppState) -> Result<(), AppError> {
    match command {
        Command::Feed { filter, search, limit } => {
            let mut feed = state.feed();
            feed.set_filter(filter);
            feed.load().await;
            if let Some(query) = search {
                feed.set_search_query(query);
                feed.settle_search().await;
            }
            let memes = feed.visible();
            if memes.is_empty() {
                println!("No memes to show.");
            }
            for meme in memes.iter().take(limit.unwrap_or(usize::MAX)) {
                print_meme_row(meme);
            }
        }
        Command::Show { id, comment } => {
            let feed = state.feed();
            let mut details = feed
                .open_meme(&MemeKey::parse(&id))
                .await
                .ok_or_else(|| AppError::MemeNotFound(id.clone()))?;
            if let Some(text) = comment {
                details.add_comment(&text);
            }

            let meme = details.meme();
            println!("{} ({})", meme.name, meme.id);
            println!("  {}", meme.url);
            println!("  {}x{}  {} likes", meme.width, meme.height, details.like_count());
            if let Some(caption) = meme.caption.as_deref().filter(|c| !c.is_empty()) {
                println!("  \"{caption}\"");
            }
            println!(
                "  liked: {}  saved: {}",
                yes_no(details.is_liked()),
                yes_no(details.is_saved())
            );
            println!("  {} comments", details.comments().len());
            for c in details.comments() {
                println!("    [{}] {}: {}", c.timestamp, c.username, c.text);
            }
        }
        Command::Upload {
            name,
            image_url,
            caption,
            ai_caption,
        } => {
            if name.trim().is_empty() {
                return Err(AppError::InvalidInput("Please enter a title for your meme".to_string()));
            }
            if image_url.trim().is_empty() {
                return Err(AppError::InvalidInput("Please provide an image".to_string()));
            }
            let caption = if ai_caption {
                generate_ai_caption(&state.rng, state.config.caption_delay).await
            } else {
                caption
            };
            let meme = state.repo.upload_meme(&name, &image_url, &caption).await?;
            println!("Meme uploaded successfully! id: {}", meme.id);
        }
        Command::Like { id } => {
            let liked = state.repo.toggle_meme_like(&id).await?;
            if liked {
                println!("Added {id} to your liked memes!");
            } else {
                println!("Removed {id} from your liked memes");
            }
        }
        Command::Save { id } => {
            let saved = state.repo.toggle_meme_save(&id).await?;
            if saved {
                println!("Meme saved to your collection!");
            } else {
                println!("Meme removed from your collection");
            }
        }
        Command::Top { limit } => {
            for (rank, meme) in state.feed().top_memes(limit).await.iter().enumerate() {
                print!("{:>3}. ", rank + 1);
                print_meme_row(meme);
            }
        }
        Command::Leaderboard { board } => match board {
            Board::Users { limit } => {
                let users = state.rng.with(|r| get_top_users(r, limit));
                for (rank, user) in users.iter().enumerate() {
                    println!(
                        "{:>3}. {:<16} score {:>7}  uploads {:>3}  likes {:>6}  comments {:>6}",
                        rank + 1,
                        user.username,
                        user.score,
                        user.uploads,
                        user.likes,
                        user.comments
                    );
                }
            }
            Board::Memes { limit } => {
                let now = chrono::Utc::now();
                let memes = state.rng.with(|r| get_leaderboard_top_memes(r, now, limit));
                for (rank, meme) in memes.iter().enumerate() {
                    print!("{:>3}. ", rank + 1);
                    print_meme_row(meme);
                }
            }
        },
        Command::Caption => {
            println!("{}", generate_ai_caption(&state.rng, state.config.caption_delay).await);
        }
        Command::Profile { action } => match action {
            ProfileAction::Show => print_profile(&state.feed().profile_view().await),
            ProfileAction::Set {
                username,
                avatar_url,
                bio,
            } => {
                let mut profile = state.repo.get_profile().await;
                if let Some(username) = username {
                    profile.username = username;
                }
                if let Some(avatar_url) = avatar_url {
                    profile.avatar_url = avatar_url;
                }
                if let Some(bio) = bio {
                    profile.bio = bio;
                }
                state.repo.save_profile(&profile.normalized()).await?;
                println!("Profile updated successfully");
            }
        },
        Command::Share { id, page_base } => {
            let feed = state.feed();
            let details = feed
                .open_meme(&MemeKey::parse(&id))
                .await
                .ok_or_else(|| AppError::MemeNotFound(id.clone()))?;
            let links = share_links(details.meme(), &meme_page_url(&page_base, &id))?;
            println!("twitter:  {}", links.twitter);
            println!("facebook: {}", links.facebook);
            println!("linkedin: {}", links.linkedin);
            println!("email:    {}", links.email);
        }
    }
    Ok(())
}

fn print_meme_row(meme: &Meme) {
    let marker = if meme.user_uploaded { "*" } else { " " };
    println!("{:>24} {:>6} likes {marker} {}", meme.id, meme.likes, meme.name);
}

fn print_profile(view: &ProfileView) {
    println!("{}", view.profile.username);
    if !view.profile.bio.is_empty() {
        println!("  {}", view.profile.bio);
    }
    for (label, memes) in [("Uploaded", &view.uploaded), ("Liked", &view.liked), ("Saved", &view.saved)] {
        println!("{label} ({})", memes.len());
        for meme in memes.iter() {
            print_meme_row(meme);
        }
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}
