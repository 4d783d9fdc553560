//! `alumnet posts` subcommands.

use alumnet_core::models::{Author, NewPost, PostId, UserId};
use alumnet_core::Store;

use crate::cli::PostsCommand;
use crate::commands::common::{format_post_line, print_notifications};
use crate::error::CliError;

pub async fn run(store: &Store, command: PostsCommand) -> Result<(), CliError> {
    match command {
        PostsCommand::List { json } => {
            let posts = store.fetch_posts().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&posts)?);
            } else if posts.is_empty() {
                println!("No posts yet.");
            } else {
                for post in &posts {
                    println!("{}", format_post_line(post));
                }
            }
        }
        PostsCommand::Create {
            title,
            content,
            category,
        } => {
            let post = store
                .create_post(NewPost {
                    title,
                    content,
                    category,
                    image: None,
                    tags: vec![],
                })
                .await?;
            println!("Created post {}", post.id);
        }
        PostsCommand::Like { id, user } => {
            let id = parse_post_id(&id)?;
            store.fetch_posts().await?;
            store.toggle_like(id, UserId::new(user)).await?;
            let post = store.post(&id).ok_or_else(|| CliError::PostNotFound(id.to_string()))?;
            println!("{} now has {} like(s)", post.title, post.likes);
        }
        PostsCommand::Comment { id, user, text } => {
            let id = parse_post_id(&id)?;
            store.fetch_posts().await?;
            store.fetch_users().await?;
            let author = resolve_author(store, UserId::new(user));
            store.add_comment(id, text, author).await?;
            let post = store.post(&id).ok_or_else(|| CliError::PostNotFound(id.to_string()))?;
            println!("{} now has {} comment(s)", post.title, post.comments.len());
        }
        PostsCommand::Delete { id } => {
            let id = parse_post_id(&id)?;
            store.fetch_posts().await?;
            store.delete_post(id).await?;
            println!("Deleted post {id}");
            print_notifications(store);
        }
    }
    Ok(())
}

fn parse_post_id(raw: &str) -> Result<PostId, CliError> {
    raw.parse()
        .map_err(|_| CliError::InvalidPostId(raw.to_string()))
}

fn resolve_author(store: &Store, id: UserId) -> Author {
    store.user(&id).map_or_else(
        || Author {
            id,
            name: format!("Member {id}"),
            avatar: None,
        },
        |user| Author {
            id: user.id,
            name: user.name,
            avatar: user.avatar,
        },
    )
}
