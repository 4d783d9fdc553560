use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "alumnet")]
#[command(about = "Alumni community from the command line")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Remote API root, e.g. https://api.example.com/api
    /// (defaults to the bundled sample community)
    #[arg(long, global = true, value_name = "URL")]
    pub server: Option<String>,

    /// Where to keep the signed-in session between runs
    #[arg(long, global = true, value_name = "PATH")]
    pub session_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Community posts
    Posts {
        #[command(subcommand)]
        command: PostsCommand,
    },
    /// Community events
    Events {
        #[command(subcommand)]
        command: EventsCommand,
    },
    /// Alumni directory
    Users {
        #[command(subcommand)]
        command: UsersCommand,
    },
    /// Sign in, sign out, session status
    Auth {
        #[command(subcommand)]
        command: AuthCommand,
    },
}

#[derive(Subcommand)]
pub enum PostsCommand {
    /// List all posts
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Create a new post
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
        #[arg(long)]
        category: String,
    },
    /// Toggle a like on a post
    Like {
        /// Post ID
        id: String,
        /// ID of the liking user
        #[arg(long)]
        user: i64,
    },
    /// Comment on a post
    Comment {
        /// Post ID
        id: String,
        /// ID of the commenting user
        #[arg(long)]
        user: i64,
        /// Comment text
        text: String,
    },
    /// Delete a post
    Delete {
        /// Post ID
        id: String,
    },
}

#[derive(Subcommand)]
pub enum EventsCommand {
    /// List all events
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Change an event's status and notify attendees
    SetStatus {
        /// Event ID
        id: i64,
        /// New status: upcoming, ongoing, completed, cancelled, postponed
        status: String,
        /// Human-readable message for the notification
        #[arg(long)]
        message: String,
    },
    /// Delete an event
    Delete {
        /// Event ID
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum UsersCommand {
    /// List the alumni directory
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Flag a user online or offline
    Online {
        /// User ID
        id: i64,
        /// Flag offline instead of online
        #[arg(long)]
        off: bool,
    },
    /// Delete a directory user
    Delete {
        /// User ID
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum AuthCommand {
    /// Sign in
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Sign out
    Logout,
    /// Show the current session
    Status,
}
