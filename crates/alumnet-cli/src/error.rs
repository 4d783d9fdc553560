use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] alumnet_core::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("Invalid post ID: {0}")]
    InvalidPostId(String),
    #[error("Post not found: {0}")]
    PostNotFound(String),
    #[error("You are not signed in; run `alumnet auth login` first")]
    NotSignedIn,
}
