pub mod auth;
pub mod common;
pub mod events;
pub mod posts;
pub mod users;
