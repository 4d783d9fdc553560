//! alumnet-core - Core library for Alumnet
//!
//! This crate contains the client-side synchronization layer shared by all
//! Alumnet interfaces: the entity collections (posts, events, users), the
//! asynchronous operation lifecycle, the session, and the notification
//! queue. UI and transport are thin layers around the [`store::Store`].

pub mod error;
pub mod models;
pub mod services;
pub mod store;

pub use error::{Error, Result};
pub use store::{OpStatus, Store};
