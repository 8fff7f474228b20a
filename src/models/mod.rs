//! Database models shared across the modding history repository.

#[cfg(feature = "server")]
pub mod auth;
pub mod beatmapset;
#[cfg(feature = "server")]
pub mod config;
pub mod discussion;
pub mod event;
pub mod post;
pub mod user;
pub mod vote;
