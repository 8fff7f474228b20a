//! Domain aggregates exposed by the modding history service layer.

pub mod beatmapset;
pub mod discussion;
pub mod event;
pub mod post;
pub mod record;
pub mod search;
pub mod types;
pub mod user;
pub mod vote;
