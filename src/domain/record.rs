//! Listing rows together with their eagerly loaded relations.
//!
//! Relations are `None` when they were not requested for the record kind or
//! when the related row is hidden (for instance a soft-deleted beatmap set
//! loaded without trashed visibility).

use serde::Serialize;

use crate::domain::beatmapset::Beatmapset;
use crate::domain::discussion::Discussion;
use crate::domain::event::BeatmapsetEvent;
use crate::domain::post::Post;
use crate::domain::user::User;
use crate::domain::vote::Vote;

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct DiscussionEntry {
    pub discussion: Discussion,
    pub user: Option<User>,
    pub beatmapset: Option<Beatmapset>,
    pub starting_post: Option<Post>,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct PostEntry {
    pub post: Post,
    pub user: Option<User>,
    pub beatmapset: Option<Beatmapset>,
    pub discussion: Option<DiscussionEntry>,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct VoteEntry {
    pub vote: Vote,
    pub user: Option<User>,
    pub discussion: Option<DiscussionEntry>,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct EventEntry {
    pub event: BeatmapsetEvent,
    pub user: Option<User>,
    pub beatmapset: Option<Beatmapset>,
}

/// One row of a modding history listing.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(tag = "kind", content = "record", rename_all = "snake_case")]
pub enum ModdingRecord {
    Discussion(DiscussionEntry),
    Post(PostEntry),
    Vote(VoteEntry),
    Event(EventEntry),
}

impl ModdingRecord {
    /// Primary key of the underlying row, used for ordering.
    pub fn id(&self) -> i32 {
        match self {
            ModdingRecord::Discussion(entry) => entry.discussion.id.get(),
            ModdingRecord::Post(entry) => entry.post.id.get(),
            ModdingRecord::Vote(entry) => entry.vote.id.get(),
            ModdingRecord::Event(entry) => entry.event.id.get(),
        }
    }

    /// Whether the row counts as soft-deleted for visibility purposes.
    ///
    /// Votes inherit the flag from their discussion and events from their
    /// beatmap set, so those relations must be loaded for this to be exact.
    pub fn is_deleted(&self) -> bool {
        match self {
            ModdingRecord::Discussion(entry) => entry.discussion.is_deleted(),
            ModdingRecord::Post(entry) => entry.post.is_deleted(),
            ModdingRecord::Vote(entry) => entry
                .discussion
                .as_ref()
                .is_some_and(|d| d.discussion.is_deleted()),
            ModdingRecord::Event(entry) => {
                entry.beatmapset.as_ref().is_some_and(Beatmapset::is_deleted)
            }
        }
    }
}
