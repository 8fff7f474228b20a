use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{BeatmapsetId, TypeConstraintError, UserId};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Beatmapset {
    pub id: BeatmapsetId,
    pub user_id: UserId,
    pub artist: String,
    pub title: String,
    pub deleted_at: Option<NaiveDateTime>,
}

impl Beatmapset {
    pub fn try_new(
        id: i32,
        user_id: i32,
        artist: String,
        title: String,
        deleted_at: Option<NaiveDateTime>,
    ) -> Result<Self, TypeConstraintError> {
        Ok(Self {
            id: BeatmapsetId::new(id)?,
            user_id: UserId::new(user_id)?,
            artist,
            title,
            deleted_at,
        })
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}
