use std::fmt::Display;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{BeatmapsetId, DiscussionId, TypeConstraintError, UserId};

/// Beatmap discussion thread opened by a modder.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Discussion {
    pub id: DiscussionId,
    pub beatmapset_id: BeatmapsetId,
    pub user_id: UserId,
    pub message_type: DiscussionMessageType,
    pub resolved: bool,
    pub deleted_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DiscussionMessageType {
    Suggestion,
    Problem,
    MapperNote,
    Praise,
    Hype,
    Review,
}

impl Discussion {
    #[allow(clippy::too_many_arguments)]
    pub fn try_new(
        id: i32,
        beatmapset_id: i32,
        user_id: i32,
        message_type: &str,
        resolved: bool,
        deleted_at: Option<NaiveDateTime>,
        created_at: NaiveDateTime,
        updated_at: NaiveDateTime,
    ) -> Result<Self, TypeConstraintError> {
        Ok(Self {
            id: DiscussionId::new(id)?,
            beatmapset_id: BeatmapsetId::new(beatmapset_id)?,
            user_id: UserId::new(user_id)?,
            message_type: message_type.parse()?,
            resolved,
            deleted_at,
            created_at,
            updated_at,
        })
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

impl DiscussionMessageType {
    pub const fn as_str(self) -> &'static str {
        match self {
            DiscussionMessageType::Suggestion => "suggestion",
            DiscussionMessageType::Problem => "problem",
            DiscussionMessageType::MapperNote => "mapper_note",
            DiscussionMessageType::Praise => "praise",
            DiscussionMessageType::Hype => "hype",
            DiscussionMessageType::Review => "review",
        }
    }
}

impl Display for DiscussionMessageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DiscussionMessageType {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "suggestion" => Ok(DiscussionMessageType::Suggestion),
            "problem" => Ok(DiscussionMessageType::Problem),
            "mapper_note" => Ok(DiscussionMessageType::MapperNote),
            "praise" => Ok(DiscussionMessageType::Praise),
            "hype" => Ok(DiscussionMessageType::Hype),
            "review" => Ok(DiscussionMessageType::Review),
            other => Err(TypeConstraintError::InvalidValue(other.to_string())),
        }
    }
}
