use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{DiscussionId, TypeConstraintError, UserId, VoteId, VoteScore};
use crate::domain::user::User;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Vote {
    pub id: VoteId,
    pub discussion_id: DiscussionId,
    pub user_id: UserId,
    pub score: VoteScore,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Vote {
    pub fn try_new(
        id: i32,
        discussion_id: i32,
        user_id: i32,
        score: i32,
        created_at: NaiveDateTime,
        updated_at: NaiveDateTime,
    ) -> Result<Self, TypeConstraintError> {
        Ok(Self {
            id: VoteId::new(id)?,
            discussion_id: DiscussionId::new(discussion_id)?,
            user_id: UserId::new(user_id)?,
            score: VoteScore::new(score)?,
            created_at,
            updated_at,
        })
    }
}

/// Which side of a vote the subject is on when aggregating.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VoteDirection {
    /// Votes cast by the subject, grouped by the discussion author.
    Given,
    /// Votes on the subject's discussions, grouped by the voter.
    Received,
}

/// Aggregated votes exchanged between the subject and one other user.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct VoteSummary {
    pub user: User,
    pub score: i64,
    pub count: i64,
}
