use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{DiscussionId, PostId, TypeConstraintError, UserId};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Post {
    pub id: PostId,
    pub discussion_id: DiscussionId,
    pub user_id: UserId,
    pub message: String,
    /// Generated resolve/reopen markers rather than user-written replies.
    pub system: bool,
    pub deleted_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Post {
    #[allow(clippy::too_many_arguments)]
    pub fn try_new(
        id: i32,
        discussion_id: i32,
        user_id: i32,
        message: String,
        system: bool,
        deleted_at: Option<NaiveDateTime>,
        created_at: NaiveDateTime,
        updated_at: NaiveDateTime,
    ) -> Result<Self, TypeConstraintError> {
        Ok(Self {
            id: PostId::new(id)?,
            discussion_id: DiscussionId::new(discussion_id)?,
            user_id: UserId::new(user_id)?,
            message,
            system,
            deleted_at,
            created_at,
            updated_at,
        })
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}
