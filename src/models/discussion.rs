use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::{discussion::Discussion as DomainDiscussion, types::TypeConstraintError};
use crate::models::beatmapset::Beatmapset;

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(belongs_to(Beatmapset, foreign_key = beatmapset_id))]
#[diesel(table_name = crate::schema::beatmap_discussions)]
pub struct Discussion {
    pub id: i32,
    pub beatmapset_id: i32,
    pub user_id: i32,
    pub message_type: String,
    pub resolved: bool,
    pub deleted_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::beatmap_discussions)]
pub struct NewDiscussion<'a> {
    pub beatmapset_id: i32,
    pub user_id: i32,
    pub message_type: &'a str,
    pub resolved: bool,
    pub deleted_at: Option<NaiveDateTime>,
}

impl TryFrom<Discussion> for DomainDiscussion {
    type Error = TypeConstraintError;

    fn try_from(discussion: Discussion) -> Result<Self, Self::Error> {
        DomainDiscussion::try_new(
            discussion.id,
            discussion.beatmapset_id,
            discussion.user_id,
            &discussion.message_type,
            discussion.resolved,
            discussion.deleted_at,
            discussion.created_at,
            discussion.updated_at,
        )
    }
}
