use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::{post::Post as DomainPost, types::TypeConstraintError};
use crate::models::discussion::Discussion;

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(belongs_to(Discussion, foreign_key = beatmap_discussion_id))]
#[diesel(table_name = crate::schema::beatmap_discussion_posts)]
pub struct Post {
    pub id: i32,
    pub beatmap_discussion_id: i32,
    pub user_id: i32,
    pub message: String,
    pub system: bool,
    pub deleted_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::beatmap_discussion_posts)]
pub struct NewPost<'a> {
    pub beatmap_discussion_id: i32,
    pub user_id: i32,
    pub message: &'a str,
    pub system: bool,
    pub deleted_at: Option<NaiveDateTime>,
}

impl TryFrom<Post> for DomainPost {
    type Error = TypeConstraintError;

    fn try_from(post: Post) -> Result<Self, Self::Error> {
        DomainPost::try_new(
            post.id,
            post.beatmap_discussion_id,
            post.user_id,
            post.message,
            post.system,
            post.deleted_at,
            post.created_at,
            post.updated_at,
        )
    }
}
