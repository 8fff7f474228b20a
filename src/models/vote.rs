use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::{types::TypeConstraintError, vote::Vote as DomainVote};
use crate::models::discussion::Discussion;

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(belongs_to(Discussion, foreign_key = beatmap_discussion_id))]
#[diesel(table_name = crate::schema::beatmap_discussion_votes)]
pub struct Vote {
    pub id: i32,
    pub beatmap_discussion_id: i32,
    pub user_id: i32,
    pub score: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::beatmap_discussion_votes)]
pub struct NewVote {
    pub beatmap_discussion_id: i32,
    pub user_id: i32,
    pub score: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<Vote> for DomainVote {
    type Error = TypeConstraintError;

    fn try_from(vote: Vote) -> Result<Self, Self::Error> {
        DomainVote::try_new(
            vote.id,
            vote.beatmap_discussion_id,
            vote.user_id,
            vote.score,
            vote.created_at,
            vote.updated_at,
        )
    }
}
