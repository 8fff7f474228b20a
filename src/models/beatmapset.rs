use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::{beatmapset::Beatmapset as DomainBeatmapset, types::TypeConstraintError};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::beatmapsets)]
pub struct Beatmapset {
    pub id: i32,
    pub user_id: i32,
    pub artist: String,
    pub title: String,
    pub deleted_at: Option<NaiveDateTime>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::beatmapsets)]
pub struct NewBeatmapset<'a> {
    pub user_id: i32,
    pub artist: &'a str,
    pub title: &'a str,
    pub deleted_at: Option<NaiveDateTime>,
}

impl TryFrom<Beatmapset> for DomainBeatmapset {
    type Error = TypeConstraintError;

    fn try_from(set: Beatmapset) -> Result<Self, Self::Error> {
        DomainBeatmapset::try_new(set.id, set.user_id, set.artist, set.title, set.deleted_at)
    }
}
