//! Diesel models for beatmap set moderation events.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde_json::Value;

use crate::domain::{event::BeatmapsetEvent as DomainEvent, types::TypeConstraintError};
use crate::models::beatmapset::Beatmapset;

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(belongs_to(Beatmapset, foreign_key = beatmapset_id))]
#[diesel(table_name = crate::schema::beatmapset_events)]
pub struct BeatmapsetEvent {
    pub id: i32,
    pub beatmapset_id: i32,
    pub user_id: Option<i32>,
    pub event_type: String,
    pub comment: Option<String>, // JSON text
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::beatmapset_events)]
pub struct NewBeatmapsetEvent<'a> {
    pub beatmapset_id: i32,
    pub user_id: Option<i32>,
    pub event_type: &'a str,
    pub comment: Option<String>,
}

impl TryFrom<BeatmapsetEvent> for DomainEvent {
    type Error = TypeConstraintError;

    fn try_from(event: BeatmapsetEvent) -> Result<Self, Self::Error> {
        let comment = event
            .comment
            .as_deref()
            .and_then(|raw| serde_json::from_str(raw).ok())
            .unwrap_or(Value::Null);

        DomainEvent::try_new(
            event.id,
            event.beatmapset_id,
            event.user_id,
            event.event_type,
            comment,
            event.created_at,
        )
    }
}
