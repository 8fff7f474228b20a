use std::fmt::Display;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::types::{BeatmapsetId, EventId, TypeConstraintError, UserId};

/// Moderation event recorded against a beatmap set.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct BeatmapsetEvent {
    pub id: EventId,
    pub beatmapset_id: BeatmapsetId,
    /// System generated events have no acting user.
    pub user_id: Option<UserId>,
    pub event_type: BeatmapsetEventType,
    pub comment: Value,
    pub created_at: NaiveDateTime,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(into = "String", from = "String")]
pub enum BeatmapsetEventType {
    Nominate,
    Qualify,
    Disqualify,
    Love,
    Rank,
    NominationReset,
    IssueResolve,
    IssueReopen,
    DiscussionDelete,
    DiscussionRestore,
    KudosuGain,
    KudosuLost,
    Other(String),
}

impl BeatmapsetEvent {
    pub fn try_new(
        id: i32,
        beatmapset_id: i32,
        user_id: Option<i32>,
        event_type: String,
        comment: Value,
        created_at: NaiveDateTime,
    ) -> Result<Self, TypeConstraintError> {
        Ok(Self {
            id: EventId::new(id)?,
            beatmapset_id: BeatmapsetId::new(beatmapset_id)?,
            user_id: user_id.map(UserId::new).transpose()?,
            event_type: event_type.into(),
            comment,
            created_at,
        })
    }
}

impl Display for BeatmapsetEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BeatmapsetEventType::Nominate => write!(f, "nominate"),
            BeatmapsetEventType::Qualify => write!(f, "qualify"),
            BeatmapsetEventType::Disqualify => write!(f, "disqualify"),
            BeatmapsetEventType::Love => write!(f, "love"),
            BeatmapsetEventType::Rank => write!(f, "rank"),
            BeatmapsetEventType::NominationReset => write!(f, "nomination_reset"),
            BeatmapsetEventType::IssueResolve => write!(f, "issue_resolve"),
            BeatmapsetEventType::IssueReopen => write!(f, "issue_reopen"),
            BeatmapsetEventType::DiscussionDelete => write!(f, "discussion_delete"),
            BeatmapsetEventType::DiscussionRestore => write!(f, "discussion_restore"),
            BeatmapsetEventType::KudosuGain => write!(f, "kudosu_gain"),
            BeatmapsetEventType::KudosuLost => write!(f, "kudosu_lost"),
            BeatmapsetEventType::Other(s) => write!(f, "{s}"),
        }
    }
}

impl From<&str> for BeatmapsetEventType {
    fn from(s: &str) -> Self {
        match s {
            "nominate" => BeatmapsetEventType::Nominate,
            "qualify" => BeatmapsetEventType::Qualify,
            "disqualify" => BeatmapsetEventType::Disqualify,
            "love" => BeatmapsetEventType::Love,
            "rank" => BeatmapsetEventType::Rank,
            "nomination_reset" => BeatmapsetEventType::NominationReset,
            "issue_resolve" => BeatmapsetEventType::IssueResolve,
            "issue_reopen" => BeatmapsetEventType::IssueReopen,
            "discussion_delete" => BeatmapsetEventType::DiscussionDelete,
            "discussion_restore" => BeatmapsetEventType::DiscussionRestore,
            "kudosu_gain" => BeatmapsetEventType::KudosuGain,
            "kudosu_lost" => BeatmapsetEventType::KudosuLost,
            _ => BeatmapsetEventType::Other(s.to_string()),
        }
    }
}

impl From<String> for BeatmapsetEventType {
    fn from(s: String) -> Self {
        s.as_str().into()
    }
}

impl From<BeatmapsetEventType> for String {
    fn from(value: BeatmapsetEventType) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_event_types_are_preserved() {
        let event_type = BeatmapsetEventType::from("genre_edit");
        assert_eq!(event_type, BeatmapsetEventType::Other("genre_edit".to_string()));
        assert_eq!(event_type.to_string(), "genre_edit");
    }

    #[test]
    fn known_event_types_parse() {
        assert_eq!(
            BeatmapsetEventType::from("nomination_reset"),
            BeatmapsetEventType::NominationReset
        );
        assert_eq!(BeatmapsetEventType::Disqualify.to_string(), "disqualify");
    }
}
