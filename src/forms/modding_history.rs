//! Query string accepted by every modding history listing.
//!
//! Values are kept as raw strings so that one malformed parameter only drops
//! that parameter instead of rejecting the whole request.

use std::str::FromStr;

use serde::Deserialize;

use crate::domain::discussion::DiscussionMessageType;
use crate::domain::event::BeatmapsetEventType;
use crate::domain::search::{RecordFilters, SearchParams, SortOrder};
use crate::domain::types::{BeatmapsetId, DiscussionId, VoteScore};

#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
pub struct HistoryQueryForm {
    pub limit: Option<String>,
    pub sort: Option<String>,
    pub page: Option<String>,
    pub with_deleted: Option<String>,
    pub beatmapset_id: Option<String>,
    pub beatmapset_discussion_id: Option<String>,
    #[serde(default, alias = "message_types[]")]
    pub message_types: Vec<String>,
    pub only_unresolved: Option<String>,
    pub score: Option<String>,
    #[serde(default, alias = "types[]")]
    pub types: Vec<String>,
}

impl HistoryQueryForm {
    /// Parses a raw query string, falling back to an empty form when it is
    /// not even structurally valid.
    pub fn parse(query: &str) -> Self {
        serde_html_form::from_str(query).unwrap_or_else(|err| {
            log::warn!("Discarding malformed query string {query:?}: {err}");
            Self::default()
        })
    }
}

fn parse_value<T: FromStr>(value: Option<&str>) -> Option<T> {
    value.and_then(|v| v.trim().parse().ok())
}

fn parse_flag(value: Option<&str>) -> bool {
    value.is_some_and(|v| {
        matches!(
            v.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "on" | "yes"
        )
    })
}

fn is_known_event_type(event_type: &BeatmapsetEventType) -> bool {
    !matches!(event_type, BeatmapsetEventType::Other(_))
}

impl From<HistoryQueryForm> for SearchParams {
    fn from(form: HistoryQueryForm) -> Self {
        let filters = RecordFilters {
            beatmapset_id: parse_value::<BeatmapsetId>(form.beatmapset_id.as_deref()),
            discussion_id: parse_value::<DiscussionId>(form.beatmapset_discussion_id.as_deref()),
            message_types: form
                .message_types
                .iter()
                .filter_map(|t| t.trim().parse::<DiscussionMessageType>().ok())
                .collect(),
            only_unresolved: parse_flag(form.only_unresolved.as_deref()),
            score: parse_value::<i32>(form.score.as_deref()).and_then(|s| VoteScore::new(s).ok()),
            event_types: form
                .types
                .iter()
                .map(|t| BeatmapsetEventType::from(t.trim()))
                .filter(is_known_event_type)
                .collect(),
        };

        Self {
            limit: parse_value(form.limit.as_deref()),
            sort: parse_value::<SortOrder>(form.sort.as_deref()),
            page: parse_value(form.page.as_deref()),
            with_deleted: parse_flag(form.with_deleted.as_deref()),
            filters,
        }
    }
}
