//! Typed search parameters shared by every modding history listing.
//!
//! A request goes through two stages: [`SearchParams`] holds what the caller
//! asked for (possibly incomplete), and [`EffectiveParams`] holds the fully
//! resolved values that are actually applied to the query. Defaulting,
//! clamping and the deleted-record visibility rule all happen in the
//! transition between the two.

use std::fmt::Display;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::domain::discussion::DiscussionMessageType;
use crate::domain::event::BeatmapsetEventType;
use crate::domain::types::{BeatmapsetId, DiscussionId, TypeConstraintError, UserId, VoteScore};
use crate::domain::user::User;

pub const DEFAULT_LIMIT: usize = 20;
pub const MIN_LIMIT: usize = 5;
pub const MAX_LIMIT: usize = 50;
pub const SUMMARY_LIMIT: usize = 10;

/// The listings sharing the search-and-paginate pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Discussion,
    Post,
    VoteGiven,
    VoteReceived,
    Event,
}

/// Related rows that can be loaded alongside a listing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
    /// Author of the record (voter for votes, actor for events).
    User,
    /// Beatmap set of the record, hidden when soft-deleted.
    Beatmapset,
    /// Beatmap set of the record, including soft-deleted ones.
    TrashedBeatmapset,
    /// First post of a discussion.
    StartingPost,
    /// Parent discussion of a post or vote.
    Discussion,
    DiscussionUser,
    DiscussionBeatmapset,
    DiscussionStartingPost,
}

const DISCUSSION_RELATIONS: &[Relation] =
    &[Relation::User, Relation::Beatmapset, Relation::StartingPost];

const POST_RELATIONS: &[Relation] = &[
    Relation::User,
    Relation::Beatmapset,
    Relation::Discussion,
    Relation::DiscussionBeatmapset,
    Relation::DiscussionUser,
    Relation::DiscussionStartingPost,
];

const VOTE_RELATIONS: &[Relation] = &[
    Relation::User,
    Relation::Discussion,
    Relation::DiscussionUser,
    Relation::DiscussionBeatmapset,
    Relation::DiscussionStartingPost,
];

const EVENT_RELATIONS: &[Relation] = &[Relation::User, Relation::Beatmapset];

const MODERATOR_EVENT_RELATIONS: &[Relation] = &[Relation::User, Relation::TrashedBeatmapset];

impl RecordKind {
    pub const ALL: [RecordKind; 5] = [
        RecordKind::Discussion,
        RecordKind::Post,
        RecordKind::VoteGiven,
        RecordKind::VoteReceived,
        RecordKind::Event,
    ];

    /// Relations every listing of this kind needs for rendering.
    pub const fn eager_relations(self, is_moderator: bool) -> &'static [Relation] {
        match self {
            RecordKind::Discussion => DISCUSSION_RELATIONS,
            RecordKind::Post => POST_RELATIONS,
            RecordKind::VoteGiven | RecordKind::VoteReceived => VOTE_RELATIONS,
            RecordKind::Event if is_moderator => MODERATOR_EVENT_RELATIONS,
            RecordKind::Event => EVENT_RELATIONS,
        }
    }

    /// How the subject constrains this listing.
    pub const fn subject_filter(self, user_id: UserId) -> SubjectFilter {
        match self {
            RecordKind::VoteReceived => SubjectFilter::Receiver(user_id),
            _ => SubjectFilter::Author(user_id),
        }
    }

    /// URL segment of the listing.
    pub const fn as_str(self) -> &'static str {
        match self {
            RecordKind::Discussion => "discussions",
            RecordKind::Post => "posts",
            RecordKind::VoteGiven => "votes-given",
            RecordKind::VoteReceived => "votes-received",
            RecordKind::Event => "events",
        }
    }
}

impl Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordKind {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RecordKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| TypeConstraintError::InvalidValue(s.to_string()))
    }
}

/// Restricts a listing to one user's side of the activity.
///
/// "Votes by X" and "votes on X's discussions" are different predicates, so
/// a listing carries exactly one of them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SubjectFilter {
    /// Records written or cast by the user.
    Author(UserId),
    /// Votes cast on discussions the user opened.
    Receiver(UserId),
}

impl SubjectFilter {
    pub fn author(&self) -> Option<UserId> {
        match self {
            SubjectFilter::Author(id) => Some(*id),
            SubjectFilter::Receiver(_) => None,
        }
    }

    pub fn receiver(&self) -> Option<UserId> {
        match self {
            SubjectFilter::Receiver(id) => Some(*id),
            SubjectFilter::Author(_) => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SortOrder {
    #[default]
    IdDesc,
    IdAsc,
}

impl SortOrder {
    pub const fn as_str(self) -> &'static str {
        match self {
            SortOrder::IdDesc => "id-desc",
            SortOrder::IdAsc => "id-asc",
        }
    }
}

impl FromStr for SortOrder {
    type Err = TypeConstraintError;

    /// Accepts `id-desc`/`id-asc` and their underscore spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "id-desc" => Ok(SortOrder::IdDesc),
            "id-asc" => Ok(SortOrder::IdAsc),
            _ => Err(TypeConstraintError::InvalidValue(s.to_string())),
        }
    }
}

impl Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for SortOrder {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Kind-specific filters. Filters that do not apply to a kind are ignored.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecordFilters {
    /// Discussions and events.
    pub beatmapset_id: Option<BeatmapsetId>,
    /// Posts and votes.
    pub discussion_id: Option<DiscussionId>,
    /// Discussions.
    pub message_types: Vec<DiscussionMessageType>,
    /// Discussions.
    pub only_unresolved: bool,
    /// Votes.
    pub score: Option<VoteScore>,
    /// Events.
    pub event_types: Vec<BeatmapsetEventType>,
}

/// Parameters requested by the caller before defaults are applied.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchParams {
    pub limit: Option<usize>,
    pub sort: Option<SortOrder>,
    pub page: Option<usize>,
    pub with_deleted: bool,
    pub filters: RecordFilters,
}

/// Immutable per-request context resolved before any search runs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchContext {
    pub subject: User,
    pub is_moderator: bool,
}

/// Parameters after defaulting, clamping and visibility enforcement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EffectiveParams {
    pub subject: SubjectFilter,
    pub limit: usize,
    pub sort: SortOrder,
    pub page: usize,
    pub with_deleted: bool,
    pub filters: RecordFilters,
}

/// Filters echoed into pagination links. The subject lives in the path and
/// the page number is appended per link.
#[derive(Serialize)]
struct LinkParams<'a> {
    limit: usize,
    sort: SortOrder,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    with_deleted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    beatmapset_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    beatmapset_discussion_id: Option<i32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    message_types: Vec<&'static str>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    only_unresolved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    score: Option<i32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    types: Vec<&'a BeatmapsetEventType>,
}

impl EffectiveParams {
    /// Resolves caller parameters for a per-kind listing page.
    ///
    /// Deleted records are only visible to moderators who asked for them.
    pub fn listing(kind: RecordKind, context: &SearchContext, params: SearchParams) -> Self {
        Self {
            subject: kind.subject_filter(context.subject.id),
            limit: params
                .limit
                .map_or(DEFAULT_LIMIT, |limit| limit.clamp(MIN_LIMIT, MAX_LIMIT)),
            sort: params.sort.unwrap_or_default(),
            page: params.page.unwrap_or(1).max(1),
            with_deleted: params.with_deleted && context.is_moderator,
            filters: params.filters,
        }
    }

    /// Parameters of the activity summary: the caller's page and filters
    /// with the newest ten records, deleted ones included whenever the
    /// viewer is a moderator.
    pub fn summary(kind: RecordKind, context: &SearchContext, params: SearchParams) -> Self {
        Self {
            limit: SUMMARY_LIMIT,
            sort: SortOrder::IdDesc,
            with_deleted: context.is_moderator,
            ..Self::listing(kind, context, params)
        }
    }

    /// Number of rows skipped before the current page window.
    pub fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// Serializes the active filters as a query string for pagination links.
    pub fn to_query_string(&self) -> String {
        let link_params = LinkParams {
            limit: self.limit,
            sort: self.sort,
            with_deleted: self.with_deleted,
            beatmapset_id: self.filters.beatmapset_id.map(BeatmapsetId::get),
            beatmapset_discussion_id: self.filters.discussion_id.map(DiscussionId::get),
            message_types: self
                .filters
                .message_types
                .iter()
                .map(|t| t.as_str())
                .collect(),
            only_unresolved: self.filters.only_unresolved,
            score: self.filters.score.map(VoteScore::get),
            types: self.filters.event_types.iter().collect(),
        };

        serde_html_form::to_string(&link_params).unwrap_or_else(|err| {
            log::error!("Failed to serialize pagination parameters: {err}");
            format!("limit={}&sort={}", self.limit, self.sort)
        })
    }
}
