//! Services backing the modding history pages of a user.
//!
//! Every listing goes through [`paginated_search`]: resolve parameters, attach
//! the relations the record kind needs, count the filtered set and load one
//! page window of it.

use chrono::{Months, NaiveDateTime};

use crate::domain::record::ModdingRecord;
use crate::domain::search::{EffectiveParams, RecordKind, SearchContext, SearchParams};
use crate::domain::types::{UserId, Username};
use crate::domain::user::User;
use crate::domain::vote::VoteDirection;
use crate::dto::modding_history::{ListingPageData, SummaryPageData};
use crate::pagination::{Page, PageLinks};
use crate::repository::{RecordQuery, RecordReader, UserReader, VoteSummaryReader};
use crate::services::{ServiceError, ServiceResult};

/// How far back the vote aggregates of the summary reach.
const RECENT_VOTES_MONTHS: u32 = 3;

/// Who is looking at the history.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Viewer {
    pub user_id: Option<UserId>,
    pub is_moderator: bool,
}

impl Viewer {
    pub fn guest() -> Self {
        Self::default()
    }

    /// Restricted users are only visible to moderators and to themselves.
    pub fn can_see(&self, user: &User) -> bool {
        !user.is_restricted || self.is_moderator || self.user_id == Some(user.id)
    }
}

/// Resolves the subject from a path segment holding either an id or a name.
///
/// Bots, unknown users and users hidden from the viewer are all reported as
/// [`ServiceError::NotFound`].
pub fn resolve_subject<R>(repo: &R, viewer: &Viewer, lookup: &str) -> ServiceResult<SearchContext>
where
    R: UserReader + ?Sized,
{
    let lookup = lookup.trim();
    // Restricted rows are worth fetching only when the viewer may see some.
    let include_restricted = viewer.is_moderator || viewer.user_id.is_some();

    // A numeric segment is always an id, never a username.
    let user = match lookup.parse::<UserId>() {
        Ok(id) => repo.get_user_by_id(id, include_restricted).map_err(|err| {
            log::error!("Failed to load user {id}: {err}");
            err
        })?,
        Err(_) if lookup.chars().all(|c| c.is_ascii_digit()) => None,
        Err(_) => match Username::new(lookup) {
            Ok(username) => repo
                .get_user_by_username(&username, include_restricted)
                .map_err(|err| {
                    log::error!("Failed to load user {username}: {err}");
                    err
                })?,
            Err(_) => None,
        },
    };

    match user {
        Some(user) if !user.is_bot && viewer.can_see(&user) => Ok(SearchContext {
            subject: user,
            is_moderator: viewer.is_moderator,
        }),
        _ => Err(ServiceError::NotFound),
    }
}

/// Runs one search and returns the requested page window.
///
/// `total` is counted on the filtered but unpaginated query, so a page past
/// the end is empty while still reporting the real totals.
pub fn paginated_search<R>(
    repo: &R,
    context: &SearchContext,
    kind: RecordKind,
    params: EffectiveParams,
    path: &str,
) -> ServiceResult<Page<ModdingRecord>>
where
    R: RecordReader + ?Sized,
{
    let query = RecordQuery::new(kind, params)
        .with_related(kind.eager_relations(context.is_moderator).iter().copied());

    log::debug!(
        "Searching {kind} of user {} (page {}, limit {}, sort {}, with_deleted {})",
        context.subject.id,
        query.params().page,
        query.params().limit,
        query.params().sort,
        query.params().with_deleted,
    );

    let total = repo.count_records(&query).map_err(|err| {
        log::error!("Failed to count {kind}: {err}");
        err
    })?;
    let items = repo.load_records(&query).map_err(|err| {
        log::error!("Failed to load {kind}: {err}");
        err
    })?;

    let params = query.params();
    let links = PageLinks::new(path, params.to_query_string());

    Ok(Page::new(items, total, params.limit, params.page, links))
}

/// Loads one per-kind listing with the caller's parameters.
pub fn load_listing<R>(
    repo: &R,
    context: &SearchContext,
    kind: RecordKind,
    params: SearchParams,
    path: &str,
) -> ServiceResult<ListingPageData>
where
    R: RecordReader + ?Sized,
{
    let params = EffectiveParams::listing(kind, context, params);
    let sort = params.sort;
    let with_deleted = params.with_deleted;

    let records = paginated_search(repo, context, kind, params, path)?;

    Ok(ListingPageData {
        user: context.subject.clone(),
        kind,
        sort,
        with_deleted,
        records,
    })
}

/// Loads the activity overview: the newest records of each kind plus the
/// vote exchanges of the last months.
///
/// The caller's page and filters apply to every section, while limit, sort
/// and deleted visibility are fixed. `base_path` is the summary path;
/// listing links are built below it.
pub fn load_summary<R>(
    repo: &R,
    context: &SearchContext,
    params: SearchParams,
    base_path: &str,
    now: NaiveDateTime,
) -> ServiceResult<SummaryPageData>
where
    R: RecordReader + VoteSummaryReader + ?Sized,
{
    let base_path = base_path.trim_end_matches('/');
    let section = |kind: RecordKind| {
        paginated_search(
            repo,
            context,
            kind,
            EffectiveParams::summary(kind, context, params.clone()),
            &format!("{base_path}/{kind}"),
        )
    };

    let discussions = section(RecordKind::Discussion)?;
    let posts = section(RecordKind::Post)?;
    let events = section(RecordKind::Event)?;

    let since = now
        .checked_sub_months(Months::new(RECENT_VOTES_MONTHS))
        .unwrap_or(NaiveDateTime::MIN);
    let subject_id = context.subject.id;

    let votes_given = repo
        .list_vote_summaries(subject_id, VoteDirection::Given, since)
        .map_err(|err| {
            log::error!("Failed to summarize votes given by {subject_id}: {err}");
            err
        })?;
    let votes_received = repo
        .list_vote_summaries(subject_id, VoteDirection::Received, since)
        .map_err(|err| {
            log::error!("Failed to summarize votes received by {subject_id}: {err}");
            err
        })?;

    Ok(SummaryPageData {
        user: context.subject.clone(),
        discussions,
        posts,
        events,
        votes_given,
        votes_received,
    })
}
