//! Listing queries shared by every modding history record kind.
//!
//! Each kind has one filter builder. The same builder feeds both the total
//! count and the page window, so both always agree on the filtered set.
//! Relations are loaded afterwards with one `IN (...)` query per relation.

use std::collections::{BTreeSet, HashMap};

use diesel::dsl::min;
use diesel::prelude::*;
use diesel::sqlite::Sqlite;

use crate::db::DbConnection;
use crate::domain::beatmapset::Beatmapset;
use crate::domain::discussion::Discussion;
use crate::domain::event::BeatmapsetEvent;
use crate::domain::post::Post;
use crate::domain::record::{DiscussionEntry, EventEntry, ModdingRecord, PostEntry, VoteEntry};
use crate::domain::search::{EffectiveParams, RecordKind, Relation, SortOrder, SubjectFilter};
use crate::domain::types::{TypeConstraintError, UserId};
use crate::domain::user::User;
use crate::domain::vote::Vote;
use crate::models::beatmapset::Beatmapset as DbBeatmapset;
use crate::models::discussion::Discussion as DbDiscussion;
use crate::models::event::BeatmapsetEvent as DbBeatmapsetEvent;
use crate::models::post::Post as DbPost;
use crate::models::user::User as DbUser;
use crate::models::vote::Vote as DbVote;
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, RecordQuery, RecordReader};
use crate::schema::{
    beatmap_discussion_posts, beatmap_discussion_votes, beatmap_discussions, beatmapset_events,
    beatmapsets, users,
};

/// Orders by id and cuts the page window out of a boxed query.
macro_rules! page_window {
    ($query:expr, $id:expr, $params:expr) => {{
        let query = match $params.sort {
            SortOrder::IdDesc => $query.order($id.desc()),
            SortOrder::IdAsc => $query.order($id.asc()),
        };
        query
            .offset(to_i64($params.offset()))
            .limit(to_i64($params.limit))
    }};
}

fn to_i64(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// Only votes distinguish author from receiver; every other kind belongs to
/// the subject directly.
fn subject_user_id(subject: &SubjectFilter) -> i32 {
    match subject {
        SubjectFilter::Author(id) | SubjectFilter::Receiver(id) => id.get(),
    }
}

fn into_domain<T, D>(rows: Vec<T>) -> RepositoryResult<Vec<D>>
where
    D: TryFrom<T, Error = TypeConstraintError>,
{
    rows.into_iter()
        .map(|row| D::try_from(row).map_err(RepositoryError::from))
        .collect()
}

fn discussion_filter(params: &EffectiveParams) -> beatmap_discussions::BoxedQuery<'static, Sqlite> {
    use crate::schema::beatmap_discussions as d;

    let mut query = d::table
        .filter(d::user_id.eq(subject_user_id(&params.subject)))
        .into_boxed();

    if !params.with_deleted {
        query = query.filter(d::deleted_at.is_null());
    }
    if let Some(beatmapset_id) = params.filters.beatmapset_id {
        query = query.filter(d::beatmapset_id.eq(beatmapset_id.get()));
    }
    if !params.filters.message_types.is_empty() {
        let message_types: Vec<&'static str> = params
            .filters
            .message_types
            .iter()
            .map(|t| t.as_str())
            .collect();
        query = query.filter(d::message_type.eq_any(message_types));
    }
    if params.filters.only_unresolved {
        query = query.filter(d::resolved.eq(false));
    }
    query
}

fn post_filter(params: &EffectiveParams) -> beatmap_discussion_posts::BoxedQuery<'static, Sqlite> {
    use crate::schema::beatmap_discussion_posts as p;

    let mut query = p::table
        .filter(p::user_id.eq(subject_user_id(&params.subject)))
        .filter(p::system.eq(false))
        .into_boxed();

    if !params.with_deleted {
        query = query.filter(p::deleted_at.is_null());
    }
    if let Some(discussion_id) = params.filters.discussion_id {
        query = query.filter(p::beatmap_discussion_id.eq(discussion_id.get()));
    }
    query
}

fn vote_filter(params: &EffectiveParams) -> beatmap_discussion_votes::BoxedQuery<'static, Sqlite> {
    use crate::schema::beatmap_discussion_votes as v;
    use crate::schema::beatmap_discussions as d;

    let mut query = v::table.into_boxed();

    query = match params.subject {
        SubjectFilter::Author(user_id) => query.filter(v::user_id.eq(user_id.get())),
        SubjectFilter::Receiver(user_id) => query.filter(
            v::beatmap_discussion_id
                .eq_any(d::table.filter(d::user_id.eq(user_id.get())).select(d::id)),
        ),
    };

    if !params.with_deleted {
        query = query.filter(
            v::beatmap_discussion_id.eq_any(d::table.filter(d::deleted_at.is_null()).select(d::id)),
        );
    }
    if let Some(discussion_id) = params.filters.discussion_id {
        query = query.filter(v::beatmap_discussion_id.eq(discussion_id.get()));
    }
    if let Some(score) = params.filters.score {
        query = query.filter(v::score.eq(score.get()));
    }
    query
}

fn event_filter(params: &EffectiveParams) -> beatmapset_events::BoxedQuery<'static, Sqlite> {
    use crate::schema::beatmapset_events as e;
    use crate::schema::beatmapsets as b;

    let mut query = e::table
        .filter(e::user_id.eq(subject_user_id(&params.subject)))
        .into_boxed();

    if !params.with_deleted {
        query = query
            .filter(e::beatmapset_id.eq_any(b::table.filter(b::deleted_at.is_null()).select(b::id)));
    }
    if let Some(beatmapset_id) = params.filters.beatmapset_id {
        query = query.filter(e::beatmapset_id.eq(beatmapset_id.get()));
    }
    if !params.filters.event_types.is_empty() {
        let event_types: Vec<String> = params
            .filters
            .event_types
            .iter()
            .map(ToString::to_string)
            .collect();
        query = query.filter(e::event_type.eq_any(event_types));
    }
    query
}

fn unique_ids(ids: impl IntoIterator<Item = i32>) -> Vec<i32> {
    ids.into_iter()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn load_users(
    conn: &mut DbConnection,
    ids: impl IntoIterator<Item = i32>,
) -> RepositoryResult<HashMap<i32, User>> {
    let ids = unique_ids(ids);
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = users::table
        .filter(users::id.eq_any(ids))
        .load::<DbUser>(conn)?;

    rows.into_iter()
        .map(|row| -> RepositoryResult<(i32, User)> {
            let user = User::try_from(row)?;
            Ok((user.id.get(), user))
        })
        .collect()
}

fn load_beatmapsets(
    conn: &mut DbConnection,
    ids: impl IntoIterator<Item = i32>,
    with_trashed: bool,
) -> RepositoryResult<HashMap<i32, Beatmapset>> {
    let ids = unique_ids(ids);
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let mut query = beatmapsets::table
        .filter(beatmapsets::id.eq_any(ids))
        .into_boxed::<Sqlite>();
    if !with_trashed {
        query = query.filter(beatmapsets::deleted_at.is_null());
    }

    query
        .load::<DbBeatmapset>(conn)?
        .into_iter()
        .map(|row| -> RepositoryResult<(i32, Beatmapset)> {
            let beatmapset = Beatmapset::try_from(row)?;
            Ok((beatmapset.id.get(), beatmapset))
        })
        .collect()
}

/// Parent discussions are loaded regardless of deletion so that votes and
/// posts can report the state of their thread.
fn load_discussions(
    conn: &mut DbConnection,
    ids: impl IntoIterator<Item = i32>,
) -> RepositoryResult<Vec<Discussion>> {
    let ids = unique_ids(ids);
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let rows = beatmap_discussions::table
        .filter(beatmap_discussions::id.eq_any(ids))
        .load::<DbDiscussion>(conn)?;
    into_domain(rows)
}

/// First post of each discussion, keyed by discussion id.
fn load_starting_posts(
    conn: &mut DbConnection,
    discussion_ids: impl IntoIterator<Item = i32>,
) -> RepositoryResult<HashMap<i32, Post>> {
    use crate::schema::beatmap_discussion_posts as p;

    let discussion_ids = unique_ids(discussion_ids);
    if discussion_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let first_ids = p::table
        .filter(p::beatmap_discussion_id.eq_any(discussion_ids))
        .group_by(p::beatmap_discussion_id)
        .select((p::beatmap_discussion_id, min(p::id)))
        .load::<(i32, Option<i32>)>(conn)?
        .into_iter()
        .filter_map(|(_, first_id)| first_id)
        .collect::<Vec<i32>>();

    if first_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = p::table
        .filter(p::id.eq_any(first_ids))
        .load::<DbPost>(conn)?;

    rows.into_iter()
        .map(|row| -> RepositoryResult<(i32, Post)> {
            let post = Post::try_from(row)?;
            Ok((post.discussion_id.get(), post))
        })
        .collect()
}

#[derive(Clone, Copy, Debug, Default)]
struct DiscussionIncludes {
    user: bool,
    beatmapset: bool,
    starting_post: bool,
}

fn build_discussion_entries(
    conn: &mut DbConnection,
    discussions: Vec<Discussion>,
    includes: DiscussionIncludes,
) -> RepositoryResult<Vec<DiscussionEntry>> {
    let users = if includes.user {
        load_users(conn, discussions.iter().map(|d| d.user_id.get()))?
    } else {
        HashMap::new()
    };
    let beatmapsets = if includes.beatmapset {
        load_beatmapsets(conn, discussions.iter().map(|d| d.beatmapset_id.get()), false)?
    } else {
        HashMap::new()
    };
    let starting_posts = if includes.starting_post {
        load_starting_posts(conn, discussions.iter().map(|d| d.id.get()))?
    } else {
        HashMap::new()
    };

    Ok(discussions
        .into_iter()
        .map(|discussion| DiscussionEntry {
            user: users.get(&discussion.user_id.get()).cloned(),
            beatmapset: beatmapsets.get(&discussion.beatmapset_id.get()).cloned(),
            starting_post: starting_posts.get(&discussion.id.get()).cloned(),
            discussion,
        })
        .collect())
}

/// Parent discussions for posts and votes, keyed by discussion id.
fn load_parent_discussions(
    conn: &mut DbConnection,
    query: &RecordQuery,
    discussion_ids: impl IntoIterator<Item = i32>,
    with_beatmapset: bool,
) -> RepositoryResult<HashMap<i32, DiscussionEntry>> {
    let discussions = load_discussions(conn, discussion_ids)?;
    let includes = DiscussionIncludes {
        user: query.includes(Relation::DiscussionUser),
        beatmapset: with_beatmapset,
        starting_post: query.includes(Relation::DiscussionStartingPost),
    };

    Ok(build_discussion_entries(conn, discussions, includes)?
        .into_iter()
        .map(|entry| (entry.discussion.id.get(), entry))
        .collect())
}

fn nested_discussion(query: &RecordQuery, entry: Option<&DiscussionEntry>) -> Option<DiscussionEntry> {
    if !query.includes(Relation::Discussion) {
        return None;
    }
    entry.cloned().map(|mut entry| {
        if !query.includes(Relation::DiscussionBeatmapset) {
            entry.beatmapset = None;
        }
        entry
    })
}

fn load_discussion_records(
    conn: &mut DbConnection,
    query: &RecordQuery,
) -> RepositoryResult<Vec<ModdingRecord>> {
    let params = query.params();
    let rows = page_window!(discussion_filter(params), beatmap_discussions::id, params)
        .load::<DbDiscussion>(conn)?;
    let discussions: Vec<Discussion> = into_domain(rows)?;

    let includes = DiscussionIncludes {
        user: query.includes(Relation::User),
        beatmapset: query.includes(Relation::Beatmapset),
        starting_post: query.includes(Relation::StartingPost),
    };

    Ok(build_discussion_entries(conn, discussions, includes)?
        .into_iter()
        .map(ModdingRecord::Discussion)
        .collect())
}

fn load_post_records(
    conn: &mut DbConnection,
    query: &RecordQuery,
) -> RepositoryResult<Vec<ModdingRecord>> {
    let params = query.params();
    let rows = page_window!(post_filter(params), beatmap_discussion_posts::id, params)
        .load::<DbPost>(conn)?;
    let posts: Vec<Post> = into_domain(rows)?;

    let users = if query.includes(Relation::User) {
        load_users(conn, posts.iter().map(|p| p.user_id.get()))?
    } else {
        HashMap::new()
    };

    // A post's beatmap set is reached through its discussion.
    let wants_beatmapset = query.includes(Relation::Beatmapset);
    let discussions = if query.includes(Relation::Discussion) || wants_beatmapset {
        load_parent_discussions(
            conn,
            query,
            posts.iter().map(|p| p.discussion_id.get()),
            wants_beatmapset || query.includes(Relation::DiscussionBeatmapset),
        )?
    } else {
        HashMap::new()
    };

    Ok(posts
        .into_iter()
        .map(|post| {
            let parent = discussions.get(&post.discussion_id.get());
            ModdingRecord::Post(PostEntry {
                user: users.get(&post.user_id.get()).cloned(),
                beatmapset: parent
                    .filter(|_| wants_beatmapset)
                    .and_then(|entry| entry.beatmapset.clone()),
                discussion: nested_discussion(query, parent),
                post,
            })
        })
        .collect())
}

fn load_vote_records(
    conn: &mut DbConnection,
    query: &RecordQuery,
) -> RepositoryResult<Vec<ModdingRecord>> {
    let params = query.params();
    let rows = page_window!(vote_filter(params), beatmap_discussion_votes::id, params)
        .load::<DbVote>(conn)?;
    let votes: Vec<Vote> = into_domain(rows)?;

    let users = if query.includes(Relation::User) {
        load_users(conn, votes.iter().map(|v| v.user_id.get()))?
    } else {
        HashMap::new()
    };
    let discussions = if query.includes(Relation::Discussion) {
        load_parent_discussions(
            conn,
            query,
            votes.iter().map(|v| v.discussion_id.get()),
            query.includes(Relation::DiscussionBeatmapset),
        )?
    } else {
        HashMap::new()
    };

    Ok(votes
        .into_iter()
        .map(|vote| {
            ModdingRecord::Vote(VoteEntry {
                user: users.get(&vote.user_id.get()).cloned(),
                discussion: nested_discussion(query, discussions.get(&vote.discussion_id.get())),
                vote,
            })
        })
        .collect())
}

fn load_event_records(
    conn: &mut DbConnection,
    query: &RecordQuery,
) -> RepositoryResult<Vec<ModdingRecord>> {
    let params = query.params();
    let rows = page_window!(event_filter(params), beatmapset_events::id, params)
        .load::<DbBeatmapsetEvent>(conn)?;
    let events: Vec<BeatmapsetEvent> = into_domain(rows)?;

    let users = if query.includes(Relation::User) {
        load_users(conn, events.iter().filter_map(|e| e.user_id.map(UserId::get)))?
    } else {
        HashMap::new()
    };

    let beatmapset_ids = events.iter().map(|e| e.beatmapset_id.get());
    let beatmapsets = if query.includes(Relation::TrashedBeatmapset) {
        load_beatmapsets(conn, beatmapset_ids, true)?
    } else if query.includes(Relation::Beatmapset) {
        load_beatmapsets(conn, beatmapset_ids, false)?
    } else {
        HashMap::new()
    };

    Ok(events
        .into_iter()
        .map(|event| {
            ModdingRecord::Event(EventEntry {
                user: event
                    .user_id
                    .and_then(|user_id| users.get(&user_id.get()).cloned()),
                beatmapset: beatmapsets.get(&event.beatmapset_id.get()).cloned(),
                event,
            })
        })
        .collect())
}

impl RecordReader for DieselRepository {
    fn count_records(&self, query: &RecordQuery) -> RepositoryResult<usize> {
        let mut conn = self.conn()?;
        let params = query.params();

        let total = match query.kind() {
            RecordKind::Discussion => discussion_filter(params)
                .count()
                .get_result::<i64>(&mut conn)?,
            RecordKind::Post => post_filter(params).count().get_result::<i64>(&mut conn)?,
            RecordKind::VoteGiven | RecordKind::VoteReceived => {
                vote_filter(params).count().get_result::<i64>(&mut conn)?
            }
            RecordKind::Event => event_filter(params).count().get_result::<i64>(&mut conn)?,
        };

        Ok(usize::try_from(total).unwrap_or_default())
    }

    fn load_records(&self, query: &RecordQuery) -> RepositoryResult<Vec<ModdingRecord>> {
        let mut conn = self.conn()?;

        log::debug!(
            "Loading {} page {} (limit {}) with relations {:?}",
            query.kind(),
            query.params().page,
            query.params().limit,
            query.relations().collect::<Vec<_>>()
        );

        match query.kind() {
            RecordKind::Discussion => load_discussion_records(&mut conn, query),
            RecordKind::Post => load_post_records(&mut conn, query),
            RecordKind::VoteGiven | RecordKind::VoteReceived => {
                load_vote_records(&mut conn, query)
            }
            RecordKind::Event => load_event_records(&mut conn, query),
        }
    }
}
