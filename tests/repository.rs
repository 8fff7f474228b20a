use std::collections::BTreeSet;

use osu_modding_history::domain::record::ModdingRecord;
use osu_modding_history::domain::search::{
    EffectiveParams, RecordKind, SearchContext, SearchParams, SortOrder,
};
use osu_modding_history::domain::types::{UserId, Username};
use osu_modding_history::domain::user::User;
use osu_modding_history::domain::vote::VoteDirection;
use osu_modding_history::repository::{
    DieselRepository, RecordQuery, RecordReader, UserReader, VoteSummaryReader,
};

mod common;

fn context(repo: &DieselRepository, user_id: i32, is_moderator: bool) -> SearchContext {
    let subject: User = repo
        .get_user_by_id(UserId::new(user_id).unwrap(), true)
        .unwrap()
        .unwrap();
    SearchContext {
        subject,
        is_moderator,
    }
}

fn listing(
    kind: RecordKind,
    context: &SearchContext,
    params: SearchParams,
) -> RecordQuery {
    RecordQuery::new(kind, EffectiveParams::listing(kind, context, params))
        .with_related(kind.eager_relations(context.is_moderator).iter().copied())
}

fn page(limit: usize, page: usize) -> SearchParams {
    SearchParams {
        limit: Some(limit),
        page: Some(page),
        ..SearchParams::default()
    }
}

#[test]
fn test_user_lookup_by_id_and_name() {
    let test_db = common::TestDb::new("test_user_lookup_by_id_and_name.db");
    let mut conn = test_db.conn();
    let mapper = common::insert_user(&mut conn, "Mapper_One", false, false);
    let hidden = common::insert_user(&mut conn, "hidden", false, true);
    common::insert_user(&mut conn, "Mapper1One", false, false);
    let repo = DieselRepository::new(test_db.pool());

    let by_name = repo
        .get_user_by_username(&Username::new("mapper_one").unwrap(), false)
        .unwrap()
        .unwrap();
    assert_eq!(by_name.id.get(), mapper);

    let hidden_id = UserId::new(hidden).unwrap();
    assert!(repo.get_user_by_id(hidden_id, false).unwrap().is_none());
    assert!(repo.get_user_by_id(hidden_id, true).unwrap().is_some());
}

#[test]
fn test_discussion_pages_report_real_totals() {
    let test_db = common::TestDb::new("test_discussion_pages_report_real_totals.db");
    let mut conn = test_db.conn();
    let subject = common::insert_user(&mut conn, "subject", false, false);
    let other = common::insert_user(&mut conn, "other", false, false);
    let set = common::insert_beatmapset(&mut conn, other, None);
    for _ in 0..25 {
        common::insert_discussion(&mut conn, set, subject, "suggestion", None);
    }
    common::insert_discussion(&mut conn, set, other, "problem", None);
    let repo = DieselRepository::new(test_db.pool());
    let context = context(&repo, subject, false);

    for (requested, expected) in [(1, 10), (3, 5), (4, 0)] {
        let query = listing(RecordKind::Discussion, &context, page(10, requested));
        let items = repo.load_records(&query).unwrap();

        assert_eq!(repo.count_records(&query).unwrap(), 25);
        assert_eq!(items.len(), expected, "page {requested}");
    }
}

#[test]
fn test_pages_cover_the_sorted_set_without_gaps() {
    let test_db = common::TestDb::new("test_pages_cover_the_sorted_set_without_gaps.db");
    let mut conn = test_db.conn();
    let subject = common::insert_user(&mut conn, "subject", false, false);
    let set = common::insert_beatmapset(&mut conn, subject, None);
    let discussion = common::insert_discussion(&mut conn, set, subject, "praise", None);
    let mut expected = Vec::new();
    for i in 0..12 {
        expected.push(common::insert_post(
            &mut conn,
            discussion,
            subject,
            &format!("post {i}"),
            false,
            None,
        ));
    }
    let repo = DieselRepository::new(test_db.pool());
    let context = context(&repo, subject, false);

    let params = |number| SearchParams {
        sort: Some(SortOrder::IdAsc),
        ..page(5, number)
    };
    let total = repo
        .count_records(&listing(RecordKind::Post, &context, params(1)))
        .unwrap();
    assert_eq!(total, 12);

    let collected: Vec<i32> = (1..=total.div_ceil(5))
        .flat_map(|number| {
            repo.load_records(&listing(RecordKind::Post, &context, params(number)))
                .unwrap()
        })
        .map(|record| record.id())
        .collect();
    assert_eq!(collected, expected);

    let first = repo
        .load_records(&listing(RecordKind::Post, &context, params(1)))
        .unwrap();
    let again = repo
        .load_records(&listing(RecordKind::Post, &context, params(1)))
        .unwrap();
    assert_eq!(first, again);
}

#[test]
fn test_deleted_records_stay_hidden_from_non_moderators() {
    let test_db = common::TestDb::new("test_deleted_records_stay_hidden.db");
    let mut conn = test_db.conn();
    let deleted_at = Some(common::timestamp("2024-01-01 00:00:00"));
    let subject = common::insert_user(&mut conn, "subject", false, false);
    let voter = common::insert_user(&mut conn, "voter", false, false);
    let live_set = common::insert_beatmapset(&mut conn, subject, None);
    let dead_set = common::insert_beatmapset(&mut conn, subject, deleted_at);
    let live = common::insert_discussion(&mut conn, live_set, subject, "problem", None);
    let dead = common::insert_discussion(&mut conn, live_set, subject, "problem", deleted_at);
    common::insert_post(&mut conn, live, subject, "kept", false, None);
    common::insert_post(&mut conn, live, subject, "removed", false, deleted_at);
    let now = common::timestamp("2025-01-01 00:00:00");
    common::insert_vote(&mut conn, live, voter, 1, now);
    common::insert_vote(&mut conn, dead, voter, -1, now);
    common::insert_event(&mut conn, live_set, Some(subject), "nominate");
    common::insert_event(&mut conn, dead_set, Some(subject), "nominate");
    let repo = DieselRepository::new(test_db.pool());

    let asks_for_deleted = SearchParams {
        with_deleted: true,
        ..SearchParams::default()
    };

    for kind in RecordKind::ALL {
        let query = listing(kind, &context(&repo, subject, false), asks_for_deleted.clone());
        let items = repo.load_records(&query).unwrap();

        assert!(
            items.iter().all(|record| !record.is_deleted()),
            "{kind} leaked a deleted record"
        );
        assert_eq!(repo.count_records(&query).unwrap(), items.len());

        let moderated = listing(kind, &context(&repo, subject, true), asks_for_deleted.clone());
        if kind != RecordKind::VoteGiven {
            assert_eq!(repo.count_records(&moderated).unwrap(), 2, "{kind}");
        }
    }
}

#[test]
fn test_votes_received_filter_by_discussion_author() {
    let test_db = common::TestDb::new("test_votes_received_filter_by_author.db");
    let mut conn = test_db.conn();
    let subject = common::insert_user(&mut conn, "subject", false, false);
    let other = common::insert_user(&mut conn, "other", false, false);
    let set = common::insert_beatmapset(&mut conn, other, None);
    let own = common::insert_discussion(&mut conn, set, subject, "suggestion", None);
    let foreign = common::insert_discussion(&mut conn, set, other, "suggestion", None);
    let now = common::timestamp("2025-01-01 00:00:00");
    let received = common::insert_vote(&mut conn, own, other, 1, now);
    let given = common::insert_vote(&mut conn, foreign, subject, 1, now);
    let repo = DieselRepository::new(test_db.pool());
    let context = context(&repo, subject, false);

    let received_ids: Vec<i32> = repo
        .load_records(&listing(
            RecordKind::VoteReceived,
            &context,
            SearchParams::default(),
        ))
        .unwrap()
        .iter()
        .map(ModdingRecord::id)
        .collect();
    let given_ids: Vec<i32> = repo
        .load_records(&listing(RecordKind::VoteGiven, &context, SearchParams::default()))
        .unwrap()
        .iter()
        .map(ModdingRecord::id)
        .collect();

    assert_eq!(received_ids, vec![received]);
    assert_eq!(given_ids, vec![given]);
}

#[test]
fn test_listings_eagerly_load_relations() {
    let test_db = common::TestDb::new("test_listings_eagerly_load_relations.db");
    let mut conn = test_db.conn();
    let subject = common::insert_user(&mut conn, "subject", false, false);
    let other = common::insert_user(&mut conn, "other", false, false);
    let set = common::insert_beatmapset(&mut conn, other, None);
    let discussion = common::insert_discussion(&mut conn, set, other, "problem", None);
    let opening = common::insert_post(&mut conn, discussion, other, "opening", false, None);
    common::insert_post(&mut conn, discussion, subject, "reply", false, None);
    common::insert_post(&mut conn, discussion, subject, "resolved", true, None);
    let repo = DieselRepository::new(test_db.pool());
    let context = context(&repo, subject, false);

    let query = listing(RecordKind::Post, &context, SearchParams::default());
    assert_eq!(repo.count_records(&query).unwrap(), 1);

    let items = repo.load_records(&query).unwrap();
    let ModdingRecord::Post(entry) = &items[0] else {
        panic!("expected a post record");
    };
    assert_eq!(entry.post.message, "reply");
    assert_eq!(entry.user.as_ref().unwrap().username.as_str(), "subject");
    assert_eq!(entry.beatmapset.as_ref().unwrap().id.get(), set);

    let parent = entry.discussion.as_ref().unwrap();
    assert_eq!(parent.discussion.id.get(), discussion);
    assert_eq!(parent.user.as_ref().unwrap().username.as_str(), "other");
    assert_eq!(parent.starting_post.as_ref().unwrap().id.get(), opening);
    assert!(parent.beatmapset.is_some());
}

#[test]
fn test_moderators_see_events_on_deleted_beatmapsets() {
    let test_db = common::TestDb::new("test_moderators_see_trashed_events.db");
    let mut conn = test_db.conn();
    let subject = common::insert_user(&mut conn, "subject", false, false);
    let dead_set = common::insert_beatmapset(
        &mut conn,
        subject,
        Some(common::timestamp("2024-05-05 10:00:00")),
    );
    common::insert_event(&mut conn, dead_set, Some(subject), "disqualify");
    let repo = DieselRepository::new(test_db.pool());

    let moderator = context(&repo, subject, true);
    let params = SearchParams {
        with_deleted: true,
        ..SearchParams::default()
    };
    let items = repo
        .load_records(&listing(RecordKind::Event, &moderator, params))
        .unwrap();

    let ModdingRecord::Event(entry) = &items[0] else {
        panic!("expected an event record");
    };
    assert!(entry.beatmapset.as_ref().unwrap().is_deleted());
    assert!(items[0].is_deleted());
}

#[test]
fn test_vote_summaries_group_recent_votes() {
    let test_db = common::TestDb::new("test_vote_summaries_group_recent_votes.db");
    let mut conn = test_db.conn();
    let subject = common::insert_user(&mut conn, "subject", false, false);
    let alice = common::insert_user(&mut conn, "alice", false, false);
    let bob = common::insert_user(&mut conn, "bob", false, false);
    let set = common::insert_beatmapset(&mut conn, subject, None);
    let recent = common::timestamp("2025-06-01 00:00:00");
    let old = common::timestamp("2024-01-01 00:00:00");

    let own_a = common::insert_discussion(&mut conn, set, subject, "problem", None);
    let own_b = common::insert_discussion(&mut conn, set, subject, "problem", None);
    common::insert_vote(&mut conn, own_a, alice, 1, recent);
    common::insert_vote(&mut conn, own_b, alice, -1, recent);
    common::insert_vote(&mut conn, own_a, bob, 1, recent);
    let stale = common::insert_discussion(&mut conn, set, subject, "problem", None);
    common::insert_vote(&mut conn, stale, bob, 1, old);

    let bobs = common::insert_discussion(&mut conn, set, bob, "praise", None);
    common::insert_vote(&mut conn, bobs, subject, 1, recent);
    let repo = DieselRepository::new(test_db.pool());
    let since = common::timestamp("2025-03-01 00:00:00");
    let subject_id = UserId::new(subject).unwrap();

    let received = repo
        .list_vote_summaries(subject_id, VoteDirection::Received, since)
        .unwrap();
    let summary: Vec<(i32, i64, i64)> = received
        .iter()
        .map(|s| (s.user.id.get(), s.score, s.count))
        .collect();
    assert_eq!(summary, vec![(alice, 0, 2), (bob, 1, 1)]);

    let given = repo
        .list_vote_summaries(subject_id, VoteDirection::Given, since)
        .unwrap();
    let voters: BTreeSet<i32> = given.iter().map(|s| s.user.id.get()).collect();
    assert_eq!(voters, BTreeSet::from([bob]));
}

#[test]
fn test_vote_summaries_order_by_count_then_user() {
    let test_db = common::TestDb::new("test_vote_summaries_order_by_count.db");
    let mut conn = test_db.conn();
    let subject = common::insert_user(&mut conn, "subject", false, false);
    let early = common::insert_user(&mut conn, "early", false, false);
    let tied = common::insert_user(&mut conn, "tied", false, false);
    let busy = common::insert_user(&mut conn, "busy", false, false);
    let set = common::insert_beatmapset(&mut conn, subject, None);
    let recent = common::timestamp("2025-06-01 00:00:00");
    let deleted_at = common::timestamp("2025-06-02 00:00:00");

    for _ in 0..3 {
        let discussion = common::insert_discussion(&mut conn, set, subject, "problem", None);
        common::insert_vote(&mut conn, discussion, busy, -1, recent);
    }
    let discussion = common::insert_discussion(&mut conn, set, subject, "problem", None);
    common::insert_vote(&mut conn, discussion, tied, -1, recent);
    common::insert_vote(&mut conn, discussion, early, -1, recent);
    // Votes on deleted discussions do not count.
    for _ in 0..5 {
        let removed =
            common::insert_discussion(&mut conn, set, subject, "problem", Some(deleted_at));
        common::insert_vote(&mut conn, removed, tied, 1, recent);
    }

    let repo = DieselRepository::new(test_db.pool());
    let since = common::timestamp("2025-03-01 00:00:00");

    let received = repo
        .list_vote_summaries(UserId::new(subject).unwrap(), VoteDirection::Received, since)
        .unwrap();
    let summary: Vec<(i32, i64, i64)> = received
        .iter()
        .map(|s| (s.user.id.get(), s.score, s.count))
        .collect();

    assert_eq!(summary, vec![(busy, -3, 3), (early, -1, 1), (tied, -1, 1)]);
}
