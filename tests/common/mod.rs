#![allow(dead_code)]

use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use osu_modding_history::db::{DbConnection, DbPool, establish_connection_pool};
use osu_modding_history::models::beatmapset::NewBeatmapset;
use osu_modding_history::models::discussion::NewDiscussion;
use osu_modding_history::models::event::NewBeatmapsetEvent;
use osu_modding_history::models::post::NewPost;
use osu_modding_history::models::user::NewUser;
use osu_modding_history::models::vote::NewVote;
use osu_modding_history::schema::{
    beatmap_discussion_posts, beatmap_discussion_votes, beatmap_discussions, beatmapset_events,
    beatmapsets, users,
};
use tempfile::TempDir;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// SQLite database in a temporary directory, migrated and removed on drop.
pub struct TestDb {
    _dir: TempDir,
    pool: DbPool,
}

impl TestDb {
    pub fn new(name: &str) -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join(name);
        let pool = establish_connection_pool(path.to_str().expect("utf-8 path"))
            .expect("create pool");

        pool.get()
            .expect("get connection")
            .run_pending_migrations(MIGRATIONS)
            .expect("run migrations");

        Self { _dir: dir, pool }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }

    pub fn conn(&self) -> DbConnection {
        self.pool.get().expect("get connection")
    }
}

pub fn timestamp(value: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S").expect("valid timestamp")
}

pub fn insert_user(conn: &mut DbConnection, username: &str, is_bot: bool, is_restricted: bool) -> i32 {
    diesel::insert_into(users::table)
        .values(&NewUser {
            username,
            is_bot,
            is_restricted,
        })
        .returning(users::id)
        .get_result(conn)
        .expect("insert user")
}

pub fn insert_beatmapset(conn: &mut DbConnection, user_id: i32, deleted_at: Option<NaiveDateTime>) -> i32 {
    diesel::insert_into(beatmapsets::table)
        .values(&NewBeatmapset {
            user_id,
            artist: "Artist",
            title: "Title",
            deleted_at,
        })
        .returning(beatmapsets::id)
        .get_result(conn)
        .expect("insert beatmapset")
}

pub fn insert_discussion(
    conn: &mut DbConnection,
    beatmapset_id: i32,
    user_id: i32,
    message_type: &str,
    deleted_at: Option<NaiveDateTime>,
) -> i32 {
    diesel::insert_into(beatmap_discussions::table)
        .values(&NewDiscussion {
            beatmapset_id,
            user_id,
            message_type,
            resolved: false,
            deleted_at,
        })
        .returning(beatmap_discussions::id)
        .get_result(conn)
        .expect("insert discussion")
}

pub fn insert_post(
    conn: &mut DbConnection,
    discussion_id: i32,
    user_id: i32,
    message: &str,
    system: bool,
    deleted_at: Option<NaiveDateTime>,
) -> i32 {
    diesel::insert_into(beatmap_discussion_posts::table)
        .values(&NewPost {
            beatmap_discussion_id: discussion_id,
            user_id,
            message,
            system,
            deleted_at,
        })
        .returning(beatmap_discussion_posts::id)
        .get_result(conn)
        .expect("insert post")
}

pub fn insert_vote(
    conn: &mut DbConnection,
    discussion_id: i32,
    user_id: i32,
    score: i32,
    created_at: NaiveDateTime,
) -> i32 {
    diesel::insert_into(beatmap_discussion_votes::table)
        .values(&NewVote {
            beatmap_discussion_id: discussion_id,
            user_id,
            score,
            created_at,
            updated_at: created_at,
        })
        .returning(beatmap_discussion_votes::id)
        .get_result(conn)
        .expect("insert vote")
}

pub fn insert_event(
    conn: &mut DbConnection,
    beatmapset_id: i32,
    user_id: Option<i32>,
    event_type: &str,
) -> i32 {
    diesel::insert_into(beatmapset_events::table)
        .values(&NewBeatmapsetEvent {
            beatmapset_id,
            user_id,
            event_type,
            comment: None,
        })
        .returning(beatmapset_events::id)
        .get_result(conn)
        .expect("insert event")
}
