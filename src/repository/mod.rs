use std::collections::BTreeSet;

use chrono::NaiveDateTime;

use crate::db::{DbConnection, DbPool, get_connection};
use crate::domain::record::ModdingRecord;
use crate::domain::search::{EffectiveParams, RecordKind, Relation};
use crate::domain::types::{UserId, Username};
use crate::domain::user::User;
use crate::domain::vote::{VoteDirection, VoteSummary};
use crate::repository::errors::RepositoryResult;

pub mod errors;
#[cfg(any(test, feature = "test-mocks"))]
pub mod mock;
pub mod record;
pub mod user;
pub mod vote;

/// Unmaterialized listing query: which kind, which filters, which relations.
///
/// Nothing touches the database until the descriptor is handed to a
/// [`RecordReader`], so the same query can be counted and then sliced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordQuery {
    kind: RecordKind,
    params: EffectiveParams,
    relations: BTreeSet<Relation>,
}

impl RecordQuery {
    pub fn new(kind: RecordKind, params: EffectiveParams) -> Self {
        Self {
            kind,
            params,
            relations: BTreeSet::new(),
        }
    }

    pub fn with_related<I>(mut self, relations: I) -> Self
    where
        I: IntoIterator<Item = Relation>,
    {
        self.relations.extend(relations);
        self
    }

    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    pub fn params(&self) -> &EffectiveParams {
        &self.params
    }

    pub fn includes(&self, relation: Relation) -> bool {
        self.relations.contains(&relation)
    }

    pub fn relations(&self) -> impl Iterator<Item = Relation> + '_ {
        self.relations.iter().copied()
    }
}

pub trait UserReader {
    /// Restricted users are only returned when `include_restricted` is set.
    fn get_user_by_id(&self, id: UserId, include_restricted: bool)
    -> RepositoryResult<Option<User>>;
    /// Case-insensitive lookup by username.
    fn get_user_by_username(
        &self,
        username: &Username,
        include_restricted: bool,
    ) -> RepositoryResult<Option<User>>;
}

pub trait RecordReader {
    /// Number of records matching the query filters, ignoring the page window.
    fn count_records(&self, query: &RecordQuery) -> RepositoryResult<usize>;
    /// Loads exactly the page window selected by the query, with relations.
    fn load_records(&self, query: &RecordQuery) -> RepositoryResult<Vec<ModdingRecord>>;
}

pub trait VoteSummaryReader {
    /// Aggregates votes exchanged with the user since the given instant.
    fn list_vote_summaries(
        &self,
        user_id: UserId,
        direction: VoteDirection,
        since: NaiveDateTime,
    ) -> RepositoryResult<Vec<VoteSummary>>;
}

/// Diesel-backed implementation of every repository trait.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool,
}

impl DieselRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(get_connection(&self.pool)?)
    }
}
