//! Mock repository implementations for isolating services in tests.

use chrono::NaiveDateTime;
use mockall::mock;

use crate::domain::record::ModdingRecord;
use crate::domain::types::{UserId, Username};
use crate::domain::user::User;
use crate::domain::vote::{VoteDirection, VoteSummary};
use crate::repository::errors::RepositoryResult;
use crate::repository::{RecordQuery, RecordReader, UserReader, VoteSummaryReader};

mock! {
    pub Repository {}

    impl UserReader for Repository {
        fn get_user_by_id(
            &self,
            id: UserId,
            include_restricted: bool,
        ) -> RepositoryResult<Option<User>>;
        fn get_user_by_username(
            &self,
            username: &Username,
            include_restricted: bool,
        ) -> RepositoryResult<Option<User>>;
    }

    impl RecordReader for Repository {
        fn count_records(&self, query: &RecordQuery) -> RepositoryResult<usize>;
        fn load_records(&self, query: &RecordQuery) -> RepositoryResult<Vec<ModdingRecord>>;
    }

    impl VoteSummaryReader for Repository {
        fn list_vote_summaries(
            &self,
            user_id: UserId,
            direction: VoteDirection,
            since: NaiveDateTime,
        ) -> RepositoryResult<Vec<VoteSummary>>;
    }
}
