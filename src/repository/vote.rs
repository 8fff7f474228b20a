//! Vote aggregates shown on the modding activity summary.

use std::collections::HashMap;

use chrono::NaiveDateTime;
use diesel::dsl::{count, sum};
use diesel::prelude::*;

use crate::domain::types::UserId;
use crate::domain::user::User;
use crate::domain::vote::{VoteDirection, VoteSummary};
use crate::models::user::User as DbUser;
use crate::repository::errors::RepositoryResult;
use crate::repository::{DieselRepository, VoteSummaryReader};

impl VoteSummaryReader for DieselRepository {
    fn list_vote_summaries(
        &self,
        user_id: UserId,
        direction: VoteDirection,
        since: NaiveDateTime,
    ) -> RepositoryResult<Vec<VoteSummary>> {
        use crate::schema::beatmap_discussion_votes as votes;
        use crate::schema::beatmap_discussions as discussions;
        use crate::schema::users;

        let mut conn = self.conn()?;

        // (other user, score sum, vote count), busiest counterpart first.
        let totals: Vec<(i32, Option<i64>, i64)> = match direction {
            VoteDirection::Given => votes::table
                .inner_join(discussions::table)
                .filter(votes::created_at.gt(since))
                .filter(discussions::deleted_at.is_null())
                .filter(votes::user_id.eq(user_id.get()))
                .group_by(discussions::user_id)
                .select((discussions::user_id, sum(votes::score), count(votes::id)))
                .order_by((count(votes::id).desc(), discussions::user_id.asc()))
                .load(&mut conn)?,
            VoteDirection::Received => votes::table
                .inner_join(discussions::table)
                .filter(votes::created_at.gt(since))
                .filter(discussions::deleted_at.is_null())
                .filter(discussions::user_id.eq(user_id.get()))
                .group_by(votes::user_id)
                .select((votes::user_id, sum(votes::score), count(votes::id)))
                .order_by((count(votes::id).desc(), votes::user_id.asc()))
                .load(&mut conn)?,
        };

        if totals.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i32> = totals.iter().map(|(id, _, _)| *id).collect();
        let mut db_users: HashMap<i32, DbUser> = users::table
            .filter(users::id.eq_any(ids))
            .load::<DbUser>(&mut conn)?
            .into_iter()
            .map(|db_user| (db_user.id, db_user))
            .collect();

        let summaries = totals
            .into_iter()
            .filter_map(|(id, score, count)| {
                db_users.remove(&id).map(|db_user| -> RepositoryResult<VoteSummary> {
                    Ok(VoteSummary {
                        user: User::try_from(db_user)?,
                        score: score.unwrap_or_default(),
                        count,
                    })
                })
            })
            .collect::<RepositoryResult<Vec<_>>>()?;

        Ok(summaries)
    }
}
