//! User lookups for resolving the subject of a modding history page.

use diesel::prelude::*;

use crate::domain::types::{UserId, Username};
use crate::domain::user::User;
use crate::models::user::User as DbUser;
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, UserReader};

impl UserReader for DieselRepository {
    fn get_user_by_id(
        &self,
        id: UserId,
        include_restricted: bool,
    ) -> RepositoryResult<Option<User>> {
        use crate::schema::users;

        let mut conn = self.conn()?;
        let mut query = users::table
            .filter(users::id.eq(id.get()))
            .into_boxed::<diesel::sqlite::Sqlite>();
        if !include_restricted {
            query = query.filter(users::is_restricted.eq(false));
        }

        let db_user = query.first::<DbUser>(&mut conn).optional()?;

        db_user
            .map(|user| User::try_from(user).map_err(RepositoryError::from))
            .transpose()
    }

    fn get_user_by_username(
        &self,
        username: &Username,
        include_restricted: bool,
    ) -> RepositoryResult<Option<User>> {
        use crate::schema::users;

        let mut conn = self.conn()?;
        // SQLite LIKE is case-insensitive for ASCII, wildcards are escaped.
        let pattern = username
            .as_str()
            .replace('\\', "\\\\")
            .replace('%', "\\%")
            .replace('_', "\\_");

        let mut query = users::table
            .filter(users::username.like(pattern).escape('\\'))
            .order(users::id.asc())
            .into_boxed::<diesel::sqlite::Sqlite>();
        if !include_restricted {
            query = query.filter(users::is_restricted.eq(false));
        }

        let db_user = query.first::<DbUser>(&mut conn).optional()?;

        db_user
            .map(|user| User::try_from(user).map_err(RepositoryError::from))
            .transpose()
    }
}
