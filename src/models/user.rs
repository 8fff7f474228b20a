use diesel::prelude::*;

use crate::domain::{types::TypeConstraintError, user::User as DomainUser};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::users)]
/// Diesel model for [`crate::domain::user::User`].
pub struct User {
    pub id: i32,
    pub username: String,
    pub is_bot: bool,
    pub is_restricted: bool,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::users)]
pub struct NewUser<'a> {
    pub username: &'a str,
    pub is_bot: bool,
    pub is_restricted: bool,
}

impl TryFrom<User> for DomainUser {
    type Error = TypeConstraintError;

    fn try_from(user: User) -> Result<Self, Self::Error> {
        DomainUser::try_new(user.id, user.username, user.is_bot, user.is_restricted)
    }
}
