use serde::{Deserialize, Serialize};

use crate::domain::types::{TypeConstraintError, UserId, Username};

/// Account whose modding activity can be listed.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub username: Username,
    /// Automated accounts never have a public modding history.
    pub is_bot: bool,
    /// Restricted accounts are only visible to moderators and themselves.
    pub is_restricted: bool,
}

impl User {
    pub fn try_new(
        id: i32,
        username: String,
        is_bot: bool,
        is_restricted: bool,
    ) -> Result<Self, TypeConstraintError> {
        Ok(Self {
            id: UserId::new(id)?,
            username: Username::new(username)?,
            is_bot,
            is_restricted,
        })
    }
}
