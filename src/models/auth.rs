//! Viewer identity carried in the session cookie.
//!
//! The external auth service signs a JWT with the shared secret and stores it
//! as the `actix-identity` id. Guests simply have no identity.

use std::future::{Ready, ready};

use actix_identity::IdentityExt;
use actix_web::{FromRequest, HttpRequest, dev::Payload, error::ErrorUnauthorized, web};
use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

use crate::domain::types::UserId;
use crate::models::config::ServerConfig;
use crate::services::modding_history::Viewer;

/// Roles granting visibility of soft-deleted modding records.
pub const MODERATOR_ROLES: &[&str] = &["gmt", "nat", "admin"];

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub sub: String,
    pub name: String,
    pub roles: Vec<String>,
    pub exp: usize,
}

pub fn check_role(role: &str, roles: &[String]) -> bool {
    roles.iter().any(|r| r == role)
}

impl AuthenticatedUser {
    pub fn is_moderator(&self) -> bool {
        MODERATOR_ROLES
            .iter()
            .any(|role| check_role(role, &self.roles))
    }

    pub fn from_jwt(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        let key = DecodingKey::from_secret(secret.as_bytes());
        decode::<Self>(token, &key, &Validation::default()).map(|data| data.claims)
    }
}

impl From<Option<&AuthenticatedUser>> for Viewer {
    fn from(user: Option<&AuthenticatedUser>) -> Self {
        match user {
            Some(user) => Viewer {
                user_id: user.sub.parse::<UserId>().ok(),
                is_moderator: user.is_moderator(),
            },
            None => Viewer::guest(),
        }
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(extract_user(req))
    }
}

fn extract_user(req: &HttpRequest) -> Result<AuthenticatedUser, actix_web::Error> {
    let identity = req.get_identity().map_err(ErrorUnauthorized)?;
    let token = identity.id().map_err(ErrorUnauthorized)?;

    let server_config = req
        .app_data::<web::Data<ServerConfig>>()
        .ok_or_else(|| ErrorUnauthorized("server configuration is missing"))?;

    AuthenticatedUser::from_jwt(&token, &server_config.secret).map_err(|err| {
        log::warn!("Rejected session token: {err}");
        ErrorUnauthorized(err)
    })
}
