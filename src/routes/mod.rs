use actix_web::HttpResponse;
use tera::{Context, Tera};

use crate::models::auth::AuthenticatedUser;
use crate::services::ServiceError;

pub mod api;
pub mod modding_history;

/// Renders a Tera template into an HTML response, logging render failures.
pub fn render_template(tera: &Tera, template: &str, context: &Context) -> HttpResponse {
    match tera.render(template, context) {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(body),
        Err(err) => {
            log::error!("Failed to render template '{template}': {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// Context shared by every page layout.
pub fn base_context(
    current_user: Option<&AuthenticatedUser>,
    current_page: &str,
    home_url: &str,
) -> Context {
    let mut context = Context::new();
    context.insert("current_user", &current_user);
    context.insert("current_page", current_page);
    context.insert("home_url", home_url);
    context
}

/// Maps a service failure onto the response the client gets.
pub fn error_response(err: &ServiceError) -> HttpResponse {
    match err {
        ServiceError::NotFound => HttpResponse::NotFound().finish(),
        ServiceError::TypeConstraint(_) | ServiceError::Repository(_) => {
            HttpResponse::InternalServerError().finish()
        }
    }
}
