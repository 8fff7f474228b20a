use actix_web::{HttpRequest, HttpResponse, Responder, get, web};
use chrono::Utc;
use tera::Tera;

use crate::domain::search::{RecordKind, SearchParams};
use crate::forms::modding_history::HistoryQueryForm;
use crate::models::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{base_context, error_response, render_template};
use crate::services::ServiceError;
use crate::services::modding_history::{self as history_service, Viewer};

#[get("/users/{user}/modding")]
pub async fn show_summary(
    req: HttpRequest,
    lookup: web::Path<String>,
    user: Option<AuthenticatedUser>,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let viewer = Viewer::from(user.as_ref());
    let params = SearchParams::from(HistoryQueryForm::parse(req.query_string()));

    let data = history_service::resolve_subject(repo.get_ref(), &viewer, &lookup).and_then(
        |context| {
            history_service::load_summary(
                repo.get_ref(),
                &context,
                params,
                req.path(),
                Utc::now().naive_utc(),
            )
        },
    );

    match data {
        Ok(data) => {
            let mut context = base_context(
                user.as_ref(),
                "modding",
                &server_config.auth_service_url,
            );
            context.insert("summary", &data);
            render_template(&tera, "modding_history/summary.html", &context)
        }
        Err(err) => {
            log_failure(&lookup, &err);
            error_response(&err)
        }
    }
}

#[get("/users/{user}/modding/{kind}")]
pub async fn show_listing(
    req: HttpRequest,
    path: web::Path<(String, String)>,
    user: Option<AuthenticatedUser>,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let (lookup, kind) = path.into_inner();
    let Ok(kind) = kind.parse::<RecordKind>() else {
        return HttpResponse::NotFound().finish();
    };

    let viewer = Viewer::from(user.as_ref());
    let params = SearchParams::from(HistoryQueryForm::parse(req.query_string()));

    let data = history_service::resolve_subject(repo.get_ref(), &viewer, &lookup).and_then(
        |context| history_service::load_listing(repo.get_ref(), &context, kind, params, req.path()),
    );

    match data {
        Ok(data) => {
            let mut context = base_context(
                user.as_ref(),
                "modding",
                &server_config.auth_service_url,
            );
            context.insert("listing", &data);
            context.insert("kind_path", kind.as_str());
            render_template(&tera, "modding_history/listing.html", &context)
        }
        Err(err) => {
            log_failure(&lookup, &err);
            error_response(&err)
        }
    }
}

fn log_failure(lookup: &str, err: &ServiceError) {
    match err {
        ServiceError::NotFound => log::debug!("No visible modding history for {lookup:?}"),
        _ => log::error!("Failed to load modding history of {lookup:?}: {err}"),
    }
}
