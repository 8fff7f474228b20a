use actix_web::{HttpRequest, HttpResponse, Responder, get, web};

use crate::domain::search::{RecordKind, SearchParams};
use crate::forms::modding_history::HistoryQueryForm;
use crate::models::auth::AuthenticatedUser;
use crate::repository::DieselRepository;
use crate::routes::error_response;
use crate::services::ServiceError;
use crate::services::modding_history::{self as history_service, Viewer};

#[get("/v1/users/{user}/modding/{kind}")]
pub async fn api_v1_modding_history(
    req: HttpRequest,
    path: web::Path<(String, String)>,
    user: Option<AuthenticatedUser>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let (lookup, kind) = path.into_inner();
    let Ok(kind) = kind.parse::<RecordKind>() else {
        return HttpResponse::NotFound().finish();
    };

    let viewer = Viewer::from(user.as_ref());
    let params = SearchParams::from(HistoryQueryForm::parse(req.query_string()));

    let page = history_service::resolve_subject(repo.get_ref(), &viewer, &lookup).and_then(
        |context| {
            history_service::load_listing(repo.get_ref(), &context, kind, params, req.path())
                .map(|data| data.records)
        },
    );

    match page {
        Ok(page) => HttpResponse::Ok().json(page),
        Err(ServiceError::NotFound) => HttpResponse::NotFound().finish(),
        Err(err) => {
            log::error!("Failed to list {kind} of {lookup:?}: {err}");
            error_response(&err)
        }
    }
}
