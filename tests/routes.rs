use actix_identity::IdentityMiddleware;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use actix_web::{App, http::StatusCode, test, web};
use osu_modding_history::configure;
use osu_modding_history::models::config::ServerConfig;
use osu_modding_history::repository::DieselRepository;
use serde_json::Value;
use tera::Tera;

mod common;

const SECRET: &str = "a-test-secret-that-is-long-enough-for-the-cookie-key-of-the-session-store";

fn server_config() -> ServerConfig {
    ServerConfig {
        domain: "localhost".to_string(),
        address: "127.0.0.1".to_string(),
        port: 8080,
        database_url: String::new(),
        templates_dir: "templates/**/*".to_string(),
        secret: SECRET.to_string(),
        auth_service_url: "http://localhost".to_string(),
    }
}

/// Builds the application with the same middleware stack as `run`.
macro_rules! test_app {
    ($test_db:expr) => {{
        let config = server_config();
        let tera = Tera::new(&config.templates_dir).expect("templates parse");
        test::init_service(
            App::new()
                .wrap(IdentityMiddleware::default())
                .wrap(
                    SessionMiddleware::builder(
                        CookieSessionStore::default(),
                        Key::from(config.secret.as_bytes()),
                    )
                    .cookie_secure(false)
                    .build(),
                )
                .configure(configure)
                .app_data(web::Data::new(tera))
                .app_data(web::Data::new(DieselRepository::new($test_db.pool())))
                .app_data(web::Data::new(config)),
        )
        .await
    }};
}

/// Fetches an HTML page that must render successfully.
macro_rules! get_html {
    ($app:expr, $uri:expr) => {{
        let req = test::TestRequest::get().uri($uri).to_request();
        let resp = test::call_service(&$app, req).await;
        assert_eq!(resp.status(), StatusCode::OK, "{}", $uri);
        let body = test::read_body(resp).await;
        String::from_utf8(body.to_vec()).expect("utf-8 body")
    }};
}

#[actix_web::test]
async fn test_api_lists_discussions_of_a_user() {
    let test_db = common::TestDb::new("test_api_lists_discussions.db");
    let mut conn = test_db.conn();
    let subject = common::insert_user(&mut conn, "subject", false, false);
    let set = common::insert_beatmapset(&mut conn, subject, None);
    for _ in 0..7 {
        common::insert_discussion(&mut conn, set, subject, "hype", None);
    }

    let app = test_app!(test_db);

    let req = test::TestRequest::get()
        .uri("/api/v1/users/subject/modding/discussions?limit=5&page=2&with_deleted=1")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["total"], 7);
    assert_eq!(body["per_page"], 5);
    assert_eq!(body["page"], 2);
    assert_eq!(body["items"].as_array().map(Vec::len), Some(2));
    assert_eq!(body["items"][0]["kind"], "discussion");
    // Guests never get deleted records, so the flag is not echoed back.
    assert_eq!(body["query"], "limit=5&sort=id-desc");
}

#[actix_web::test]
async fn test_api_hides_bots_and_unknown_listings() {
    let test_db = common::TestDb::new("test_api_hides_bots.db");
    let mut conn = test_db.conn();
    let bot = common::insert_user(&mut conn, "BanchoBot", true, false);
    common::insert_user(&mut conn, "subject", false, false);

    let app = test_app!(test_db);

    for uri in [
        format!("/api/v1/users/{bot}/modding/posts"),
        "/api/v1/users/nobody/modding/posts".to_string(),
        "/api/v1/users/subject/modding/kudosu".to_string(),
        format!("/users/{bot}/modding"),
        "/users/nobody/modding/discussions".to_string(),
    ] {
        let req = test::TestRequest::get().uri(&uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{uri}");
    }
}

#[actix_web::test]
async fn test_listing_page_renders_records_and_pager() {
    let test_db = common::TestDb::new("test_listing_page_renders.db");
    let mut conn = test_db.conn();
    let subject = common::insert_user(&mut conn, "subject", false, false);
    let set = common::insert_beatmapset(&mut conn, subject, None);
    for _ in 0..25 {
        common::insert_discussion(&mut conn, set, subject, "suggestion", None);
    }

    let app = test_app!(test_db);

    let body = get_html!(app, "/users/subject/modding/discussions?limit=10&page=2");

    assert_eq!(body.matches("record record--discussion").count(), 10);
    assert!(body.contains("25 records"));
    assert!(body.contains(r#"<nav class="pagination">"#));
    assert!(body.contains(r#"<span class="pagination__current">2</span>"#));
}

#[actix_web::test]
async fn test_summary_page_honors_requested_page() {
    let test_db = common::TestDb::new("test_summary_page_honors_page.db");
    let mut conn = test_db.conn();
    let subject = common::insert_user(&mut conn, "subject", false, false);
    let set = common::insert_beatmapset(&mut conn, subject, None);
    for _ in 0..15 {
        common::insert_discussion(&mut conn, set, subject, "problem", None);
    }

    let app = test_app!(test_db);

    let first = get_html!(app, "/users/subject/modding");
    let second = get_html!(app, "/users/subject/modding?page=2&limit=50");

    assert_eq!(first.matches("record record--discussion").count(), 10);
    // The summary window stays at 10 even when a larger limit is asked for.
    assert_eq!(second.matches("record record--discussion").count(), 5);
}
