use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use axum_extra::extract::cookie::Key;
use http_body_util::BodyExt;
use sqlx::SqlitePool;
use tower::ServiceExt;

use foglio::application::admin::posts::AdminPostService;
use foglio::application::auth::AdminAuth;
use foglio::application::feed::FeedService;
use foglio::application::repos::{PostsRepo, PostsWriteRepo};
use foglio::infra::db::SqliteRepositories;
use foglio::infra::http::{AppState, build_router};

fn build_app(pool: SqlitePool) -> Router {
    let repos = Arc::new(SqliteRepositories::new(pool));
    let read: Arc<dyn PostsRepo> = repos.clone();
    let write: Arc<dyn PostsWriteRepo> = repos.clone();

    let state = AppState {
        feed: Arc::new(FeedService::new(read.clone())),
        posts: Arc::new(AdminPostService::new(read, write)),
        auth: Arc::new(AdminAuth::new("admin", "admin123")),
        db: repos,
        cookie_key: Key::generate(),
    };
    build_router(state)
}

async fn get(app: &Router, uri: &str) -> axum::response::Response {
    let request = Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request");
    app.clone().oneshot(request).await.expect("response")
}

async fn get_with_cookie(app: &Router, uri: &str, cookie: &str) -> axum::response::Response {
    let request = Request::builder()
        .uri(uri)
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .expect("request");
    app.clone().oneshot(request).await.expect("response")
}

async fn post_form(
    app: &Router,
    uri: &str,
    body: &str,
    cookie: Option<&str>,
) -> axum::response::Response {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    let request = builder.body(Body::from(body.to_string())).expect("request");
    app.clone().oneshot(request).await.expect("response")
}

/// Logs in with the default credentials and returns the session cookie pair.
async fn login(app: &Router) -> String {
    let response = post_form(app, "/login", "username=admin&password=admin123", None).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/");

    response
        .headers()
        .get(header::SET_COOKIE)
        .expect("session cookie")
        .to_str()
        .expect("ascii cookie")
        .split(';')
        .next()
        .expect("cookie pair")
        .to_string()
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    String::from_utf8(bytes.to_vec()).expect("utf8 body")
}

async fn api_posts(app: &Router) -> Vec<serde_json::Value> {
    let response = get(app, "/api/posts").await;
    assert_eq!(response.status(), StatusCode::OK);
    let text = body_text(response).await;
    serde_json::from_str(&text).expect("json array")
}

#[sqlx::test]
async fn db_health_reports_no_content(pool: SqlitePool) {
    let app = build_app(pool);
    let response = get(&app, "/_health/db").await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[sqlx::test]
async fn index_renders_empty_state_for_visitors(pool: SqlitePool) {
    let app = build_app(pool);
    let response = get(&app, "/").await;
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(response).await;
    assert!(html.contains("No posts found."));
    assert!(html.contains("Log in"));
    assert!(!html.contains("New post"));
}

#[sqlx::test]
async fn anonymous_mutations_redirect_to_login(pool: SqlitePool) {
    let app = build_app(pool);

    for uri in ["/create", "/edit/1", "/delete/1"] {
        let response = get(&app, uri).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "GET {uri}");
        assert_eq!(response.headers()[header::LOCATION], "/login");
    }

    let response = post_form(&app, "/create", "title=sneaky&body=nope", None).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/login");

    // Nothing was written along the way.
    assert!(api_posts(&app).await.is_empty());
}

#[sqlx::test]
async fn forged_session_cookie_is_ignored(pool: SqlitePool) {
    let app = build_app(pool);
    let response = get_with_cookie(&app, "/create", "foglio_session=admin").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/login");
}

#[sqlx::test]
async fn wrong_credentials_rerender_the_login_form(pool: SqlitePool) {
    let app = build_app(pool);
    let response = post_form(&app, "/login", "username=admin&password=wrong", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get(header::SET_COOKIE).is_none());

    let html = body_text(response).await;
    assert!(html.contains("Invalid username or password."));
}

#[sqlx::test]
async fn login_opens_and_logout_closes_the_admin_surface(pool: SqlitePool) {
    let app = build_app(pool);
    let cookie = login(&app).await;

    let response = get_with_cookie(&app, "/create", &cookie).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get_with_cookie(&app, "/logout", &cookie).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/");

    // The removal cookie replaces the session; without it the gate is shut.
    let response = get(&app, "/create").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/login");
}

#[sqlx::test]
async fn create_edit_delete_round_trip(pool: SqlitePool) {
    let app = build_app(pool);
    let cookie = login(&app).await;

    let response = post_form(
        &app,
        "/create",
        "title=Hello&body=First+draft",
        Some(&cookie),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/");

    let posts = api_posts(&app).await;
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0]["title"], "Hello");
    let id = posts[0]["id"].as_i64().expect("post id");

    let response = get(&app, &format!("/post/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("First draft"));

    let response = post_form(
        &app,
        &format!("/edit/{id}"),
        "title=Hello+again&body=Second+draft",
        Some(&cookie),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let posts = api_posts(&app).await;
    assert_eq!(posts[0]["title"], "Hello again");
    assert_eq!(posts[0]["body"], "Second draft");
    assert_eq!(posts[0]["id"].as_i64(), Some(id));

    let response = get_with_cookie(&app, &format!("/delete/{id}"), &cookie).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    assert!(api_posts(&app).await.is_empty());
    let response = get(&app, &format!("/post/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test]
async fn blank_title_rerenders_the_editor_with_the_input(pool: SqlitePool) {
    let app = build_app(pool);
    let cookie = login(&app).await;

    let response = post_form(&app, "/create", "title=&body=kept+text", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let html = body_text(response).await;
    assert!(html.contains("title must not be empty"));
    assert!(html.contains("kept text"));

    assert!(api_posts(&app).await.is_empty());
}

#[sqlx::test]
async fn editing_a_missing_post_is_not_found(pool: SqlitePool) {
    let app = build_app(pool);
    let cookie = login(&app).await;

    let response = get_with_cookie(&app, "/edit/999", &cookie).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = post_form(&app, "/edit/999", "title=t&body=b", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = get_with_cookie(&app, "/delete/999", &cookie).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test]
async fn api_feed_lists_newest_first(pool: SqlitePool) {
    let app = build_app(pool);
    let cookie = login(&app).await;

    post_form(&app, "/create", "title=first&body=a", Some(&cookie)).await;
    post_form(&app, "/create", "title=second&body=b", Some(&cookie)).await;

    let posts = api_posts(&app).await;
    let titles: Vec<&str> = posts
        .iter()
        .map(|post| post["title"].as_str().expect("title"))
        .collect();
    assert_eq!(titles, vec!["second", "first"]);

    for post in &posts {
        assert!(post["date"].as_str().is_some());
        assert!(post["body"].as_str().is_some());
    }
}

#[sqlx::test]
async fn search_and_sort_drive_the_listing(pool: SqlitePool) {
    let app = build_app(pool);
    let cookie = login(&app).await;

    post_form(&app, "/create", "title=rust+diary&body=notes", Some(&cookie)).await;
    post_form(&app, "/create", "title=garden&body=tomatoes", Some(&cookie)).await;

    let response = get(&app, "/?q=rust").await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("rust diary"));
    assert!(!html.contains("garden"));

    let response = get(&app, "/?sort=oldest").await;
    let html = body_text(response).await;
    let first = html.find("rust diary").expect("oldest post shown");
    let second = html.find("garden").expect("newest post shown");
    assert!(first < second);
}
