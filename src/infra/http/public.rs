use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
};
use axum_extra::extract::cookie::SignedCookieJar;
use serde::{Deserialize, Serialize};

use crate::{
    application::repos::PostOrder,
    domain::entities::PostRecord,
    presentation::views::{
        IndexTemplate, LayoutChrome, LayoutContext, PostTemplate, render_not_found_response,
        render_template_response,
    },
};

use super::{
    AppState, admin, db_health_response,
    middleware::{log_responses, set_request_context},
    repo_error_to_http,
};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/post/{id}", get(post_detail))
        .route("/api/posts", get(api_posts))
        .route("/_health/db", get(db_health))
        .merge(admin::build_router())
        .with_state(state)
        .layer(middleware::from_fn(log_responses))
        .layer(middleware::from_fn(set_request_context))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct IndexQuery {
    q: Option<String>,
    sort: Option<String>,
}

fn parse_order(sort: Option<&str>) -> PostOrder {
    match sort {
        Some("oldest") => PostOrder::Oldest,
        _ => PostOrder::Newest,
    }
}

async fn index(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Query(query): Query<IndexQuery>,
) -> Response {
    let chrome = LayoutChrome::new(admin::session_is_admin(&jar));
    let order = parse_order(query.sort.as_deref());

    match state.feed.index_context(query.q.as_deref(), order).await {
        Ok(content) => {
            let view = LayoutContext::new(chrome, content);
            render_template_response(IndexTemplate { view }, StatusCode::OK)
        }
        Err(err) => repo_error_to_http("infra::http::public::index", err).into_response(),
    }
}

async fn post_detail(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Path(id): Path<i64>,
) -> Response {
    let chrome = LayoutChrome::new(admin::session_is_admin(&jar));

    match state.feed.post_detail(id).await {
        Ok(Some(content)) => {
            let view = LayoutContext::new(chrome, content);
            render_template_response(PostTemplate { view }, StatusCode::OK)
        }
        Ok(None) => render_not_found_response(chrome),
        Err(err) => repo_error_to_http("infra::http::public::post_detail", err).into_response(),
    }
}

#[derive(Debug, Serialize)]
struct ApiPost {
    id: i64,
    title: String,
    body: String,
    date: String,
}

impl From<PostRecord> for ApiPost {
    fn from(record: PostRecord) -> Self {
        Self {
            id: record.id,
            title: record.title,
            body: record.body,
            date: record.date,
        }
    }
}

async fn api_posts(State(state): State<AppState>) -> Response {
    match state.feed.api_feed().await {
        Ok(records) => {
            let posts: Vec<ApiPost> = records.into_iter().map(ApiPost::from).collect();
            Json(posts).into_response()
        }
        Err(err) => repo_error_to_http("infra::http::public::api_posts", err).into_response(),
    }
}

async fn db_health(State(state): State<AppState>) -> Response {
    db_health_response(state.db.health_check().await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_defaults_to_newest() {
        assert_eq!(parse_order(None), PostOrder::Newest);
        assert_eq!(parse_order(Some("newest")), PostOrder::Newest);
        assert_eq!(parse_order(Some("bogus")), PostOrder::Newest);
        assert_eq!(parse_order(Some("oldest")), PostOrder::Oldest);
    }
}
