//! Session-gated admin surface: login, logout, and post mutations.

use axum::{
    Router,
    extract::{Form, Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::get,
};
use axum_extra::extract::cookie::{Cookie, SignedCookieJar};
use serde::Deserialize;

use crate::{
    application::admin::posts::{AdminPostError, CreatePostCommand, UpdatePostCommand},
    application::repos::RepoError,
    presentation::views::{
        EditorContext, EditorTemplate, LayoutChrome, LayoutContext, LoginContext, LoginTemplate,
        render_not_found_response, render_template_response,
    },
};

use super::{AppState, repo_error_to_http};

const SESSION_COOKIE: &str = "foglio_session";
const SESSION_MARKER: &str = "admin";
const LOGIN_ERROR: &str = "Invalid username or password.";

pub(super) fn build_router() -> Router<AppState> {
    Router::new()
        .route("/login", get(login_form).post(login_submit))
        .route("/logout", get(logout))
        .route("/create", get(create_form).post(create_submit))
        .route("/edit/{id}", get(edit_form).post(edit_submit))
        .route("/delete/{id}", get(delete_post))
}

/// True when the signed session cookie carries the admin marker. A forged or
/// tampered cookie fails signature verification and reads as absent.
pub(super) fn session_is_admin(jar: &SignedCookieJar) -> bool {
    jar.get(SESSION_COOKIE)
        .map(|cookie| cookie.value() == SESSION_MARKER)
        .unwrap_or(false)
}

/// Unauthenticated requests to mutation routes are bounced to the login
/// form. This is navigation, not an error status.
fn redirect_to_login() -> Response {
    Redirect::to("/login").into_response()
}

#[derive(Debug, Deserialize)]
struct LoginForm {
    username: String,
    password: String,
}

#[derive(Debug, Deserialize)]
struct PostForm {
    title: String,
    body: String,
}

async fn login_form(jar: SignedCookieJar) -> Response {
    render_login(session_is_admin(&jar), None)
}

async fn login_submit(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Form(form): Form<LoginForm>,
) -> Response {
    if state.auth.verify(&form.username, &form.password) {
        let cookie = Cookie::build((SESSION_COOKIE, SESSION_MARKER))
            .path("/")
            .http_only(true);
        return (jar.add(cookie), Redirect::to("/")).into_response();
    }

    render_login(false, Some(LOGIN_ERROR.to_string()))
}

async fn logout(jar: SignedCookieJar) -> Response {
    let mut cookie = Cookie::from(SESSION_COOKIE);
    cookie.set_path("/");
    (jar.remove(cookie), Redirect::to("/")).into_response()
}

async fn create_form(jar: SignedCookieJar) -> Response {
    if !session_is_admin(&jar) {
        return redirect_to_login();
    }

    render_editor(EditorContext::create(), StatusCode::OK)
}

async fn create_submit(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Form(form): Form<PostForm>,
) -> Response {
    if !session_is_admin(&jar) {
        return redirect_to_login();
    }

    match state
        .posts
        .create_post(CreatePostCommand {
            title: form.title.clone(),
            body: form.body.clone(),
        })
        .await
    {
        Ok(_) => Redirect::to("/").into_response(),
        Err(AdminPostError::Validation(message)) => {
            let mut editor = EditorContext::create().with_error(message);
            editor.title = form.title;
            editor.body = form.body;
            render_editor(editor, StatusCode::BAD_REQUEST)
        }
        Err(AdminPostError::Repo(err)) => {
            repo_error_to_http("infra::http::admin::create_submit", err).into_response()
        }
    }
}

async fn edit_form(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Path(id): Path<i64>,
) -> Response {
    if !session_is_admin(&jar) {
        return redirect_to_login();
    }

    match state.posts.find_post(id).await {
        Ok(Some(post)) => render_editor(
            EditorContext::edit(post.id, post.title, post.body),
            StatusCode::OK,
        ),
        Ok(None) => render_not_found_response(LayoutChrome::new(true)),
        Err(err) => repo_error_to_http("infra::http::admin::edit_form", err).into_response(),
    }
}

async fn edit_submit(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Path(id): Path<i64>,
    Form(form): Form<PostForm>,
) -> Response {
    if !session_is_admin(&jar) {
        return redirect_to_login();
    }

    match state
        .posts
        .update_post(UpdatePostCommand {
            id,
            title: form.title.clone(),
            body: form.body.clone(),
        })
        .await
    {
        Ok(_) => Redirect::to("/").into_response(),
        Err(AdminPostError::Validation(message)) => {
            let editor = EditorContext::edit(id, form.title, form.body).with_error(message);
            render_editor(editor, StatusCode::BAD_REQUEST)
        }
        Err(AdminPostError::Repo(RepoError::NotFound)) => {
            render_not_found_response(LayoutChrome::new(true))
        }
        Err(AdminPostError::Repo(err)) => {
            repo_error_to_http("infra::http::admin::edit_submit", err).into_response()
        }
    }
}

async fn delete_post(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Path(id): Path<i64>,
) -> Response {
    if !session_is_admin(&jar) {
        return redirect_to_login();
    }

    match state.posts.delete_post(id).await {
        Ok(()) => Redirect::to("/").into_response(),
        Err(RepoError::NotFound) => render_not_found_response(LayoutChrome::new(true)),
        Err(err) => repo_error_to_http("infra::http::admin::delete_post", err).into_response(),
    }
}

fn render_login(signed_in: bool, error: Option<String>) -> Response {
    let view = LayoutContext::new(LayoutChrome::new(signed_in), LoginContext { error });
    render_template_response(LoginTemplate { view }, StatusCode::OK)
}

fn render_editor(content: EditorContext, status: StatusCode) -> Response {
    let view = LayoutContext::new(LayoutChrome::new(true), content);
    render_template_response(EditorTemplate { view }, status)
}
