use crate::application::error::{ErrorReport, HttpError};
use askama::{Error as AskamaError, Template};
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("{public_message}")]
pub struct TemplateRenderError {
    pub(crate) source: &'static str,
    pub(crate) public_message: &'static str,
    #[source]
    pub(crate) error: AskamaError,
}

impl TemplateRenderError {
    pub fn new(source: &'static str, public_message: &'static str, error: AskamaError) -> Self {
        Self {
            source,
            public_message,
            error,
        }
    }
}

impl From<TemplateRenderError> for HttpError {
    fn from(err: TemplateRenderError) -> Self {
        let TemplateRenderError {
            source,
            public_message,
            error,
        } = err;

        HttpError::from_error(
            source,
            StatusCode::INTERNAL_SERVER_ERROR,
            public_message,
            &error,
        )
    }
}

pub fn render_template<T: Template>(template: T) -> Result<Html<String>, HttpError> {
    template.render().map(Html).map_err(|err| {
        TemplateRenderError::new(
            "presentation::views::render_template",
            "Template rendering failed",
            err,
        )
        .into()
    })
}

pub fn render_template_response<T: Template>(template: T, status: StatusCode) -> Response {
    match render_template(template) {
        Ok(html) => (status, html).into_response(),
        Err(err) => err.into_response(),
    }
}

pub fn render_not_found_response(chrome: LayoutChrome) -> Response {
    let content = ErrorPageView::not_found();
    let view = LayoutContext::new(chrome, content);
    let mut response = render_template_response(ErrorTemplate { view }, StatusCode::NOT_FOUND);
    ErrorReport::from_message(
        "presentation::views::render_not_found_response",
        StatusCode::NOT_FOUND,
        "Resource not found",
    )
    .attach(&mut response);
    response
}

/// Shared page furniture: site title plus whether the admin session is live,
/// which decides the navigation links.
#[derive(Clone)]
pub struct LayoutChrome {
    pub site_title: String,
    pub signed_in: bool,
}

impl LayoutChrome {
    pub fn new(signed_in: bool) -> Self {
        Self {
            site_title: "Foglio".to_string(),
            signed_in,
        }
    }
}

#[derive(Clone)]
pub struct LayoutContext<T> {
    pub site_title: String,
    pub signed_in: bool,
    pub content: T,
}

impl<T> LayoutContext<T> {
    pub fn new(chrome: LayoutChrome, content: T) -> Self {
        Self {
            site_title: chrome.site_title,
            signed_in: chrome.signed_in,
            content,
        }
    }
}

#[derive(Clone)]
pub struct PostCard {
    pub id: i64,
    pub title: String,
    pub excerpt: String,
    pub date: String,
}

pub struct IndexContext {
    pub posts: Vec<PostCard>,
    pub post_count: usize,
    pub has_results: bool,
    pub search: String,
    pub sort_oldest: bool,
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub view: LayoutContext<IndexContext>,
}

pub struct PostDetailContext {
    pub id: i64,
    pub title: String,
    pub body: String,
    pub date: String,
}

#[derive(Template)]
#[template(path = "post.html")]
pub struct PostTemplate {
    pub view: LayoutContext<PostDetailContext>,
}

pub struct LoginContext {
    pub error: Option<String>,
}

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub view: LayoutContext<LoginContext>,
}

/// Shared by the create and edit forms; `action` is the POST target.
pub struct EditorContext {
    pub heading: String,
    pub action: String,
    pub title: String,
    pub body: String,
    pub error: Option<String>,
}

impl EditorContext {
    pub fn create() -> Self {
        Self {
            heading: "New post".to_string(),
            action: "/create".to_string(),
            title: String::new(),
            body: String::new(),
            error: None,
        }
    }

    pub fn edit(id: i64, title: String, body: String) -> Self {
        Self {
            heading: "Edit post".to_string(),
            action: format!("/edit/{id}"),
            title,
            body,
            error: None,
        }
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }
}

#[derive(Template)]
#[template(path = "editor.html")]
pub struct EditorTemplate {
    pub view: LayoutContext<EditorContext>,
}

pub struct ErrorPageView {
    pub title: String,
    pub message: String,
}

impl ErrorPageView {
    pub fn not_found() -> Self {
        Self {
            title: "Post Not Found".to_string(),
            message: "The post you requested does not exist. Try returning to the homepage."
                .to_string(),
        }
    }
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub view: LayoutContext<ErrorPageView>,
}
