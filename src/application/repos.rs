//! Repository traits describing the post store.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::PostRecord;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("resource not found")]
    NotFound,
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

/// Listing order: `Newest` is `id` descending, `Oldest` ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostOrder {
    Newest,
    Oldest,
}

#[derive(Debug, Clone, Default)]
pub struct PostQueryFilter {
    /// Substring matched against `title` OR `body`. `None` (or blank, which
    /// callers normalize to `None`) lists every post.
    pub search: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CreatePostParams {
    pub title: String,
    pub body: String,
    pub date: String,
}

#[derive(Debug, Clone)]
pub struct UpdatePostParams {
    pub id: i64,
    pub title: String,
    pub body: String,
}

#[async_trait]
pub trait PostsRepo: Send + Sync {
    async fn list_posts(
        &self,
        filter: &PostQueryFilter,
        order: PostOrder,
    ) -> Result<Vec<PostRecord>, RepoError>;

    async fn find_post(&self, id: i64) -> Result<Option<PostRecord>, RepoError>;
}

#[async_trait]
pub trait PostsWriteRepo: Send + Sync {
    async fn create_post(&self, params: CreatePostParams) -> Result<PostRecord, RepoError>;

    /// Overwrites `title` and `body`; `id` and `date` stay untouched.
    async fn update_post(&self, params: UpdatePostParams) -> Result<PostRecord, RepoError>;

    async fn delete_post(&self, id: i64) -> Result<(), RepoError>;
}
