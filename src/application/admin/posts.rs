//! Write side of the blog: validated create, update, and delete.

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::application::repos::{
    CreatePostParams, PostsRepo, PostsWriteRepo, RepoError, UpdatePostParams,
};
use crate::domain::entities::PostRecord;
use crate::domain::posts::{self, MAX_TITLE_LEN};

#[derive(Debug, Clone)]
pub struct CreatePostCommand {
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone)]
pub struct UpdatePostCommand {
    pub id: i64,
    pub title: String,
    pub body: String,
}

#[derive(Debug, Error)]
pub enum AdminPostError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

#[derive(Clone)]
pub struct AdminPostService {
    posts: Arc<dyn PostsRepo>,
    posts_write: Arc<dyn PostsWriteRepo>,
}

impl AdminPostService {
    pub fn new(posts: Arc<dyn PostsRepo>, posts_write: Arc<dyn PostsWriteRepo>) -> Self {
        Self { posts, posts_write }
    }

    /// Allocates the next id and stamps `date` with the current UTC day.
    pub async fn create_post(
        &self,
        command: CreatePostCommand,
    ) -> Result<PostRecord, AdminPostError> {
        validate_fields(&command.title, &command.body)?;

        let record = self
            .posts_write
            .create_post(CreatePostParams {
                title: command.title,
                body: command.body,
                date: posts::today_stamp(),
            })
            .await?;

        info!(
            target = "foglio::admin::posts",
            id = record.id,
            title = %record.title,
            "post created"
        );
        Ok(record)
    }

    pub async fn update_post(
        &self,
        command: UpdatePostCommand,
    ) -> Result<PostRecord, AdminPostError> {
        validate_fields(&command.title, &command.body)?;

        let record = self
            .posts_write
            .update_post(UpdatePostParams {
                id: command.id,
                title: command.title,
                body: command.body,
            })
            .await?;

        info!(target = "foglio::admin::posts", id = record.id, "post updated");
        Ok(record)
    }

    pub async fn delete_post(&self, id: i64) -> Result<(), RepoError> {
        self.posts_write.delete_post(id).await?;
        info!(target = "foglio::admin::posts", id, "post deleted");
        Ok(())
    }

    /// Loads a post for the edit form.
    pub async fn find_post(&self, id: i64) -> Result<Option<PostRecord>, RepoError> {
        self.posts.find_post(id).await
    }
}

fn validate_fields(title: &str, body: &str) -> Result<(), AdminPostError> {
    if title.trim().is_empty() {
        return Err(AdminPostError::Validation(
            "title must not be empty".to_string(),
        ));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(AdminPostError::Validation(format!(
            "title exceeds {MAX_TITLE_LEN} characters"
        )));
    }
    if body.trim().is_empty() {
        return Err(AdminPostError::Validation(
            "body must not be empty".to_string(),
        ));
    }
    Ok(())
}
