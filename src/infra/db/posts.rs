use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite};

use crate::application::repos::{
    CreatePostParams, PostOrder, PostQueryFilter, PostsRepo, PostsWriteRepo, RepoError,
    UpdatePostParams,
};
use crate::domain::entities::PostRecord;

use super::{SqliteRepositories, map_sqlx_error};

#[derive(Debug, sqlx::FromRow)]
struct PostRow {
    id: i64,
    title: String,
    body: String,
    date: String,
}

impl From<PostRow> for PostRecord {
    fn from(row: PostRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            body: row.body,
            date: row.date,
        }
    }
}

/// Escapes LIKE metacharacters and wraps the query in `%…%`, so the search
/// term is always matched literally as a substring.
fn like_pattern(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len() + 2);
    for ch in query.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    format!("%{escaped}%")
}

#[async_trait]
impl PostsRepo for SqliteRepositories {
    async fn list_posts(
        &self,
        filter: &PostQueryFilter,
        order: PostOrder,
    ) -> Result<Vec<PostRecord>, RepoError> {
        let mut qb: QueryBuilder<'_, Sqlite> =
            QueryBuilder::new("SELECT id, title, body, date FROM posts WHERE 1=1 ");

        if let Some(search) = filter.search.as_ref() {
            let pattern = like_pattern(search);
            qb.push(" AND (title LIKE ");
            qb.push_bind(pattern.clone());
            qb.push(" ESCAPE '\\' OR body LIKE ");
            qb.push_bind(pattern);
            qb.push(" ESCAPE '\\')");
        }

        qb.push(match order {
            PostOrder::Newest => " ORDER BY id DESC",
            PostOrder::Oldest => " ORDER BY id ASC",
        });

        let rows = qb
            .build_query_as::<PostRow>()
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(PostRecord::from).collect())
    }

    async fn find_post(&self, id: i64) -> Result<Option<PostRecord>, RepoError> {
        let row = sqlx::query_as::<_, PostRow>(
            "SELECT id, title, body, date FROM posts WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(PostRecord::from))
    }
}

#[async_trait]
impl PostsWriteRepo for SqliteRepositories {
    async fn create_post(&self, params: CreatePostParams) -> Result<PostRecord, RepoError> {
        let CreatePostParams { title, body, date } = params;

        let row = sqlx::query_as::<_, PostRow>(
            "INSERT INTO posts (title, body, date) VALUES (?, ?, ?) \
             RETURNING id, title, body, date",
        )
        .bind(title)
        .bind(body)
        .bind(date)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(PostRecord::from(row))
    }

    async fn update_post(&self, params: UpdatePostParams) -> Result<PostRecord, RepoError> {
        let UpdatePostParams { id, title, body } = params;

        let row = sqlx::query_as::<_, PostRow>(
            "UPDATE posts SET title = ?, body = ? WHERE id = ? \
             RETURNING id, title, body, date",
        )
        .bind(title)
        .bind(body)
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        row.map(PostRecord::from).ok_or(RepoError::NotFound)
    }

    async fn delete_post(&self, id: i64) -> Result<(), RepoError> {
        let result = sqlx::query("DELETE FROM posts WHERE id = ?")
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}
