//! Read side of the blog: listings, search, single posts, and the JSON feed.

use std::sync::Arc;

use crate::application::repos::{PostOrder, PostQueryFilter, PostsRepo, RepoError};
use crate::domain::entities::PostRecord;
use crate::presentation::views::{IndexContext, PostCard, PostDetailContext};

const EXCERPT_LEN: usize = 180;

#[derive(Clone)]
pub struct FeedService {
    posts: Arc<dyn PostsRepo>,
}

impl FeedService {
    pub fn new(posts: Arc<dyn PostsRepo>) -> Self {
        Self { posts }
    }

    /// Context for the listing page. A blank search string means "no filter",
    /// so `/?q=` renders the same listing as `/`.
    pub async fn index_context(
        &self,
        search: Option<&str>,
        order: PostOrder,
    ) -> Result<IndexContext, RepoError> {
        let search = normalize_search(search);
        let filter = PostQueryFilter {
            search: search.map(str::to_string),
        };

        let records = self.posts.list_posts(&filter, order).await?;
        let post_count = records.len();
        let posts = records.into_iter().map(post_card).collect::<Vec<_>>();

        Ok(IndexContext {
            has_results: !posts.is_empty(),
            post_count,
            posts,
            search: search.unwrap_or_default().to_string(),
            sort_oldest: order == PostOrder::Oldest,
        })
    }

    pub async fn post_detail(&self, id: i64) -> Result<Option<PostDetailContext>, RepoError> {
        let record = self.posts.find_post(id).await?;
        Ok(record.map(|post| PostDetailContext {
            id: post.id,
            title: post.title,
            body: post.body,
            date: post.date,
        }))
    }

    /// Stable machine-readable feed: every post, newest first, independent of
    /// any UI search or sort state.
    pub async fn api_feed(&self) -> Result<Vec<PostRecord>, RepoError> {
        self.posts
            .list_posts(&PostQueryFilter::default(), PostOrder::Newest)
            .await
    }
}

fn normalize_search(search: Option<&str>) -> Option<&str> {
    search.map(str::trim).filter(|value| !value.is_empty())
}

fn post_card(record: PostRecord) -> PostCard {
    PostCard {
        id: record.id,
        title: record.title,
        excerpt: excerpt_of(&record.body, EXCERPT_LEN),
        date: record.date,
    }
}

/// Whitespace-collapsed prefix of the body, cut at a character boundary.
fn excerpt_of(body: &str, max_len: usize) -> String {
    let mut text = String::with_capacity(max_len);
    let mut last_was_space = false;

    for ch in body.chars() {
        if ch.is_whitespace() {
            if !last_was_space && !text.is_empty() {
                text.push(' ');
            }
            last_was_space = true;
        } else {
            text.push(ch);
            last_was_space = false;
        }

        if text.chars().count() >= max_len {
            text.push('…');
            break;
        }
    }

    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_search_is_no_filter() {
        assert_eq!(normalize_search(None), None);
        assert_eq!(normalize_search(Some("")), None);
        assert_eq!(normalize_search(Some("   ")), None);
        assert_eq!(normalize_search(Some(" rust ")), Some("rust"));
    }

    #[test]
    fn excerpt_collapses_whitespace() {
        assert_eq!(excerpt_of("a\n\nb\tc", 180), "a b c");
    }

    #[test]
    fn excerpt_truncates_long_bodies() {
        let body = "x".repeat(500);
        let excerpt = excerpt_of(&body, 180);
        assert!(excerpt.ends_with('…'));
        assert!(excerpt.chars().count() <= 181);
    }
}
