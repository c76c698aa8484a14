use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::error::DomainError;
use crate::domain::post::{Comment, Post, Privacy, SelectedFile};

#[derive(Debug, Clone)]
pub(crate) struct NewPost {
    pub(crate) title: String,
    pub(crate) message: String,
    pub(crate) name: String,
    pub(crate) creator: String,
    pub(crate) privacy: Privacy,
    pub(crate) tags: Vec<String>,
    pub(crate) selected_file: Option<SelectedFile>,
    pub(crate) alt: Option<String>,
    pub(crate) created_at: DateTime<Utc>,
}

/// Store access for the `posts` collection. Callers pass well-formed 24-hex
/// identifiers; `Ok(None)` / `Ok(false)` means the post does not exist.
///
/// The like/save toggles are atomic set operations in the store (add when the
/// user is absent, remove every occurrence when present), so two users
/// toggling the same post concurrently never lose each other's update.
/// Comment append/removal are equally single store operations; removal drops
/// every comment carrying the given `commentId`.
#[async_trait]
pub(crate) trait PostRepository: Send + Sync {
    async fn create_post(&self, input: NewPost) -> Result<Post, DomainError>;
    async fn find_post(&self, id: &str) -> Result<Option<Post>, DomainError>;
    /// Full-document replace; returns the store's post-write view.
    async fn replace_post(&self, post: Post) -> Result<Option<Post>, DomainError>;
    async fn delete_post(&self, id: &str) -> Result<bool, DomainError>;

    /// All posts, most recently created first.
    async fn list_all(&self) -> Result<Vec<Post>, DomainError>;
    /// A window of posts, most recently created first.
    async fn list_page(&self, skip: u64, limit: i64) -> Result<Vec<Post>, DomainError>;
    async fn count_posts(&self) -> Result<u64, DomainError>;

    /// Case-insensitive title pattern OR membership of any of `tags`.
    async fn search_posts(
        &self,
        title_pattern: Option<&str>,
        tags: &[String],
    ) -> Result<Vec<Post>, DomainError>;
    async fn find_by_creator(&self, creator: &str) -> Result<Vec<Post>, DomainError>;
    async fn find_saved_by(&self, user_id: &str) -> Result<Vec<Post>, DomainError>;

    async fn toggle_like(&self, post_id: &str, user_id: &str)
    -> Result<Option<Post>, DomainError>;
    async fn toggle_save(&self, post_id: &str, user_id: &str)
    -> Result<Option<Post>, DomainError>;
    async fn add_comment(
        &self,
        post_id: &str,
        comment: Comment,
    ) -> Result<Option<Post>, DomainError>;
    async fn remove_comments(
        &self,
        post_id: &str,
        comment_id: &str,
    ) -> Result<Option<Post>, DomainError>;
}
