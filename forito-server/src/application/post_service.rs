use chrono::Utc;

use crate::data::post_repository::{NewPost, PostRepository};
use crate::domain::error::DomainError;
use crate::domain::post::{Comment, CreatePostRequest, Post, UpdatePostRequest};
use crate::domain::id;
use crate::domain::search::escape_regex;

/// Fixed page size of the paginated listing; `number_of_pages` is derived
/// from it regardless of how many private posts pad the returned page.
const POSTS_PAGE_SIZE: i64 = 6;

#[derive(Debug, Clone)]
pub(crate) struct ListPostsResult {
    pub(crate) posts: Vec<Post>,
    /// Echoes the requested page verbatim, valid or not.
    pub(crate) current_page: i64,
    pub(crate) number_of_pages: u64,
    pub(crate) total: u64,
}

pub(crate) struct PostService<R: PostRepository> {
    repo: R,
}

impl<R: PostRepository> PostService<R> {
    pub(crate) fn new(repo: R) -> Self {
        Self { repo }
    }

    pub(crate) async fn get_all_posts(&self) -> Result<Vec<Post>, DomainError> {
        self.repo.list_all().await
    }

    /// Pagination with privacy compensation: after fetching the 6-post
    /// window, the same offset is re-fetched with limit `6 + k` where `k` is
    /// the number of private posts in the window, so consumers that filter
    /// private posts client-side still see a full page.
    pub(crate) async fn list_posts(&self, page: i64) -> Result<ListPostsResult, DomainError> {
        let total = self.repo.count_posts().await?;

        // Page 0 or negative would produce a negative offset; the store
        // boundary clamps it to the beginning.
        let start_index = (page - 1).saturating_mul(POSTS_PAGE_SIZE).max(0) as u64;

        let window = self.repo.list_page(start_index, POSTS_PAGE_SIZE).await?;
        let private_quantity = window
            .iter()
            .filter(|post| post.privacy.is_private())
            .count() as i64;
        let posts = self
            .repo
            .list_page(start_index, POSTS_PAGE_SIZE + private_quantity)
            .await?;

        let number_of_pages = if total == 0 {
            0
        } else {
            total.div_ceil(POSTS_PAGE_SIZE as u64)
        };

        Ok(ListPostsResult {
            posts,
            current_page: page,
            number_of_pages,
            total,
        })
    }

    /// Title substring match (case-insensitive, metacharacters escaped) OR
    /// membership of any comma-separated tag. No criteria at all yields an
    /// empty result without touching the store.
    pub(crate) async fn search_posts(
        &self,
        search_query: Option<String>,
        tags: Option<String>,
    ) -> Result<Vec<Post>, DomainError> {
        let search_query = search_query.filter(|query| !query.is_empty());
        let tags = tags.filter(|tags| !tags.is_empty());

        if search_query.is_none() && tags.is_none() {
            return Ok(Vec::new());
        }

        let title_pattern = search_query.map(|query| escape_regex(&query));
        let tags: Vec<String> = tags
            .map(|tags| tags.split(',').map(str::to_string).collect())
            .unwrap_or_default();

        self.repo
            .search_posts(title_pattern.as_deref(), &tags)
            .await
    }

    /// Malformed identifiers skip the lookup and yield an empty body,
    /// matching the historical API; a well-formed id that matches nothing is
    /// a NotFound.
    pub(crate) async fn get_post(&self, post_id: &str) -> Result<Option<Post>, DomainError> {
        if !id::is_well_formed(post_id) {
            return Ok(None);
        }

        match self.repo.find_post(post_id).await? {
            Some(post) => Ok(Some(post)),
            None => Err(DomainError::NotFound(format!("post id: {post_id}"))),
        }
    }

    /// `creator` always comes from the authenticated caller, never from the
    /// request body.
    pub(crate) async fn create_post(
        &self,
        creator: &str,
        req: CreatePostRequest,
    ) -> Result<Post, DomainError> {
        let req = req.validate()?;

        let input = NewPost {
            title: req.title,
            message: req.message,
            name: req.name.unwrap_or_default(),
            creator: creator.to_string(),
            privacy: req.privacy,
            tags: req.tags,
            selected_file: req.selected_file,
            alt: req.alt,
            created_at: Utc::now(),
        };
        self.repo.create_post(input).await
    }

    /// Full-replace update. The response is the store's post-write document,
    /// not the locally constructed one.
    pub(crate) async fn update_post(
        &self,
        post_id: &str,
        req: UpdatePostRequest,
    ) -> Result<Post, DomainError> {
        id::validate(post_id)?;
        let req = req.validate()?;

        let post = req.into_post(post_id.to_string(), Utc::now());
        self.repo
            .replace_post(post)
            .await?
            .ok_or(DomainError::NotFound(format!("post id: {post_id}")))
    }

    pub(crate) async fn delete_post(&self, post_id: &str) -> Result<(), DomainError> {
        id::validate(post_id)?;

        let deleted = self.repo.delete_post(post_id).await?;
        if !deleted {
            return Err(DomainError::NotFound(format!("post id: {post_id}")));
        }
        Ok(())
    }

    pub(crate) async fn toggle_like(
        &self,
        post_id: &str,
        user_id: &str,
    ) -> Result<Post, DomainError> {
        id::validate(post_id)?;
        self.repo
            .toggle_like(post_id, user_id)
            .await?
            .ok_or(DomainError::NotFound(format!("post id: {post_id}")))
    }

    pub(crate) async fn toggle_save(
        &self,
        post_id: &str,
        user_id: &str,
    ) -> Result<Post, DomainError> {
        id::validate(post_id)?;
        self.repo
            .toggle_save(post_id, user_id)
            .await?
            .ok_or(DomainError::NotFound(format!("post id: {post_id}")))
    }

    pub(crate) async fn add_comment(
        &self,
        post_id: &str,
        comment: Comment,
    ) -> Result<Post, DomainError> {
        id::validate(post_id)?;
        self.repo
            .add_comment(post_id, comment)
            .await?
            .ok_or(DomainError::NotFound(format!("post id: {post_id}")))
    }

    /// Removes every comment carrying `comment_id`, not just the first.
    pub(crate) async fn delete_comment(
        &self,
        post_id: &str,
        comment_id: &str,
    ) -> Result<Post, DomainError> {
        id::validate(post_id)?;
        self.repo
            .remove_comments(post_id, comment_id)
            .await?
            .ok_or(DomainError::NotFound(format!("post id: {post_id}")))
    }

    pub(crate) async fn get_posts_by_creator(
        &self,
        creator: &str,
    ) -> Result<Vec<Post>, DomainError> {
        self.repo.find_by_creator(creator).await
    }

    pub(crate) async fn get_saved_posts(&self, user_id: &str) -> Result<Vec<Post>, DomainError> {
        self.repo.find_saved_by(user_id).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use chrono::Utc;

    use super::PostService;
    use crate::data::post_repository::{NewPost, PostRepository};
    use crate::domain::error::DomainError;
    use crate::domain::post::{Comment, CreatePostRequest, Post, Privacy, UpdatePostRequest};

    #[derive(Clone, Default)]
    struct FakePostRepo {
        posts: Arc<Mutex<Vec<Post>>>,
        page_calls: Arc<Mutex<Vec<(u64, i64)>>>,
        search_calls: Arc<Mutex<usize>>,
        find_calls: Arc<Mutex<usize>>,
    }

    impl FakePostRepo {
        fn new() -> Self {
            Self::default()
        }

        fn seed(&self, posts: Vec<Post>) {
            *self.posts.lock().expect("posts mutex poisoned") = posts;
        }

        fn snapshot(&self) -> Vec<Post> {
            self.posts.lock().expect("posts mutex poisoned").clone()
        }

        fn page_calls(&self) -> Vec<(u64, i64)> {
            self.page_calls
                .lock()
                .expect("page_calls mutex poisoned")
                .clone()
        }
    }

    #[async_trait]
    impl PostRepository for FakePostRepo {
        async fn create_post(&self, input: NewPost) -> Result<Post, DomainError> {
            let mut posts = self.posts.lock().expect("posts mutex poisoned");
            let post = Post {
                id: format!("{:024x}", posts.len() + 1),
                title: input.title,
                message: input.message,
                name: input.name,
                creator: input.creator,
                privacy: input.privacy,
                tags: input.tags,
                selected_file: input.selected_file,
                likes: Vec::new(),
                saves: Vec::new(),
                comments: Vec::new(),
                alt: input.alt,
                created_at: input.created_at,
                updated_at: None,
            };
            posts.insert(0, post.clone());
            Ok(post)
        }

        async fn find_post(&self, id: &str) -> Result<Option<Post>, DomainError> {
            *self.find_calls.lock().expect("find_calls mutex poisoned") += 1;
            Ok(self
                .posts
                .lock()
                .expect("posts mutex poisoned")
                .iter()
                .find(|post| post.id == id)
                .cloned())
        }

        async fn replace_post(&self, post: Post) -> Result<Option<Post>, DomainError> {
            let mut posts = self.posts.lock().expect("posts mutex poisoned");
            match posts.iter_mut().find(|existing| existing.id == post.id) {
                Some(existing) => {
                    *existing = post.clone();
                    Ok(Some(post))
                }
                None => Ok(None),
            }
        }

        async fn delete_post(&self, id: &str) -> Result<bool, DomainError> {
            let mut posts = self.posts.lock().expect("posts mutex poisoned");
            let before = posts.len();
            posts.retain(|post| post.id != id);
            Ok(posts.len() < before)
        }

        async fn list_all(&self) -> Result<Vec<Post>, DomainError> {
            Ok(self.snapshot())
        }

        async fn list_page(&self, skip: u64, limit: i64) -> Result<Vec<Post>, DomainError> {
            self.page_calls
                .lock()
                .expect("page_calls mutex poisoned")
                .push((skip, limit));
            Ok(self
                .snapshot()
                .into_iter()
                .skip(skip as usize)
                .take(limit as usize)
                .collect())
        }

        async fn count_posts(&self) -> Result<u64, DomainError> {
            Ok(self.snapshot().len() as u64)
        }

        async fn search_posts(
            &self,
            title_pattern: Option<&str>,
            tags: &[String],
        ) -> Result<Vec<Post>, DomainError> {
            *self
                .search_calls
                .lock()
                .expect("search_calls mutex poisoned") += 1;
            let title_matcher = title_pattern.map(|pattern| {
                regex::RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .build()
                    .expect("escaped pattern must compile")
            });
            Ok(self
                .snapshot()
                .into_iter()
                .filter(|post| {
                    let title_hit = title_matcher
                        .as_ref()
                        .is_some_and(|matcher| matcher.is_match(&post.title));
                    let tag_hit = post.tags.iter().any(|tag| tags.contains(tag));
                    title_hit || tag_hit
                })
                .collect())
        }

        async fn find_by_creator(&self, creator: &str) -> Result<Vec<Post>, DomainError> {
            Ok(self
                .snapshot()
                .into_iter()
                .filter(|post| post.creator == creator)
                .collect())
        }

        async fn find_saved_by(&self, user_id: &str) -> Result<Vec<Post>, DomainError> {
            Ok(self
                .snapshot()
                .into_iter()
                .filter(|post| post.saves.iter().any(|save| save == user_id))
                .collect())
        }

        async fn toggle_like(
            &self,
            post_id: &str,
            user_id: &str,
        ) -> Result<Option<Post>, DomainError> {
            self.toggle(post_id, user_id, true)
        }

        async fn toggle_save(
            &self,
            post_id: &str,
            user_id: &str,
        ) -> Result<Option<Post>, DomainError> {
            self.toggle(post_id, user_id, false)
        }

        async fn add_comment(
            &self,
            post_id: &str,
            comment: Comment,
        ) -> Result<Option<Post>, DomainError> {
            let mut posts = self.posts.lock().expect("posts mutex poisoned");
            match posts.iter_mut().find(|post| post.id == post_id) {
                Some(post) => {
                    post.comments.push(comment);
                    Ok(Some(post.clone()))
                }
                None => Ok(None),
            }
        }

        async fn remove_comments(
            &self,
            post_id: &str,
            comment_id: &str,
        ) -> Result<Option<Post>, DomainError> {
            let mut posts = self.posts.lock().expect("posts mutex poisoned");
            match posts.iter_mut().find(|post| post.id == post_id) {
                Some(post) => {
                    post.comments
                        .retain(|comment| comment.comment_id != comment_id);
                    Ok(Some(post.clone()))
                }
                None => Ok(None),
            }
        }
    }

    impl FakePostRepo {
        fn toggle(
            &self,
            post_id: &str,
            user_id: &str,
            likes: bool,
        ) -> Result<Option<Post>, DomainError> {
            let mut posts = self.posts.lock().expect("posts mutex poisoned");
            let Some(post) = posts.iter_mut().find(|post| post.id == post_id) else {
                return Ok(None);
            };
            let list = if likes { &mut post.likes } else { &mut post.saves };
            if list.iter().any(|entry| entry == user_id) {
                list.retain(|entry| entry != user_id);
            } else {
                list.push(user_id.to_string());
            }
            Ok(Some(post.clone()))
        }
    }

    #[tokio::test]
    async fn list_posts_reports_ceil_page_count() {
        let repo = FakePostRepo::new();
        repo.seed((0..13).map(|n| sample_post(n, Privacy::Public)).collect());

        let service = PostService::new(repo);
        let result = service.list_posts(1).await.expect("listing must succeed");

        assert_eq!(result.total, 13);
        assert_eq!(result.number_of_pages, 3);
        assert_eq!(result.current_page, 1);
    }

    #[tokio::test]
    async fn list_posts_reports_zero_pages_for_empty_store() {
        let service = PostService::new(FakePostRepo::new());
        let result = service.list_posts(1).await.expect("listing must succeed");

        assert_eq!(result.total, 0);
        assert_eq!(result.number_of_pages, 0);
        assert!(result.posts.is_empty());
    }

    #[tokio::test]
    async fn list_posts_extends_window_by_private_count() {
        let repo = FakePostRepo::new();
        let mut posts: Vec<Post> = (0..8).map(|n| sample_post(n, Privacy::Public)).collect();
        posts[1].privacy = Privacy::Private;
        posts[4].privacy = Privacy::Private;
        repo.seed(posts);

        let service = PostService::new(repo.clone());
        let result = service.list_posts(1).await.expect("listing must succeed");

        assert_eq!(repo.page_calls(), vec![(0, 6), (0, 8)]);
        assert_eq!(result.posts.len(), 8);
    }

    #[tokio::test]
    async fn list_posts_offsets_by_page() {
        let repo = FakePostRepo::new();
        repo.seed((0..13).map(|n| sample_post(n, Privacy::Public)).collect());

        let service = PostService::new(repo.clone());
        let result = service.list_posts(2).await.expect("listing must succeed");

        assert_eq!(repo.page_calls()[0], (6, 6));
        assert_eq!(result.current_page, 2);
    }

    #[tokio::test]
    async fn list_posts_clamps_negative_offset() {
        let repo = FakePostRepo::new();
        repo.seed((0..3).map(|n| sample_post(n, Privacy::Public)).collect());

        let service = PostService::new(repo.clone());
        let result = service.list_posts(-2).await.expect("listing must succeed");

        assert_eq!(repo.page_calls()[0], (0, 6));
        // the invalid page is still echoed back untouched
        assert_eq!(result.current_page, -2);
    }

    #[tokio::test]
    async fn search_without_criteria_returns_empty_without_store_call() {
        let repo = FakePostRepo::new();
        repo.seed(vec![sample_post(0, Privacy::Public)]);

        let service = PostService::new(repo.clone());
        let posts = service
            .search_posts(None, Some(String::new()))
            .await
            .expect("search must succeed");

        assert!(posts.is_empty());
        assert_eq!(*repo.search_calls.lock().expect("mutex poisoned"), 0);
    }

    #[tokio::test]
    async fn search_matches_literal_metacharacters() {
        let repo = FakePostRepo::new();
        let mut cpp = sample_post(0, Privacy::Public);
        cpp.title = "C++ Guide".to_string();
        let mut c = sample_post(1, Privacy::Public);
        c.title = "C Guide".to_string();
        repo.seed(vec![cpp, c]);

        let service = PostService::new(repo);
        let posts = service
            .search_posts(Some("C++".to_string()), None)
            .await
            .expect("search must succeed");

        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].title, "C++ Guide");
    }

    #[tokio::test]
    async fn search_dot_does_not_match_arbitrary_characters() {
        let repo = FakePostRepo::new();
        let mut post = sample_post(0, Privacy::Public);
        post.title = "axb".to_string();
        repo.seed(vec![post]);

        let service = PostService::new(repo);
        let posts = service
            .search_posts(Some("a.b".to_string()), None)
            .await
            .expect("search must succeed");

        assert!(posts.is_empty());
    }

    #[tokio::test]
    async fn search_matches_any_listed_tag() {
        let repo = FakePostRepo::new();
        let mut tagged = sample_post(0, Privacy::Public);
        tagged.tags = vec!["web".to_string()];
        let untagged = sample_post(1, Privacy::Public);
        repo.seed(vec![tagged, untagged]);

        let service = PostService::new(repo);
        let posts = service
            .search_posts(None, Some("rust,web".to_string()))
            .await
            .expect("search must succeed");

        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].tags, vec!["web"]);
    }

    #[tokio::test]
    async fn create_post_takes_creator_from_caller() {
        let repo = FakePostRepo::new();
        let service = PostService::new(repo.clone());

        let req = CreatePostRequest {
            title: "  Title  ".to_string(),
            message: "Message".to_string(),
            name: Some("Ada".to_string()),
            privacy: Privacy::Public,
            tags: Vec::new(),
            selected_file: None,
            alt: None,
        };

        let created = service
            .create_post("507f1f77bcf86cd799439012", req)
            .await
            .expect("create must succeed");

        assert_eq!(created.creator, "507f1f77bcf86cd799439012");
        assert_eq!(created.title, "Title");
        assert_eq!(repo.snapshot().len(), 1);
    }

    #[tokio::test]
    async fn get_post_skips_lookup_for_malformed_id() {
        let repo = FakePostRepo::new();
        let service = PostService::new(repo.clone());

        let post = service
            .get_post("definitely-not-an-id")
            .await
            .expect("malformed id must not error");

        assert!(post.is_none());
        assert_eq!(*repo.find_calls.lock().expect("mutex poisoned"), 0);
    }

    #[tokio::test]
    async fn get_post_reports_missing_well_formed_id() {
        let service = PostService::new(FakePostRepo::new());
        let err = service
            .get_post("507f1f77bcf86cd799439011")
            .await
            .expect_err("missing post must surface");
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn update_post_fails_fast_on_malformed_id() {
        let repo = FakePostRepo::new();
        repo.seed(vec![sample_post(0, Privacy::Public)]);

        let service = PostService::new(repo.clone());
        let err = service
            .update_post("bad-id", sample_update_request())
            .await
            .expect_err("malformed id must be rejected");

        assert!(matches!(err, DomainError::Validation { field: "id", .. }));
        assert_eq!(repo.snapshot()[0].title, "post 0");
    }

    #[tokio::test]
    async fn update_post_replaces_and_returns_store_view() {
        let repo = FakePostRepo::new();
        let existing = sample_post(0, Privacy::Public);
        let post_id = existing.id.clone();
        let original_created_at = Utc::now() - chrono::Duration::days(7);
        repo.seed(vec![existing]);

        let service = PostService::new(repo.clone());
        let mut req = sample_update_request();
        req.created_at = original_created_at;

        let updated = service
            .update_post(&post_id, req)
            .await
            .expect("update must succeed");

        assert_eq!(updated.title, "updated title");
        assert_eq!(updated.created_at, original_created_at);
        assert!(updated.updated_at.is_some());
        assert_eq!(repo.snapshot()[0].title, "updated title");
    }

    #[tokio::test]
    async fn delete_post_surfaces_missing_id() {
        let service = PostService::new(FakePostRepo::new());
        let err = service
            .delete_post("507f1f77bcf86cd799439011")
            .await
            .expect_err("missing post must surface");
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn toggling_twice_restores_original_state() {
        let repo = FakePostRepo::new();
        let post = sample_post(0, Privacy::Public);
        let post_id = post.id.clone();
        repo.seed(vec![post]);

        let service = PostService::new(repo);
        let user = "507f1f77bcf86cd799439012";

        let liked = service
            .toggle_like(&post_id, user)
            .await
            .expect("toggle must succeed");
        assert_eq!(liked.likes, vec![user]);

        let unliked = service
            .toggle_like(&post_id, user)
            .await
            .expect("toggle must succeed");
        assert!(unliked.likes.is_empty());
    }

    #[tokio::test]
    async fn toggles_by_distinct_users_accumulate() {
        let repo = FakePostRepo::new();
        let post = sample_post(0, Privacy::Public);
        let post_id = post.id.clone();
        repo.seed(vec![post]);

        let service = PostService::new(repo);
        service
            .toggle_save(&post_id, "507f1f77bcf86cd799439012")
            .await
            .expect("toggle must succeed");
        let saved = service
            .toggle_save(&post_id, "507f1f77bcf86cd799439013")
            .await
            .expect("toggle must succeed");

        assert_eq!(saved.saves.len(), 2);
    }

    #[tokio::test]
    async fn delete_comment_removes_every_match() {
        let repo = FakePostRepo::new();
        let mut post = sample_post(0, Privacy::Public);
        let post_id = post.id.clone();
        post.comments = vec![
            sample_comment("c1", "first"),
            sample_comment("c2", "second"),
            sample_comment("c1", "duplicate"),
        ];
        repo.seed(vec![post]);

        let service = PostService::new(repo);
        let updated = service
            .delete_comment(&post_id, "c1")
            .await
            .expect("removal must succeed");

        assert_eq!(updated.comments.len(), 1);
        assert_eq!(updated.comments[0].comment_id, "c2");
    }

    #[tokio::test]
    async fn add_comment_appends_verbatim() {
        let repo = FakePostRepo::new();
        let mut post = sample_post(0, Privacy::Public);
        let post_id = post.id.clone();
        post.comments = vec![sample_comment("c1", "first")];
        repo.seed(vec![post]);

        let service = PostService::new(repo);
        let updated = service
            .add_comment(&post_id, sample_comment("c1", "same key again"))
            .await
            .expect("append must succeed");

        // no uniqueness enforcement on the removal key
        assert_eq!(updated.comments.len(), 2);
    }

    fn sample_post(n: usize, privacy: Privacy) -> Post {
        Post {
            id: format!("{n:024x}"),
            title: format!("post {n}"),
            message: "message".to_string(),
            name: "Ada".to_string(),
            creator: "507f1f77bcf86cd799439012".to_string(),
            privacy,
            tags: Vec::new(),
            selected_file: None,
            likes: Vec::new(),
            saves: Vec::new(),
            comments: Vec::new(),
            alt: None,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    fn sample_update_request() -> UpdatePostRequest {
        UpdatePostRequest {
            title: "updated title".to_string(),
            message: "updated message".to_string(),
            name: "Ada".to_string(),
            creator: "507f1f77bcf86cd799439012".to_string(),
            privacy: Privacy::Public,
            tags: Vec::new(),
            selected_file: None,
            alt: String::new(),
            likes: Vec::new(),
            saves: Vec::new(),
            comments: Vec::new(),
            created_at: Utc::now(),
        }
    }

    fn sample_comment(comment_id: &str, text: &str) -> Comment {
        Comment {
            user_id: "507f1f77bcf86cd799439012".to_string(),
            name: "Ada".to_string(),
            comment: text.to_string(),
            comment_id: comment_id.to_string(),
        }
    }
}
