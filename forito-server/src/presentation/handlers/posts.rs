use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::application::post_service::ListPostsResult;
use crate::domain::post::{
    Comment, CreatePostRequest, Post, Privacy, SelectedFile, UpdatePostRequest,
};
use crate::presentation::AppState;
use crate::presentation::app_error::AppResult;
use crate::presentation::middleware::auth::AuthenticatedUser;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct SelectedFileDto {
    pub(crate) url: Option<String>,
    pub(crate) name: Option<String>,
    pub(crate) id: Option<String>,
}

impl From<SelectedFile> for SelectedFileDto {
    fn from(file: SelectedFile) -> Self {
        Self {
            url: file.url,
            name: file.name,
            id: file.id,
        }
    }
}

impl From<SelectedFileDto> for SelectedFile {
    fn from(dto: SelectedFileDto) -> Self {
        Self {
            url: dto.url,
            name: dto.name,
            id: dto.id,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CommentDto {
    pub(crate) user_id: String,
    pub(crate) name: String,
    pub(crate) comment: String,
    pub(crate) comment_id: String,
}

impl From<Comment> for CommentDto {
    fn from(comment: Comment) -> Self {
        Self {
            user_id: comment.user_id,
            name: comment.name,
            comment: comment.comment,
            comment_id: comment.comment_id,
        }
    }
}

impl From<CommentDto> for Comment {
    fn from(dto: CommentDto) -> Self {
        Self {
            user_id: dto.user_id,
            name: dto.name,
            comment: dto.comment,
            comment_id: dto.comment_id,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PostDto {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) message: String,
    pub(crate) name: String,
    pub(crate) creator: String,
    #[schema(value_type = String)]
    pub(crate) privacy: Privacy,
    pub(crate) tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) selected_file: Option<SelectedFileDto>,
    pub(crate) likes: Vec<String>,
    pub(crate) saves: Vec<String>,
    pub(crate) comments: Vec<CommentDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) alt: Option<String>,
    pub(crate) created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) updated_at: Option<DateTime<Utc>>,
}

impl From<Post> for PostDto {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            title: post.title,
            message: post.message,
            name: post.name,
            creator: post.creator,
            privacy: post.privacy,
            tags: post.tags,
            selected_file: post.selected_file.map(SelectedFileDto::from),
            likes: post.likes,
            saves: post.saves,
            comments: post.comments.into_iter().map(CommentDto::from).collect(),
            alt: post.alt,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct PostsResponseDto {
    pub(crate) data: Vec<PostDto>,
    pub(crate) count: usize,
}

impl PostsResponseDto {
    fn from_posts(posts: Vec<Post>) -> Self {
        let data: Vec<PostDto> = posts.into_iter().map(PostDto::from).collect();
        let count = data.len();
        Self { data, count }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PagedPostsResponseDto {
    pub(crate) data: Vec<PostDto>,
    pub(crate) current_page: i64,
    pub(crate) number_of_pages: u64,
    pub(crate) count: u64,
}

impl From<ListPostsResult> for PagedPostsResponseDto {
    fn from(result: ListPostsResult) -> Self {
        Self {
            data: result.posts.into_iter().map(PostDto::from).collect(),
            current_page: result.current_page,
            number_of_pages: result.number_of_pages,
            count: result.total,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct PageQuery {
    pub(crate) page: Option<i64>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SearchQuery {
    pub(crate) search_query: Option<String>,
    pub(crate) tags: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct UserIdQuery {
    pub(crate) id: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreatePostDto {
    #[validate(length(min = 1, max = 255))]
    pub(crate) title: String,
    #[validate(length(min = 1))]
    pub(crate) message: String,
    pub(crate) name: Option<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub(crate) privacy: Privacy,
    #[serde(default)]
    pub(crate) tags: Vec<String>,
    pub(crate) selected_file: Option<SelectedFileDto>,
    pub(crate) alt: Option<String>,
}

/// Full-replace payload: everything except the optionals is mandatory, and
/// `createdAt` is resubmitted verbatim.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpdatePostDto {
    #[validate(length(min = 1, max = 255))]
    pub(crate) title: String,
    #[validate(length(min = 1))]
    pub(crate) message: String,
    pub(crate) name: String,
    pub(crate) creator: String,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub(crate) privacy: Privacy,
    #[serde(default)]
    pub(crate) tags: Vec<String>,
    pub(crate) selected_file: Option<SelectedFileDto>,
    pub(crate) alt: Option<String>,
    #[serde(default)]
    pub(crate) likes: Vec<String>,
    #[serde(default)]
    pub(crate) saves: Vec<String>,
    #[serde(default)]
    pub(crate) comments: Vec<CommentDto>,
    pub(crate) created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct AddCommentDto {
    #[validate(nested)]
    pub(crate) value: AddCommentValueDto,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AddCommentValueDto {
    pub(crate) user_id: String,
    pub(crate) name: String,
    #[validate(length(min = 1))]
    pub(crate) comment: String,
    #[validate(length(min = 1))]
    pub(crate) comment_id: String,
}

#[utoipa::path(
    get,
    path = "/posts/top",
    tag = "posts",
    responses(
        (status = 200, description = "All posts, newest first", body = PostsResponseDto),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn get_all_posts(
    State(state): State<AppState>,
) -> AppResult<(StatusCode, Json<PostsResponseDto>)> {
    let posts = state.post_service.get_all_posts().await?;
    Ok((StatusCode::OK, Json(PostsResponseDto::from_posts(posts))))
}

#[utoipa::path(
    get,
    path = "/posts",
    tag = "posts",
    params(
        ("page" = Option<i64>, Query, description = "1-based page number")
    ),
    responses(
        (status = 200, description = "Posts listed", body = PagedPostsResponseDto),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn list_posts(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<(StatusCode, Json<PagedPostsResponseDto>)> {
    let page = query.page.unwrap_or(1);
    let result = state.post_service.list_posts(page).await?;
    Ok((StatusCode::OK, Json(PagedPostsResponseDto::from(result))))
}

#[utoipa::path(
    get,
    path = "/posts/search",
    tag = "posts",
    params(
        ("searchQuery" = Option<String>, Query, description = "Title substring, matched case-insensitively"),
        ("tags" = Option<String>, Query, description = "Comma-separated tag list")
    ),
    responses(
        (status = 200, description = "Matching posts", body = PostsResponseDto),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn search_posts(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<(StatusCode, Json<PostsResponseDto>)> {
    let posts = state
        .post_service
        .search_posts(query.search_query, query.tags)
        .await?;
    Ok((StatusCode::OK, Json(PostsResponseDto::from_posts(posts))))
}

#[utoipa::path(
    get,
    path = "/posts/creator",
    tag = "posts",
    params(
        ("id" = String, Query, description = "Creator user id")
    ),
    responses(
        (status = 200, description = "Posts by the creator", body = PostsResponseDto),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn get_posts_by_creator(
    State(state): State<AppState>,
    Query(query): Query<UserIdQuery>,
) -> AppResult<(StatusCode, Json<PostsResponseDto>)> {
    let posts = state.post_service.get_posts_by_creator(&query.id).await?;
    Ok((StatusCode::OK, Json(PostsResponseDto::from_posts(posts))))
}

#[utoipa::path(
    get,
    path = "/posts/saved",
    tag = "posts",
    params(
        ("id" = String, Query, description = "User id whose saved posts to list")
    ),
    responses(
        (status = 200, description = "Saved posts", body = PostsResponseDto),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn get_saved_posts(
    State(state): State<AppState>,
    Query(query): Query<UserIdQuery>,
) -> AppResult<(StatusCode, Json<PostsResponseDto>)> {
    let posts = state.post_service.get_saved_posts(&query.id).await?;
    Ok((StatusCode::OK, Json(PostsResponseDto::from_posts(posts))))
}

#[utoipa::path(
    get,
    path = "/posts/{id}",
    tag = "posts",
    params(
        ("id" = String, Path, description = "Post id (24 hex characters)")
    ),
    responses(
        (status = 200, description = "Post found, or null for a malformed id", body = Option<PostDto>),
        (status = 404, description = "Post not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<(StatusCode, Json<Option<PostDto>>)> {
    let post = state.post_service.get_post(&id).await?;
    Ok((StatusCode::OK, Json(post.map(PostDto::from))))
}

#[utoipa::path(
    post,
    path = "/posts",
    tag = "posts",
    security(
        ("bearer_auth" = [])
    ),
    request_body = CreatePostDto,
    responses(
        (status = 201, description = "Post created", body = PostDto),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn create_post(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Json(dto): Json<CreatePostDto>,
) -> AppResult<(StatusCode, Json<PostDto>)> {
    dto.validate()?;
    let req = CreatePostRequest {
        title: dto.title,
        message: dto.message,
        name: dto.name,
        privacy: dto.privacy,
        tags: dto.tags,
        selected_file: dto.selected_file.map(SelectedFile::from),
        alt: dto.alt,
    };

    let result = state.post_service.create_post(&auth.user_id, req).await?;
    Ok((StatusCode::CREATED, Json(PostDto::from(result))))
}

#[utoipa::path(
    patch,
    path = "/posts/{id}",
    tag = "posts",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("id" = String, Path, description = "Post id (24 hex characters)")
    ),
    request_body = UpdatePostDto,
    responses(
        (status = 200, description = "Post updated", body = PostDto),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Post not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn update_post(
    State(state): State<AppState>,
    _auth: AuthenticatedUser,
    Path(id): Path<String>,
    Json(dto): Json<UpdatePostDto>,
) -> AppResult<(StatusCode, Json<PostDto>)> {
    dto.validate()?;
    let req = UpdatePostRequest {
        title: dto.title,
        message: dto.message,
        name: dto.name,
        creator: dto.creator,
        privacy: dto.privacy,
        tags: dto.tags,
        selected_file: dto.selected_file.map(SelectedFile::from),
        alt: dto.alt.unwrap_or_default(),
        likes: dto.likes,
        saves: dto.saves,
        comments: dto.comments.into_iter().map(Comment::from).collect(),
        created_at: dto.created_at,
    };

    let result = state.post_service.update_post(&id, req).await?;
    Ok((StatusCode::OK, Json(PostDto::from(result))))
}

#[utoipa::path(
    delete,
    path = "/posts/{id}",
    tag = "posts",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("id" = String, Path, description = "Post id (24 hex characters)")
    ),
    responses(
        (status = 204, description = "Post deleted"),
        (status = 400, description = "Malformed id"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Post not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn delete_post(
    State(state): State<AppState>,
    _auth: AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.post_service.delete_post(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    patch,
    path = "/posts/{id}/likePost",
    tag = "posts",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("id" = String, Path, description = "Post id (24 hex characters)")
    ),
    responses(
        (status = 200, description = "Like toggled", body = PostDto),
        (status = 400, description = "Malformed id"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Post not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn like_post(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<(StatusCode, Json<PostDto>)> {
    let result = state.post_service.toggle_like(&id, &auth.user_id).await?;
    Ok((StatusCode::OK, Json(PostDto::from(result))))
}

#[utoipa::path(
    patch,
    path = "/posts/{id}/savePost",
    tag = "posts",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("id" = String, Path, description = "Post id (24 hex characters)")
    ),
    responses(
        (status = 200, description = "Save toggled", body = PostDto),
        (status = 400, description = "Malformed id"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Post not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn save_post(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<(StatusCode, Json<PostDto>)> {
    let result = state.post_service.toggle_save(&id, &auth.user_id).await?;
    Ok((StatusCode::OK, Json(PostDto::from(result))))
}

#[utoipa::path(
    post,
    path = "/posts/{id}/addComment",
    tag = "posts",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("id" = String, Path, description = "Post id (24 hex characters)")
    ),
    request_body = AddCommentDto,
    responses(
        (status = 200, description = "Comment appended", body = PostDto),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Post not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn add_comment(
    State(state): State<AppState>,
    _auth: AuthenticatedUser,
    Path(id): Path<String>,
    Json(dto): Json<AddCommentDto>,
) -> AppResult<(StatusCode, Json<PostDto>)> {
    dto.validate()?;
    let comment = Comment {
        user_id: dto.value.user_id,
        name: dto.value.name,
        comment: dto.value.comment,
        comment_id: dto.value.comment_id,
    };

    let result = state.post_service.add_comment(&id, comment).await?;
    Ok((StatusCode::OK, Json(PostDto::from(result))))
}

#[utoipa::path(
    delete,
    path = "/posts/{id}/{commentId}",
    tag = "posts",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("id" = String, Path, description = "Post id (24 hex characters)"),
        ("commentId" = String, Path, description = "Removal key; every matching comment is dropped")
    ),
    responses(
        (status = 200, description = "Comments removed", body = PostDto),
        (status = 400, description = "Malformed id"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Post not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn delete_comment(
    State(state): State<AppState>,
    _auth: AuthenticatedUser,
    Path((id, comment_id)): Path<(String, String)>,
) -> AppResult<(StatusCode, Json<PostDto>)> {
    let result = state.post_service.delete_comment(&id, &comment_id).await?;
    Ok((StatusCode::OK, Json(PostDto::from(result))))
}
