use axum::Router;
use axum::middleware;
use axum::routing::{delete, get, patch, post};

use crate::presentation::AppState;
use crate::presentation::handlers::posts::{
    add_comment, create_post, delete_comment, delete_post, get_all_posts, get_post,
    get_posts_by_creator, get_saved_posts, like_post, list_posts, save_post, search_posts,
    update_post,
};
use crate::presentation::middleware::auth::jwt_auth_middleware;

pub(crate) fn router(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/top", get(get_all_posts))
        .route("/search", get(search_posts))
        .route("/creator", get(get_posts_by_creator))
        .route("/saved", get(get_saved_posts))
        .route("/", get(list_posts))
        .route("/{id}", get(get_post));

    let protected = Router::new()
        .route("/", post(create_post))
        .route("/{id}", patch(update_post).delete(delete_post))
        .route("/{id}/likePost", patch(like_post))
        .route("/{id}/savePost", patch(save_post))
        .route("/{id}/addComment", post(add_comment))
        .route("/{id}/{commentId}", delete(delete_comment))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_middleware,
        ));

    public.merge(protected)
}
