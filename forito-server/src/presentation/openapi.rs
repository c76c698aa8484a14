use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::presentation::handlers::auth::{AuthResponseDto, LoginDto, SignupDto, UserDto};
use crate::presentation::handlers::posts::{
    AddCommentDto, AddCommentValueDto, CommentDto, CreatePostDto, PagedPostsResponseDto,
    PostDto, PostsResponseDto, SelectedFileDto, UpdatePostDto,
};
use crate::presentation::handlers::users::{
    AddNotificationDto, EmailDto, SetBirthdayDto, SetEmailDto, SetNameDto, UpdateNotificationsDto,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::presentation::handlers::auth::signup,
        crate::presentation::handlers::auth::login,
        crate::presentation::handlers::posts::get_all_posts,
        crate::presentation::handlers::posts::list_posts,
        crate::presentation::handlers::posts::search_posts,
        crate::presentation::handlers::posts::get_posts_by_creator,
        crate::presentation::handlers::posts::get_saved_posts,
        crate::presentation::handlers::posts::get_post,
        crate::presentation::handlers::posts::create_post,
        crate::presentation::handlers::posts::update_post,
        crate::presentation::handlers::posts::delete_post,
        crate::presentation::handlers::posts::like_post,
        crate::presentation::handlers::posts::save_post,
        crate::presentation::handlers::posts::add_comment,
        crate::presentation::handlers::posts::delete_comment,
        crate::presentation::handlers::users::get_user,
        crate::presentation::handlers::users::set_birthday,
        crate::presentation::handlers::users::set_name,
        crate::presentation::handlers::users::set_email,
        crate::presentation::handlers::users::get_notifications,
        crate::presentation::handlers::users::add_notification,
        crate::presentation::handlers::users::update_notifications
    ),
    components(
        schemas(
            SignupDto,
            LoginDto,
            AuthResponseDto,
            UserDto,
            SelectedFileDto,
            CommentDto,
            PostDto,
            PostsResponseDto,
            PagedPostsResponseDto,
            CreatePostDto,
            UpdatePostDto,
            AddCommentDto,
            AddCommentValueDto,
            SetBirthdayDto,
            SetNameDto,
            SetEmailDto,
            EmailDto,
            AddNotificationDto,
            UpdateNotificationsDto
        )
    ),
    tags(
        (name = "auth", description = "Signup and login"),
        (name = "posts", description = "Post listing, search and mutations"),
        (name = "users", description = "User profile and notifications")
    ),
    modifiers(&SecurityAddon)
)]
pub(crate) struct ApiDoc;

pub(crate) struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let mut components = openapi.components.take().unwrap_or_default();
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
        openapi.components = Some(components);
    }
}
