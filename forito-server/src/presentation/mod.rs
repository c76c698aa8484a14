use std::sync::Arc;

use crate::application::auth_service::AuthService;
use crate::application::post_service::PostService;
use crate::application::user_service::UserService;
use crate::data::repositories::mongo::post_repository::MongoPostRepository;
use crate::data::repositories::mongo::user_repository::MongoUserRepository;
use crate::infrastructure::jwt::JwtService;

pub(crate) mod app_error;
pub(crate) mod handlers;
pub(crate) mod middleware;
pub(crate) mod openapi;
pub(crate) mod routes;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) post_service: Arc<PostService<MongoPostRepository>>,
    pub(crate) user_service: Arc<UserService<MongoUserRepository>>,
    pub(crate) auth_service: Arc<AuthService<MongoUserRepository>>,
    pub(crate) jwt: Arc<JwtService>,
}

impl AppState {
    pub(crate) fn new(
        post_service: Arc<PostService<MongoPostRepository>>,
        user_service: Arc<UserService<MongoUserRepository>>,
        auth_service: Arc<AuthService<MongoUserRepository>>,
        jwt: Arc<JwtService>,
    ) -> Self {
        Self {
            post_service,
            user_service,
            auth_service,
            jwt,
        }
    }
}
