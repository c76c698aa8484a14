use std::sync::Arc;

use anyhow::Result;

mod application;
mod data;
mod domain;
mod infrastructure;
mod presentation;
mod server;

use application::auth_service::{AuthConfig, AuthService};
use application::post_service::PostService;
use application::user_service::UserService;
use data::repositories::mongo::post_repository::MongoPostRepository;
use data::repositories::mongo::user_repository::MongoUserRepository;
use infrastructure::database;
use infrastructure::jwt::JwtService;
use infrastructure::logging::init_logging;
use infrastructure::settings::Settings;
use presentation::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let settings = Settings::from_env()?;

    init_logging(&settings.log_level)?;

    let database = database::connect(&settings.mongodb_uri, &settings.mongodb_db).await?;

    let post_repo = MongoPostRepository::new(&database);
    let user_repo = MongoUserRepository::new(&database);

    let jwt = Arc::new(JwtService::new(&settings.jwt_secret));
    let post_service = Arc::new(PostService::new(post_repo));
    let user_service = Arc::new(UserService::new(user_repo.clone()));
    let auth_service = Arc::new(AuthService::new(
        user_repo,
        jwt.clone(),
        AuthConfig {
            hash_memory_kib: settings.hash_memory_kib,
            hash_iterations: settings.hash_iterations,
            login_ttl_seconds: settings.jwt_login_ttl_seconds,
            signup_ttl_seconds: settings.jwt_signup_ttl_seconds,
        },
    ));

    let state = AppState::new(post_service, user_service, auth_service, jwt);

    server::run_http(&settings, state).await
}
