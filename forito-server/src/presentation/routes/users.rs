use axum::Router;
use axum::middleware;
use axum::routing::{get, patch, post};

use crate::presentation::AppState;
use crate::presentation::handlers::auth::{login, signup};
use crate::presentation::handlers::users::{
    add_notification, get_notifications, get_user, set_birthday, set_email, set_name,
    update_notifications,
};
use crate::presentation::middleware::auth::jwt_auth_middleware;

pub(crate) fn router(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/{id}", get(get_user));

    let protected = Router::new()
        .route("/{id}/setBirthday", patch(set_birthday))
        .route("/{id}/setName", patch(set_name))
        .route("/{id}/setEmail", patch(set_email))
        .route("/{id}/notifications", get(get_notifications))
        .route("/{id}/addNotification", patch(add_notification))
        .route("/{id}/updateNotifications", patch(update_notifications))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_middleware,
        ));

    public.merge(protected)
}
