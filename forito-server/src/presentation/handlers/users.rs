use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::Value;
use utoipa::ToSchema;
use validator::Validate;

use crate::presentation::AppState;
use crate::presentation::app_error::AppResult;
use crate::presentation::handlers::auth::UserDto;
use crate::presentation::middleware::auth::AuthenticatedUser;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct SetBirthdayDto {
    /// Strictly `yyyy/mm/dd`.
    #[validate(length(equal = 10))]
    pub(crate) birthday: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SetNameDto {
    #[validate(length(min = 1, max = 64))]
    pub(crate) first_name: String,
    #[validate(length(max = 64))]
    pub(crate) last_name: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct SetEmailDto {
    #[validate(nested)]
    pub(crate) email: EmailDto,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct EmailDto {
    #[validate(email)]
    pub(crate) email: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct AddNotificationDto {
    #[schema(value_type = Object)]
    pub(crate) notification: Value,
}

#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct UpdateNotificationsDto {
    #[schema(value_type = Vec<Object>)]
    pub(crate) notifications: Vec<Value>,
}

#[utoipa::path(
    get,
    path = "/user/{id}",
    tag = "users",
    params(
        ("id" = String, Path, description = "User id (24 hex characters)")
    ),
    responses(
        (status = 200, description = "User found", body = UserDto),
        (status = 400, description = "Malformed id"),
        (status = 404, description = "User not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<(StatusCode, Json<UserDto>)> {
    let user = state.user_service.get_user(&id).await?;
    Ok((StatusCode::OK, Json(UserDto::from(user))))
}

#[utoipa::path(
    patch,
    path = "/user/{id}/setBirthday",
    tag = "users",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("id" = String, Path, description = "User id (24 hex characters)")
    ),
    request_body = SetBirthdayDto,
    responses(
        (status = 200, description = "Birthday set", body = UserDto),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn set_birthday(
    State(state): State<AppState>,
    _auth: AuthenticatedUser,
    Path(id): Path<String>,
    Json(dto): Json<SetBirthdayDto>,
) -> AppResult<(StatusCode, Json<UserDto>)> {
    dto.validate()?;
    let user = state.user_service.set_birthday(&id, &dto.birthday).await?;
    Ok((StatusCode::OK, Json(UserDto::from(user))))
}

#[utoipa::path(
    patch,
    path = "/user/{id}/setName",
    tag = "users",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("id" = String, Path, description = "User id (24 hex characters)")
    ),
    request_body = SetNameDto,
    responses(
        (status = 200, description = "Name set", body = UserDto),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn set_name(
    State(state): State<AppState>,
    _auth: AuthenticatedUser,
    Path(id): Path<String>,
    Json(dto): Json<SetNameDto>,
) -> AppResult<(StatusCode, Json<UserDto>)> {
    dto.validate()?;
    let user = state
        .user_service
        .set_name(&id, &dto.first_name, dto.last_name.as_deref())
        .await?;
    Ok((StatusCode::OK, Json(UserDto::from(user))))
}

#[utoipa::path(
    patch,
    path = "/user/{id}/setEmail",
    tag = "users",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("id" = String, Path, description = "User id (24 hex characters)")
    ),
    request_body = SetEmailDto,
    responses(
        (status = 200, description = "Email set", body = UserDto),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found"),
        (status = 409, description = "Email already taken"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn set_email(
    State(state): State<AppState>,
    _auth: AuthenticatedUser,
    Path(id): Path<String>,
    Json(dto): Json<SetEmailDto>,
) -> AppResult<(StatusCode, Json<UserDto>)> {
    dto.validate()?;
    let user = state.user_service.set_email(&id, &dto.email.email).await?;
    Ok((StatusCode::OK, Json(UserDto::from(user))))
}

#[utoipa::path(
    get,
    path = "/user/{id}/notifications",
    tag = "users",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("id" = String, Path, description = "User id (24 hex characters)")
    ),
    responses(
        (status = 200, description = "Notification list", body = Object),
        (status = 400, description = "Malformed id"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn get_notifications(
    State(state): State<AppState>,
    _auth: AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<(StatusCode, Json<Vec<Value>>)> {
    let notifications = state.user_service.get_notifications(&id).await?;
    Ok((StatusCode::OK, Json(notifications)))
}

#[utoipa::path(
    patch,
    path = "/user/{id}/addNotification",
    tag = "users",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("id" = String, Path, description = "User id (24 hex characters)")
    ),
    request_body = AddNotificationDto,
    responses(
        (status = 200, description = "Notification appended", body = UserDto),
        (status = 400, description = "Malformed id"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn add_notification(
    State(state): State<AppState>,
    _auth: AuthenticatedUser,
    Path(id): Path<String>,
    Json(dto): Json<AddNotificationDto>,
) -> AppResult<(StatusCode, Json<UserDto>)> {
    let user = state
        .user_service
        .add_notification(&id, dto.notification)
        .await?;
    Ok((StatusCode::OK, Json(UserDto::from(user))))
}

#[utoipa::path(
    patch,
    path = "/user/{id}/updateNotifications",
    tag = "users",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("id" = String, Path, description = "User id (24 hex characters)")
    ),
    request_body = UpdateNotificationsDto,
    responses(
        (status = 200, description = "Notifications merged", body = UserDto),
        (status = 400, description = "Malformed id"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn update_notifications(
    State(state): State<AppState>,
    _auth: AuthenticatedUser,
    Path(id): Path<String>,
    Json(dto): Json<UpdateNotificationsDto>,
) -> AppResult<(StatusCode, Json<UserDto>)> {
    let user = state
        .user_service
        .update_notifications(&id, dto.notifications)
        .await?;
    Ok((StatusCode::OK, Json(UserDto::from(user))))
}
