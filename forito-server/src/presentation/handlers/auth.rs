use axum::{Json, extract::State, http::StatusCode};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::user::{LoginRequest, SignupRequest, User};
use crate::presentation::AppState;
use crate::presentation::app_error::AppResult;

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SignupDto {
    #[validate(length(min = 1, max = 64))]
    pub(crate) first_name: String,
    #[validate(length(max = 64))]
    pub(crate) last_name: Option<String>,
    #[validate(email)]
    pub(crate) email: String,
    #[validate(length(min = 1, max = 128))]
    pub(crate) password: String,
    #[validate(length(min = 1, max = 128))]
    pub(crate) confirm_password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct LoginDto {
    #[validate(length(min = 1, max = 256))]
    pub(crate) email: String,
    #[validate(length(min = 1))]
    pub(crate) password: String,
}

/// `result` carries the user, never the password hash.
#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct AuthResponseDto {
    pub(crate) result: UserDto,
    pub(crate) token: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct UserDto {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) birthday: Option<NaiveDate>,
    #[schema(value_type = Vec<Object>)]
    pub(crate) notifications: Vec<Value>,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            birthday: user.birthday,
            notifications: user.notifications,
        }
    }
}

#[utoipa::path(
    post,
    path = "/user/signup",
    tag = "auth",
    request_body = SignupDto,
    responses(
        (status = 201, description = "Signed up successfully", body = AuthResponseDto),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Email already taken"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn signup(
    State(state): State<AppState>,
    Json(dto): Json<SignupDto>,
) -> AppResult<(StatusCode, Json<AuthResponseDto>)> {
    dto.validate()?;

    let req = SignupRequest {
        first_name: dto.first_name,
        last_name: dto.last_name,
        email: dto.email,
        password: dto.password,
        confirm_password: dto.confirm_password,
    };

    let result = state.auth_service.signup(req).await?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponseDto {
            result: result.user.into(),
            token: result.token,
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/user/login",
    tag = "auth",
    request_body = LoginDto,
    responses(
        (status = 200, description = "Login successful", body = AuthResponseDto),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials"),
        (status = 404, description = "No account for the email"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn login(
    State(state): State<AppState>,
    Json(dto): Json<LoginDto>,
) -> AppResult<(StatusCode, Json<AuthResponseDto>)> {
    dto.validate()?;

    let req = LoginRequest {
        email: dto.email,
        password: dto.password,
    };

    let result = state.auth_service.login(req).await?;

    Ok((
        StatusCode::OK,
        Json(AuthResponseDto {
            result: result.user.into(),
            token: result.token,
        }),
    ))
}
