use serde_json::Value;

use crate::data::user_repository::UserRepository;
use crate::domain::error::DomainError;
use crate::domain::id;
use crate::domain::user::{User, merge_notifications, normalize_email, parse_birthday};

pub(crate) struct UserService<R: UserRepository> {
    repo: R,
}

impl<R: UserRepository> UserService<R> {
    pub(crate) fn new(repo: R) -> Self {
        Self { repo }
    }

    pub(crate) async fn get_user(&self, user_id: &str) -> Result<User, DomainError> {
        id::validate(user_id)?;
        self.repo
            .find_user(user_id)
            .await?
            .ok_or(DomainError::NotFound(format!("user id: {user_id}")))
    }

    pub(crate) async fn set_birthday(
        &self,
        user_id: &str,
        birthday: &str,
    ) -> Result<User, DomainError> {
        id::validate(user_id)?;
        let birthday = parse_birthday(birthday)?;
        self.repo
            .set_birthday(user_id, birthday)
            .await?
            .ok_or(DomainError::NotFound(format!("user id: {user_id}")))
    }

    pub(crate) async fn set_name(
        &self,
        user_id: &str,
        first_name: &str,
        last_name: Option<&str>,
    ) -> Result<User, DomainError> {
        id::validate(user_id)?;

        let first_name = first_name.trim();
        if first_name.is_empty() {
            return Err(DomainError::Validation {
                field: "firstName",
                message: "first name must not be empty",
            });
        }

        let name = match last_name.map(str::trim) {
            Some(last_name) if !last_name.is_empty() => format!("{first_name} {last_name}"),
            _ => first_name.to_string(),
        };

        self.repo
            .set_name(user_id, &name)
            .await?
            .ok_or(DomainError::NotFound(format!("user id: {user_id}")))
    }

    /// Email uniqueness is enforced here; the address is stored exactly as
    /// submitted (trimmed, case preserved).
    pub(crate) async fn set_email(&self, user_id: &str, email: &str) -> Result<User, DomainError> {
        id::validate(user_id)?;
        let email = normalize_email(email)?;

        if let Some(existing) = self.repo.find_by_email(&email).await?
            && existing.user.id != user_id
        {
            return Err(DomainError::AlreadyExists(format!("user email: {email}")));
        }

        self.repo
            .set_email(user_id, &email)
            .await?
            .ok_or(DomainError::NotFound(format!("user id: {user_id}")))
    }

    pub(crate) async fn get_notifications(&self, user_id: &str) -> Result<Vec<Value>, DomainError> {
        Ok(self.get_user(user_id).await?.notifications)
    }

    pub(crate) async fn add_notification(
        &self,
        user_id: &str,
        notification: Value,
    ) -> Result<User, DomainError> {
        id::validate(user_id)?;
        self.repo
            .push_notification(user_id, notification)
            .await?
            .ok_or(DomainError::NotFound(format!("user id: {user_id}")))
    }

    /// Update-only merge: submitted entries replace stored ones with the same
    /// `_id`; unmatched submissions are dropped, untouched entries survive.
    pub(crate) async fn update_notifications(
        &self,
        user_id: &str,
        submitted: Vec<Value>,
    ) -> Result<User, DomainError> {
        let user = self.get_user(user_id).await?;
        let merged = merge_notifications(&user.notifications, &submitted);
        self.repo
            .set_notifications(user_id, merged)
            .await?
            .ok_or(DomainError::NotFound(format!("user id: {user_id}")))
    }
}
