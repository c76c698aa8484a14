use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::Value;

use crate::domain::error::DomainError;
use crate::domain::user::User;

/// A user together with the stored password hash. Only the credential checks
/// see this; everything else works with [`User`], which never carries the
/// hash.
#[derive(Debug, Clone)]
pub(crate) struct UserCredentials {
    pub(crate) user: User,
    pub(crate) password_hash: String,
}

#[derive(Debug, Clone)]
pub(crate) struct NewUser {
    pub(crate) name: String,
    pub(crate) email: String,
    pub(crate) password_hash: String,
}

/// Store access for the `users` collection. The `set_*` operations are
/// targeted single-field updates returning the post-write document, `None`
/// when the user does not exist.
#[async_trait]
pub(crate) trait UserRepository: Send + Sync {
    async fn create_user(&self, input: NewUser) -> Result<User, DomainError>;
    async fn find_user(&self, id: &str) -> Result<Option<User>, DomainError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<UserCredentials>, DomainError>;

    async fn set_birthday(
        &self,
        id: &str,
        birthday: NaiveDate,
    ) -> Result<Option<User>, DomainError>;
    async fn set_name(&self, id: &str, name: &str) -> Result<Option<User>, DomainError>;
    async fn set_email(&self, id: &str, email: &str) -> Result<Option<User>, DomainError>;

    async fn push_notification(
        &self,
        id: &str,
        notification: Value,
    ) -> Result<Option<User>, DomainError>;
    async fn set_notifications(
        &self,
        id: &str,
        notifications: Vec<Value>,
    ) -> Result<Option<User>, DomainError>;
}
