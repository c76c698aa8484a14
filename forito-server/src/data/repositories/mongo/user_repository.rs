use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::{Bson, DateTime as BsonDateTime, Document, doc};
use chrono::NaiveDate;
use mongodb::options::ReturnDocument;
use mongodb::{Collection, Database};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::data::user_repository::{NewUser, UserCredentials, UserRepository};
use crate::domain::error::DomainError;
use crate::domain::user::User;

/// Stored shape of a user. `password` holds the PHC-format hash and never
/// leaves this module except inside [`UserCredentials`].
#[derive(Debug, Serialize, Deserialize)]
struct UserDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    id: Option<ObjectId>,
    name: String,
    email: String,
    password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    birthday: Option<BsonDateTime>,
    #[serde(default)]
    notifications: Vec<Bson>,
}

impl UserDocument {
    fn into_credentials(self) -> UserCredentials {
        let password_hash = self.password;
        UserCredentials {
            user: User {
                id: self.id.map(|oid| oid.to_hex()).unwrap_or_default(),
                name: self.name,
                email: self.email,
                birthday: self
                    .birthday
                    .map(|stamp| stamp.to_chrono().date_naive()),
                notifications: self.notifications.into_iter().map(Value::from).collect(),
            },
            password_hash,
        }
    }

    fn into_user(self) -> User {
        self.into_credentials().user
    }
}

#[derive(Clone)]
pub(crate) struct MongoUserRepository {
    collection: Collection<UserDocument>,
}

impl MongoUserRepository {
    pub(crate) fn new(database: &Database) -> Self {
        Self {
            collection: database.collection("users"),
        }
    }

    async fn update_user(&self, id: &str, update: Document) -> Result<Option<User>, DomainError> {
        let Some(oid) = parse_object_id(id) else {
            return Ok(None);
        };
        let updated = self
            .collection
            .find_one_and_update(doc! { "_id": oid }, update)
            .return_document(ReturnDocument::After)
            .await
            .map_err(store_error)?;
        Ok(updated.map(UserDocument::into_user))
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    async fn create_user(&self, input: NewUser) -> Result<User, DomainError> {
        let mut document = UserDocument {
            id: None,
            name: input.name,
            email: input.email,
            password: input.password_hash,
            birthday: None,
            notifications: Vec::new(),
        };
        let inserted = self
            .collection
            .insert_one(&document)
            .await
            .map_err(store_error)?;

        document.id = inserted.inserted_id.as_object_id();
        if document.id.is_none() {
            return Err(DomainError::Unexpected(
                "user store returned a non-ObjectId insert id".to_string(),
            ));
        }
        Ok(document.into_user())
    }

    async fn find_user(&self, id: &str) -> Result<Option<User>, DomainError> {
        let Some(oid) = parse_object_id(id) else {
            return Ok(None);
        };
        let document = self
            .collection
            .find_one(doc! { "_id": oid })
            .await
            .map_err(store_error)?;
        Ok(document.map(UserDocument::into_user))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserCredentials>, DomainError> {
        let document = self
            .collection
            .find_one(doc! { "email": email })
            .await
            .map_err(store_error)?;
        Ok(document.map(UserDocument::into_credentials))
    }

    async fn set_birthday(
        &self,
        id: &str,
        birthday: NaiveDate,
    ) -> Result<Option<User>, DomainError> {
        let birthday = birthday_to_bson(birthday)?;
        self.update_user(id, doc! { "$set": { "birthday": birthday } })
            .await
    }

    async fn set_name(&self, id: &str, name: &str) -> Result<Option<User>, DomainError> {
        self.update_user(id, doc! { "$set": { "name": name } }).await
    }

    async fn set_email(&self, id: &str, email: &str) -> Result<Option<User>, DomainError> {
        self.update_user(id, doc! { "$set": { "email": email } })
            .await
    }

    async fn push_notification(
        &self,
        id: &str,
        notification: Value,
    ) -> Result<Option<User>, DomainError> {
        let notification = Bson::try_from(notification).map_err(|e| {
            DomainError::Unexpected(format!("notification failed to serialize: {e}"))
        })?;
        self.update_user(id, doc! { "$push": { "notifications": notification } })
            .await
    }

    async fn set_notifications(
        &self,
        id: &str,
        notifications: Vec<Value>,
    ) -> Result<Option<User>, DomainError> {
        let notifications: Result<Vec<Bson>, _> =
            notifications.into_iter().map(Bson::try_from).collect();
        let notifications = notifications.map_err(|e| {
            DomainError::Unexpected(format!("notifications failed to serialize: {e}"))
        })?;
        self.update_user(
            id,
            doc! { "$set": { "notifications": Bson::Array(notifications) } },
        )
        .await
    }
}

/// Birthdays are stored as midnight UTC, the same convention the collection
/// was originally populated with.
fn birthday_to_bson(date: NaiveDate) -> Result<BsonDateTime, DomainError> {
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| DomainError::Unexpected("birthday out of range".to_string()))?;
    Ok(BsonDateTime::from_chrono(midnight.and_utc()))
}

fn parse_object_id(id: &str) -> Option<ObjectId> {
    ObjectId::parse_str(id).ok()
}

fn store_error(e: mongodb::error::Error) -> DomainError {
    DomainError::Unexpected(format!("user store failure: {e}"))
}

#[cfg(test)]
mod tests {
    use bson::oid::ObjectId;
    use bson::doc;
    use chrono::NaiveDate;

    use super::{UserDocument, birthday_to_bson};

    #[test]
    fn credentials_carry_hash_and_user_separately() {
        let raw = doc! {
            "_id": ObjectId::new(),
            "name": "Ada Lovelace",
            "email": "ada@example.com",
            "password": "$argon2id$v=19$m=64,t=1,p=1$c2FsdA$aGFzaA",
            "notifications": [{ "_id": "n1", "read": false }],
        };

        let document: UserDocument = bson::from_document(raw).expect("must deserialize");
        let credentials = document.into_credentials();

        assert!(credentials.password_hash.starts_with("$argon2id$"));
        assert_eq!(credentials.user.email, "ada@example.com");
        assert_eq!(credentials.user.notifications.len(), 1);
        assert_eq!(credentials.user.notifications[0]["_id"], "n1");
    }

    #[test]
    fn birthday_round_trips_through_midnight_utc() {
        let date = NaiveDate::from_ymd_opt(1815, 12, 10).expect("valid date");
        let stored = birthday_to_bson(date).expect("must convert");
        assert_eq!(stored.to_chrono().date_naive(), date);
    }

    #[test]
    fn missing_birthday_and_notifications_deserialize_empty() {
        let raw = doc! {
            "_id": ObjectId::new(),
            "name": "Ada",
            "email": "ada@example.com",
            "password": "$argon2id$irrelevant",
        };

        let document: UserDocument = bson::from_document(raw).expect("must deserialize");
        let user = document.into_user();
        assert!(user.birthday.is_none());
        assert!(user.notifications.is_empty());
    }
}
