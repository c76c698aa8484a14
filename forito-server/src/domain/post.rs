use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::error::DomainError;

/// A post is public unless it explicitly carries the `private` tag, so any
/// unknown privacy value deserializes as `Public`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Privacy {
    #[default]
    Public,
    Private,
}

impl<'de> Deserialize<'de> for Privacy {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(match value.as_str() {
            "private" => Privacy::Private,
            _ => Privacy::Public,
        })
    }
}

impl Privacy {
    pub(crate) fn is_private(self) -> bool {
        matches!(self, Privacy::Private)
    }
}

/// Optional attachment descriptor carried verbatim on a post.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct SelectedFile {
    pub(crate) url: Option<String>,
    pub(crate) name: Option<String>,
    pub(crate) id: Option<String>,
}

/// `comment_id` is the removal key; it is unique per post by caller contract,
/// not enforced on append.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Comment {
    pub(crate) user_id: String,
    pub(crate) name: String,
    pub(crate) comment: String,
    pub(crate) comment_id: String,
}

#[derive(Debug, Clone)]
pub(crate) struct Post {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) message: String,
    pub(crate) name: String,
    pub(crate) creator: String,
    pub(crate) privacy: Privacy,
    pub(crate) tags: Vec<String>,
    pub(crate) selected_file: Option<SelectedFile>,
    pub(crate) likes: Vec<String>,
    pub(crate) saves: Vec<String>,
    pub(crate) comments: Vec<Comment>,
    pub(crate) alt: Option<String>,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub(crate) struct CreatePostRequest {
    pub(crate) title: String,
    pub(crate) message: String,
    pub(crate) name: Option<String>,
    pub(crate) privacy: Privacy,
    pub(crate) tags: Vec<String>,
    pub(crate) selected_file: Option<SelectedFile>,
    pub(crate) alt: Option<String>,
}

impl CreatePostRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        Ok(Self {
            title: normalize_required("title", &self.title)?,
            message: normalize_required("message", &self.message)?,
            name: self.name.map(|name| name.trim().to_string()),
            privacy: self.privacy,
            tags: trim_tags(self.tags),
            selected_file: self.selected_file,
            alt: self.alt.map(|alt| alt.trim().to_string()),
        })
    }
}

/// Update is a full replace by contract: every mandatory field is resubmitted
/// and `created_at` is preserved verbatim from the caller.
#[derive(Debug, Clone)]
pub(crate) struct UpdatePostRequest {
    pub(crate) title: String,
    pub(crate) message: String,
    pub(crate) name: String,
    pub(crate) creator: String,
    pub(crate) privacy: Privacy,
    pub(crate) tags: Vec<String>,
    pub(crate) selected_file: Option<SelectedFile>,
    pub(crate) alt: String,
    pub(crate) likes: Vec<String>,
    pub(crate) saves: Vec<String>,
    pub(crate) comments: Vec<Comment>,
    pub(crate) created_at: DateTime<Utc>,
}

impl UpdatePostRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        Ok(Self {
            title: normalize_required("title", &self.title)?,
            message: normalize_required("message", &self.message)?,
            name: self.name.trim().to_string(),
            creator: self.creator.trim().to_string(),
            privacy: self.privacy,
            tags: trim_tags(self.tags),
            selected_file: self.selected_file,
            alt: self.alt.trim().to_string(),
            likes: self.likes,
            saves: self.saves,
            comments: self.comments,
            created_at: self.created_at,
        })
    }

    pub(crate) fn into_post(self, id: String, updated_at: DateTime<Utc>) -> Post {
        Post {
            id,
            title: self.title,
            message: self.message,
            name: self.name,
            creator: self.creator,
            privacy: self.privacy,
            tags: self.tags,
            selected_file: self.selected_file,
            likes: self.likes,
            saves: self.saves,
            comments: self.comments,
            alt: Some(self.alt),
            created_at: self.created_at,
            updated_at: Some(updated_at),
        }
    }
}

fn normalize_required(field: &'static str, value: &str) -> Result<String, DomainError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(DomainError::Validation {
            field,
            message: "must not be empty",
        });
    }
    Ok(value.to_string())
}

fn trim_tags(tags: Vec<String>) -> Vec<String> {
    tags.into_iter()
        .map(|tag| tag.trim().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::{Comment, CreatePostRequest, Privacy, UpdatePostRequest};
    use crate::domain::error::DomainError;

    #[test]
    fn create_request_rejects_empty_title() {
        let req = sample_create_request("   ", "message");
        let err = req.validate().expect_err("title must be rejected");
        assert_validation_field(err, "title");
    }

    #[test]
    fn create_request_trims_text_fields_and_tags() {
        let mut req = sample_create_request("  Title  ", "  Message  ");
        req.name = Some("  Ada  ".to_string());
        req.tags = vec!["  rust  ".to_string(), "web".to_string()];
        req.alt = Some("  caption  ".to_string());

        let validated = req.validate().expect("must validate");
        assert_eq!(validated.title, "Title");
        assert_eq!(validated.message, "Message");
        assert_eq!(validated.name.as_deref(), Some("Ada"));
        assert_eq!(validated.tags, vec!["rust", "web"]);
        assert_eq!(validated.alt.as_deref(), Some("caption"));
    }

    #[test]
    fn update_request_rejects_empty_message() {
        let req = sample_update_request("title", "   ");
        let err = req.validate().expect_err("message must be rejected");
        assert_validation_field(err, "message");
    }

    #[test]
    fn update_request_preserves_created_at_and_lists() {
        let created_at = Utc::now();
        let mut req = sample_update_request("  title  ", "  message  ");
        req.created_at = created_at;
        req.likes = vec!["u1".to_string()];
        req.comments = vec![sample_comment("c1")];

        let updated_at = Utc::now();
        let post = req
            .validate()
            .expect("must validate")
            .into_post("507f1f77bcf86cd799439011".to_string(), updated_at);

        assert_eq!(post.title, "title");
        assert_eq!(post.created_at, created_at);
        assert_eq!(post.updated_at, Some(updated_at));
        assert_eq!(post.likes, vec!["u1"]);
        assert_eq!(post.comments.len(), 1);
    }

    #[test]
    fn privacy_defaults_to_public_for_unknown_values() {
        assert_eq!(
            serde_json::from_str::<Privacy>("\"private\"").expect("must parse"),
            Privacy::Private
        );
        assert_eq!(
            serde_json::from_str::<Privacy>("\"public\"").expect("must parse"),
            Privacy::Public
        );
        assert_eq!(
            serde_json::from_str::<Privacy>("\"friends-only\"").expect("must parse"),
            Privacy::Public
        );
    }

    fn sample_create_request(title: &str, message: &str) -> CreatePostRequest {
        CreatePostRequest {
            title: title.to_string(),
            message: message.to_string(),
            name: None,
            privacy: Privacy::Public,
            tags: Vec::new(),
            selected_file: None,
            alt: None,
        }
    }

    fn sample_update_request(title: &str, message: &str) -> UpdatePostRequest {
        UpdatePostRequest {
            title: title.to_string(),
            message: message.to_string(),
            name: "Ada".to_string(),
            creator: "507f1f77bcf86cd799439012".to_string(),
            privacy: Privacy::Public,
            tags: Vec::new(),
            selected_file: None,
            alt: String::new(),
            likes: Vec::new(),
            saves: Vec::new(),
            comments: Vec::new(),
            created_at: Utc::now(),
        }
    }

    fn sample_comment(comment_id: &str) -> Comment {
        Comment {
            user_id: "507f1f77bcf86cd799439012".to_string(),
            name: "Ada".to_string(),
            comment: "hello".to_string(),
            comment_id: comment_id.to_string(),
        }
    }

    fn assert_validation_field(err: DomainError, expected_field: &'static str) {
        match err {
            DomainError::Validation { field, .. } => assert_eq!(field, expected_field),
            _ => panic!("expected DomainError::Validation"),
        }
    }
}
