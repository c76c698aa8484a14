use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::{Bson, DateTime as BsonDateTime, Document, doc};
use futures::TryStreamExt;
use mongodb::options::ReturnDocument;
use mongodb::{Collection, Database};
use serde::{Deserialize, Serialize};

use crate::data::post_repository::{NewPost, PostRepository};
use crate::domain::error::DomainError;
use crate::domain::post::{Comment, Post, Privacy, SelectedFile};

/// Stored shape of a post. Array fields default to empty and `createdAt` to
/// the epoch so documents written by earlier revisions of the collection
/// still deserialize.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PostDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    id: Option<ObjectId>,
    title: String,
    message: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    creator: String,
    #[serde(default)]
    privacy: Privacy,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    selected_file: Option<SelectedFile>,
    #[serde(default)]
    likes: Vec<String>,
    #[serde(default)]
    saves: Vec<String>,
    #[serde(default)]
    comments: Vec<Comment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    alt: Option<String>,
    #[serde(default = "epoch")]
    created_at: BsonDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    updated_at: Option<BsonDateTime>,
}

fn epoch() -> BsonDateTime {
    BsonDateTime::from_millis(0)
}

impl PostDocument {
    fn from_new(input: NewPost) -> Self {
        PostDocument {
            id: None,
            title: input.title,
            message: input.message,
            name: input.name,
            creator: input.creator,
            privacy: input.privacy,
            tags: input.tags,
            selected_file: input.selected_file,
            likes: Vec::new(),
            saves: Vec::new(),
            comments: Vec::new(),
            alt: input.alt,
            created_at: BsonDateTime::from_chrono(input.created_at),
            updated_at: None,
        }
    }

    fn from_post(post: Post, id: ObjectId) -> Self {
        PostDocument {
            id: Some(id),
            title: post.title,
            message: post.message,
            name: post.name,
            creator: post.creator,
            privacy: post.privacy,
            tags: post.tags,
            selected_file: post.selected_file,
            likes: post.likes,
            saves: post.saves,
            comments: post.comments,
            alt: post.alt,
            created_at: BsonDateTime::from_chrono(post.created_at),
            updated_at: post.updated_at.map(BsonDateTime::from_chrono),
        }
    }

    fn into_post(self) -> Post {
        Post {
            id: self.id.map(|oid| oid.to_hex()).unwrap_or_default(),
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
            alt: self.alt,
            created_at: self.created_at.to_chrono(),
            updated_at: self.updated_at.map(|stamp| stamp.to_chrono()),
        }
    }
}

#[derive(Clone)]
pub(crate) struct MongoPostRepository {
    collection: Collection<PostDocument>,
}

impl MongoPostRepository {
    pub(crate) fn new(database: &Database) -> Self {
        Self {
            collection: database.collection("posts"),
        }
    }

    async fn find_sorted(&self, filter: Document) -> Result<Vec<Post>, DomainError> {
        let documents: Vec<PostDocument> = self
            .collection
            .find(filter)
            .sort(doc! { "_id": -1 })
            .await
            .map_err(store_error)?
            .try_collect()
            .await
            .map_err(store_error)?;
        Ok(documents.into_iter().map(PostDocument::into_post).collect())
    }

    /// `$pull` when the user is already in `field`, otherwise `$addToSet`;
    /// each arm is a single atomic update so concurrent toggles by distinct
    /// users never overwrite each other.
    async fn toggle_membership(
        &self,
        post_id: &str,
        user_id: &str,
        field: &str,
    ) -> Result<Option<Post>, DomainError> {
        let Some(oid) = parse_object_id(post_id) else {
            return Ok(None);
        };

        let mut present_filter = doc! { "_id": oid };
        present_filter.insert(field, user_id);
        let mut pull = Document::new();
        pull.insert(field, user_id);

        let pulled = self
            .collection
            .find_one_and_update(present_filter, doc! { "$pull": pull })
            .return_document(ReturnDocument::After)
            .await
            .map_err(store_error)?;
        if let Some(document) = pulled {
            return Ok(Some(document.into_post()));
        }

        let mut add = Document::new();
        add.insert(field, user_id);
        let added = self
            .collection
            .find_one_and_update(doc! { "_id": oid }, doc! { "$addToSet": add })
            .return_document(ReturnDocument::After)
            .await
            .map_err(store_error)?;
        Ok(added.map(PostDocument::into_post))
    }
}

#[async_trait]
impl PostRepository for MongoPostRepository {
    async fn create_post(&self, input: NewPost) -> Result<Post, DomainError> {
        let mut document = PostDocument::from_new(input);
        let inserted = self
            .collection
            .insert_one(&document)
            .await
            .map_err(store_error)?;

        document.id = inserted.inserted_id.as_object_id();
        if document.id.is_none() {
            return Err(DomainError::Unexpected(
                "post store returned a non-ObjectId insert id".to_string(),
            ));
        }
        Ok(document.into_post())
    }

    async fn find_post(&self, id: &str) -> Result<Option<Post>, DomainError> {
        let Some(oid) = parse_object_id(id) else {
            return Ok(None);
        };
        let document = self
            .collection
            .find_one(doc! { "_id": oid })
            .await
            .map_err(store_error)?;
        Ok(document.map(PostDocument::into_post))
    }

    async fn replace_post(&self, post: Post) -> Result<Option<Post>, DomainError> {
        let Some(oid) = parse_object_id(&post.id) else {
            return Ok(None);
        };
        let replacement = PostDocument::from_post(post, oid);
        let replaced = self
            .collection
            .find_one_and_replace(doc! { "_id": oid }, &replacement)
            .return_document(ReturnDocument::After)
            .await
            .map_err(store_error)?;
        Ok(replaced.map(PostDocument::into_post))
    }

    async fn delete_post(&self, id: &str) -> Result<bool, DomainError> {
        let Some(oid) = parse_object_id(id) else {
            return Ok(false);
        };
        let result = self
            .collection
            .delete_one(doc! { "_id": oid })
            .await
            .map_err(store_error)?;
        Ok(result.deleted_count > 0)
    }

    async fn list_all(&self) -> Result<Vec<Post>, DomainError> {
        self.find_sorted(doc! {}).await
    }

    async fn list_page(&self, skip: u64, limit: i64) -> Result<Vec<Post>, DomainError> {
        let documents: Vec<PostDocument> = self
            .collection
            .find(doc! {})
            .sort(doc! { "_id": -1 })
            .skip(skip)
            .limit(limit)
            .await
            .map_err(store_error)?
            .try_collect()
            .await
            .map_err(store_error)?;
        Ok(documents.into_iter().map(PostDocument::into_post).collect())
    }

    async fn count_posts(&self) -> Result<u64, DomainError> {
        self.collection
            .count_documents(doc! {})
            .await
            .map_err(store_error)
    }

    async fn search_posts(
        &self,
        title_pattern: Option<&str>,
        tags: &[String],
    ) -> Result<Vec<Post>, DomainError> {
        let mut criteria: Vec<Bson> = Vec::new();
        if let Some(pattern) = title_pattern {
            criteria.push(Bson::Document(
                doc! { "title": { "$regex": pattern, "$options": "i" } },
            ));
        }
        if !tags.is_empty() {
            let tags: Vec<Bson> = tags.iter().map(|tag| Bson::String(tag.clone())).collect();
            criteria.push(Bson::Document(doc! { "tags": { "$in": tags } }));
        }
        if criteria.is_empty() {
            return Ok(Vec::new());
        }

        self.find_sorted(doc! { "$or": criteria }).await
    }

    async fn find_by_creator(&self, creator: &str) -> Result<Vec<Post>, DomainError> {
        self.find_sorted(doc! { "creator": creator }).await
    }

    async fn find_saved_by(&self, user_id: &str) -> Result<Vec<Post>, DomainError> {
        self.find_sorted(doc! { "saves": user_id }).await
    }

    async fn toggle_like(
        &self,
        post_id: &str,
        user_id: &str,
    ) -> Result<Option<Post>, DomainError> {
        self.toggle_membership(post_id, user_id, "likes").await
    }

    async fn toggle_save(
        &self,
        post_id: &str,
        user_id: &str,
    ) -> Result<Option<Post>, DomainError> {
        self.toggle_membership(post_id, user_id, "saves").await
    }

    async fn add_comment(
        &self,
        post_id: &str,
        comment: Comment,
    ) -> Result<Option<Post>, DomainError> {
        let Some(oid) = parse_object_id(post_id) else {
            return Ok(None);
        };
        let comment = bson::to_bson(&comment)
            .map_err(|e| DomainError::Unexpected(format!("comment failed to serialize: {e}")))?;
        let updated = self
            .collection
            .find_one_and_update(
                doc! { "_id": oid },
                doc! { "$push": { "comments": comment } },
            )
            .return_document(ReturnDocument::After)
            .await
            .map_err(store_error)?;
        Ok(updated.map(PostDocument::into_post))
    }

    async fn remove_comments(
        &self,
        post_id: &str,
        comment_id: &str,
    ) -> Result<Option<Post>, DomainError> {
        let Some(oid) = parse_object_id(post_id) else {
            return Ok(None);
        };
        let updated = self
            .collection
            .find_one_and_update(
                doc! { "_id": oid },
                doc! { "$pull": { "comments": { "commentId": comment_id } } },
            )
            .return_document(ReturnDocument::After)
            .await
            .map_err(store_error)?;
        Ok(updated.map(PostDocument::into_post))
    }
}

fn parse_object_id(id: &str) -> Option<ObjectId> {
    ObjectId::parse_str(id).ok()
}

fn store_error(e: mongodb::error::Error) -> DomainError {
    DomainError::Unexpected(format!("post store failure: {e}"))
}
