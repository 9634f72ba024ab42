use std::str::FromStr as _;

use anyhow::Context as _;
use async_trait::async_trait;
use chrono::Utc;
use entity::prelude::*;
use sea_orm::{
    ActiveModelTrait as _, ActiveValue, DatabaseConnection, EntityTrait,
    QueryOrder,
};
use uuid::Uuid;

use crate::active_models::{prelude::*, *};
use crate::store::PostStore;

#[derive(Clone, Debug)]
pub struct PostRepository {
    db: DatabaseConnection,
}

impl PostRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl TryFrom<post::Model> for PostEntity {
    type Error = anyhow::Error;

    fn try_from(value: post::Model) -> anyhow::Result<Self> {
        let category = CategoryEntity::from_str(&value.category)
            .with_context(|| {
                format!(
                    "unknown category {:?} in post {}",
                    value.category, value.id
                )
            })?;
        let hashtags = serde_json::from_value(value.hashtags)
            .with_context(|| format!("malformed hashtags in post {}", value.id))?;
        let images = serde_json::from_value(value.images)
            .with_context(|| format!("malformed images in post {}", value.id))?;

        Ok(Self {
            id: PostId(value.id),
            title: value.title,
            description: value.description,
            category,
            hashtags,
            images,
            created_by: value.created_by,
            created_at: value.created_at,
            views: value.views,
        })
    }
}

fn into_active_model(
    id: &str,
    post: NewPostEntity,
) -> anyhow::Result<post::ActiveModel> {
    let hashtags = serde_json::to_value(&post.hashtags)
        .context("failed to serialize hashtags")?;
    let images = serde_json::to_value(&post.images)
        .context("failed to serialize images")?;

    Ok(post::ActiveModel {
        id: ActiveValue::set(id.to_string()),
        title: ActiveValue::set(post.title),
        description: ActiveValue::set(post.description),
        category: ActiveValue::set(post.category.to_string()),
        hashtags: ActiveValue::set(hashtags),
        images: ActiveValue::set(images),
        created_by: ActiveValue::set(post.created_by),
        created_at: ActiveValue::set(Utc::now()),
        views: ActiveValue::set(post.views),
    })
}

#[async_trait]
impl PostStore for PostRepository {
    async fn find_all(&self) -> anyhow::Result<Vec<PostEntity>> {
        let posts = Post::find()
            .order_by_desc(post::Column::CreatedAt)
            .all(&self.db)
            .await?;

        posts.into_iter().map(PostEntity::try_from).collect()
    }

    async fn create(&self, post: NewPostEntity) -> anyhow::Result<PostId> {
        let id = Uuid::new_v4().to_string();
        let model = into_active_model(&id, post)?;

        let inserted = model
            .insert(&self.db)
            .await
            .with_context(|| format!("failed to insert post {}", id))?;

        Ok(PostId(inserted.id))
    }
}

#[cfg(test)]
mod test {
    use chrono::{TimeZone, Utc};
    use sea_orm::{DatabaseBackend, MockDatabase};
    use serde_json::json;

    use super::*;

    fn model(id: &str, category: &str) -> post::Model {
        post::Model {
            id: id.to_string(),
            title: "Welcome".to_string(),
            description: None,
            category: category.to_string(),
            hashtags: json!(["jazz"]),
            images: json!([
                { "url": "https://cdn/1.png" },
                { "url": "https://cdn/2.png", "link": "https://shop" }
            ]),
            created_by: "uid-1".to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap(),
            views: 0,
        }
    }

    #[test]
    fn test_model_into_entity() {
        // Act
        let post = PostEntity::try_from(model("p1", "music")).unwrap();

        // Assert
        assert_eq!(post.id, PostId::from("p1"));
        assert_eq!(post.category, CategoryEntity::Music);
        assert_eq!(post.hashtags, vec!["jazz".to_string()]);
        assert_eq!(post.images.len(), 2);
        assert_eq!(post.images[0].link, None);
        assert_eq!(post.images[1].link.as_deref(), Some("https://shop"));
    }

    #[test]
    fn test_unknown_category_is_rejected() {
        let err = PostEntity::try_from(model("p1", "poetry")).unwrap_err();

        assert_eq!(err.to_string(), "unknown category \"poetry\" in post p1");
    }

    #[test]
    fn test_malformed_json_names_the_post() {
        // Arrange
        let mut hashtags = model("p7", "music");
        hashtags.hashtags = json!({ "jazz": true });
        let mut images = model("p8", "music");
        images.images = json!(["https://cdn/1.png"]);

        // Act
        let hashtags_err = PostEntity::try_from(hashtags).unwrap_err();
        let images_err = PostEntity::try_from(images).unwrap_err();

        // Assert
        assert_eq!(hashtags_err.to_string(), "malformed hashtags in post p7");
        assert_eq!(images_err.to_string(), "malformed images in post p8");
    }

    #[tokio::test]
    async fn test_find_all_converts_rows() {
        // Arrange
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![
                model("p2", "film"),
                model("p1", "music"),
            ]])
            .into_connection();
        let repository = PostRepository::new(db);

        // Act
        let posts = repository.find_all().await.unwrap();

        // Assert
        let ids: Vec<_> = posts.iter().map(|p| p.id.0.as_str()).collect();
        assert_eq!(ids, ["p2", "p1"]);
    }

    #[tokio::test]
    async fn test_create_returns_stored_id() {
        // Arrange
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![model("p9", "music")]])
            .into_connection();
        let repository = PostRepository::new(db);
        let post = NewPostEntity {
            title: "Welcome".to_string(),
            category: CategoryEntity::Music,
            hashtags: vec!["jazz".to_string()],
            images: vec![ImageEntity {
                url: "https://cdn/1.png".to_string(),
                link: None,
            }],
            created_by: "uid-1".to_string(),
            ..Default::default()
        };

        // Act
        let id = repository.create(post).await.unwrap();

        // Assert
        assert_eq!(id, PostId::from("p9"));
    }
}
