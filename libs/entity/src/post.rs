use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier assigned by the persistence layer.
#[derive(Debug, Default, PartialEq, Eq, Hash, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(pub String);

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for PostId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for PostId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// A published magazine post.
///
/// `images` is in display order and is never empty once persisted; the
/// first image is the card thumbnail.
#[derive(Debug, Default, PartialEq, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub description: Option<String>,
    pub category: Category,
    pub hashtags: Vec<String>,
    pub images: Vec<Image>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub views: i64,
}

impl Post {
    pub fn thumbnail(&self) -> Option<&Image> {
        self.images.first()
    }

    pub fn has_hashtag(&self, tag: &str) -> bool {
        self.hashtags.iter().any(|t| t == tag)
    }
}

/// A post that has not been written yet. The persistence layer assigns
/// `id` and `created_at`.
#[derive(Debug, Default, PartialEq, Clone, Serialize, Deserialize)]
pub struct NewPost {
    pub title: String,
    pub description: Option<String>,
    pub category: Category,
    pub hashtags: Vec<String>,
    pub images: Vec<Image>,
    pub created_by: String,
    pub views: i64,
}

impl NewPost {
    pub fn into_post(self, id: PostId, created_at: DateTime<Utc>) -> Post {
        Post {
            id,
            title: self.title,
            description: self.description,
            category: self.category,
            hashtags: self.hashtags,
            images: self.images,
            created_by: self.created_by,
            created_at,
            views: self.views,
        }
    }
}

#[derive(Debug, Default, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct Image {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

#[derive(
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Category {
    BoardGame,
    Perfume,
    Cocktail,
    Music,
    Film,
    #[default]
    Other,
}
