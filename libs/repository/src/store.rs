use async_trait::async_trait;
use entity::prelude::*;

/// Read and write access to published posts.
#[async_trait]
pub trait PostStore: Send + Sync {
    /// Every post, newest first.
    async fn find_all(&self) -> anyhow::Result<Vec<PostEntity>>;

    /// Writes the post as one record. Either the whole post is stored or
    /// nothing is.
    async fn create(&self, post: NewPostEntity) -> anyhow::Result<PostId>;
}

#[async_trait]
pub trait AdminCheck: Send + Sync {
    async fn is_admin(&self, uid: &str) -> anyhow::Result<bool>;
}

#[async_trait]
pub trait ActivitySink: Send + Sync {
    async fn record(&self, activity: ActivityEntity) -> anyhow::Result<()>;
}
