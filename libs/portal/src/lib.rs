//! A reader's session over the magazine: the loaded post list, the
//! active filters, activity logging and, for admins, post submission.

use std::sync::Arc;

use entity::prelude::*;
use repository::{AdminCheck, PostStore};
use search::{all_hashtags, FilterState};
use submission::{Draft, SubmissionError, SubmissionPipeline};
use tracing::{error, info};

mod activity;

pub use activity::{ActivityLogger, DEFAULT_CAPACITY};

/// Searches shorter than this many characters are not logged.
const MIN_LOGGED_QUERY_CHARS: usize = 3;

#[derive(Debug, thiserror::Error)]
pub enum PortalError {
    #[error("failed to load posts: {0:#}")]
    Load(#[source] anyhow::Error),

    #[error("failed to check admin rights for {uid}: {source:#}")]
    AdminCheck {
        uid: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("user {uid} may not create posts")]
    Forbidden { uid: String },

    #[error(transparent)]
    Submission(#[from] SubmissionError),
}

/// Collaborators a session works against.
#[derive(Clone)]
pub struct Services {
    pub posts: Arc<dyn PostStore>,
    pub admins: Arc<dyn AdminCheck>,
    pub activity: ActivityLogger,
    pub pipeline: SubmissionPipeline,
}

pub struct Portal {
    user: UserEntity,
    is_admin: bool,
    posts: Vec<PostEntity>,
    filter: FilterState,
    services: Services,
}

impl Portal {
    /// Loads the session content. Admin rights are checked once here.
    pub async fn load(
        user: UserEntity,
        services: Services,
    ) -> Result<Self, PortalError> {
        let is_admin = services.admins.is_admin(&user.uid).await.map_err(
            |source| PortalError::AdminCheck {
                uid: user.uid.clone(),
                source,
            },
        )?;
        let posts = services.posts.find_all().await.map_err(PortalError::Load)?;

        info!(
            task = "load content",
            uid = %user.uid,
            is_admin,
            posts = posts.len()
        );

        Ok(Self {
            user,
            is_admin,
            posts,
            filter: FilterState::new(),
            services,
        })
    }

    pub fn user(&self) -> &UserEntity {
        &self.user
    }

    pub fn is_admin(&self) -> bool {
        self.is_admin
    }

    pub fn posts(&self) -> &[PostEntity] {
        &self.posts
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn visible(&self) -> Vec<PostEntity> {
        self.filter.visible(&self.posts)
    }

    pub fn hashtags(&self) -> Vec<String> {
        all_hashtags(&self.posts)
    }

    pub async fn refresh(&mut self) -> Result<(), PortalError> {
        self.posts = self
            .services
            .posts
            .find_all()
            .await
            .map_err(PortalError::Load)?;

        Ok(())
    }

    pub fn search(&mut self, query: &str) {
        self.filter.set_query(query);

        let trimmed = query.trim();
        if trimmed.chars().count() >= MIN_LOGGED_QUERY_CHARS {
            self.log(ActivityActionEntity::Search {
                query: trimmed.to_string(),
            });
        }
    }

    /// Toggles the tag filter; selecting a new tag clears the query.
    pub fn select_tag(&mut self, tag: &str) {
        self.filter.select_tag(tag);
    }

    pub fn clear_filters(&mut self) {
        self.filter.clear();
    }

    pub fn view_post(&self, id: &PostId) -> Option<&PostEntity> {
        let post = self.find(id)?;

        self.log(ActivityActionEntity::ViewPost {
            post_id: post.id.clone(),
            title: post.title.clone(),
        });

        Some(post)
    }

    /// External link of the image at `index`, if it has one.
    pub fn open_image_link(&self, id: &PostId, index: usize) -> Option<&str> {
        let post = self.find(id)?;
        let link = post.images.get(index)?.link.as_deref()?;

        self.log(ActivityActionEntity::ClickImageLink {
            post_id: post.id.clone(),
            link: link.to_string(),
        });

        Some(link)
    }

    /// Publishes the draft and reloads the post list. Only admins may
    /// submit.
    pub async fn submit(&mut self, draft: Draft) -> Result<PostId, PortalError> {
        if !self.is_admin {
            return Err(PortalError::Forbidden {
                uid: self.user.uid.clone(),
            });
        }

        let id = self
            .services
            .pipeline
            .submit_draft(&self.user.uid, draft)
            .await?;

        if let Err(e) = self.refresh().await {
            error!(task = "refresh after submit", post_id = %id, err = e.to_string());
        }

        Ok(id)
    }

    fn find(&self, id: &PostId) -> Option<&PostEntity> {
        self.posts.iter().find(|post| &post.id == id)
    }

    fn log(&self, action: ActivityActionEntity) {
        self.services.activity.log(&self.user.uid, action);
    }
}
