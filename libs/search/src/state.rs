use entity::prelude::*;
use tracing::debug;

use crate::compute_visible;

/// The two filter predicates a reader controls.
#[derive(Debug, Default, PartialEq, Eq, Clone)]
pub struct FilterState {
    query: String,
    active_tag: Option<String>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn active_tag(&self) -> Option<&str> {
        self.active_tag.as_deref()
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// Applies `tag` as the tag filter and clears the query. Selecting the
    /// tag that is already active removes the tag filter instead.
    pub fn select_tag(&mut self, tag: &str) {
        if self.active_tag.as_deref() == Some(tag) {
            debug!(task = "clear tag", tag);
            self.active_tag = None;
        } else {
            debug!(task = "select tag", tag);
            self.active_tag = Some(tag.to_string());
            self.query.clear();
        }
    }

    pub fn clear(&mut self) {
        self.query.clear();
        self.active_tag = None;
    }

    pub fn is_active(&self) -> bool {
        self.active_tag.is_some() || !self.query.trim().is_empty()
    }

    pub fn visible(&self, posts: &[PostEntity]) -> Vec<PostEntity> {
        compute_visible(posts, &self.query, self.active_tag())
    }
}
