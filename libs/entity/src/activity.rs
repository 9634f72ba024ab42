use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::post::PostId;

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Activity {
    pub user_id: String,
    #[serde(flatten)]
    pub action: ActivityAction,
    pub created_at: DateTime<Utc>,
}

impl Activity {
    pub fn new(user_id: impl Into<String>, action: ActivityAction) -> Self {
        Self {
            user_id: user_id.into(),
            action,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ActivityAction {
    Search { query: String },
    ViewPost { post_id: PostId, title: String },
    ClickImageLink { post_id: PostId, link: String },
}

impl ActivityAction {
    pub fn name(&self) -> &'static str {
        match self {
            ActivityAction::Search { .. } => "search",
            ActivityAction::ViewPost { .. } => "view_post",
            ActivityAction::ClickImageLink { .. } => "click_image_link",
        }
    }

    /// Event context without the action tag.
    pub fn context(&self) -> serde_json::Value {
        let mut value = serde_json::to_value(self).unwrap_or_default();
        if let Some(object) = value.as_object_mut() {
            object.remove("action");
        }
        value
    }
}
