use serde::{Deserialize, Serialize};

/// Signed-in user as reported by the identity provider. Only `uid` is
/// relied on; the rest is display data.
#[derive(Debug, Default, PartialEq, Clone, Serialize, Deserialize)]
pub struct User {
    pub uid: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
}

impl User {
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            ..Default::default()
        }
    }
}
