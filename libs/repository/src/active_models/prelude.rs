pub use super::activity::Entity as Activity;
pub use super::admin::Entity as Admin;
pub use super::post::Entity as Post;
