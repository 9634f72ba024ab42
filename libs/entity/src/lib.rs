pub mod activity;
pub mod post;
pub mod user;

pub mod prelude {
    pub use crate::activity::{
        Activity as ActivityEntity, ActivityAction as ActivityActionEntity,
    };
    pub use crate::post::{
        Category as CategoryEntity, Image as ImageEntity,
        NewPost as NewPostEntity, Post as PostEntity, PostId,
    };
    pub use crate::user::User as UserEntity;
}
