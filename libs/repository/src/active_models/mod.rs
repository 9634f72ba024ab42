pub mod prelude;

pub mod activity;
pub mod admin;
pub mod post;
