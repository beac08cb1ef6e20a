pub mod article;
pub mod dashboard;
pub mod feed;
pub mod friend;
pub mod project;
pub mod slide;
pub mod sqlx_repo;
pub mod tag;
