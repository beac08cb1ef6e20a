pub mod article;
pub mod dashboard;
pub mod feed;
pub mod friend;
pub mod option_fields;
pub mod pagination;
pub mod project;
pub mod slide;
pub mod tag;
pub mod token;
