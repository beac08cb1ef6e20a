pub mod articles;
pub mod dashboard;
pub mod extractors;
pub mod feeds;
pub mod friends;
pub mod projects;
pub mod slides;
pub mod tags;
