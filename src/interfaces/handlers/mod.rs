pub mod articles;
pub mod dashboard;
pub mod envelope;
pub mod feeds;
pub mod friends;
pub mod home;
pub mod projects;
pub mod slides;
pub mod system;
pub mod tags;
