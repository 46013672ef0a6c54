pub mod add;
pub mod bulk;
pub mod calendar;
pub mod common;
pub mod config;
pub mod delete;
pub mod edit;
pub mod hide;
pub mod list;
pub mod quick;
pub mod show;
