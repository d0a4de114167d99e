pub mod analytics;
pub mod browser;
pub mod config;
pub mod error;
pub mod event;
pub mod id;
pub mod store;
