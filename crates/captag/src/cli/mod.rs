//! Command handlers.

pub mod caption;
pub mod config;
pub mod interactive;
pub mod projects;
pub mod types;
