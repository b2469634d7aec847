//! Local persistence, configuration and logging.

pub mod config;
pub mod local_data;
pub mod local_store;
pub mod logger;
pub mod paths;
