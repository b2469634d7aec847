//! Utility functions for HTTP client construction.

pub mod http;
