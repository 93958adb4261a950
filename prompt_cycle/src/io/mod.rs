//! Filesystem-facing helpers: configuration and line loading.

pub mod config;
pub mod error;
pub mod formats;
pub mod loader;
