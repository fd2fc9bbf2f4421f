//! # BOM Common Library
//!
//! Shared code for the BOM explosion service:
//! - Hierarchy, deduplication and verification data model
//! - Configuration loading (TOML + environment)
//! - Common error type

pub mod config;
pub mod error;
pub mod models;

pub use error::{Error, Result};
