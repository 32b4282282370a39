//! Pixel QA Adapters - External adapters for pixel-qa.
//!
//! This crate provides adapters for:
//! - Filesystem image source
//! - Environment-variable configuration overrides

pub mod env;
pub mod fs;

pub use env::EnvOverrides;
pub use fs::FsImageSource;
