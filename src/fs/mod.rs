//! Filesystem module.
//!
//! Provides:
//! - Path and directory management
//! - Path component sanitizing

pub mod naming;
pub mod paths;

pub use naming::sanitize_path_component;
pub use paths::{atomic_write, ensure_dir, expand_tilde, resolve_download_path, staging_path};
