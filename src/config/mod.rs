//! Configuration module for audiobook-sync.
//!
//! This module handles:
//! - Loading and saving configuration from TOML files
//! - The credential/session store persisted inside it
//! - Configuration validation

pub mod loader;
pub mod session;
pub mod validation;

pub use loader::{Config, OptionsConfig, DEFAULT_API_BASE_URL};
pub use session::{Session, SessionUpdate};
pub use validation::{parse_isbn, validate_base_url, validate_config};
