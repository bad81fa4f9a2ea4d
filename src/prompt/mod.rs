//! Interactive input module.
//!
//! Provides:
//! - The prompt contract used by the sync engine
//! - A terminal implementation

pub mod contract;
pub mod terminal;

pub use contract::{Credentials, Prompt};
pub use terminal::TerminalPrompt;
