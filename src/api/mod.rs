//! Library service API module.
//!
//! This module provides:
//! - The catalog gateway contract the sync engine depends on
//! - HTTP client for the library REST API
//! - API response types

pub mod client;
pub mod gateway;
pub mod types;

pub use client::LibraryApi;
pub use gateway::{CatalogGateway, CatalogPage, LoginResponse};
