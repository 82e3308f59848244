//! Proxy module for loading and rotating upstream proxies
//!
//! This module provides functionality for:
//! - Parsing proxies from flat files (IP:PORT, IP:PORT:USER:PASS, etc.)
//! - Rotating through a configured proxy list (round-robin or random)

pub mod models;
pub mod parser;
pub mod rotation;

pub use models::{Proxy, ProxyAuth, ProxyScheme};
pub use rotation::{ProxyCursor, RotationStrategy};
