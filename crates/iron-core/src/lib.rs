//! Iron Core - Foundational types for Iron Creator
//!
//! This crate provides the types every other Iron crate depends on:
//! - `IronError` - The error taxonomy and Result alias
//! - `ContentHash` - SHA-256 based content hashing

mod error;
mod hash;

pub use error::{IronError, Result};
pub use hash::ContentHash;
