//! Common utilities for the Marten layout core.
//!
//! This crate provides shared infrastructure used by the style and layout crates:
//! - **Warning System** - deduplicated, colored terminal output for recovered conditions

pub mod warning;
