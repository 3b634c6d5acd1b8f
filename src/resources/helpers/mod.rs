//! Shared helpers for resource implementations.
pub mod download;
pub mod fs;
