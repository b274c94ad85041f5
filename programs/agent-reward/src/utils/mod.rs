//! Shared helpers for instruction handlers

pub mod version;
