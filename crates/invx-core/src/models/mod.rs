//! Data models for the extraction engine.

pub mod config;
pub mod invoice;
