//! Infrastructure layer: external integrations.

pub mod config;
pub mod judge;
