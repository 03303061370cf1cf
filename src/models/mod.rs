//! Server-side models: configuration and per-visitor preferences.

pub mod config;
pub mod theme;
