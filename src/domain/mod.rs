//! Domain entities mirrored from the health API.

pub mod client;
pub mod program;
pub mod types;
