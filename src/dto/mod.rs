//! DTO modules that bridge the views with templates and JSON endpoints.

pub mod api;
pub mod client;
pub mod main;
