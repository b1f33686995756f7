//! Command handlers. Each translates parsed arguments into a service call
//! and renders the result; no business logic lives here.

pub mod completions;
pub mod config;
pub mod init;
pub mod template;
