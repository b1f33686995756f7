//! Infrastructure adapters for Prozes.
//!
//! This crate implements the ports defined in `prozes-core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod filesystem;
pub mod process;
pub mod template_store;

// Re-export commonly used adapters
pub use filesystem::LocalFilesystem;
pub use process::ProcessFinalizer;
pub use template_store::FsTemplateStore;
