//! Filesystem adapters.

mod local;

pub use local::LocalFilesystem;
pub(crate) use local::map_io_error;
