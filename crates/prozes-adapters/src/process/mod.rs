//! Post-generation setup steps driven through external programs.

mod finalizer;

pub use finalizer::ProcessFinalizer;
