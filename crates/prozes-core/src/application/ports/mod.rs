//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `prozes-adapters` and the CLI
//! implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `Filesystem`: File operations and tree walking
//!   - `TemplateStore`: The on-disk template catalog
//!   - `Prompter`: Interactive variable entry
//!   - `ProjectFinalizer`: venv / git / dependency steps after instantiation
//!
//! - **Driving (Input) Ports**: Called by external world, implemented by application
//!   - (Defined in CLI layer, implemented by services)

pub mod output;

pub use output::{
    Filesystem, ProjectFinalizer, Prompter, SetupOptions, SetupStep, StepOutcome, TemplateStore,
};

#[cfg(test)]
pub use output::{MockFilesystem, MockProjectFinalizer, MockPrompter, MockTemplateStore};
