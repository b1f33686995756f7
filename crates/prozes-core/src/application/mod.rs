//! Application layer for Prozes.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (Capture, Instantiate, Catalog)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! business logic itself. All template-engine rules live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

// Re-export main services
pub use services::{
    CaptureReport, CaptureRequest, CaptureService, CatalogService, InstantiateReport,
    InstantiateRequest, InstantiateService, SkipReason, SkippedPath, TemplateDetails,
    TemplateSummary,
};

// Re-export port traits (for adapter implementation)
pub use ports::{
    Filesystem, ProjectFinalizer, Prompter, SetupOptions, SetupStep, StepOutcome, TemplateStore,
};

pub use error::ApplicationError;
