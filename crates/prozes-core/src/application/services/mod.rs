//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish the
//! template-engine use cases: capture (`save`), instantiate (`use`) and the
//! catalog (`list`, `show`, `delete`).

pub mod capture_service;
pub mod catalog_service;
pub mod instantiate_service;

pub use capture_service::{CaptureReport, CaptureRequest, CaptureService, SkipReason, SkippedPath};
pub use catalog_service::{CatalogService, TemplateDetails, TemplateSummary};
pub use instantiate_service::{
    InstantiateReport, InstantiateRequest, InstantiateService, resolve_variables,
};
