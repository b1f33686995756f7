//! Prozes Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers of the Prozes
//! template engine: capturing a project directory as a reusable template and
//! instantiating it again with variable substitution.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │            prozes-cli (CLI)             │
//! │     (Implements Driving Ports)          │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │  (Capture, Instantiate, Catalog)        │
//! │         Orchestrates Use Cases          │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │ (Filesystem, Store, Prompter, Finalizer)│
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │     prozes-adapters (Infrastructure)    │
//! │ (LocalFilesystem, FsTemplateStore, ...) │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │ (Names, Variables, Content, Resolution) │
//! │              No I/O                     │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use prozes_core::application::{CaptureRequest, CaptureService};
//!
//! // Adapters come from prozes-adapters
//! let service = CaptureService::new(store, filesystem);
//! let report = service.capture(CaptureRequest {
//!     source: "./my-project".into(),
//!     name: "flask-api".into(),
//!     detect_variables: true,
//!     ..Default::default()
//! })?;
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        CaptureRequest, CaptureService, CatalogService, InstantiateRequest, InstantiateService,
        ports::{Filesystem, ProjectFinalizer, Prompter, TemplateStore},
    };
    pub use crate::domain::{
        TemplateDescriptor, TemplateDraft, TemplateMetadata, TemplateName, VariableSet,
    };
    pub use crate::error::{ProzesError, ProzesResult};
}
