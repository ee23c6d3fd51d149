//! # Core Routing Logic
//!
//! Everything between "the web view intercepted a URL" and "open this
//! screen". It knows nothing about the embedding UI or the HTTP transport.
//!
//! ```text
//!              ┌─────────────────────────┐
//!   URLs ────► │   classifier (pure)     │
//!              └───────────┬─────────────┘
//!                          ▼
//!              ┌─────────────────────────┐      ┌──────────────┐
//!              │   coordinator (tasks)   │ ───► │   fetcher    │ ──► ApiClient
//!              └───────────┬─────────────┘      └──────────────┘
//!                          ▼
//!        web_view_url · start_comments · start_update
//! ```
//!
//! ## Modules
//!
//! - [`types`]: `Project`, `Update`, `NavigationRequest`
//! - [`classifier`]: URL routing and param extraction
//! - [`fetcher`]: fail-silent wrapper around the API client
//! - [`switch`]: latest-wins cancellation for request channels
//! - [`coordinator`]: the pipelines tying it all together
//! - [`config`]: layered settings

pub mod classifier;
pub mod config;
pub mod coordinator;
pub mod fetcher;
pub mod switch;
pub mod types;

pub use classifier::{ClassifyError, ProjectUpdateParams, Route, classify, route};
pub use coordinator::{CoordinatorOutputs, Environment, NavigationCoordinator};
pub use types::{NavigationRequest, Project, Update};
