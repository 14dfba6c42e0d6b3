//! Storage layer for the programme engines.
//!
//! The engines never talk to a concrete store; they depend on the repository
//! traits in [`repository`], which any backend can satisfy.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Presentation Layer (CLI, HTTP handlers, ...)           │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Service Layer (crate::services)                        │
//! │  - Heatmap generation and activity stats                │
//! │  - Programme prediction and calendar grids              │
//! │  - Follower ranking                                      │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Repository Traits (repository) - Abstract Interface    │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!     ┌──────────────────────────────────────────────┐
//!     │             Local Repository                  │
//!     │               (in-memory)                     │
//!     └──────────────────────────────────────────────┘
//! ```
//!
//! The module includes:
//! - `repository`: store traits and the `RepositoryError` type
//! - `repositories::local`: in-memory implementation for tests and local runs
//! - `factory`: creates repository instances from type or configuration
//! - `repo_config`: TOML configuration

#[cfg(not(feature = "local-repo"))]
compile_error!("Enable at least one repository backend feature.");

pub mod factory;
pub mod repo_config;
pub mod repositories;
pub mod repository;

pub use factory::{RepositoryFactory, RepositoryType};
pub use repo_config::{EngineSettings, ProgrammeConfig, RepositorySettings, DEFAULT_GLOBAL_LIMIT};
#[cfg(feature = "local-repo")]
pub use repositories::{LocalRepository, LocalSeed};
pub use repository::{
    ActivityRepository, CustomProgrammeRepository, ErrorContext, FollowRepository,
    FullRepository, HeatmapRepository, RepositoryError, RepositoryResult, StreamerRepository,
};
