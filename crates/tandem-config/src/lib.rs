//! Build-plan composition for a browser UI bundle and its isolated worker.
//!
//! The plan is a pure function of the build mode and the project layout:
//!
//! ```
//! use tandem_config::{BuildPlan, ProjectConfig, validate_invariants};
//!
//! let plan = BuildPlan::assemble(Some("development"), &ProjectConfig::at("/app")).unwrap();
//! validate_invariants(&plan).unwrap();
//! assert!(plan.main().unwrap().has_plugin("native-module"));
//! ```

pub mod base;
pub mod dev;
pub mod discovery;
pub mod error;
pub mod layout;
pub mod mode;
pub mod plan;
pub mod plugins;
pub mod target;
pub mod types;
pub mod validation;

// Re-export main types
pub use base::{build_base, BaseDefinition};
pub use dev::*;
pub use error::*;
pub use layout::{ProjectConfig, ProjectLayout};
pub use mode::{resolve_mode, BuildMode, MODE_ENV_VAR};
pub use plan::{assemble_plan, BuildPlan};
pub use plugins::*;
pub use target::{compose, TargetDescriptor, TargetSpec};
pub use types::*;

// Re-export discovery and validation
pub use discovery::{discover, ConfigDiscovery};
pub use validation::{validate_fs, validate_invariants, FsValidator, InvariantValidator, PlanValidator};
