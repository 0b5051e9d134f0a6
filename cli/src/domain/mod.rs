//! Domain layer: pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, or `std::process`.
//! All functions are synchronous and take data in, returning data out.

pub mod aliases;
pub mod config;
pub mod digest;
pub mod env_file;
pub mod error;
pub mod layout;
pub mod report;
pub mod unit;

pub use aliases::{AliasBlock, rc_file_for};
pub use config::{InstallerConfig, validate_env_entry, validate_service_name};
pub use error::{ConfigError, PreflightError, StepError};
pub use layout::{Account, InstallLayout, InvokerEnv};
pub use report::{
    ActivationStatus, ArtifactState, InstallReport, ProbeResult, StatusReport, Step, StepOutcome,
    StepRecord,
};
pub use unit::UnitSpec;
