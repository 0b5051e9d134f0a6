//! Application services: use-case orchestration.
//!
//! Each service module implements a single workflow step by composing domain
//! logic with port trait calls. Services import only from `crate::domain` and
//! `crate::application::ports`, never from `crate::infra`, `crate::commands`,
//! or `crate::output`.

pub mod activation;
pub mod dependencies;
pub mod env_file;
pub mod environment;
pub mod install;
pub mod packages;
pub mod preflight;
pub mod sanity;
pub mod shell_integration;
pub mod status;
pub mod unit_file;


use std::process::Output;

use anyhow::Result;

use crate::domain::StepError;

/// Turn a non-zero exit into a [`StepError`] carrying the captured stderr.
///
/// # Errors
///
/// Returns an error if `output` did not exit successfully.
pub(crate) fn ensure_success(output: &Output, step: &'static str, program: &str) -> Result<()> {
    if output.status.success() {
        return Ok(());
    }
    Err(StepError {
        step,
        program: program.to_string(),
        code: output.status.code(),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    }
    .into())
}
