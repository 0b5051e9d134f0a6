//! Per-step results and the reports rendered by the presentation layer.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// What a step did to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepOutcome {
    /// An artifact that did not exist was created.
    Created,
    /// An existing artifact was rewritten because it differed.
    Updated,
    /// The artifact already matched; nothing was written.
    Unchanged,
    /// The step did not apply (e.g. no manifest present).
    Skipped,
    /// A command-only step ran to completion.
    Done,
}

impl StepOutcome {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Unchanged => "unchanged",
            Self::Skipped => "skipped",
            Self::Done => "done",
        }
    }

    /// `true` when the step modified the host.
    #[must_use]
    pub fn changed(self) -> bool {
        matches!(self, Self::Created | Self::Updated | Self::Done)
    }
}

/// Workflow stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Packages,
    Environment,
    ToolingUpgrade,
    ManifestGeneration,
    Manifest,
    CriticalPackages,
    SanityCheck,
    UnitFile,
    EnvFile,
    Activation,
    ShellAliases,
}

impl Step {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Packages => "OS packages",
            Self::Environment => "virtual environment",
            Self::ToolingUpgrade => "installer tooling",
            Self::ManifestGeneration => "manifest generation",
            Self::Manifest => "manifest dependencies",
            Self::CriticalPackages => "critical packages",
            Self::SanityCheck => "sanity check",
            Self::UnitFile => "unit file",
            Self::EnvFile => "environment file",
            Self::Activation => "service activation",
            Self::ShellAliases => "shell aliases",
        }
    }
}

/// Result of one workflow step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepRecord {
    pub step: Step,
    pub outcome: StepOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl StepRecord {
    #[must_use]
    pub fn new(step: Step, outcome: StepOutcome) -> Self {
        Self {
            step,
            outcome,
            detail: None,
        }
    }

    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// Parsed output of the environment sanity probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeResult {
    pub module_version: String,
    pub interpreter: String,
}

/// Python program run inside the environment: prints the module version on
/// the first line and the interpreter path on the second.
#[must_use]
pub fn probe_script(module: &str) -> String {
    format!(
        "import sys, importlib; m = importlib.import_module('{module}'); \
         print(getattr(m, '__version__', 'unknown')); print(sys.executable)"
    )
}

/// Parse the two-line probe output.
#[must_use]
pub fn parse_probe_output(stdout: &str) -> Option<ProbeResult> {
    let mut lines = stdout.lines().map(str::trim).filter(|l| !l.is_empty());
    let module_version = lines.next()?.to_string();
    let interpreter = lines.next()?.to_string();
    Some(ProbeResult {
        module_version,
        interpreter,
    })
}

/// Service state from a single `systemctl is-active` poll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivationStatus {
    pub active: bool,
    /// Raw state word, e.g. `active`, `activating`, `failed`.
    pub state: String,
}

/// Summary of a full install run.
#[derive(Debug, Clone, Serialize)]
pub struct InstallReport {
    pub service: String,
    pub user: String,
    pub unit_path: PathBuf,
    pub started_at: DateTime<Utc>,
    pub steps: Vec<StepRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probe: Option<ProbeResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activation: Option<ActivationStatus>,
}

impl InstallReport {
    #[must_use]
    pub fn outcome_of(&self, step: Step) -> Option<StepOutcome> {
        self.steps.iter().find(|r| r.step == step).map(|r| r.outcome)
    }
}

/// On-disk state of a managed artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactState {
    Missing,
    Current,
    Stale,
    /// The artifact exists but could not be read.
    Unknown,
}

impl ArtifactState {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Missing => "missing",
            Self::Current => "current",
            Self::Stale => "stale",
            Self::Unknown => "unknown",
        }
    }
}

/// Read-only view of the host, produced by the `status` command.
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub service: String,
    pub user: String,
    pub entry_present: bool,
    pub venv_present: bool,
    pub manifest_present: bool,
    /// `None` when no config module is expected.
    pub config_module_present: Option<bool>,
    pub unit_file: ArtifactState,
    pub env_file_present: bool,
    pub rc_file: PathBuf,
    pub aliases: ArtifactState,
    pub service_state: String,
}
