//! Human-readable terminal renderer.

use owo_colors::OwoColorize as _;

use crate::domain::{
    Account, ArtifactState, InstallLayout, InstallReport, StatusReport, Step, StepOutcome,
};
use crate::output::OutputContext;

/// A closing message of the install summary, printed with its prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Warn(String),
    Info(String),
}

/// Renders domain types as human-readable terminal output using `OutputContext`.
pub struct HumanRenderer<'a> {
    ctx: &'a OutputContext,
}

impl<'a> HumanRenderer<'a> {
    /// Create a new `HumanRenderer` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }

    /// Print the resolved configuration before any host mutation.
    pub fn render_layout(&self, layout: &InstallLayout, account: &Account) {
        if self.ctx.quiet {
            return;
        }
        println!();
        self.ctx.header(&format!("Installing {}", layout.service_name));
        self.ctx.kv("Bot directory:", &layout.bot_dir.display().to_string());
        self.ctx.kv("Entry:        ", &layout.entry.display().to_string());
        if let Some(module) = &layout.config_module {
            self.ctx.kv("Bot config:   ", &module.display().to_string());
        }
        self.ctx.kv("Run as:       ", &format!("{} ({})", account.name, account.home.display()));
        self.ctx.kv("Environment:  ", &layout.venv_dir.display().to_string());
        self.ctx.kv("Unit file:    ", &layout.unit_path.display().to_string());
        println!();
    }

    /// Print the completion summary and operator hints.
    pub fn render_install_report(&self, report: &InstallReport, layout: &InstallLayout) {
        if self.ctx.quiet {
            return;
        }
        println!();
        self.ctx.header("Summary:");
        for row in self.summary_rows(report) {
            println!("{row}");
        }
        println!();
        for notice in install_notices(report, layout) {
            match notice {
                Notice::Success(msg) => self.ctx.success(&msg),
                Notice::Warn(msg) => self.ctx.warn(&msg),
                Notice::Info(msg) => self.ctx.info(&msg),
            }
        }
    }

    /// One aligned row per step: label, outcome, detail.
    #[must_use]
    pub fn summary_rows(&self, report: &InstallReport) -> Vec<String> {
        report
            .steps
            .iter()
            .map(|record| {
                let outcome = record.outcome.as_str();
                let outcome = if record.outcome.changed() {
                    outcome.style(self.ctx.styles.success).to_string()
                } else {
                    outcome.style(self.ctx.styles.dim).to_string()
                };
                let detail = record.detail.as_deref().unwrap_or("");
                format!("    {:<22} {outcome:<10} {detail}", record.step.label())
                    .trim_end()
                    .to_string()
            })
            .collect()
    }

    /// Render the read-only status view.
    pub fn render_status(&self, status: &StatusReport) {
        println!();
        for line in self.status_lines(status) {
            println!("{line}");
        }
        println!();
    }

    /// Status view lines: a title, then one check per managed artifact.
    #[must_use]
    pub fn status_lines(&self, status: &StatusReport) -> Vec<String> {
        let mut lines = vec![format!(
            "  {}",
            format!("{} ({})", status.service, status.user).style(self.ctx.styles.header)
        )];
        lines.push(self.check_line(status.entry_present, "entry file present"));
        if let Some(present) = status.config_module_present {
            lines.push(self.check_line(present, "bot config module present"));
        }
        lines.push(self.check_line(status.venv_present, "virtual environment present"));
        lines.push(self.check_line(status.manifest_present, "dependency manifest present"));
        lines.push(self.state_line(status.unit_file, "unit file"));
        lines.push(self.check_line(status.env_file_present, "environment file present"));
        lines.push(self.state_line(
            status.aliases,
            &format!("aliases in {}", status.rc_file.display()),
        ));
        let active = status.service_state == "active";
        lines.push(self.check_line(active, &format!("service {}", status.service_state)));
        lines
    }

    /// Print a rendered unit verbatim.
    pub fn render_unit(&self, content: &str) {
        print!("{content}");
    }

    /// Render the CLI version information.
    pub fn render_version(&self, version: &str) {
        println!("nearbot-provision {version}");
    }

    fn state_line(&self, state: ArtifactState, what: &str) -> String {
        let warning = "\u{26a0}".style(self.ctx.styles.warning);
        match state {
            ArtifactState::Current => self.check_line(true, &format!("{what} current")),
            ArtifactState::Stale => format!("    {warning} {what} stale (re-run install to repair)"),
            ArtifactState::Unknown => format!("    {warning} {what} unknown (not readable)"),
            ArtifactState::Missing => self.check_line(false, &format!("{what} missing")),
        }
    }

    fn check_line(&self, ok: bool, msg: &str) -> String {
        if ok {
            format!("    {} {msg}", "\u{2713}".style(self.ctx.styles.success))
        } else {
            format!("    {} {msg}", "\u{2717}".style(self.ctx.styles.error))
        }
    }
}

/// Closing messages after an install: service state and where settings live.
#[must_use]
pub fn install_notices(report: &InstallReport, layout: &InstallLayout) -> Vec<Notice> {
    let svc = &report.service;
    let mut notices = Vec::new();
    if report.activation.as_ref().is_some_and(|a| a.active) {
        notices.push(Notice::Success(format!("{svc} is running as {}", report.user)));
    } else {
        notices.push(Notice::Warn(format!(
            "{svc} is not active yet. Check: sudo journalctl -u {svc} -e"
        )));
    }
    if let Some(module) = &layout.config_module {
        notices.push(Notice::Info(format!(
            "Bot settings (BotAPIKey, AdminChatID, POOL_NAME, NEAR_NETWORK) live in {}. \
             After editing, run: sudo systemctl restart {svc}",
            module.display()
        )));
    }
    if report.outcome_of(Step::EnvFile) == Some(StepOutcome::Created) {
        notices.push(Notice::Info(format!(
            "Process environment for the service: {}",
            layout.env_path.display()
        )));
    }
    match report.outcome_of(Step::ShellAliases) {
        Some(StepOutcome::Skipped) => notices.push(Notice::Warn(
            "Shell aliases were not installed, see the warning above.".to_string(),
        )),
        _ => {
            notices.push(Notice::Info(format!(
                "Aliases: {svc}-start {svc}-stop {svc}-restart {svc}-status {svc}-logs"
            )));
            notices.push(Notice::Info(
                "Open a new shell (or source your rc file) to use them.".to_string(),
            ));
        }
    }
    notices
}
