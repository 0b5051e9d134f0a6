//! systemd unit rendering.

use std::fmt::Write as _;

use crate::domain::layout::{Account, InstallLayout};

/// Everything substituted into the rendered unit.
#[derive(Debug, Clone)]
pub struct UnitSpec<'a> {
    pub description: &'a str,
    pub user: &'a str,
    pub working_directory: String,
    pub environment_file: String,
    pub exec_start: String,
    pub restart_sec: u32,
    /// The only path the sandbox leaves writable.
    pub read_write_path: String,
}

impl<'a> UnitSpec<'a> {
    #[must_use]
    pub fn new(layout: &'a InstallLayout, account: &'a Account) -> Self {
        Self {
            description: &layout.description,
            user: &account.name,
            working_directory: layout.bot_dir.display().to_string(),
            environment_file: layout.env_path.display().to_string(),
            exec_start: format!(
                "{} {}",
                quote_arg(&layout.venv_python().display().to_string()),
                quote_arg(&layout.entry.display().to_string())
            ),
            restart_sec: layout.restart_sec,
            read_write_path: quote_arg(&layout.bot_dir.display().to_string()),
        }
    }

    /// Render the unit file body.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "[Unit]");
        let _ = writeln!(out, "Description={}", self.description);
        let _ = writeln!(out, "After=network-online.target");
        let _ = writeln!(out, "Wants=network-online.target");
        let _ = writeln!(out);
        let _ = writeln!(out, "[Service]");
        let _ = writeln!(out, "Type=simple");
        let _ = writeln!(out, "User={}", self.user);
        let _ = writeln!(out, "WorkingDirectory={}", self.working_directory);
        // Leading '-' keeps the unit startable when the env file is removed.
        let _ = writeln!(out, "EnvironmentFile=-{}", self.environment_file);
        let _ = writeln!(out, "ExecStart={}", self.exec_start);
        let _ = writeln!(out, "Restart=on-failure");
        let _ = writeln!(out, "RestartSec={}", self.restart_sec);
        let _ = writeln!(out, "NoNewPrivileges=true");
        let _ = writeln!(out, "PrivateTmp=true");
        let _ = writeln!(out, "ProtectSystem=strict");
        let _ = writeln!(out, "ReadWritePaths={}", self.read_write_path);
        let _ = writeln!(out, "ProtectKernelTunables=true");
        let _ = writeln!(out);
        let _ = writeln!(out, "[Install]");
        let _ = writeln!(out, "WantedBy=multi-user.target");
        out
    }
}

/// Quote an `ExecStart=` argument or a `ReadWritePaths=` entry when it
/// contains whitespace or quotes. Both settings split on whitespace.
fn quote_arg(arg: &str) -> String {
    if arg.chars().any(|c| c.is_whitespace() || c == '"' || c == '\\') {
        let escaped = arg.replace('\\', "\\\\").replace('"', "\\\"");
        format!("\"{escaped}\"")
    } else {
        arg.to_string()
    }
}
