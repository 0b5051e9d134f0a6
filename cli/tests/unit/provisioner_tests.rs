//! Argument construction tests for `SystemProvisioner`.
//!
//! Verifies the exact argv handed to the command runner for package
//! management, virtual-environment tooling, and service control, and that
//! error context is attached when a program cannot be run.

#![allow(clippy::expect_used)]

use std::path::Path;

use nearbot_provision::application::ports::{PackageManager, PythonTooling, ServiceManager};
use nearbot_provision::domain::Account;
use nearbot_provision::infra::provisioner::SystemProvisioner;

use crate::helpers::account_with_home;
use crate::mocks::MockCommandRunner;

fn provisioner() -> (SystemProvisioner<MockCommandRunner>, MockCommandRunner) {
    let runner = MockCommandRunner::default();
    (SystemProvisioner::new(runner.clone(), runner.clone()), runner)
}

fn alice() -> Account {
    account_with_home("alice", Path::new("/home/alice"))
}

fn root() -> Account {
    Account {
        name: "root".to_string(),
        uid: 0,
        gid: 0,
        home: "/root".into(),
        shell: "/bin/bash".into(),
    }
}

#[tokio::test]
async fn apt_runs_noninteractive() {
    let (p, runner) = provisioner();
    p.update_index().await.expect("update");
    p.install(&["python3", "python3-venv"]).await.expect("install");
    assert_eq!(
        runner.command_lines(),
        vec![
            "env DEBIAN_FRONTEND=noninteractive apt-get update",
            "env DEBIAN_FRONTEND=noninteractive apt-get install -y python3 python3-venv",
        ]
    );
}

#[tokio::test]
async fn venv_is_created_as_target_user() {
    let (p, runner) = provisioner();
    p.create_venv(&alice(), "python3", Path::new("/srv/bot/venv"))
        .await
        .expect("venv");
    assert_eq!(
        runner.command_lines(),
        vec!["sudo -u alice -H -- python3 -m venv /srv/bot/venv"]
    );
}

#[tokio::test]
async fn pip_runs_as_target_user_without_version_check() {
    let (p, runner) = provisioner();
    p.pip(
        &alice(),
        Path::new("/srv/bot/venv/bin/pip"),
        &["install", "-r", "/srv/bot/requirements.txt"],
    )
    .await
    .expect("pip");
    assert_eq!(
        runner.command_lines(),
        vec![
            "sudo -u alice -H -- /srv/bot/venv/bin/pip --disable-pip-version-check install -r /srv/bot/requirements.txt"
        ]
    );
}

#[tokio::test]
async fn root_account_skips_sudo() {
    let (p, runner) = provisioner();
    p.run_inline(&root(), Path::new("/root/bot/venv/bin/python"), "import telebot")
        .await
        .expect("probe");
    let calls = runner.recorded_calls();
    assert_eq!(calls[0].0, "/root/bot/venv/bin/python");
    assert_eq!(calls[0].1, vec!["-c", "import telebot"]);
}

#[tokio::test]
async fn inline_code_is_a_single_argument() {
    let (p, runner) = provisioner();
    let code = "import telebot\nprint(telebot.__version__)";
    p.run_inline(&alice(), Path::new("/srv/bot/venv/bin/python"), code)
        .await
        .expect("probe");
    let (program, args) = &runner.recorded_calls()[0];
    assert_eq!(program, "sudo");
    assert_eq!(args.last().map(String::as_str), Some(code));
}

#[tokio::test]
async fn run_tool_passes_args_through() {
    let (p, runner) = provisioner();
    p.run_tool(
        &alice(),
        Path::new("/srv/bot/venv/bin/pipreqs"),
        &["--savepath", "/srv/bot/requirements.txt", "/srv/bot"],
    )
    .await
    .expect("pipreqs");
    assert_eq!(
        runner.command_lines(),
        vec![
            "sudo -u alice -H -- /srv/bot/venv/bin/pipreqs --savepath /srv/bot/requirements.txt /srv/bot"
        ]
    );
}

#[tokio::test]
async fn systemctl_verbs() {
    let (p, runner) = provisioner();
    p.daemon_reload().await.expect("reload");
    p.enable_now("nearbot.service").await.expect("enable");
    p.restart("nearbot.service").await.expect("restart");
    p.is_active("nearbot.service").await.expect("is-active");
    assert_eq!(
        runner.command_lines(),
        vec![
            "systemctl daemon-reload",
            "systemctl enable --now nearbot.service",
            "systemctl restart nearbot.service",
            "systemctl is-active nearbot.service",
        ]
    );
}

#[tokio::test]
async fn runner_error_gets_context() {
    let (p, runner) = provisioner();
    runner.push_error("failed to spawn systemctl");
    let err = p.daemon_reload().await.expect_err("expected Err");
    assert_eq!(err.to_string(), "systemctl daemon-reload");
    assert!(format!("{err:#}").contains("failed to spawn systemctl"));
}

#[tokio::test]
async fn non_zero_exit_is_returned_not_raised() {
    let (p, runner) = provisioner();
    runner.push_output(crate::helpers::err_output(3, b""));
    let output = p.is_active("nearbot.service").await.expect("Ok(output)");
    assert_eq!(output.status.code(), Some(3));
}
