//! Shared fixtures for render behavioural tests.

use std::process::Output;
use std::sync::Arc;

use assert_cmd::cargo::cargo_bin_cmd;
use rstest::fixture;
use tempfile::TempDir;

/// Variables that would leak the developer's own configuration into a run.
const INHERITED_VARS: [&str; 8] = [
    "DROPKIT_CONFIG_PATH",
    "DROPKIT_USERNAME",
    "DROPKIT_FULL_NAME",
    "DROPKIT_EMAIL",
    "DROPKIT_SSH_KEYS_FILE",
    "DROPKIT_TAILSCALE_ENABLED",
    "DROPKIT_TEMPLATE_PATH",
    "XDG_CONFIG_HOME",
];

#[derive(Clone, Debug)]
pub struct CliOutput {
    pub status_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CliOutput {
    pub fn from_process_output(output: Output) -> Self {
        let Output {
            status,
            stdout: raw_stdout,
            stderr: raw_stderr,
        } = output;
        Self {
            status_code: status.code().unwrap_or(1),
            stdout: String::from_utf8_lossy(&raw_stdout).into_owned(),
            stderr: String::from_utf8_lossy(&raw_stderr).into_owned(),
        }
    }
}

/// State threaded through each scenario. The temporary directory doubles as
/// `HOME` and as the working directory of the spawned binary.
#[derive(Clone, Debug)]
pub struct CliContext {
    pub home: Arc<TempDir>,
    pub env: Vec<(String, String)>,
    pub email: Option<String>,
    pub ssh_keys: Vec<String>,
    pub tailscale: Option<bool>,
    pub template: Option<String>,
    pub output: Option<CliOutput>,
}

impl CliContext {
    pub fn base_command(&self) -> assert_cmd::Command {
        let mut cmd = cargo_bin_cmd!("dropkit");
        for key in INHERITED_VARS {
            cmd.env_remove(key);
        }
        cmd.env("HOME", self.home.path());
        cmd.current_dir(self.home.path());
        for (key, value) in &self.env {
            cmd.env(key, value);
        }
        cmd
    }

    /// Arguments for `dropkit render`, excluding the subcommand.
    pub fn render_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if let Some(email) = &self.email {
            args.extend([String::from("--email"), email.clone()]);
        }
        for key in &self.ssh_keys {
            args.extend([String::from("--ssh-key"), key.clone()]);
        }
        match self.tailscale {
            Some(true) => args.push(String::from("--tailscale")),
            Some(false) => args.push(String::from("--no-tailscale")),
            None => {}
        }
        args.extend(self.template_args());
        args
    }

    pub fn template_args(&self) -> Vec<String> {
        self.template
            .iter()
            .flat_map(|path| [String::from("--template"), path.clone()])
            .collect()
    }

    /// Absolute path of `relative` inside the scenario's home directory.
    pub fn home_path(&self, relative: &str) -> String {
        self.home.path().join(relative).to_string_lossy().into_owned()
    }
}

#[fixture]
pub fn cli_context() -> CliContext {
    let home = TempDir::new().unwrap_or_else(|err| panic!("tempdir: {err}"));
    CliContext {
        home: Arc::new(home),
        env: Vec::new(),
        email: None,
        ssh_keys: Vec::new(),
        tailscale: None,
        template: None,
        output: None,
    }
}
