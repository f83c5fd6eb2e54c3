//! BDD step definitions for the render and check subcommands.

use dropkit::files::{read_to_string_ambient, write_string_ambient};
use rstest_bdd_macros::{given, then, when};

use super::test_helpers::{CliContext, CliOutput};

#[derive(Debug, thiserror::Error)]
pub enum StepError {
    #[error("assertion failed: {0}")]
    Assertion(String),
    #[error("failed to execute dropkit command: {0}")]
    Execution(String),
    #[error("failed to prepare scenario file: {0}")]
    Fixture(String),
}

fn execute(mut cli_context: CliContext, args: &[String]) -> Result<CliContext, StepError> {
    let output = cli_context
        .base_command()
        .args(args)
        .output()
        .map_err(|err| StepError::Execution(err.to_string()))?;
    cli_context.output = Some(CliOutput::from_process_output(output));
    Ok(cli_context)
}

fn command_output(cli_context: &CliContext) -> Result<&CliOutput, StepError> {
    cli_context
        .output
        .as_ref()
        .ok_or_else(|| StepError::Assertion(String::from("missing command output")))
}

fn set_env(cli_context: &mut CliContext, key: &str, value: &str) {
    cli_context.env.push((key.to_owned(), value.to_owned()));
}

#[given("a profile for \"{username}\" named \"{full_name}\" with email \"{email}\"")]
fn profile_for(
    mut cli_context: CliContext,
    username: String,
    full_name: String,
    email: String,
) -> CliContext {
    set_env(&mut cli_context, "DROPKIT_USERNAME", &username);
    set_env(&mut cli_context, "DROPKIT_FULL_NAME", &full_name);
    cli_context.email = Some(email);
    cli_context
}

#[given("a profile without a username")]
fn profile_without_username(mut cli_context: CliContext) -> CliContext {
    set_env(&mut cli_context, "DROPKIT_FULL_NAME", "Nobody");
    set_env(&mut cli_context, "DROPKIT_EMAIL", "nobody@example.com");
    cli_context
}

#[given("the public key \"{key}\" is supplied")]
fn public_key_supplied(mut cli_context: CliContext, key: String) -> CliContext {
    cli_context.ssh_keys.push(key);
    cli_context
}

#[given("the default keys file contains \"{key}\"")]
fn default_keys_file(cli_context: CliContext, key: String) -> Result<CliContext, StepError> {
    let path = cli_context.home_path(".ssh/id_ed25519.pub");
    write_string_ambient(&path, &format!("# scenario key\n{key}\n")).map_err(StepError::Fixture)?;
    Ok(cli_context)
}

#[given("Tailscale is enabled")]
fn tailscale_enabled(mut cli_context: CliContext) -> CliContext {
    cli_context.tailscale = Some(true);
    cli_context
}

#[given("Tailscale is disabled")]
fn tailscale_disabled(mut cli_context: CliContext) -> CliContext {
    cli_context.tailscale = Some(false);
    cli_context
}

#[given("the template file contains \"{content}\"")]
fn template_file(mut cli_context: CliContext, content: String) -> Result<CliContext, StepError> {
    let path = cli_context.home_path("templates/custom.j2");
    write_string_ambient(&path, &content).map_err(StepError::Fixture)?;
    cli_context.template = Some(path);
    Ok(cli_context)
}

#[when("I render the cloud-init document")]
fn render_document(cli_context: CliContext) -> Result<CliContext, StepError> {
    let mut args = vec![String::from("render")];
    args.extend(cli_context.render_args());
    execute(cli_context, &args)
}

#[when("I render the cloud-init document to \"{path}\"")]
fn render_document_to(cli_context: CliContext, path: String) -> Result<CliContext, StepError> {
    let mut args = vec![String::from("render"), String::from("--output"), path];
    args.extend(cli_context.render_args());
    execute(cli_context, &args)
}

#[when("I check the template")]
fn check_template(cli_context: CliContext) -> Result<CliContext, StepError> {
    let mut args = vec![String::from("check")];
    args.extend(cli_context.template_args());
    execute(cli_context, &args)
}

#[then("the command succeeds")]
fn command_succeeds(cli_context: &CliContext) -> Result<(), StepError> {
    let output = command_output(cli_context)?;
    if output.status_code != 0 {
        return Err(StepError::Assertion(format!(
            "expected success, got exit code {} with stderr: {}",
            output.status_code, output.stderr
        )));
    }
    Ok(())
}

#[then("the document contains \"{snippet}\"")]
fn document_contains(cli_context: &CliContext, snippet: String) -> Result<(), StepError> {
    let output = command_output(cli_context)?;
    if !output.stdout.contains(&snippet) {
        return Err(StepError::Assertion(format!(
            "expected stdout to contain '{snippet}', got: {}",
            output.stdout
        )));
    }
    Ok(())
}

#[then("the document does not contain \"{snippet}\"")]
fn document_lacks(cli_context: &CliContext, snippet: String) -> Result<(), StepError> {
    let output = command_output(cli_context)?;
    if output.stdout.contains(&snippet) {
        return Err(StepError::Assertion(format!(
            "expected stdout to omit '{snippet}', got: {}",
            output.stdout
        )));
    }
    Ok(())
}

#[then("standard output is empty")]
fn stdout_empty(cli_context: &CliContext) -> Result<(), StepError> {
    let output = command_output(cli_context)?;
    if !output.stdout.is_empty() {
        return Err(StepError::Assertion(format!(
            "expected empty stdout, got: {}",
            output.stdout
        )));
    }
    Ok(())
}

#[then("the file \"{path}\" contains \"{snippet}\"")]
fn file_contains(cli_context: &CliContext, path: String, snippet: String) -> Result<(), StepError> {
    let contents = read_to_string_ambient(&cli_context.home_path(&path))
        .map_err(|err| StepError::Assertion(format!("output file should be readable: {err}")))?;
    if !contents.contains(&snippet) {
        return Err(StepError::Assertion(format!(
            "expected {path} to contain '{snippet}', got: {contents}"
        )));
    }
    Ok(())
}

#[then("the command fails with error containing \"{snippet}\"")]
fn command_fails_with(cli_context: &CliContext, snippet: String) -> Result<(), StepError> {
    let output = command_output(cli_context)?;
    if output.status_code == 0 {
        return Err(StepError::Assertion(String::from(
            "expected non-zero exit status",
        )));
    }
    if !output.stderr.contains(&snippet) {
        return Err(StepError::Assertion(format!(
            "expected stderr to contain '{snippet}', got: {}",
            output.stderr
        )));
    }
    Ok(())
}
