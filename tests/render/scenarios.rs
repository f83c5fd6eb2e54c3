//! BDD scenarios for rendering and checking templates through the CLI.

use rstest_bdd_macros::scenario;

use super::test_helpers::{CliContext, cli_context};

#[scenario(
    path = "tests/features/render.feature",
    name = "Render the built-in template with Tailscale enabled"
)]
fn scenario_render_with_tailscale(cli_context: CliContext) {
    let _ = cli_context;
}

#[scenario(
    path = "tests/features/render.feature",
    name = "Omit the Tailscale installer when disabled"
)]
fn scenario_render_without_tailscale(cli_context: CliContext) {
    let _ = cli_context;
}

#[scenario(
    path = "tests/features/render.feature",
    name = "Read public keys from the default keys file"
)]
fn scenario_render_keys_file(cli_context: CliContext) {
    let _ = cli_context;
}

#[scenario(
    path = "tests/features/render.feature",
    name = "Write the document to a file"
)]
fn scenario_render_to_file(cli_context: CliContext) {
    let _ = cli_context;
}

#[scenario(
    path = "tests/features/render.feature",
    name = "Reject a profile without a username"
)]
fn scenario_render_missing_username(cli_context: CliContext) {
    let _ = cli_context;
}

#[scenario(
    path = "tests/features/render.feature",
    name = "Render a custom template file"
)]
fn scenario_render_custom_template(cli_context: CliContext) {
    let _ = cli_context;
}

#[scenario(
    path = "tests/features/render.feature",
    name = "Report undefined variables in a custom template"
)]
fn scenario_render_undefined_variable(cli_context: CliContext) {
    let _ = cli_context;
}

#[scenario(
    path = "tests/features/render.feature",
    name = "Check reports template syntax errors with a location"
)]
fn scenario_check_syntax_error(cli_context: CliContext) {
    let _ = cli_context;
}

#[scenario(
    path = "tests/features/render.feature",
    name = "Check lists the variables of a valid template"
)]
fn scenario_check_lists_variables(cli_context: CliContext) {
    let _ = cli_context;
}
