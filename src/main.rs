//! Binary entry point for the dropkit CLI.

use std::io::{self, Write};
use std::process;

use clap::Parser;
use thiserror::Error;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use dropkit::files::{expand_tilde, write_string_ambient};
use dropkit::{
    ConfigError, DropkitConfig, ProfileOverrides, RenderError, Template, TemplateSource,
    TemplateSourceError, TemplateSyntaxError,
};

mod cli;

use cli::{CheckCommand, Cli, RenderCommand};

/// Environment variable holding the `tracing` filter directive.
const LOG_ENV_VAR: &str = "DROPKIT_LOG";
const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("template source error: {0}")]
    Source(#[from] TemplateSourceError),
    #[error("template syntax error in {origin}: {source}")]
    Syntax {
        origin: String,
        #[source]
        source: TemplateSyntaxError,
    },
    #[error("render failed: {0}")]
    Render(#[from] RenderError),
    #[error("failed to write `{path}`: {message}")]
    Output { path: String, message: String },
    #[error("failed to write to standard output: {0}")]
    Stdout(#[from] io::Error),
}

fn main() {
    init_logging();
    let cli = Cli::parse();
    let exit_code = match dispatch(cli) {
        Ok(()) => 0,
        Err(err) => {
            report_error(&err);
            1
        }
    };

    process::exit(exit_code);
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init()
        .ok();
}

fn dispatch(cli: Cli) -> Result<(), CliError> {
    match cli {
        Cli::Render(command) => render_command(command),
        Cli::Check(command) => check_command(command),
    }
}

fn render_command(args: RenderCommand) -> Result<(), CliError> {
    let tailscale_enabled = args.tailscale_override();
    let RenderCommand {
        template: template_path,
        output,
        username,
        full_name,
        email,
        ssh_keys,
        ..
    } = args;
    let overrides = ProfileOverrides {
        username,
        full_name,
        email,
        ssh_keys,
        tailscale_enabled,
        template_path,
    };

    let config = DropkitConfig::load_without_cli_args()?.with_overrides(&overrides);
    let profile = config.to_profile(&overrides.ssh_keys)?;
    let template = load_template(&config.template_source())?;
    let document = template.render(&profile.to_parameters())?;

    match output {
        Some(path) => {
            let expanded = expand_tilde(&path);
            write_string_ambient(&expanded, &document)
                .map_err(|message| CliError::Output { path: expanded.clone(), message })?;
            info!(path = %expanded, bytes = document.len(), "wrote cloud-init document");
        }
        None => io::stdout().lock().write_all(document.as_bytes())?,
    }
    Ok(())
}

fn check_command(args: CheckCommand) -> Result<(), CliError> {
    let overrides = ProfileOverrides {
        template_path: args.template,
        ..ProfileOverrides::default()
    };
    let config = DropkitConfig::load_without_cli_args()?.with_overrides(&overrides);
    let source = config.template_source();
    let template = load_template(&source)?;

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "template OK: {}", source.describe())?;
    for variable in template.variables() {
        writeln!(stdout, "{}: {}", variable.name, variable.usage.label())?;
    }
    Ok(())
}

fn load_template(source: &TemplateSource) -> Result<Template, CliError> {
    let text = source.load()?;
    let template = Template::parse(&text).map_err(|err| CliError::Syntax {
        origin: source.describe(),
        source: err,
    })?;
    debug!(origin = %source.describe(), "template ready");
    Ok(template)
}

fn report_error(err: &CliError) {
    write_error(io::stderr(), err);
}

fn write_error(mut target: impl Write, err: &CliError) {
    writeln!(target, "{err}").ok();
}
