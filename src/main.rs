use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod artifacts;
mod cli;
mod config;
mod env_file;
mod model;
mod prompt;
mod secrets;
mod templates;
#[cfg(test)]
mod test_support;
mod workflow;

use cli::{Command, CommonArgs, RootArgs};
use config::{ConfigOverrides, DeployConfig};
use prompt::TerminalPrompt;
use secrets::HttpSecretStore;
use templates::{DirectoryTemplates, EmbeddedTemplates, TemplateSource};
use workflow::{InitOutcome, SetupOrchestrator};

/// Log filter variable; `--verbose` overrides it with `debug`.
const LOG_ENV: &str = "FASTAPI_DEPLOY_LOG";
/// Exit status when the operator declines a confirmation in `init`.
const EXIT_ABORTED: u8 = 2;

fn main() -> ExitCode {
    let args = RootArgs::parse();
    init_tracing(args.command.common().verbose);
    if !io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    match run(args) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn run(args: RootArgs) -> Result<ExitCode> {
    match args.command {
        Command::Init(args) => {
            let config = load_config(&args.common, args.api_url.clone())?;
            run_workflow(&args.common, &config, |orchestrator| {
                Ok(match orchestrator.init()? {
                    InitOutcome::Completed(summary) => {
                        tracing::info!(
                            all_succeeded = summary.all_succeeded(),
                            artifacts = summary.artifacts.len(),
                            "init finished"
                        );
                        ExitCode::SUCCESS
                    }
                    InitOutcome::Aborted(point) => {
                        tracing::info!(?point, "init aborted by operator");
                        ExitCode::from(EXIT_ABORTED)
                    }
                })
            })
        }
        Command::Update(args) => {
            let config = load_config(&args.common, None)?;
            run_workflow(&args.common, &config, |orchestrator| {
                let summary = orchestrator.update()?;
                tracing::info!(
                    package_manager = %summary.package_manager,
                    env_path = %summary.env_path.display(),
                    selected = summary.artifacts.len(),
                    updated = summary.artifacts.iter().filter(|outcome| outcome.succeeded).count(),
                    "update finished"
                );
                Ok(ExitCode::SUCCESS)
            })
        }
    }
}

fn load_config(common: &CommonArgs, api_url: Option<String>) -> Result<DeployConfig> {
    let overrides = ConfigOverrides {
        config_path: common.config.clone(),
        api_url,
        templates_dir: common.templates_dir.clone(),
    };
    let config = config::load(&overrides)?;
    tracing::debug!(
        api_url = %config.api_url,
        templates_dir = ?config.templates_dir,
        timeout_secs = config.request_timeout.as_secs(),
        "resolved config"
    );
    Ok(config)
}

fn run_workflow<F>(common: &CommonArgs, config: &DeployConfig, body: F) -> Result<ExitCode>
where
    F: FnOnce(&mut SetupOrchestrator<'_>) -> Result<ExitCode>,
{
    let project_root = resolve_project_root(&common.dir)?;
    let templates: Box<dyn TemplateSource> = match &config.templates_dir {
        Some(dir) => Box::new(DirectoryTemplates::new(project_root.join(dir))),
        None => Box::new(EmbeddedTemplates),
    };
    let secrets = HttpSecretStore::new(config.api_url.clone(), config.request_timeout);
    let mut prompt = TerminalPrompt::new(io::stdin().lock(), io::stdout());
    let mut orchestrator =
        SetupOrchestrator::new(&mut prompt, &secrets, templates.as_ref(), &project_root);
    body(&mut orchestrator)
}

/// Canonical project root; relative `.env` and template paths are joined onto it.
fn resolve_project_root(dir: &Path) -> Result<PathBuf> {
    dir.canonicalize()
        .with_context(|| format!("resolve project dir {}", dir.display()))
}
