//! CLI argument parsing.
//!
//! Flags only configure the tool (where to write, which endpoint, which
//! templates); every workflow answer is asked interactively.
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Root CLI entrypoint.
#[derive(Parser, Debug)]
#[command(
    name = "fastapi-deploy",
    version,
    about = "Prepare Docker and GitHub Actions deployment files for a FastAPI app",
    after_help = "Commands:\n  init    Interactive first-time setup (secrets upload + deployment files)\n  update  Re-create selected deployment files from templates\n\nExamples:\n  fastapi-deploy init\n  fastapi-deploy update --dir ./my-app",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct RootArgs {
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level workflow commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    Init(InitArgs),
    Update(UpdateArgs),
}

impl Command {
    pub fn common(&self) -> &CommonArgs {
        match self {
            Command::Init(args) => &args.common,
            Command::Update(args) => &args.common,
        }
    }
}

/// Settings shared by every command.
#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Project root where deployment files are written
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub dir: PathBuf,

    /// Config file (defaults to the platform config dir)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Read templates from <DIR>/<pip|uv>/ instead of the bundled set
    /// (relative paths resolve against --dir)
    #[arg(long, value_name = "DIR")]
    pub templates_dir: Option<PathBuf>,

    /// Emit debug logs on stderr
    #[arg(long)]
    pub verbose: bool,
}

/// Init command inputs.
#[derive(Parser, Debug)]
#[command(about = "Initialize deployment setup for a FastAPI application")]
pub struct InitArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Secret-storage endpoint receiving the .env upload
    #[arg(long, value_name = "URL")]
    pub api_url: Option<String>,
}

/// Update command inputs.
#[derive(Parser, Debug)]
#[command(about = "Update deployment files")]
pub struct UpdateArgs {
    #[command(flatten)]
    pub common: CommonArgs,
}
