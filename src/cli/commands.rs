use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "chime", about = concat!("chime v", env!("CARGO_PKG_VERSION"), " - task comments with @mentions"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Config file to use instead of ./chime.toml
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Write logs to this file (filter with RUST_LOG)
    #[arg(long = "log-file", global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a default chime.toml
    Init(InitArgs),
    /// List mentionable members, optionally filtered
    Members(MembersArgs),
    /// Type text through the comment composer and print the result
    Render(RenderArgs),
}

#[derive(Args)]
pub struct InitArgs {
    /// Overwrite an existing config file
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub struct MembersArgs {
    /// Case-insensitive substring of the member name
    pub query: Option<String>,
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct RenderArgs {
    /// Comment text; `@name` completes to a mention, `\n` starts a new block
    pub text: String,
    /// Print the comment record as JSON
    #[arg(long, conflicts_with = "markdown")]
    pub json: bool,
    /// Print markdown instead of HTML
    #[arg(long)]
    pub markdown: bool,
    /// Attach a file (repeatable)
    #[arg(long = "attach", value_name = "FILE")]
    pub attach: Vec<PathBuf>,
}
