use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::agents::roles::TeamRole;

/// Ergane - A multi-provider agent team for software development tasks
#[derive(Parser, Debug, Clone)]
#[command(name = "ergane", version, about, long_about = None)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, env = "ERGANE_CONFIG", default_value = "ergane.toml")]
    pub config: PathBuf,

    /// Workspace root directory (overrides the configured one)
    #[arg(short, long, env = "ERGANE_WORKSPACE")]
    pub workspace: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Ask a single role one question
    Ask {
        /// Role to ask (senior_dev, coder, coder_2, qa, ba, reviewer)
        role: TeamRole,

        /// The prompt, as one or more words
        #[arg(required = true)]
        prompt: Vec<String>,

        /// File whose contents are appended to the prompt
        #[arg(long)]
        context_file: Option<PathBuf>,
    },

    /// Ask every role the same question
    Team {
        #[arg(required = true)]
        prompt: Vec<String>,
    },

    /// Run a workflow with context variables
    Workflow {
        /// Workflow name
        name: String,

        /// Context variable as KEY=VALUE (repeatable)
        #[arg(long = "var", value_parser = parse_key_val)]
        vars: Vec<(String, String)>,

        /// Context variable read from a file, as KEY=PATH (repeatable)
        #[arg(long = "var-file", value_parser = parse_key_val)]
        var_files: Vec<(String, String)>,
    },

    /// List registered workflows
    Workflows,

    /// Print the resolved configuration
    Config,

    /// Start the interactive shell (default)
    Shell,
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) => Ok((key.to_string(), value.to_string())),
        None => Err(format!("invalid KEY=VALUE: no '=' found in '{}'", s)),
    }
}
