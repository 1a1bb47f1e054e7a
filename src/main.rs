use std::collections::HashMap;
use std::fs;
use std::sync::Arc;

use clap::Parser;
use colored::Colorize;
use tracing::info;

use ergane::agents::domain::AgentResponse;
use ergane::agents::llm::ProviderKind;
use ergane::agents::orchestration::WorkflowStatus;
use ergane::agents::roles::TeamRole;
use ergane::cli::{Cli, Commands};
use ergane::config::Settings;
use ergane::shell::Shell;
use ergane::{Orchestrator, Workspace};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing; logs go to stderr so agent output stays pipeable
    let level = match cli.verbose {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    // Load configuration
    let settings = Arc::new(Settings::new_with_cli(&cli)?);
    let workspace = Workspace::new(settings.workspace_root())?;
    let mut orchestrator = Orchestrator::new(settings.clone());

    match cli.command.unwrap_or(Commands::Shell) {
        Commands::Shell => {
            info!("Starting interactive shell");
            Shell::new(orchestrator, workspace).run().await?;
        }
        Commands::Ask {
            role,
            prompt,
            context_file,
        } => {
            let mut prompt = prompt.join(" ");
            if let Some(path) = &context_file {
                let content = fs::read_to_string(path)?;
                prompt.push_str(&format!(
                    "\n\n---\nFile: {}\n```\n{}\n```\n",
                    path.display(),
                    content
                ));
            }
            let response = orchestrator.ask(role, &prompt, false).await?;
            print_response(role.as_str(), &response);
        }
        Commands::Team { prompt } => {
            let prompt = prompt.join(" ");
            let responses = orchestrator.consult_team(&prompt, None).await?;
            for (role, response) in &responses {
                print_response(role.as_str(), response);
            }
        }
        Commands::Workflow {
            name,
            vars,
            var_files,
        } => {
            let mut context: HashMap<String, String> = vars.into_iter().collect();
            for (key, path) in var_files {
                context.insert(key, fs::read_to_string(&path)?);
            }

            let result = orchestrator.run_workflow(&name, &context).await;
            for (step, response) in &result.outputs {
                let role = step.splitn(3, '_').nth(2).unwrap_or(step.as_str());
                print_response(role, response);
            }

            if result.status == WorkflowStatus::Completed {
                println!();
                println!(
                    "{}",
                    format!("Workflow {} completed in {:.2}s", name, result.duration_secs)
                        .green()
                );
            } else {
                for error in &result.errors {
                    eprintln!("{}", format!("  {}", error).red());
                }
                anyhow::bail!(
                    "workflow {} failed after {} completed steps",
                    name,
                    result.steps_completed
                );
            }
        }
        Commands::Workflows => {
            for name in orchestrator.list_workflows() {
                let pipeline = orchestrator
                    .workflow(&name)
                    .map(|steps| {
                        steps
                            .iter()
                            .map(|step| step.role.as_str())
                            .collect::<Vec<_>>()
                            .join(" -> ")
                    })
                    .unwrap_or_default();
                println!("{:<16} {}", name, pipeline);
            }
        }
        Commands::Config => print_config(&settings, &workspace),
    }

    Ok(())
}

fn print_response(title: &str, response: &AgentResponse) {
    println!();
    println!(
        "{}",
        format!("=== {} ===", title.to_uppercase()).green().bold()
    );
    println!("{}", response.content);
    println!(
        "{}",
        format!("[{} | {} tokens]", response.model, response.total_tokens()).bright_black()
    );
}

fn print_config(settings: &Settings, workspace: &Workspace) {
    println!("Workspace root: {}", workspace.root().display());
    println!(
        "Defaults: {} max tokens, temperature {}",
        settings.defaults.max_tokens, settings.defaults.temperature
    );
    println!();
    for (provider, env_var) in [
        (ProviderKind::Anthropic, "ANTHROPIC_API_KEY"),
        (ProviderKind::OpenAi, "OPENAI_API_KEY"),
        (ProviderKind::Gemini, "GEMINI_API_KEY"),
    ] {
        let configured = settings.provider_config(provider).api_key.is_some()
            || std::env::var(env_var).map(|v| !v.is_empty()).unwrap_or(false);
        let status = if configured {
            "key set".green()
        } else {
            "key missing".red()
        };
        println!("{} {}", format!("{:<10}", provider), status);
    }
    println!();
    for role in TeamRole::ALL {
        if let Some(binding) = settings.role_binding(role) {
            println!("{:<12} {:<10} {}", role, binding.provider, binding.model);
        }
    }
}
