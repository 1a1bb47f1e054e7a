//! Interactive shell
//!
//! A rustyline REPL over the orchestrator and workspace. Lines go through
//! [`command::parse_line`]; dispatch prints colored output and never aborts
//! the loop on a failed operation.

pub mod command;

use std::borrow::Cow::{self, Borrowed, Owned};
use std::collections::HashMap;
use std::path::Path;

use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};

use crate::agents::domain::AgentResponse;
use crate::agents::llm::ProviderKind;
use crate::agents::orchestration::{Orchestrator, WorkflowStatus};
use crate::agents::roles::TeamRole;
use crate::workspace::{ProjectTemplate, Workspace};

pub use command::{parse_line, Command};

/// Roles addressed by `@team` and the `team` command
const TEAM_QUERY_ROLES: [TeamRole; 4] = [
    TeamRole::SeniorDev,
    TeamRole::Coder,
    TeamRole::Qa,
    TeamRole::Ba,
];

/// Extensions for which output redirection extracts the fenced code block
/// instead of saving the whole markdown response
const CODE_EXTENSIONS: [&str; 8] = ["py", "js", "ts", "java", "cpp", "c", "go", "rs"];

/// Shell helper for rustyline that provides completion, highlighting, and hints
struct ShellHelper {
    commands: Vec<String>,
    mentions: Vec<String>,
}

impl ShellHelper {
    fn new() -> Self {
        Self {
            commands: command::COMMAND_WORDS
                .iter()
                .map(|word| word.to_string())
                .collect(),
            mentions: command::mention_completions(),
        }
    }
}

impl Helper for ShellHelper {}

impl Completer for ShellHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];

        if let Some(at_pos) = line.rfind('@') {
            let partial = line[at_pos..].to_lowercase();
            let candidates = self
                .mentions
                .iter()
                .filter(|mention| mention.starts_with(&partial))
                .map(|mention| Pair {
                    display: mention.clone(),
                    replacement: mention.clone(),
                })
                .collect();
            return Ok((at_pos, candidates));
        }

        let word_start = line.rfind(' ').map(|i| i + 1).unwrap_or(0);
        let word = line[word_start..].to_lowercase();
        let candidates = self
            .commands
            .iter()
            .filter(|cmd| cmd.starts_with(&word))
            .map(|cmd| Pair {
                display: cmd.clone(),
                replacement: cmd.clone(),
            })
            .collect();
        Ok((word_start, candidates))
    }
}

impl Highlighter for ShellHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('@') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for ShellHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];

        if line.starts_with('@') && !line.contains(' ') {
            let lowered = line.to_lowercase();
            self.mentions
                .iter()
                .find(|mention| mention.starts_with(&lowered) && mention.len() > line.len())
                .map(|mention| mention[line.len()..].to_string())
        } else {
            None
        }
    }
}

impl Validator for ShellHelper {}

/// The interactive shell over one orchestrator and one workspace
pub struct Shell {
    orchestrator: Orchestrator,
    workspace: Workspace,
}

impl Shell {
    pub fn new(orchestrator: Orchestrator, workspace: Workspace) -> Self {
        Self {
            orchestrator,
            workspace,
        }
    }

    /// Runs the REPL until `exit`, Ctrl-D, or a terminal error
    pub async fn run(mut self) -> anyhow::Result<()> {
        let helper = ShellHelper::new();
        let mut rl = Editor::new()?;
        rl.set_helper(Some(helper));

        println!();
        println!("{}", "=== Ergane: your AI dev team ===".bright_magenta().bold());
        println!(
            "{}",
            "Type 'help' for commands, @mentions to talk to the team, 'exit' to leave."
                .bright_black()
        );
        println!();

        loop {
            match rl.readline("ergane> ") {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    let _ = rl.add_history_entry(trimmed);

                    match parse_line(trimmed) {
                        Command::Exit => {
                            println!("{}", "Goodbye!".bright_green());
                            break;
                        }
                        command => self.dispatch(command).await,
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("{}", "CTRL-C. Type 'exit' to quit.".yellow());
                }
                Err(ReadlineError::Eof) => {
                    println!("{}", "Goodbye!".bright_green());
                    break;
                }
                Err(err) => {
                    eprintln!("{}", format!("Error: {:?}", err).red());
                    break;
                }
            }
        }

        Ok(())
    }

    async fn dispatch(&mut self, command: Command) {
        match command {
            Command::Help => self.print_help(),
            Command::ListRoles => self.print_roles(),
            Command::ListWorkflows => self.print_workflows(),
            Command::ShowConfig => self.print_config(),
            Command::ShowHistory => self.print_history(),
            Command::ClearContext { role } => {
                self.orchestrator.clear_context(role);
                match role {
                    Some(role) => {
                        println!("{}", format!("Cleared context for {}", role).green())
                    }
                    None => println!("{}", "Cleared context for every role".green()),
                }
            }
            Command::AskRole {
                role,
                prompt,
                input_file,
                output_file,
            } => self.ask_role(role, prompt, input_file, output_file).await,
            Command::AskTeam {
                prompt,
                input_file,
                output_file,
            } => {
                if output_file.is_some() {
                    println!(
                        "{}",
                        "Output redirection is ignored for team queries".yellow()
                    );
                }
                self.ask_team(prompt, input_file).await;
            }
            Command::RunWorkflow { name, vars } => self.run_workflow(&name, vars).await,
            Command::ListProjects => self.print_projects(),
            Command::NewProject { name, template } => self.create_project(&name, template),
            Command::ListFiles { dir } => self.print_files(&dir),
            Command::Tree { dir, depth } => {
                println!("\n{}\n", self.workspace.tree(&dir, depth).cyan());
            }
            Command::ReadFile { path } => self.print_file(&path),
            Command::Grep { term, dir } => self.print_grep(&term, &dir),
            Command::Find { pattern, dir } => self.print_find(&pattern, &dir),
            Command::WorkspaceInfo => {
                println!("\nWorkspace: {}\n", self.workspace.root().display());
            }
            Command::Unknown(message) => println!("{}", message.yellow()),
            Command::Empty | Command::Exit => {}
        }
    }

    // Agent queries

    async fn ask_role(
        &mut self,
        role: TeamRole,
        prompt: String,
        input_file: Option<String>,
        output_file: Option<String>,
    ) {
        let mut prompt = prompt;
        if let Some(path) = input_file {
            match self.load_file_context(&path) {
                Some(context) => prompt.push_str(&context),
                None => return,
            }
        }

        println!("{}", format!("{} is thinking...", role).bright_blue());
        match self.orchestrator.ask(role, &prompt, false).await {
            Ok(response) => {
                self.print_response(role.as_str(), &response);
                if let Some(path) = output_file {
                    self.save_response(&response.content, &path);
                }
            }
            Err(e) => println!("{}", format!("Error: {}", e).red()),
        }
    }

    async fn ask_team(&mut self, prompt: String, input_file: Option<String>) {
        let mut prompt = prompt;
        if let Some(path) = input_file {
            match self.load_file_context(&path) {
                Some(context) => prompt.push_str(&context),
                None => return,
            }
        }

        println!("{}", "Asking the whole team...".bright_blue());
        match self
            .orchestrator
            .consult_team(&prompt, Some(&TEAM_QUERY_ROLES))
            .await
        {
            Ok(responses) => {
                for (role, response) in &responses {
                    self.print_response(role.as_str(), response);
                }
            }
            Err(e) => println!("{}", format!("Error: {}", e).red()),
        }
    }

    async fn run_workflow(&mut self, name: &str, vars: Vec<(String, String)>) {
        let context: HashMap<String, String> = vars.into_iter().collect();

        println!("{}", format!("Running {} workflow...", name).bright_blue());
        let result = self.orchestrator.run_workflow(name, &context).await;

        match result.status {
            WorkflowStatus::Completed => {
                println!(
                    "{}",
                    format!("Done in {:.2}s", result.duration_secs).green()
                );
                for (step, response) in &result.outputs {
                    let role = step.splitn(3, '_').nth(2).unwrap_or(step.as_str());
                    self.print_response(role, response);
                }
            }
            _ => {
                println!("{}", "Workflow failed".red());
                for error in &result.errors {
                    println!("{}", format!("  {}", error).red());
                }
            }
        }
    }

    fn print_response(&self, title: &str, response: &AgentResponse) {
        println!();
        println!("{}", format!("=== {} ===", title.to_uppercase()).green().bold());
        println!("{}", response.content);
        println!(
            "{}",
            format!("[{} | {} tokens]", response.model, response.total_tokens()).bright_black()
        );
        println!();
    }

    // File redirection

    /// Reads a workspace file and wraps it for inclusion in a prompt
    fn load_file_context(&self, path: &str) -> Option<String> {
        let result = self.workspace.read_file(path);
        if !result.success {
            println!("{}", result.message.red());
            return None;
        }
        let content = result.data.unwrap_or_default();
        Some(format!("\n\n---\nFile: {}\n```\n{}\n```\n", path, content))
    }

    /// Saves a response to the workspace; code files get just the code block
    fn save_response(&self, content: &str, path: &str) {
        let is_code = Path::new(path)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| CODE_EXTENSIONS.contains(&ext))
            .unwrap_or(false);

        let body = if is_code {
            extract_code_block(content).unwrap_or_else(|| content.to_string())
        } else {
            content.to_string()
        };

        let result = self.workspace.write_file(path, &body);
        if result.success {
            println!("{}", format!("Saved to {}", path).green());
        } else {
            println!("{}", result.message.red());
        }
    }

    // Informational output

    fn print_help(&self) {
        println!();
        println!("{}", "Mentions".cyan().bold());
        println!("  @senior    also @architect @lead @tech     architecture and hard problems");
        println!("  @dev       also @coder @developer @code    fast implementation");
        println!("  @dev2      also @coder2 @gemini            secondary coder, large context");
        println!("  @qa        also @test @tester @bug         testing and bug hunting");
        println!("  @ba        also @analyst @specs @reqs      requirements and user stories");
        println!("  @reviewer  also @review @cr                quick code review");
        println!("  @team      also @all @everyone             ask the core team at once");
        println!();
        println!("{}", "File redirection".cyan().bold());
        println!("  @dev write a parser > parser.rs    save the response to a workspace file");
        println!("  @qa review this < src/main.py      splice a workspace file into the prompt");
        println!();
        println!("{}", "Commands".cyan().bold());
        println!("  roles                        show each role with its provider and model");
        println!("  team <prompt>                ask the core team the same question");
        println!("  workflows                    list registered workflows");
        println!("  workflow <name> key=value    run a workflow with context variables");
        println!("  history                      message counts per role");
        println!("  clear [role]                 reset conversation context");
        println!("  config                       provider and key status");
        println!("  exit                         leave the shell");
        println!();
        println!("{}", "Workspace".cyan().bold());
        println!("  projects                     list projects");
        println!("  newproject <name> [tmpl]     create a project (basic/python/node/rust/empty)");
        println!("  files [dir]                  list a directory");
        println!("  tree [dir] [depth]           render a directory tree");
        println!("  read <file>                  print a file");
        println!("  grep <term> [dir]            search file contents");
        println!("  find <pattern> [dir]         find files by glob pattern");
        println!("  workspace                    show the workspace root");
        println!();
    }

    fn print_roles(&self) {
        println!();
        for role in TeamRole::ALL {
            let (provider, model) = match self.orchestrator.settings().role_binding(role) {
                Some(binding) => (binding.provider.to_string(), binding.model.clone()),
                None => ("-".to_string(), "unbound".to_string()),
            };
            let description = self
                .orchestrator
                .registry()
                .get(role)
                .map(|config| config.description)
                .unwrap_or("");
            println!(
                "  {} {:<10} {:<28} {}",
                format!("{:<12}", role).cyan(),
                provider,
                model,
                description.bright_black()
            );
        }
        println!();
    }

    fn print_workflows(&self) {
        println!();
        for name in self.orchestrator.list_workflows() {
            let pipeline = self
                .orchestrator
                .workflow(&name)
                .map(|steps| {
                    steps
                        .iter()
                        .map(|step| step.role.as_str())
                        .collect::<Vec<_>>()
                        .join(" -> ")
                })
                .unwrap_or_default();
            println!(
                "  {} {}",
                format!("{:<16}", name).cyan(),
                pipeline.bright_black()
            );
        }
        println!();
    }

    fn print_config(&self) {
        let settings = self.orchestrator.settings();
        println!();
        println!("  Workspace root: {}", self.workspace.root().display());
        println!(
            "  Defaults: {} max tokens, temperature {}",
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
            println!("  {} {}", format!("{:<10}", provider), status);
        }
        println!();
        for role in TeamRole::ALL {
            if let Some(binding) = settings.role_binding(role) {
                println!(
                    "  {} {:<10} {}",
                    format!("{:<12}", role).cyan(),
                    binding.provider,
                    binding.model
                );
            }
        }
        println!();
    }

    fn print_history(&self) {
        println!();
        let mut any = false;
        for role in TeamRole::ALL {
            if let Some(agent) = self.orchestrator.agent(role) {
                let count = agent.context_length();
                if count > 0 {
                    println!("  {} {} messages", format!("{:<12}", role).cyan(), count);
                    any = true;
                }
            }
        }
        if !any {
            println!("  {}", "No conversation history yet".bright_black());
        }
        println!();
    }

    // Workspace output

    fn print_projects(&self) {
        let projects = self.workspace.list_projects();
        if projects.is_empty() {
            println!(
                "{}",
                "No projects yet. Create one with: newproject <name>".yellow()
            );
            println!(
                "{}",
                format!("Workspace: {}", self.workspace.root().display()).bright_black()
            );
            return;
        }

        println!();
        for project in projects {
            let file_count = self
                .workspace
                .list_directory(&project)
                .iter()
                .filter(|entry| !entry.is_dir)
                .count();
            println!(
                "  {} {} files",
                format!("{:<20}", project).cyan(),
                file_count
            );
        }
        println!(
            "{}",
            format!("\nWorkspace: {}", self.workspace.root().display()).bright_black()
        );
    }

    fn create_project(&self, name: &str, template: ProjectTemplate) {
        let result = self.workspace.create_project(name, template);
        if result.success {
            println!("{}", result.message.green());
            println!("{}", self.workspace.tree(name, 3).cyan());
        } else {
            println!("{}", result.message.red());
        }
    }

    fn print_files(&self, dir: &str) {
        let entries = self.workspace.list_directory(dir);
        if entries.is_empty() {
            println!(
                "{}",
                format!("Directory empty or not found: {}", dir).yellow()
            );
            return;
        }

        println!();
        for entry in entries {
            if entry.is_dir {
                println!("  {}", format!("{}/", entry.name).blue());
            } else {
                println!(
                    "  {} {}",
                    entry.name,
                    format!("({} bytes)", entry.size).bright_black()
                );
            }
        }
        println!();
    }

    fn print_file(&self, path: &str) {
        let result = self.workspace.read_file(path);
        if result.success {
            println!("\n{}", format!("--- {} ---", path).cyan());
            println!("{}", result.data.unwrap_or_default());
            println!();
        } else {
            println!("{}", result.message.red());
        }
    }

    fn print_grep(&self, term: &str, dir: &str) {
        let matches = self.workspace.grep(term, dir, "*");
        if matches.is_empty() {
            println!("{}", format!("No matches for '{}'", term).yellow());
            return;
        }
        println!();
        for line in matches {
            println!("  {}", line);
        }
        println!();
    }

    fn print_find(&self, pattern: &str, dir: &str) {
        let matches = self.workspace.search_files(pattern, dir);
        if matches.is_empty() {
            println!("{}", format!("No files matching '{}'", pattern).yellow());
            return;
        }
        println!();
        for path in matches {
            println!("  {}", path);
        }
        println!();
    }
}

/// First fenced code block of a markdown response, if any
fn extract_code_block(content: &str) -> Option<String> {
    let start = content.find("```")?;
    let after = &content[start + 3..];
    let newline = after.find('\n')?;
    let body = &after[newline + 1..];
    let end = body.find("```")?;
    Some(body[..end].trim().to_string())
}
