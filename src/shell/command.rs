//! Shell line grammar
//!
//! Turns a raw input line into a [`Command`]. Parsing is pure so the grammar
//! can be tested without a terminal: trailing redirections are split off
//! first (`> FILE` writes the response, `< FILE` splices the file into the
//! prompt; both must be standalone words at the end of the line), then the
//! leading word is matched against the command table, and finally
//! `@mentions` are resolved through the alias table.

use crate::agents::roles::TeamRole;
use crate::workspace::{ProjectTemplate, DEFAULT_TREE_DEPTH};

/// One parsed shell input line
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    AskRole {
        role: TeamRole,
        prompt: String,
        input_file: Option<String>,
        output_file: Option<String>,
    },
    AskTeam {
        prompt: String,
        input_file: Option<String>,
        /// Team queries cannot be redirected; kept so the shell can warn
        output_file: Option<String>,
    },
    RunWorkflow {
        name: String,
        vars: Vec<(String, String)>,
    },
    ListWorkflows,
    ListRoles,
    ShowConfig,
    ShowHistory,
    ClearContext {
        role: Option<TeamRole>,
    },
    ListProjects,
    NewProject {
        name: String,
        template: ProjectTemplate,
    },
    ListFiles {
        dir: String,
    },
    Tree {
        dir: String,
        depth: usize,
    },
    ReadFile {
        path: String,
    },
    Grep {
        term: String,
        dir: String,
    },
    Find {
        pattern: String,
        dir: String,
    },
    WorkspaceInfo,
    Help,
    Exit,
    Empty,
    /// Anything unparseable, carrying the message to show the user
    Unknown(String),
}

/// Alias table for `@mentions`; several spellings per role
const MENTION_ALIASES: [(&str, TeamRole); 25] = [
    ("senior", TeamRole::SeniorDev),
    ("seniordev", TeamRole::SeniorDev),
    ("architect", TeamRole::SeniorDev),
    ("lead", TeamRole::SeniorDev),
    ("tech", TeamRole::SeniorDev),
    ("dev", TeamRole::Coder),
    ("coder", TeamRole::Coder),
    ("dev1", TeamRole::Coder),
    ("developer", TeamRole::Coder),
    ("code", TeamRole::Coder),
    ("dev2", TeamRole::Coder2),
    ("coder2", TeamRole::Coder2),
    ("gemini", TeamRole::Coder2),
    ("qa", TeamRole::Qa),
    ("test", TeamRole::Qa),
    ("tester", TeamRole::Qa),
    ("quality", TeamRole::Qa),
    ("bug", TeamRole::Qa),
    ("ba", TeamRole::Ba),
    ("analyst", TeamRole::Ba),
    ("specs", TeamRole::Ba),
    ("reqs", TeamRole::Ba),
    ("reviewer", TeamRole::Reviewer),
    ("review", TeamRole::Reviewer),
    ("cr", TeamRole::Reviewer),
];

/// Mentions that address the whole team rather than one role
const TEAM_MENTIONS: [&str; 4] = ["team", "all", "devteam", "everyone"];

/// Command words offered by tab completion
pub(crate) const COMMAND_WORDS: [&str; 18] = [
    "help",
    "roles",
    "workflows",
    "workflow",
    "team",
    "clear",
    "history",
    "config",
    "projects",
    "newproject",
    "files",
    "tree",
    "read",
    "grep",
    "find",
    "workspace",
    "exit",
    "quit",
];

/// Every completable `@mention`, `@` included
pub(crate) fn mention_completions() -> Vec<String> {
    MENTION_ALIASES
        .iter()
        .map(|(alias, _)| format!("@{}", alias))
        .chain(TEAM_MENTIONS.iter().map(|mention| format!("@{}", mention)))
        .collect()
}

fn lookup_mention(name: &str) -> Option<TeamRole> {
    MENTION_ALIASES
        .iter()
        .find(|(alias, _)| *alias == name)
        .map(|(_, role)| *role)
        .or_else(|| name.parse().ok())
}

pub fn parse_line(line: &str) -> Command {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Command::Empty;
    }

    let mut tokens = trimmed.split_whitespace();
    let Some(first) = tokens.next() else {
        return Command::Empty;
    };

    match first.to_lowercase().as_str() {
        "help" => Command::Help,
        "exit" | "quit" => Command::Exit,
        "roles" => Command::ListRoles,
        "workflows" => Command::ListWorkflows,
        "config" => Command::ShowConfig,
        "history" => Command::ShowHistory,
        "workspace" => Command::WorkspaceInfo,
        "projects" => Command::ListProjects,
        "clear" => match tokens.next() {
            None => Command::ClearContext { role: None },
            Some(arg) => match arg.parse() {
                Ok(role) => Command::ClearContext { role: Some(role) },
                Err(_) => Command::Unknown(format!("Unknown role: {}", arg)),
            },
        },
        "team" => {
            let prompt = tokens.collect::<Vec<_>>().join(" ");
            if prompt.is_empty() {
                Command::Unknown("Usage: team <prompt>".to_string())
            } else {
                Command::AskTeam {
                    prompt,
                    input_file: None,
                    output_file: None,
                }
            }
        }
        "workflow" => parse_workflow(tokens),
        "newproject" => parse_new_project(tokens),
        "files" => Command::ListFiles {
            dir: tokens.next().unwrap_or(".").to_string(),
        },
        "tree" => parse_tree(tokens),
        "read" => match tokens.next() {
            Some(path) => Command::ReadFile {
                path: path.to_string(),
            },
            None => Command::Unknown("Usage: read <file>".to_string()),
        },
        "grep" => match tokens.next() {
            Some(term) => Command::Grep {
                term: term.to_string(),
                dir: tokens.next().unwrap_or(".").to_string(),
            },
            None => Command::Unknown("Usage: grep <term> [dir]".to_string()),
        },
        "find" => match tokens.next() {
            Some(pattern) => Command::Find {
                pattern: pattern.to_string(),
                dir: tokens.next().unwrap_or(".").to_string(),
            },
            None => Command::Unknown("Usage: find <pattern> [dir]".to_string()),
        },
        _ if trimmed.contains('@') => parse_mention(trimmed),
        _ => Command::Unknown(format!(
            "Unknown command: '{}'. Type 'help' or use an @mention",
            first
        )),
    }
}

fn parse_workflow<'a>(mut tokens: impl Iterator<Item = &'a str>) -> Command {
    let Some(name) = tokens.next() else {
        return Command::Unknown("Usage: workflow <name> key=value ...".to_string());
    };
    let mut vars = Vec::new();
    for token in tokens {
        match token.split_once('=') {
            Some((key, value)) => vars.push((key.to_string(), value.to_string())),
            None => {
                return Command::Unknown(format!(
                    "Invalid variable '{}' (expected key=value)",
                    token
                ))
            }
        }
    }
    Command::RunWorkflow {
        name: name.to_string(),
        vars,
    }
}

fn parse_new_project<'a>(mut tokens: impl Iterator<Item = &'a str>) -> Command {
    let Some(name) = tokens.next() else {
        return Command::Unknown("Usage: newproject <name> [template]".to_string());
    };
    let template = match tokens.next() {
        None => ProjectTemplate::Python,
        Some(arg) => match arg.parse() {
            Ok(template) => template,
            Err(message) => return Command::Unknown(message),
        },
    };
    Command::NewProject {
        name: name.to_string(),
        template,
    }
}

fn parse_tree<'a>(mut tokens: impl Iterator<Item = &'a str>) -> Command {
    let dir = tokens.next().unwrap_or(".").to_string();
    let depth = match tokens.next() {
        None => DEFAULT_TREE_DEPTH,
        Some(arg) => match arg.parse() {
            Ok(depth) => depth,
            Err(_) => return Command::Unknown(format!("Invalid depth: {}", arg)),
        },
    };
    Command::Tree { dir, depth }
}

/// Splits trailing `> FILE` / `< FILE` redirections off a line
///
/// Only standalone `>`/`<` words at the end of the line count, so prompt
/// text like `map a -> b` passes through untouched. Both redirections may
/// appear, in either order.
fn split_redirections(line: &str) -> (Vec<&str>, Option<String>, Option<String>) {
    let mut words: Vec<&str> = line.split_whitespace().collect();
    let mut input_file = None;
    let mut output_file = None;
    loop {
        let len = words.len();
        if len < 2 {
            break;
        }
        match words[len - 2] {
            ">" if output_file.is_none() => {
                output_file = Some(words[len - 1].to_string());
                words.truncate(len - 2);
            }
            "<" if input_file.is_none() => {
                input_file = Some(words[len - 1].to_string());
                words.truncate(len - 2);
            }
            _ => break,
        }
    }
    (words, input_file, output_file)
}

/// Resolves a line with `@mentions` and optional trailing redirections
///
/// The first role mention wins when several appear; a team mention anywhere
/// turns the line into a team query.
fn parse_mention(line: &str) -> Command {
    let (words, input_file, output_file) = split_redirections(line);

    let mut role = None;
    let mut team = false;
    let mut prompt_words: Vec<&str> = Vec::new();
    for word in words {
        if let Some(mention) = word.strip_prefix('@') {
            let mention = mention.to_lowercase();
            if TEAM_MENTIONS.contains(&mention.as_str()) {
                team = true;
                continue;
            }
            if let Some(found) = lookup_mention(&mention) {
                if role.is_none() {
                    role = Some(found);
                }
                continue;
            }
            return Command::Unknown(format!(
                "Unknown mention '@{}'. Try @senior, @dev, @qa, @ba, or @team",
                mention
            ));
        }
        prompt_words.push(word);
    }
    let prompt = prompt_words.join(" ");

    if team {
        if prompt.is_empty() && input_file.is_none() {
            return Command::Unknown("What would you like to ask?".to_string());
        }
        return Command::AskTeam {
            prompt,
            input_file,
            output_file,
        };
    }
    match role {
        Some(role) => {
            if prompt.is_empty() && input_file.is_none() {
                Command::Unknown("What would you like to ask?".to_string())
            } else {
                Command::AskRole {
                    role,
                    prompt,
                    input_file,
                    output_file,
                }
            }
        }
        None => Command::Unknown(
            "No @mention found. Try: @senior, @dev, @qa, @ba, @team".to_string(),
        ),
    }
}

#[cfg(test)]
#[path = "command_test.rs"]
mod tests;
