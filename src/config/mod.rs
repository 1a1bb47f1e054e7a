use std::collections::HashMap;
use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

pub mod validator;

use crate::agents::llm::{ProviderConfig, ProviderKind};
use crate::agents::orchestration::WorkflowStep;
use crate::agents::roles::TeamRole;
use crate::cli::Cli;

/// Default provider and model for each role, applied when the settings file
/// leaves the binding out
const DEFAULT_ROLE_BINDINGS: [(TeamRole, ProviderKind, &str); 6] = [
    (
        TeamRole::SeniorDev,
        ProviderKind::Anthropic,
        "claude-sonnet-4-20250514",
    ),
    (
        TeamRole::Coder,
        ProviderKind::Anthropic,
        "claude-sonnet-4-5-20250514",
    ),
    (TeamRole::Coder2, ProviderKind::Gemini, "gemini-2.0-flash"),
    (TeamRole::Qa, ProviderKind::OpenAi, "gpt-4o"),
    (TeamRole::Ba, ProviderKind::Gemini, "gemini-1.5-pro"),
    (
        TeamRole::Reviewer,
        ProviderKind::Anthropic,
        "claude-sonnet-4-20250514",
    ),
];

#[derive(Debug, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub workspace: WorkspaceSettings,
    #[serde(default)]
    pub defaults: GenerationDefaults,
    #[serde(default)]
    pub providers: ProviderTable,
    /// Provider and model bound to each team role
    #[serde(default = "default_role_bindings")]
    pub roles: HashMap<TeamRole, RoleBinding>,
    /// Extra workflows registered at startup alongside the built-in ones
    #[serde(default)]
    pub workflows: Vec<WorkflowDefinition>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct WorkspaceSettings {
    pub root: PathBuf,
}

impl Default for WorkspaceSettings {
    fn default() -> Self {
        Self {
            root: PathBuf::from("./workspace"),
        }
    }
}

/// Sampling parameters used when neither the role nor the caller picks any
#[derive(Debug, Deserialize, Serialize)]
pub struct GenerationDefaults {
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for GenerationDefaults {
    fn default() -> Self {
        Self {
            max_tokens: 8192,
            temperature: 0.7,
        }
    }
}

/// Connection settings per provider; API keys here take precedence over the
/// conventional environment variables
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ProviderTable {
    #[serde(default)]
    pub anthropic: ProviderConfig,
    #[serde(default)]
    pub openai: ProviderConfig,
    #[serde(default)]
    pub gemini: ProviderConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RoleBinding {
    pub provider: ProviderKind,
    pub model: String,
}

/// A workflow declared in the settings file
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WorkflowDefinition {
    pub name: String,
    pub steps: Vec<WorkflowStep>,
}

fn default_role_bindings() -> HashMap<TeamRole, RoleBinding> {
    DEFAULT_ROLE_BINDINGS
        .into_iter()
        .map(|(role, provider, model)| {
            (
                role,
                RoleBinding {
                    provider,
                    model: model.to_string(),
                },
            )
        })
        .collect()
}

impl Settings {
    pub fn new() -> Result<Self, anyhow::Error> {
        let settings = Self::load(Path::new("ergane.toml"))?;
        settings.validated()
    }

    /// Create settings from CLI arguments (includes config file and CLI overrides)
    pub fn new_with_cli(cli: &Cli) -> Result<Self, anyhow::Error> {
        let mut settings = Self::load(&cli.config)?;

        // Apply CLI overrides (CLI > env vars > config file)
        settings.apply_cli_overrides(cli);

        settings.validated()
    }

    /// Built-in defaults without touching the filesystem or environment
    pub fn defaults() -> Self {
        Self {
            workspace: WorkspaceSettings::default(),
            defaults: GenerationDefaults::default(),
            providers: ProviderTable::default(),
            roles: default_role_bindings(),
            workflows: Vec::new(),
        }
    }

    fn load(config_path: &Path) -> Result<Self, anyhow::Error> {
        let mut builder = Config::builder()
            .add_source(File::from(config_path.to_path_buf()).required(false))
            .add_source(Environment::with_prefix("ERGANE").separator("__"))
            .set_default("workspace.root", "./workspace")?
            .set_default("defaults.max_tokens", 8192)?
            .set_default("defaults.temperature", 0.7)?;
        for (role, provider, model) in DEFAULT_ROLE_BINDINGS {
            builder = builder
                .set_default(format!("roles.{}.provider", role), provider.to_string())?
                .set_default(format!("roles.{}.model", role), model)?;
        }

        let settings: Settings = builder.build()?.try_deserialize()?;
        Ok(settings)
    }

    /// Apply CLI argument overrides to settings
    fn apply_cli_overrides(&mut self, cli: &Cli) {
        if let Some(workspace) = &cli.workspace {
            self.workspace.root = workspace.clone();
        }
    }

    fn validated(self) -> Result<Self, anyhow::Error> {
        validator::ConfigValidator::validate(&self).map_err(|errors| {
            let error_messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            anyhow::anyhow!(
                "Configuration validation failed:\n{}",
                error_messages.join("\n")
            )
        })?;
        Ok(self)
    }

    pub fn workspace_root(&self) -> &Path {
        &self.workspace.root
    }

    pub fn role_binding(&self, role: TeamRole) -> Option<&RoleBinding> {
        self.roles.get(&role)
    }

    pub fn provider_config(&self, provider: ProviderKind) -> &ProviderConfig {
        match provider {
            ProviderKind::Anthropic => &self.providers.anthropic,
            ProviderKind::OpenAi => &self.providers.openai,
            ProviderKind::Gemini => &self.providers.gemini,
        }
    }
}
