//! Agent construction by provider or by team role

use crate::agents::core::{Agent, AgentConfig};
use crate::agents::error::{AgentError, AgentResult};
use crate::agents::llm::ProviderKind;
use crate::agents::roles::{RoleRegistry, TeamRole};
use crate::config::Settings;

/// Optional overrides applied on top of a role's defaults
#[derive(Debug, Clone, Default)]
pub struct RoleOverrides {
    pub system_prompt: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

/// Factory for building configured agents
///
/// Two construction paths: an explicit provider and model, or a team role
/// resolved through the role registry and the role→provider→model table in
/// [`Settings`].
pub struct AgentFactory;

impl AgentFactory {
    /// Build an agent for an explicit provider and model
    ///
    /// Unset generation knobs fall back to the process-wide defaults.
    pub fn create_by_provider(
        provider: ProviderKind,
        model: &str,
        system_prompt: &str,
        max_tokens: Option<u32>,
        temperature: Option<f32>,
        settings: &Settings,
    ) -> Agent {
        let config = AgentConfig {
            provider,
            model: model.to_string(),
            system_prompt: system_prompt.to_string(),
            max_tokens: max_tokens.unwrap_or(settings.defaults.max_tokens),
            temperature: temperature.unwrap_or(settings.defaults.temperature),
        };

        Agent::new(config, settings.provider_config(provider).clone())
    }

    /// Build an agent for a team role
    ///
    /// Overrides take precedence over the role's defaults; the provider and
    /// model come from the settings table.
    pub fn create_by_role(
        role: TeamRole,
        overrides: &RoleOverrides,
        registry: &RoleRegistry,
        settings: &Settings,
    ) -> AgentResult<Agent> {
        let role_config = registry.get(role)?;

        let binding = settings
            .role_binding(role)
            .ok_or_else(|| AgentError::UnsupportedRole(role.to_string()))?;

        if binding.model.is_empty() {
            return Err(AgentError::NoModelForRole(role.to_string()));
        }

        let system_prompt = overrides
            .system_prompt
            .clone()
            .unwrap_or_else(|| role_config.system_prompt.to_string());

        Ok(Self::create_by_provider(
            binding.provider,
            &binding.model,
            &system_prompt,
            Some(overrides.max_tokens.unwrap_or(role_config.max_tokens)),
            Some(overrides.temperature.unwrap_or(role_config.temperature)),
            settings,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_by_provider_falls_back_to_defaults() {
        let settings = Settings::defaults();
        let agent = AgentFactory::create_by_provider(
            ProviderKind::OpenAi,
            "gpt-4o",
            "custom prompt",
            None,
            None,
            &settings,
        );

        let config = agent.config();
        assert_eq!(config.provider, ProviderKind::OpenAi);
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.system_prompt, "custom prompt");
        assert_eq!(config.max_tokens, settings.defaults.max_tokens);
        assert_eq!(config.temperature, settings.defaults.temperature);
    }

    #[test]
    fn test_create_by_role_uses_role_defaults() {
        let settings = Settings::defaults();
        let registry = RoleRegistry::with_defaults();

        let agent = AgentFactory::create_by_role(
            TeamRole::Qa,
            &RoleOverrides::default(),
            &registry,
            &settings,
        )
        .unwrap();

        let config = agent.config();
        assert_eq!(config.provider, ProviderKind::OpenAi);
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.max_tokens, 4096);
        assert_eq!(config.temperature, 0.4);
        assert!(config.system_prompt.contains("QA engineer"));
    }

    #[test]
    fn test_overrides_take_precedence() {
        let settings = Settings::defaults();
        let registry = RoleRegistry::with_defaults();

        let overrides = RoleOverrides {
            system_prompt: Some("short prompt".to_string()),
            max_tokens: Some(512),
            temperature: Some(0.1),
        };
        let agent =
            AgentFactory::create_by_role(TeamRole::Reviewer, &overrides, &registry, &settings)
                .unwrap();

        let config = agent.config();
        assert_eq!(config.system_prompt, "short prompt");
        assert_eq!(config.max_tokens, 512);
        assert_eq!(config.temperature, 0.1);
        // Provider binding still comes from settings
        assert_eq!(config.provider, ProviderKind::Anthropic);
    }

    #[test]
    fn test_empty_model_binding_is_rejected() {
        let mut settings = Settings::defaults();
        if let Some(binding) = settings.roles.get_mut(&TeamRole::Ba) {
            binding.model = String::new();
        }
        let registry = RoleRegistry::with_defaults();

        let result = AgentFactory::create_by_role(
            TeamRole::Ba,
            &RoleOverrides::default(),
            &registry,
            &settings,
        );

        assert!(matches!(result, Err(AgentError::NoModelForRole(_))));
    }

    #[test]
    fn test_missing_binding_is_unsupported_role() {
        let mut settings = Settings::defaults();
        settings.roles.remove(&TeamRole::Coder2);
        let registry = RoleRegistry::with_defaults();

        let result = AgentFactory::create_by_role(
            TeamRole::Coder2,
            &RoleOverrides::default(),
            &registry,
            &settings,
        );

        assert!(matches!(result, Err(AgentError::UnsupportedRole(_))));
    }
}
