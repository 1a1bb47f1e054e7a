//! Team roles and their default configurations
//!
//! Each role carries a static [`RoleConfig`] with its system prompt,
//! generation defaults, and capability tags. Which provider and model the
//! role runs on is configuration data and lives in [`crate::config`].

use std::collections::HashMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::agents::error::{AgentError, AgentResult};
use crate::agents::prompts;

/// Named team roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamRole {
    SeniorDev,
    Coder,
    #[serde(rename = "coder_2")]
    Coder2,
    Qa,
    Ba,
    Reviewer,
}

impl TeamRole {
    /// All roles in declaration order
    pub const ALL: [TeamRole; 6] = [
        TeamRole::SeniorDev,
        TeamRole::Coder,
        TeamRole::Coder2,
        TeamRole::Qa,
        TeamRole::Ba,
        TeamRole::Reviewer,
    ];

    /// Stable string key used in config files and workflow step identifiers
    pub fn as_str(&self) -> &'static str {
        match self {
            TeamRole::SeniorDev => "senior_dev",
            TeamRole::Coder => "coder",
            TeamRole::Coder2 => "coder_2",
            TeamRole::Qa => "qa",
            TeamRole::Ba => "ba",
            TeamRole::Reviewer => "reviewer",
        }
    }
}

impl std::fmt::Display for TeamRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for TeamRole {
    type Err = AgentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "senior_dev" => Ok(TeamRole::SeniorDev),
            "coder" => Ok(TeamRole::Coder),
            "coder_2" => Ok(TeamRole::Coder2),
            "qa" => Ok(TeamRole::Qa),
            "ba" => Ok(TeamRole::Ba),
            "reviewer" => Ok(TeamRole::Reviewer),
            other => Err(AgentError::UnsupportedRole(other.to_string())),
        }
    }
}

/// Static configuration for one team role
#[derive(Debug, Clone)]
pub struct RoleConfig {
    pub name: &'static str,
    pub description: &'static str,
    pub system_prompt: &'static str,
    pub max_tokens: u32,
    pub temperature: f32,
    pub capabilities: &'static [&'static str],
}

/// Immutable table of role configurations, built once at startup
pub struct RoleRegistry {
    configs: HashMap<TeamRole, RoleConfig>,
}

impl RoleRegistry {
    /// Build a registry holding the default configuration for every role
    pub fn with_defaults() -> Self {
        let mut configs = HashMap::new();

        configs.insert(
            TeamRole::SeniorDev,
            RoleConfig {
                name: "Senior Developer",
                description: "Technical lead for architecture, complex coding, and code review",
                system_prompt: prompts::SENIOR_DEV,
                max_tokens: 8192,
                temperature: 0.5,
                capabilities: &[
                    "architecture_design",
                    "complex_coding",
                    "code_review",
                    "technical_decisions",
                    "problem_solving",
                ],
            },
        );

        configs.insert(
            TeamRole::Coder,
            RoleConfig {
                name: "Coder",
                description: "Implementation specialist for rapid, high-quality coding",
                system_prompt: prompts::CODER,
                max_tokens: 4096,
                temperature: 0.6,
                capabilities: &[
                    "implementation",
                    "feature_development",
                    "bug_fixing",
                    "utility_creation",
                ],
            },
        );

        configs.insert(
            TeamRole::Coder2,
            RoleConfig {
                name: "Coder 2",
                description: "Secondary coder with large context for multi-file tasks",
                system_prompt: prompts::CODER_2,
                max_tokens: 8192,
                temperature: 0.6,
                capabilities: &[
                    "implementation",
                    "large_context",
                    "multi_file",
                    "alternative_solutions",
                ],
            },
        );

        configs.insert(
            TeamRole::Qa,
            RoleConfig {
                name: "QA Engineer",
                description: "Quality guardian for testing, bug finding, and validation",
                system_prompt: prompts::QA,
                max_tokens: 4096,
                temperature: 0.4,
                capabilities: &[
                    "code_review",
                    "bug_finding",
                    "test_writing",
                    "edge_case_analysis",
                ],
            },
        );

        configs.insert(
            TeamRole::Ba,
            RoleConfig {
                name: "Business Analyst",
                description: "Requirements specialist for specifications and user stories",
                system_prompt: prompts::BA,
                max_tokens: 4096,
                temperature: 0.7,
                capabilities: &[
                    "requirements_gathering",
                    "specification_writing",
                    "user_story_creation",
                    "acceptance_criteria",
                ],
            },
        );

        configs.insert(
            TeamRole::Reviewer,
            RoleConfig {
                name: "Code Reviewer",
                description: "Review specialist for fast, actionable code feedback",
                system_prompt: prompts::REVIEWER,
                max_tokens: 2048,
                temperature: 0.5,
                capabilities: &[
                    "code_review",
                    "refactoring_suggestions",
                    "best_practices",
                    "quick_feedback",
                ],
            },
        );

        Self { configs }
    }

    /// Look up one role's configuration
    pub fn get(&self, role: TeamRole) -> AgentResult<&RoleConfig> {
        self.configs
            .get(&role)
            .ok_or_else(|| AgentError::RoleNotFound(role.to_string()))
    }

    /// Registered roles in declaration order
    pub fn roles(&self) -> Vec<TeamRole> {
        TeamRole::ALL
            .iter()
            .copied()
            .filter(|role| self.configs.contains_key(role))
            .collect()
    }
}

impl Default for RoleRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_keys_roundtrip() {
        for role in TeamRole::ALL {
            assert_eq!(role.as_str().parse::<TeamRole>().unwrap(), role);
        }
        assert_eq!("coder_2".parse::<TeamRole>().unwrap(), TeamRole::Coder2);
    }

    #[test]
    fn test_unknown_role_fails() {
        let err = "intern".parse::<TeamRole>().unwrap_err();
        assert!(err.to_string().contains("Unsupported role"));
    }

    #[test]
    fn test_serde_uses_stable_keys() {
        let json = serde_json::to_string(&TeamRole::Coder2).unwrap();
        assert_eq!(json, "\"coder_2\"");
        let back: TeamRole = serde_json::from_str("\"senior_dev\"").unwrap();
        assert_eq!(back, TeamRole::SeniorDev);
    }

    #[test]
    fn test_registry_covers_every_role() {
        let registry = RoleRegistry::with_defaults();
        assert_eq!(registry.roles(), TeamRole::ALL.to_vec());

        for role in TeamRole::ALL {
            let config = registry.get(role).unwrap();
            assert!(!config.system_prompt.is_empty());
            assert!(config.max_tokens > 0);
        }
    }

    #[test]
    fn test_reviewer_defaults() {
        let registry = RoleRegistry::with_defaults();
        let reviewer = registry.get(TeamRole::Reviewer).unwrap();
        assert_eq!(reviewer.max_tokens, 2048);
        assert_eq!(reviewer.temperature, 0.5);
    }
}
