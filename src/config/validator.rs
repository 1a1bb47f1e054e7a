use std::collections::HashMap;

use thiserror::Error;

use crate::agents::roles::TeamRole;
use crate::config::Settings;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Duplicate entry: {0}")]
    Duplicate(String),
}

pub struct ConfigValidator;

impl ConfigValidator {
    pub fn validate(settings: &Settings) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        // Validate generation defaults
        if let Err(e) = Self::validate_defaults(settings) {
            errors.extend(e);
        }

        // Validate role bindings
        if let Err(e) = Self::validate_roles(settings) {
            errors.extend(e);
        }

        // Validate declared workflows
        if let Err(e) = Self::validate_workflows(settings) {
            errors.extend(e);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_defaults(settings: &Settings) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if settings.defaults.max_tokens == 0 {
            errors.push(ValidationError::InvalidValue {
                field: "defaults.max_tokens".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        if !(0.0..=2.0).contains(&settings.defaults.temperature) {
            errors.push(ValidationError::InvalidValue {
                field: "defaults.temperature".to_string(),
                reason: "Must be between 0.0 and 2.0".to_string(),
            });
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_roles(settings: &Settings) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        // Every role must resolve to a model; provider validity is enforced
        // by deserialization
        for role in TeamRole::ALL {
            match settings.roles.get(&role) {
                None => {
                    errors.push(ValidationError::MissingField(format!("roles.{}", role)));
                }
                Some(binding) if binding.model.is_empty() => {
                    errors.push(ValidationError::MissingField(format!(
                        "roles.{}.model",
                        role
                    )));
                }
                Some(_) => {}
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_workflows(settings: &Settings) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        let mut seen_names = HashMap::new();

        for (idx, workflow) in settings.workflows.iter().enumerate() {
            // Check for duplicate names
            if let Some(prev_idx) = seen_names.insert(&workflow.name, idx) {
                errors.push(ValidationError::Duplicate(format!(
                    "Workflow name '{}' appears at indices {} and {}",
                    workflow.name, prev_idx, idx
                )));
            }

            if workflow.name.is_empty() {
                errors.push(ValidationError::MissingField(format!(
                    "workflows[{}].name",
                    idx
                )));
            }

            if workflow.steps.is_empty() {
                errors.push(ValidationError::InvalidValue {
                    field: format!("workflows[{}]", idx),
                    reason: "Must contain at least one step".to_string(),
                });
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::orchestration::WorkflowStep;
    use crate::config::WorkflowDefinition;

    #[test]
    fn test_valid_config() {
        let settings = Settings::defaults();
        assert!(ConfigValidator::validate(&settings).is_ok());
    }

    #[test]
    fn test_invalid_temperature() {
        let mut settings = Settings::defaults();
        settings.defaults.temperature = 3.5;

        let result = ConfigValidator::validate(&settings);
        assert!(result.is_err());
        let errors = result.unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("defaults.temperature"));
    }

    #[test]
    fn test_zero_max_tokens() {
        let mut settings = Settings::defaults();
        settings.defaults.max_tokens = 0;

        let result = ConfigValidator::validate(&settings);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .iter()
            .any(|e| e.to_string().contains("defaults.max_tokens")));
    }

    #[test]
    fn test_missing_role_binding() {
        let mut settings = Settings::defaults();
        settings.roles.remove(&TeamRole::Qa);

        let result = ConfigValidator::validate(&settings);
        assert!(result.is_err());
        let errors = result.unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::MissingField(field) if field == "roles.qa")));
    }

    #[test]
    fn test_empty_role_model() {
        let mut settings = Settings::defaults();
        if let Some(binding) = settings.roles.get_mut(&TeamRole::Coder) {
            binding.model.clear();
        }

        let result = ConfigValidator::validate(&settings);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .iter()
            .any(|e| e.to_string().contains("roles.coder.model")));
    }

    #[test]
    fn test_duplicate_workflow_names() {
        let mut settings = Settings::defaults();
        let step = WorkflowStep {
            role: TeamRole::Qa,
            instruction: "Check {input}".to_string(),
            depends_on: vec![],
        };
        settings.workflows.push(WorkflowDefinition {
            name: "audit".to_string(),
            steps: vec![step.clone()],
        });
        settings.workflows.push(WorkflowDefinition {
            name: "audit".to_string(),
            steps: vec![step],
        });

        let result = ConfigValidator::validate(&settings);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .iter()
            .any(|e| matches!(e, ValidationError::Duplicate(_))));
    }

    #[test]
    fn test_empty_workflow_steps() {
        let mut settings = Settings::defaults();
        settings.workflows.push(WorkflowDefinition {
            name: "hollow".to_string(),
            steps: vec![],
        });

        let result = ConfigValidator::validate(&settings);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .iter()
            .any(|e| e.to_string().contains("at least one step")));
    }
}
