//! Multi-agent orchestration
//!
//! The [`Orchestrator`] owns one lazily created [`Agent`] per team role and
//! coordinates three kinds of work:
//! - Single asks: one prompt routed to one role
//! - Team consultations: the same prompt asked of several roles in turn
//! - Workflows: declarative step lists with dependency-based context
//!   assembly and fail-fast execution

mod workflow;

pub use workflow::{WorkflowResult, WorkflowStatus, WorkflowStep};

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, error, info};

use crate::agents::core::Agent;
use crate::agents::domain::AgentResponse;
use crate::agents::error::AgentResult;
use crate::agents::factory::{AgentFactory, RoleOverrides};
use crate::agents::roles::{RoleRegistry, TeamRole};
use crate::config::Settings;

use workflow::{assemble_prompt, builtin_workflows, step_key};

/// Coordinates agents and workflows for the whole team
pub struct Orchestrator {
    settings: Arc<Settings>,
    registry: RoleRegistry,
    agents: HashMap<TeamRole, Agent>,
    workflows: HashMap<String, Vec<WorkflowStep>>,
}

impl Orchestrator {
    /// Create an orchestrator with the built-in workflows plus any declared
    /// in the settings file
    pub fn new(settings: Arc<Settings>) -> Self {
        let mut workflows = HashMap::new();
        for (name, steps) in builtin_workflows() {
            workflows.insert(name.to_string(), steps);
        }
        for definition in &settings.workflows {
            workflows.insert(definition.name.clone(), definition.steps.clone());
        }

        Self {
            settings,
            registry: RoleRegistry::with_defaults(),
            agents: HashMap::new(),
            workflows,
        }
    }

    /// Ask a single role one question
    ///
    /// The role's agent is created on first use and kept for the lifetime
    /// of the orchestrator.
    pub async fn ask(
        &mut self,
        role: TeamRole,
        prompt: &str,
        include_history: bool,
    ) -> AgentResult<AgentResponse> {
        let agent = self.agent_mut(role)?;

        debug!("[{}] Processing request", role);
        let response = agent.chat(prompt, include_history).await?;
        info!("[{}] Completed ({} tokens)", role, response.total_tokens());

        Ok(response)
    }

    /// Ask several roles the same question, strictly one after another
    ///
    /// Fail-fast: the first error aborts the remaining asks and propagates.
    /// Defaults to all roles in declaration order.
    pub async fn consult_team(
        &mut self,
        prompt: &str,
        roles: Option<&[TeamRole]>,
    ) -> AgentResult<Vec<(TeamRole, AgentResponse)>> {
        let roles: Vec<TeamRole> = match roles {
            Some(roles) => roles.to_vec(),
            None => TeamRole::ALL.to_vec(),
        };

        let mut results = Vec::with_capacity(roles.len());
        for role in roles {
            info!("Consulting {}", role);
            let response = self.ask(role, prompt, false).await?;
            results.push((role, response));
        }

        Ok(results)
    }

    /// Execute a registered workflow
    ///
    /// Run outcomes, including step failures and unknown workflow names,
    /// are encoded in the returned [`WorkflowResult`].
    pub async fn run_workflow(
        &mut self,
        name: &str,
        context: &HashMap<String, String>,
    ) -> WorkflowResult {
        let steps = match self.workflows.get(name) {
            Some(steps) => steps.clone(),
            None => {
                return WorkflowResult {
                    status: WorkflowStatus::Failed,
                    steps_completed: 0,
                    outputs: Vec::new(),
                    errors: vec![format!("Unknown workflow: {}", name)],
                    duration_secs: 0.0,
                };
            }
        };

        let start = Instant::now();
        let mut outputs: Vec<(String, AgentResponse)> = Vec::new();

        info!("Starting workflow: {} ({} steps)", name, steps.len());

        for (i, step) in steps.iter().enumerate() {
            let key = step_key(i, step.role);
            let prompt = assemble_prompt(step, context, &outputs);

            info!("Step {}/{}: {}", i + 1, steps.len(), step.role);

            match self.ask(step.role, &prompt, false).await {
                Ok(response) => outputs.push((key, response)),
                Err(e) => {
                    error!("Step {} failed: {}", key, e);
                    return WorkflowResult {
                        status: WorkflowStatus::Failed,
                        steps_completed: i,
                        outputs,
                        errors: vec![format!("Step {} failed: {}", key, e)],
                        duration_secs: start.elapsed().as_secs_f64(),
                    };
                }
            }
        }

        let duration_secs = start.elapsed().as_secs_f64();
        info!("Workflow {} completed in {:.2}s", name, duration_secs);

        WorkflowResult {
            status: WorkflowStatus::Completed,
            steps_completed: steps.len(),
            outputs,
            errors: Vec::new(),
            duration_secs,
        }
    }

    /// Register a workflow; re-registering a name replaces it silently
    pub fn register_workflow(&mut self, name: impl Into<String>, steps: Vec<WorkflowStep>) {
        self.workflows.insert(name.into(), steps);
    }

    /// Names of all registered workflows, sorted
    pub fn list_workflows(&self) -> Vec<String> {
        let mut names: Vec<String> = self.workflows.keys().cloned().collect();
        names.sort();
        names
    }

    /// Steps of one registered workflow
    pub fn workflow(&self, name: &str) -> Option<&[WorkflowStep]> {
        self.workflows.get(name).map(|steps| steps.as_slice())
    }

    /// Clear conversation history for one role's agent, or for all agents
    pub fn clear_context(&mut self, role: Option<TeamRole>) {
        match role {
            Some(role) => {
                if let Some(agent) = self.agents.get_mut(&role) {
                    agent.clear_history();
                }
            }
            None => {
                for agent in self.agents.values_mut() {
                    agent.clear_history();
                }
            }
        }
    }

    /// Seed a pre-built agent for a role, replacing any existing one
    pub fn insert_agent(&mut self, role: TeamRole, agent: Agent) {
        self.agents.insert(role, agent);
    }

    /// The agent currently held for a role, if one has been created
    pub fn agent(&self, role: TeamRole) -> Option<&Agent> {
        self.agents.get(&role)
    }

    /// The role registry backing this orchestrator
    pub fn registry(&self) -> &RoleRegistry {
        &self.registry
    }

    /// The settings this orchestrator was built with
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    fn agent_mut(&mut self, role: TeamRole) -> AgentResult<&mut Agent> {
        match self.agents.entry(role) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let agent = AgentFactory::create_by_role(
                    role,
                    &RoleOverrides::default(),
                    &self.registry,
                    &self.settings,
                )?;
                Ok(entry.insert(agent))
            }
        }
    }
}

#[cfg(test)]
#[path = "workflow_test.rs"]
mod tests;
