//! Workflow definitions, step keys, and prompt assembly

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::agents::domain::AgentResponse;
use crate::agents::roles::TeamRole;

/// A single step in a workflow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowStep {
    /// Which team role executes this step
    pub role: TeamRole,
    /// Instruction template; `{key}` placeholders are filled from the run
    /// context
    pub instruction: String,
    /// Step keys whose outputs are appended to this step's prompt, in order
    #[serde(default)]
    pub depends_on: Vec<String>,
}

/// Status of a workflow run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkflowStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

/// Result of a workflow run
///
/// Outputs are ordered by step execution; on failure they hold only the
/// steps that fully succeeded.
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowResult {
    pub status: WorkflowStatus,
    pub steps_completed: usize,
    pub outputs: Vec<(String, AgentResponse)>,
    pub errors: Vec<String>,
    pub duration_secs: f64,
}

impl WorkflowResult {
    /// Response recorded under a step key
    pub fn output(&self, key: &str) -> Option<&AgentResponse> {
        self.outputs
            .iter()
            .find(|(recorded, _)| recorded == key)
            .map(|(_, response)| response)
    }

    /// Content of the last completed step
    pub fn final_output(&self) -> Option<&str> {
        self.outputs
            .last()
            .map(|(_, response)| response.content.as_str())
    }
}

/// Deterministic key for a step: ordinal position plus role
pub(crate) fn step_key(index: usize, role: TeamRole) -> String {
    format!("step_{}_{}", index, role)
}

/// Substitute `{key}` placeholders in a single left-to-right pass
///
/// Substituted values are inserted literally and never re-scanned, so a
/// value containing `{other}`-shaped text cannot trigger further
/// substitution. Placeholders with no matching context key pass through
/// unchanged.
pub(crate) fn render_instruction(template: &str, context: &HashMap<String, String>) -> String {
    let mut rendered = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        rendered.push_str(&rest[..open]);
        let after_open = &rest[open + 1..];

        match after_open.find('}') {
            Some(close) => {
                let key = &after_open[..close];
                if let Some(inner) = key.find('{') {
                    // Not a placeholder; resume scanning at the inner brace
                    rendered.push('{');
                    rendered.push_str(&key[..inner]);
                    rest = &after_open[inner..];
                    continue;
                }
                match context.get(key) {
                    Some(value) => rendered.push_str(value),
                    None => {
                        rendered.push('{');
                        rendered.push_str(key);
                        rendered.push('}');
                    }
                }
                rest = &after_open[close + 1..];
            }
            None => {
                // Unclosed brace; the remainder is literal text
                rendered.push_str(&rest[open..]);
                return rendered;
            }
        }
    }

    rendered.push_str(rest);
    rendered
}

/// Assemble the full prompt for one step
///
/// Renders the instruction template, then appends one labelled block per
/// dependency found in the outputs collected so far, in `depends_on` order.
pub(crate) fn assemble_prompt(
    step: &WorkflowStep,
    context: &HashMap<String, String>,
    outputs: &[(String, AgentResponse)],
) -> String {
    let mut prompt = render_instruction(&step.instruction, context);

    if !step.depends_on.is_empty() {
        prompt.push_str("\n\n---\nPrevious outputs:\n");
        for dep in &step.depends_on {
            let recorded = outputs
                .iter()
                .find(|(key, _)| key == dep)
                .map(|(_, response)| response);
            if let Some(response) = recorded {
                prompt.push_str(&format!("\n[{}]:\n{}\n", dep, response.content));
            }
        }
    }

    prompt
}

/// Built-in workflow definitions
///
/// Pure data: four pipelines covering feature development, code review,
/// bug fixing, and architecture review.
pub(crate) fn builtin_workflows() -> Vec<(&'static str, Vec<WorkflowStep>)> {
    vec![
        (
            "feature",
            vec![
                WorkflowStep {
                    role: TeamRole::Ba,
                    instruction: "Analyze this feature request and create user stories with acceptance criteria:\n\n{requirement}".to_string(),
                    depends_on: vec![],
                },
                WorkflowStep {
                    role: TeamRole::SeniorDev,
                    instruction: "Based on the requirements below, design the architecture and create a technical plan for implementation.".to_string(),
                    depends_on: vec!["step_0_ba".to_string()],
                },
                WorkflowStep {
                    role: TeamRole::Coder,
                    instruction: "Implement the feature based on the architecture and requirements provided.".to_string(),
                    depends_on: vec!["step_0_ba".to_string(), "step_1_senior_dev".to_string()],
                },
                WorkflowStep {
                    role: TeamRole::Qa,
                    instruction: "Review the implementation for bugs, edge cases, and suggest test cases.".to_string(),
                    depends_on: vec!["step_2_coder".to_string()],
                },
            ],
        ),
        (
            "review",
            vec![
                WorkflowStep {
                    role: TeamRole::Reviewer,
                    instruction: "Review this code for issues, bugs, and improvements:\n\n{code}".to_string(),
                    depends_on: vec![],
                },
                WorkflowStep {
                    role: TeamRole::SeniorDev,
                    instruction: "Based on the review feedback, suggest how to refactor and improve this code.".to_string(),
                    depends_on: vec!["step_0_reviewer".to_string()],
                },
            ],
        ),
        (
            "bugfix",
            vec![
                WorkflowStep {
                    role: TeamRole::Qa,
                    instruction: "Analyze this bug report and identify the root cause:\n\n{bug_description}\n\nCode:\n{code}".to_string(),
                    depends_on: vec![],
                },
                WorkflowStep {
                    role: TeamRole::SeniorDev,
                    instruction: "Based on the QA analysis, plan the fix approach.".to_string(),
                    depends_on: vec!["step_0_qa".to_string()],
                },
                WorkflowStep {
                    role: TeamRole::Coder,
                    instruction: "Implement the bug fix based on the analysis and plan.".to_string(),
                    depends_on: vec!["step_0_qa".to_string(), "step_1_senior_dev".to_string()],
                },
            ],
        ),
        (
            "architecture",
            vec![
                WorkflowStep {
                    role: TeamRole::Ba,
                    instruction: "List the business requirements and constraints for:\n\n{project_description}".to_string(),
                    depends_on: vec![],
                },
                WorkflowStep {
                    role: TeamRole::SeniorDev,
                    instruction: "Design a comprehensive architecture considering the business requirements.".to_string(),
                    depends_on: vec!["step_0_ba".to_string()],
                },
                WorkflowStep {
                    role: TeamRole::Qa,
                    instruction: "Review the architecture for potential issues, scalability concerns, and security gaps.".to_string(),
                    depends_on: vec!["step_1_senior_dev".to_string()],
                },
            ],
        ),
    ]
}
