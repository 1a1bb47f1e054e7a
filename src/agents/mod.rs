//! AI agent system for Ergane
//!
//! This module provides the multi-provider agent runtime:
//! - One canonical message/response model spanning all providers
//! - Role-based agents (senior dev, coders, QA, BA, reviewer)
//! - Multi-agent orchestration with declarative workflows
//!
//! ## Architecture
//!
//! - `domain/` - Core types (Message, AgentResponse, TokenUsage)
//! - `llm/` - Chat provider implementations (Anthropic, OpenAI, Gemini)
//! - `core/` - The Agent runtime (history accumulation, lazy clients)
//! - `roles` / `prompts` - Team role table and default system prompts
//! - `factory` - Agent construction by provider or role
//! - `orchestration/` - Orchestrator and workflow engine

pub mod core;
pub mod domain;
pub mod error;
pub mod factory;
pub mod llm;
pub mod orchestration;
pub mod prompts;
pub mod roles;

// Re-export commonly used types
pub use self::core::{Agent, AgentConfig};
pub use domain::*;
pub use error::*;
pub use factory::{AgentFactory, RoleOverrides};
pub use orchestration::{Orchestrator, WorkflowResult, WorkflowStatus, WorkflowStep};
pub use roles::{RoleConfig, RoleRegistry, TeamRole};
