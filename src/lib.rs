//! # Ergane - AI Dev Team Orchestrator
//!
//! Ergane drives a team of role-specialized LLM agents from a single CLI.
//! Each role (senior dev, coder, QA, BA, reviewer) is bound to a concrete
//! provider and model, and the orchestrator routes one-shot questions,
//! whole-team consultations, and multi-step workflows across them while
//! keeping per-role conversation history.
//!
//! ## Features
//!
//! - **Multi-provider**: Anthropic, OpenAI, and Gemini behind one trait
//! - **Role bindings**: per-role provider, model, and system prompt
//! - **Workflows**: named step pipelines that feed earlier outputs forward
//! - **Workspace**: a sandboxed file store for project scaffolding
//! - **Interactive shell**: @mention routing with completion and hints
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use ergane::config::Settings;
//! use ergane::Orchestrator;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Arc::new(Settings::new()?);
//!     let mut orchestrator = Orchestrator::new(settings);
//!
//!     let response = orchestrator
//!         .ask("qa".parse()?, "Write a test plan for a login form", false)
//!         .await?;
//!     println!("{}", response.content);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`agents`]: provider clients, the agent core, roles, and orchestration
//! - [`config`]: layered settings with defaults, file, and env sources
//! - [`workspace`]: path-sandboxed project and file operations
//! - [`shell`]: the interactive readline session
//! - [`cli`]: argument parsing for the `ergane` binary

pub mod agents;
pub mod cli;
pub mod config;
pub mod shell;
pub mod workspace;

pub use agents::orchestration::Orchestrator;
pub use config::Settings;
pub use workspace::Workspace;
