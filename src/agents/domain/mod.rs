//! Domain types for the agent runtime
//!
//! Canonical message and response shapes shared by every provider adapter.

mod message;
mod response;

pub use message::*;
pub use response::*;
