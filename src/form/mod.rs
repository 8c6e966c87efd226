use thiserror::Error;

mod agent;
mod document;
mod locator;
mod orchestrator;
mod registry;
mod writer;

pub use self::agent::{AgentHandle, FormAgent, Request, Response, spawn_agent};
pub use self::document::HtmlDocument;
pub use self::locator::{LocatorTier, locate};
pub use self::orchestrator::{FillConfig, ReadinessPolicy, RetryPolicy};
pub use self::registry::{FieldKind, ordered_mappings};

/// Failures outside per-field bookkeeping. A fill that merely has field
/// errors is still an `Ok` outcome.
#[derive(Debug, Error)]
pub enum FillError {
    #[error("no form document is attached to the agent")]
    NoDocument,
    #[error("malformed request: {0}")]
    MalformedRequest(String),
    #[error("form agent is no longer reachable")]
    AgentGone,
    #[error("bridge protocol error: {0}")]
    Protocol(String),
}
