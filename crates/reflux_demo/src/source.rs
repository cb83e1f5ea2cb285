//! Where new list values come from.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    #[error("source rejected request {sequence}")]
    Rejected { sequence: u32 },
}

/// Produces the value for the `sequence`-th add (1-based).
#[async_trait(?Send)]
pub trait ValueSource {
    async fn load(&self, sequence: u32) -> Result<String, SourceError>;
}

/// Deterministic source: `"{prefix} {sequence}"`, failing every `fail_every`-th request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptedSource {
    prefix: String,
    fail_every: Option<u32>,
}

impl ScriptedSource {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            fail_every: None,
        }
    }

    pub fn failing_every(mut self, every: u32) -> Self {
        self.fail_every = (every > 0).then_some(every);
        self
    }

    pub fn value_for(&self, sequence: u32) -> Result<String, SourceError> {
        match self.fail_every {
            Some(every) if sequence % every == 0 => Err(SourceError::Rejected { sequence }),
            _ => Ok(format!("{} {}", self.prefix, sequence)),
        }
    }
}

#[async_trait(?Send)]
impl ValueSource for ScriptedSource {
    async fn load(&self, sequence: u32) -> Result<String, SourceError> {
        self.value_for(sequence)
    }
}
