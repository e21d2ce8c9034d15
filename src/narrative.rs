//! Post-game narrative summary
//!
//! The text itself comes from an external generation service. This module
//! defines what is sent, what can go wrong, and what the player sees when it
//! does. A request is made once per game over; there are no retries.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Shown whenever the service fails or answers with nothing usable
pub const FALLBACK_SUMMARY: &str =
    "Your heart kept running as long as it could. Dust yourself off and try again.";

/// Final stats of one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRequest {
    /// Session generation the request belongs to
    pub generation: u64,
    pub hearts: u32,
    /// Hazards hit, oldest first
    pub hit_labels: Vec<String>,
}

impl SummaryRequest {
    /// Prompt text for a free-form text generation backend
    pub fn prompt(&self) -> String {
        let hits = if self.hit_labels.is_empty() {
            "nothing".to_string()
        } else {
            self.hit_labels.join(", ")
        };
        format!(
            "A runner collected {} heart(s) before being stopped by {}. \
             Write a short, warm, slightly humorous two-sentence reflection on their journey.",
            self.hearts, hits
        )
    }
}

/// Ways the narrative service can fail
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NarrativeError {
    #[error("narrative service unavailable: {0}")]
    Unavailable(String),

    #[error("narrative request timed out")]
    Timeout,

    #[error("malformed narrative response: {0}")]
    Malformed(String),
}

/// A text generator that can be called off the simulation path
pub trait NarrativeService {
    fn summarize(&self, request: &SummaryRequest) -> Result<String, NarrativeError>;
}

/// Turn a service result into display text
pub fn resolve(result: Result<String, NarrativeError>) -> String {
    match result.and_then(validate) {
        Ok(text) => text,
        Err(e) => {
            log::warn!("Narrative summary failed: {e}");
            FALLBACK_SUMMARY.to_string()
        }
    }
}

fn validate(text: String) -> Result<String, NarrativeError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        Err(NarrativeError::Malformed("empty response".into()))
    } else {
        Ok(trimmed.to_string())
    }
}

/// Offline narrator built from the run's stats
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateNarrative;

impl NarrativeService for TemplateNarrative {
    fn summarize(&self, request: &SummaryRequest) -> Result<String, NarrativeError> {
        let opening = match request.hearts {
            0 => "You ran with an open heart but came away empty-handed.".to_string(),
            1 => "You held on to a single heart, and that counts.".to_string(),
            n => format!("You gathered {n} hearts along the way."),
        };
        let ending = match request.hit_labels.last() {
            Some(label) => format!("In the end, {label} got in the way. Next time, sidestep it."),
            None => "Nothing stopped you this time.".to_string(),
        };
        Ok(format!("{opening} {ending}"))
    }
}
