//! Decoder configuration types
//!
//! The decoder needs very little configuration. Routing, envelopes and worker
//! pools belong to the caller.

use crate::types::canonicalize_identifier;
use serde::{Deserialize, Serialize};

/// Configuration for the decoder library
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecoderConfig {
    /// Optional: only decode these identifiers
    #[serde(default)]
    pub message_filter: Option<Vec<String>>,
}

impl DecoderConfig {
    /// Create a new decoder configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set identifier filter
    pub fn with_message_filter<I, S>(mut self, identifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.message_filter = Some(
            identifiers
                .into_iter()
                .map(|id| canonicalize_identifier(id.as_ref()))
                .collect(),
        );
        self
    }

    /// Check if a canonical identifier should be decoded
    pub fn should_process_message(&self, identifier: &str) -> bool {
        match &self.message_filter {
            Some(identifiers) => identifiers
                .iter()
                .any(|id| id.trim().eq_ignore_ascii_case(identifier)),
            None => true,
        }
    }
}
