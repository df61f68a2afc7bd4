//! Core types for the PGN frame decoder library
//!
//! This module defines the input frame, the decoded output values and the
//! error taxonomy. The decoder is stateless: it turns one frame into one
//! ordered list of values and keeps nothing between calls.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Result type for decoder operations
pub type Result<T> = std::result::Result<T, DecoderError>;

/// Raw CAN frame as received from the bus collaborator
///
/// The payload is kept in its textual form: one two-character hexadecimal
/// token per byte, in wire order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawFrame {
    /// PGN-style identifier (hexadecimal, any case)
    pub identifier: String,
    /// Payload byte tokens, e.g. `["0A", "00", "FF"]`
    pub data: Vec<String>,
}

impl RawFrame {
    /// Create a frame from an identifier and any iterable of byte tokens
    pub fn new<I, S>(identifier: impl Into<String>, data: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            identifier: identifier.into(),
            data: data.into_iter().map(Into::into).collect(),
        }
    }

    /// Identifier in the canonical form used for registry lookup
    pub fn canonical_identifier(&self) -> String {
        canonicalize_identifier(&self.identifier)
    }

    /// Number of payload byte tokens
    pub fn dlc(&self) -> usize {
        self.data.len()
    }
}

/// Canonical identifier form: surrounding whitespace removed, uppercase.
pub fn canonicalize_identifier(identifier: &str) -> String {
    identifier.trim().to_ascii_uppercase()
}

/// One decoded physical quantity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecodedValue {
    /// `"{name} ({unit})"`
    pub label: String,
    /// Physical value after offset and resolution were applied
    pub value: f64,
}

impl fmt::Display for DecodedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.label, self.value)
    }
}

/// What went wrong while extracting one parameter from a payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadFault {
    /// The parameter's byte range reaches past the end of the payload
    OutOfRange {
        /// Highest byte index the parameter needs
        index: usize,
        /// Number of byte tokens the frame carries
        len: usize,
    },
    /// A selected byte token is not a two-digit hexadecimal value
    InvalidToken {
        /// Position of the token in the payload
        index: usize,
        /// The offending token as received
        token: String,
    },
}

impl fmt::Display for PayloadFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PayloadFault::OutOfRange { index, len } => {
                write!(f, "byte {} requested but payload has {} bytes", index, len)
            }
            PayloadFault::InvalidToken { index, token } => {
                write!(f, "byte {} is not a hex byte token: {:?}", index, token)
            }
        }
    }
}

/// Errors that can occur while building the registry or decoding a frame
///
/// An unknown identifier is deliberately absent here: it is a normal outcome
/// on a shared bus and is reported as `Ok(None)` by the decoder.
#[derive(Debug, thiserror::Error)]
pub enum DecoderError {
    #[error("Malformed payload for {identifier}, parameter '{parameter}': {fault}")]
    MalformedPayload {
        identifier: String,
        parameter: String,
        fault: PayloadFault,
    },

    #[error("Invalid message definition: {0}")]
    InvalidDefinition(String),

    #[error("Duplicate identifier in registry: {0}")]
    DuplicateIdentifier(String),
}

impl DecoderError {
    /// True for errors caused by the frame contents rather than the schema
    pub fn is_malformed_payload(&self) -> bool {
        matches!(self, DecoderError::MalformedPayload { .. })
    }
}
