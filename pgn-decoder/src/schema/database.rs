//! Schema registry
//!
//! Immutable catalog of known identifiers and their parameter layouts.
//! Built once, then shared read-only by every decoder that needs it.

use crate::types::{canonicalize_identifier, DecoderError, Result};
use std::collections::HashMap;
use std::fmt;

/// Widest byte range whose raw value still fits in a `u64`
pub const MAX_RANGE_BYTES: usize = 8;

/// Which payload bytes carry a parameter's raw value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteRange {
    /// One byte, read as-is
    Single(usize),
    /// Contiguous bytes `start..=end`, least-significant byte first on the wire
    Inclusive { start: usize, end: usize },
}

impl ByteRange {
    /// Number of payload bytes covered
    pub fn len(&self) -> usize {
        match *self {
            ByteRange::Single(_) => 1,
            ByteRange::Inclusive { start, end } => end.saturating_sub(start) + 1,
        }
    }

    /// Always false; a range covers at least one byte
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Highest byte index the range touches
    pub fn last_index(&self) -> usize {
        match *self {
            ByteRange::Single(index) => index,
            ByteRange::Inclusive { end, .. } => end,
        }
    }

    /// Parse the textual form: `"1"` or `"4:7"`
    pub fn parse(text: &str) -> Result<Self> {
        let parse_index = |s: &str| {
            s.trim().parse::<usize>().map_err(|_| {
                DecoderError::InvalidDefinition(format!("invalid byte index {:?}", s))
            })
        };

        match text.split_once(':') {
            Some((start, end)) => {
                let range = ByteRange::Inclusive {
                    start: parse_index(start)?,
                    end: parse_index(end)?,
                };
                range.validate().map_err(DecoderError::InvalidDefinition)?;
                Ok(range)
            }
            None => Ok(ByteRange::Single(parse_index(text)?)),
        }
    }

    fn validate(&self) -> std::result::Result<(), String> {
        if let ByteRange::Inclusive { start, end } = *self {
            if start > end {
                return Err(format!("byte range {} has start after end", self));
            }
            if self.len() > MAX_RANGE_BYTES {
                return Err(format!(
                    "byte range {} spans {} bytes, at most {} supported",
                    self,
                    self.len(),
                    MAX_RANGE_BYTES
                ));
            }
        }
        Ok(())
    }
}

impl fmt::Display for ByteRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ByteRange::Single(index) => write!(f, "{}", index),
            ByteRange::Inclusive { start, end } => write!(f, "{}:{}", start, end),
        }
    }
}

/// How to extract one physical quantity from a payload
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterDefinition {
    /// Parameter name
    pub name: String,
    /// Bytes carrying the raw value
    pub byte_range: ByteRange,
    /// Added to the raw value before scaling
    pub offset: i64,
    /// Scale factor from raw to physical value
    pub resolution: f64,
    /// Engineering unit (e.g. "l/h", "%")
    pub unit: String,
}

impl ParameterDefinition {
    pub fn new(
        name: impl Into<String>,
        byte_range: ByteRange,
        offset: i64,
        resolution: f64,
        unit: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            byte_range,
            offset,
            resolution,
            unit: unit.into(),
        }
    }

    /// Output label, `"{name} ({unit})"`
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.unit)
    }
}

/// A complete message definition
#[derive(Debug, Clone, PartialEq)]
pub struct MessageDefinition {
    /// PGN identifier, uppercase hex
    pub identifier: String,
    /// Human-readable message name
    pub display_name: String,
    /// Parameters in output order
    pub parameters: Vec<ParameterDefinition>,
}

impl MessageDefinition {
    pub fn new(
        identifier: impl Into<String>,
        display_name: impl Into<String>,
        parameters: Vec<ParameterDefinition>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            display_name: display_name.into(),
            parameters,
        }
    }

    /// Minimum payload length that satisfies every parameter
    pub fn required_bytes(&self) -> usize {
        self.parameters
            .iter()
            .map(|p| p.byte_range.last_index() + 1)
            .max()
            .unwrap_or(0)
    }
}

/// The schema registry
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    /// Key: canonical identifier
    messages: HashMap<String, MessageDefinition>,
}

impl SchemaRegistry {
    /// Registry holding the compiled-in catalog
    pub fn builtin() -> Result<Self> {
        Self::from_definitions(super::catalog::builtin_definitions())
    }

    /// Build a registry from definitions, validating every entry
    pub fn from_definitions<I>(definitions: I) -> Result<Self>
    where
        I: IntoIterator<Item = MessageDefinition>,
    {
        let mut messages = HashMap::new();

        for mut definition in definitions {
            let identifier = canonicalize_identifier(&definition.identifier);
            if identifier.is_empty() || !identifier.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(DecoderError::InvalidDefinition(format!(
                    "identifier {:?} is not hexadecimal",
                    definition.identifier
                )));
            }

            for parameter in &definition.parameters {
                parameter.byte_range.validate().map_err(|e| {
                    DecoderError::InvalidDefinition(format!(
                        "{} / {}: {}",
                        identifier, parameter.name, e
                    ))
                })?;
            }

            if messages.contains_key(&identifier) {
                return Err(DecoderError::DuplicateIdentifier(identifier));
            }

            definition.identifier = identifier.clone();
            messages.insert(identifier, definition);
        }

        let registry = Self { messages };
        let stats = registry.stats();
        log::info!(
            "Schema registry ready: {} messages, {} parameters",
            stats.num_messages,
            stats.num_parameters
        );
        Ok(registry)
    }

    /// Look up a definition by canonical identifier (exact match)
    pub fn lookup(&self, identifier: &str) -> Option<&MessageDefinition> {
        self.messages.get(identifier)
    }

    /// All identifiers, sorted
    pub fn identifiers(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.messages.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Definitions in identifier order
    pub fn iter(&self) -> impl Iterator<Item = &MessageDefinition> {
        self.identifiers()
            .into_iter()
            .filter_map(move |id| self.messages.get(id))
    }

    /// Get registry statistics
    pub fn stats(&self) -> RegistryStats {
        RegistryStats {
            num_messages: self.messages.len(),
            num_parameters: self.messages.values().map(|m| m.parameters.len()).sum(),
        }
    }
}

/// Registry statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryStats {
    /// Number of message definitions
    pub num_messages: usize,
    /// Number of parameter definitions across all messages
    pub num_parameters: usize,
}
