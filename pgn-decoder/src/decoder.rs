//! Main decoder API
//!
//! This module provides the primary interface for the decoder library.
//! A `Decoder` is built around an already constructed `SchemaRegistry` and
//! turns one `RawFrame` at a time into decoded values.

use crate::config::DecoderConfig;
use crate::message_decoder::MessageDecoder;
use crate::schema::SchemaRegistry;
use crate::types::{DecodedValue, RawFrame, Result};
use std::sync::Arc;

/// Result of decoding one frame, for callers that count outcomes
#[derive(Debug, Clone, PartialEq)]
pub enum DecodeOutcome {
    /// All parameters decoded, in declaration order
    Decoded(Vec<DecodedValue>),
    /// The identifier is not in the registry
    Unknown,
    /// The identifier is known but excluded by the message filter
    Filtered,
}

impl DecodeOutcome {
    /// Decoded values, or `None` for frames that were not decodable
    pub fn into_values(self) -> Option<Vec<DecodedValue>> {
        match self {
            DecodeOutcome::Decoded(values) => Some(values),
            DecodeOutcome::Unknown | DecodeOutcome::Filtered => None,
        }
    }
}

/// The main decoder struct - entry point for all decoding operations
///
/// Holds no mutable state; a single instance can be shared across threads.
#[derive(Debug, Clone)]
pub struct Decoder {
    registry: Arc<SchemaRegistry>,
    config: DecoderConfig,
}

impl Decoder {
    /// Create a decoder over `registry` with default settings
    pub fn new(registry: Arc<SchemaRegistry>) -> Self {
        Self::with_config(registry, DecoderConfig::default())
    }

    /// Create a decoder over `registry` with the given configuration
    pub fn with_config(registry: Arc<SchemaRegistry>, config: DecoderConfig) -> Self {
        Self { registry, config }
    }

    /// The registry this decoder reads from
    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// Active configuration
    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Decode one frame
    ///
    /// # Returns
    /// * `Ok(Some(values))` - one value per parameter, in declaration order
    /// * `Ok(None)` - identifier unknown (or filtered out); drop the frame
    /// * `Err(DecoderError::MalformedPayload)` - the payload does not fit the layout
    ///
    /// # Example
    /// ```
    /// use pgn_decoder::{Decoder, RawFrame, SchemaRegistry};
    /// use std::sync::Arc;
    ///
    /// let decoder = Decoder::new(Arc::new(SchemaRegistry::builtin().unwrap()));
    /// let frame = RawFrame::new("0C00EF47", ["00", "64"]);
    ///
    /// let values = decoder.decode(&frame).unwrap().unwrap();
    /// assert_eq!(values[0].label, "Fuel Level (%)");
    /// assert!((values[0].value - 40.0).abs() < 1e-9);
    /// ```
    pub fn decode(&self, frame: &RawFrame) -> Result<Option<Vec<DecodedValue>>> {
        self.decode_outcome(frame).map(DecodeOutcome::into_values)
    }

    /// Decode one frame, distinguishing unknown from filtered identifiers
    pub fn decode_outcome(&self, frame: &RawFrame) -> Result<DecodeOutcome> {
        let identifier = frame.canonical_identifier();

        let Some(message_def) = self.registry.lookup(&identifier) else {
            log::trace!("Unknown identifier: {}, dropping frame", identifier);
            return Ok(DecodeOutcome::Unknown);
        };

        if !self.config.should_process_message(&identifier) {
            log::trace!("Identifier {} excluded by message filter", identifier);
            return Ok(DecodeOutcome::Filtered);
        }

        log::debug!(
            "Decoding message: {} ({}), {} of {} bytes present",
            message_def.display_name,
            identifier,
            frame.dlc(),
            message_def.required_bytes()
        );

        match MessageDecoder::decode_message(frame, message_def) {
            Ok(values) => Ok(DecodeOutcome::Decoded(values)),
            Err(e) => {
                // Warning level is left to the caller
                log::debug!("{}", e);
                Err(e)
            }
        }
    }
}
