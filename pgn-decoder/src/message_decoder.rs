//! Message Decoding Engine
//!
//! Extracts parameter values from raw frames based on the message definitions
//! in the schema registry. Handles byte selection, byte order and physical
//! value conversion.

use crate::schema::{ByteRange, MessageDefinition, ParameterDefinition};
use crate::types::{DecodedValue, DecoderError, PayloadFault, RawFrame, Result};
use byteorder::{ByteOrder, LittleEndian};

/// Message decoder - extracts parameters from frames
pub struct MessageDecoder;

impl MessageDecoder {
    /// Decode every parameter of `message_def` from `frame`
    ///
    /// # Returns
    /// * `Ok(values)` in parameter declaration order
    /// * `Err(DecoderError::MalformedPayload)` if any parameter cannot be
    ///   extracted; no partial result is returned
    pub fn decode_message(
        frame: &RawFrame,
        message_def: &MessageDefinition,
    ) -> Result<Vec<DecodedValue>> {
        message_def
            .parameters
            .iter()
            .map(|parameter| {
                Self::decode_parameter(&frame.data, parameter).map_err(|fault| {
                    DecoderError::MalformedPayload {
                        identifier: message_def.identifier.clone(),
                        parameter: parameter.name.clone(),
                        fault,
                    }
                })
            })
            .collect()
    }

    /// Decode a single parameter from the payload tokens
    fn decode_parameter(
        data: &[String],
        parameter: &ParameterDefinition,
    ) -> std::result::Result<DecodedValue, PayloadFault> {
        let raw_value = Self::extract_raw_value(data, parameter.byte_range)?;

        Ok(DecodedValue {
            label: parameter.label(),
            value: Self::scale(raw_value, parameter.offset, parameter.resolution),
        })
    }

    /// Physical value: `(raw + offset) * resolution`
    fn scale(raw_value: u64, offset: i64, resolution: f64) -> f64 {
        (raw_value as i128 + offset as i128) as f64 * resolution
    }

    /// Extract the unsigned raw value covered by `range`
    ///
    /// Multi-byte ranges are stored least-significant byte first. Reading them
    /// little-endian is the same as reversing the tokens, concatenating them
    /// and parsing the result as one hex number.
    fn extract_raw_value(data: &[String], range: ByteRange) -> std::result::Result<u64, PayloadFault> {
        // Validate range fits within data
        if range.last_index() >= data.len() {
            return Err(PayloadFault::OutOfRange {
                index: range.last_index(),
                len: data.len(),
            });
        }

        match range {
            ByteRange::Single(index) => Self::parse_token(data, index).map(u64::from),
            ByteRange::Inclusive { start, end } => {
                let bytes = (start..=end)
                    .map(|index| Self::parse_token(data, index))
                    .collect::<std::result::Result<Vec<u8>, _>>()?;
                Ok(LittleEndian::read_uint(&bytes, bytes.len()))
            }
        }
    }

    /// Parse one two-character hex token
    fn parse_token(data: &[String], index: usize) -> std::result::Result<u8, PayloadFault> {
        let token = &data[index];
        let invalid = || PayloadFault::InvalidToken {
            index,
            token: token.clone(),
        };

        let trimmed = token.trim();
        if trimmed.len() != 2 || !trimmed.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        u8::from_str_radix(trimmed, 16).map_err(|_| invalid())
    }
}
