//! PGN Frame Decoder Library
//!
//! A stateless library that turns vehicle network frames (a PGN-style
//! identifier plus hex byte tokens) into named, unit-tagged physical values
//! ready for time-series reporting.
//!
//! # Architecture
//!
//! - [`SchemaRegistry`]: immutable catalog mapping identifiers to parameter layouts
//! - [`Decoder`]: applies the registry to one frame at a time
//!
//! The library does NOT:
//! - Receive or publish frames
//! - Manage device connections
//! - Schedule work; decoding is synchronous and can run on any thread
//!
//! # Example Usage
//!
//! ```
//! use pgn_decoder::{Decoder, RawFrame, SchemaRegistry};
//! use std::sync::Arc;
//!
//! let registry = Arc::new(SchemaRegistry::builtin().unwrap());
//! let decoder = Decoder::new(registry);
//!
//! let frame = RawFrame::new("18FEF200", ["0A", "00", "FF", "FF", "FF", "FF", "FF", "FF"]);
//! match decoder.decode(&frame) {
//!     Ok(Some(values)) => {
//!         for value in values {
//!             println!("{}", value);
//!         }
//!     }
//!     Ok(None) => println!("unknown identifier"),
//!     Err(e) => eprintln!("Decode error: {}", e),
//! }
//! ```

// Public modules
pub mod config;
pub mod decoder;
pub mod schema;
pub mod series;
pub mod types;

// Re-export main types for convenience
pub use config::DecoderConfig;
pub use decoder::{DecodeOutcome, Decoder};
pub use schema::{ByteRange, MessageDefinition, ParameterDefinition, RegistryStats, SchemaRegistry};
pub use series::{InboundMessage, OutboundMessage, SeriesPayload};
pub use types::{DecodedValue, DecoderError, PayloadFault, RawFrame, Result};

// Internal modules (not exposed in public API)
mod message_decoder;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
