//! Batch decoding pipeline
//!
//! Reads NDJSON frame messages, decodes each batch on a bounded rayon pool and
//! writes the resulting series in input order.

use crate::report::DecodeSummary;
use anyhow::{Context, Result};
use pgn_decoder::{DecodeOutcome, Decoder, InboundMessage, OutboundMessage, SeriesPayload};
use rayon::prelude::*;
use std::io::{BufRead, Write};

/// What happened to one input line
#[derive(Debug, Clone, PartialEq)]
pub enum LineOutcome {
    Decoded {
        identifier: String,
        message: OutboundMessage,
    },
    Unknown {
        identifier: String,
    },
    Filtered {
        identifier: String,
    },
    Malformed {
        identifier: String,
        reason: String,
    },
    Invalid {
        line: usize,
        reason: String,
    },
}

/// One input line, before JSON parsing
#[derive(Debug)]
enum InputLine {
    Text(String),
    NotUtf8(String),
}

impl InputLine {
    /// Line contents without the trailing `\n` or `\r\n`
    fn from_bytes(bytes: &[u8]) -> Self {
        let bytes = bytes.strip_suffix(b"\n").unwrap_or(bytes);
        let bytes = bytes.strip_suffix(b"\r").unwrap_or(bytes);
        match std::str::from_utf8(bytes) {
            Ok(text) => InputLine::Text(text.to_string()),
            Err(e) => InputLine::NotUtf8(e.to_string()),
        }
    }
}

fn invalid_line(line_no: usize, reason: String) -> LineOutcome {
    log::warn!("Line {}: not a frame message: {}", line_no, reason);
    LineOutcome::Invalid {
        line: line_no,
        reason,
    }
}

pub struct Pipeline<'a> {
    decoder: &'a Decoder,
    pool: rayon::ThreadPool,
    batch_size: usize,
    route: String,
    envelope: bool,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        decoder: &'a Decoder,
        workers: usize,
        batch_size: usize,
        route: impl Into<String>,
        envelope: bool,
    ) -> Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("pgn-decode-{}", i))
            .build()
            .context("Failed to start decode worker pool")?;

        Ok(Self {
            decoder,
            pool,
            batch_size: batch_size.max(1),
            route: route.into(),
            envelope,
        })
    }

    /// Decode every line of `reader`, writing one JSON document per decoded frame
    ///
    /// Bad lines are counted in `summary`; only I/O failures end the run.
    pub fn run<R: BufRead, W: Write>(
        &self,
        mut reader: R,
        writer: &mut W,
        summary: &mut DecodeSummary,
    ) -> Result<()> {
        let mut buf = Vec::new();
        let mut line_no = 0;
        let mut batch: Vec<(usize, InputLine)> = Vec::with_capacity(self.batch_size);

        loop {
            batch.clear();
            while batch.len() < self.batch_size {
                buf.clear();
                if reader
                    .read_until(b'\n', &mut buf)
                    .context("Failed to read input")?
                    == 0
                {
                    break;
                }
                line_no += 1;

                match InputLine::from_bytes(&buf) {
                    InputLine::Text(text) if text.trim().is_empty() => continue,
                    line => batch.push((line_no, line)),
                }
            }

            if batch.is_empty() {
                break;
            }

            log::debug!("Decoding batch of {} lines", batch.len());

            // `collect` on an indexed parallel iterator keeps input order
            let outcomes: Vec<LineOutcome> = self.pool.install(|| {
                batch
                    .par_iter()
                    .map(|(line_no, line)| match line {
                        InputLine::Text(text) => self.process_line(*line_no, text),
                        InputLine::NotUtf8(reason) => invalid_line(*line_no, reason.clone()),
                    })
                    .collect()
            });

            for outcome in &outcomes {
                summary.record(outcome);
                if let LineOutcome::Decoded { message, .. } = outcome {
                    let json = if self.envelope {
                        message.envelope_json()
                    } else {
                        message.body_json()
                    }
                    .context("Failed to serialize series")?;
                    writeln!(writer, "{}", json).context("Failed to write output")?;
                }
            }
        }

        Ok(())
    }

    fn process_line(&self, line_no: usize, line: &str) -> LineOutcome {
        let inbound: InboundMessage = match serde_json::from_str(line) {
            Ok(inbound) => inbound,
            Err(e) => return invalid_line(line_no, e.to_string()),
        };

        let frame = inbound.frame();
        let identifier = frame.canonical_identifier();

        match self.decoder.decode_outcome(&frame) {
            Ok(DecodeOutcome::Decoded(values)) => LineOutcome::Decoded {
                message: OutboundMessage::time_series(
                    SeriesPayload::new(&inbound, values),
                    self.route.as_str(),
                ),
                identifier,
            },
            Ok(DecodeOutcome::Unknown) => LineOutcome::Unknown { identifier },
            Ok(DecodeOutcome::Filtered) => LineOutcome::Filtered { identifier },
            Err(e) => {
                log::warn!("Line {}: dropping frame from {}: {}", line_no, inbound.device_id, e);
                LineOutcome::Malformed {
                    identifier,
                    reason: e.to_string(),
                }
            }
        }
    }
}
