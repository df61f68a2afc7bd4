//! Run summary
//!
//! Counts what happened to every input line so unknown and malformed traffic
//! stays visible without being logged as errors.

use crate::pipeline::LineOutcome;
use chrono::Utc;
use std::collections::BTreeMap;
use std::fmt::Write;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DecodeSummary {
    pub lines_read: usize,
    pub decoded: usize,
    pub unknown: usize,
    pub filtered: usize,
    pub malformed: usize,
    pub invalid_input: usize,
    /// Decoded frames per identifier
    pub decoded_by_identifier: BTreeMap<String, usize>,
    /// Frames seen per unknown identifier, for the first `MAX_UNKNOWN_IDENTIFIERS`
    pub unknown_by_identifier: BTreeMap<String, usize>,
    /// Unknown frames whose identifier arrived after the map was full
    pub unknown_untracked: usize,
    /// Frames excluded by the identifier filter
    pub filtered_by_identifier: BTreeMap<String, usize>,
    /// First few decode failures, for the summary
    pub problems: Vec<String>,
}

const MAX_PROBLEMS: usize = 5;
const MAX_UNKNOWN_IDENTIFIERS: usize = 256;

impl DecodeSummary {
    pub fn record(&mut self, outcome: &LineOutcome) {
        self.lines_read += 1;
        match outcome {
            LineOutcome::Decoded { identifier, .. } => {
                self.decoded += 1;
                *self.decoded_by_identifier.entry(identifier.clone()).or_default() += 1;
            }
            LineOutcome::Unknown { identifier } => {
                self.unknown += 1;
                self.note_unknown(identifier);
            }
            LineOutcome::Filtered { identifier } => {
                self.filtered += 1;
                *self.filtered_by_identifier.entry(identifier.clone()).or_default() += 1;
            }
            LineOutcome::Malformed { identifier, reason } => {
                self.malformed += 1;
                self.note_problem(|| format!("{}: {}", identifier, reason));
            }
            LineOutcome::Invalid { line, reason } => {
                self.invalid_input += 1;
                self.note_problem(|| format!("line {}: {}", line, reason));
            }
        }
    }

    fn note_unknown(&mut self, identifier: &str) {
        if let Some(count) = self.unknown_by_identifier.get_mut(identifier) {
            *count += 1;
        } else if self.unknown_by_identifier.len() < MAX_UNKNOWN_IDENTIFIERS {
            self.unknown_by_identifier.insert(identifier.to_string(), 1);
        } else {
            self.unknown_untracked += 1;
        }
    }

    fn note_problem(&mut self, describe: impl FnOnce() -> String) {
        if self.problems.len() < MAX_PROBLEMS {
            self.problems.push(describe());
        }
    }

    /// Plain-text summary
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "=== DECODING SUMMARY ({}) ===", Utc::now().to_rfc3339());
        let _ = writeln!(out, "Lines read:        {}", self.lines_read);
        let _ = writeln!(out, "Decoded frames:    {}", self.decoded);
        let _ = writeln!(out, "Unknown PGNs:      {}", self.unknown);
        let _ = writeln!(out, "Filtered frames:   {}", self.filtered);
        let _ = writeln!(out, "Malformed frames:  {}", self.malformed);
        let _ = writeln!(out, "Invalid input:     {}", self.invalid_input);

        if !self.decoded_by_identifier.is_empty() {
            let _ = writeln!(out, "\nDecoded by PGN:");
            for (identifier, count) in &self.decoded_by_identifier {
                let _ = writeln!(out, "  {}: {}", identifier, count);
            }
        }

        if !self.filtered_by_identifier.is_empty() {
            let _ = writeln!(out, "\nFiltered by PGN:");
            for (identifier, count) in &self.filtered_by_identifier {
                let _ = writeln!(out, "  {}: {}", identifier, count);
            }
        }

        if !self.unknown_by_identifier.is_empty() {
            let _ = writeln!(out, "\nTop unknown PGNs:");
            let mut sorted: Vec<_> = self.unknown_by_identifier.iter().collect();
            sorted.sort_by(|a, b| b.1.cmp(a.1).then(a.0.cmp(b.0)));
            for (identifier, count) in sorted.into_iter().take(10) {
                let _ = writeln!(out, "  {}: {}", identifier, count);
            }
            if self.unknown_untracked > 0 {
                let _ = writeln!(out, "  (other): {}", self.unknown_untracked);
            }
        }

        if !self.problems.is_empty() {
            let _ = writeln!(out, "\nFirst problems:");
            for problem in &self.problems {
                let _ = writeln!(out, "  {}", problem);
            }
        }

        out
    }
}
