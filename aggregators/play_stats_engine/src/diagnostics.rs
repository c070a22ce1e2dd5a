use crate::attribution::AttributionError;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticKind {
    /// The resolver refused the play; no credit applied.
    Rejected(AttributionError),
    /// Identical copy of an already ingested play; skipped.
    DuplicatePlay,
    /// Another, different play already uses this sequence number; both counted.
    SequenceReused,
    /// Recorded points disagree with what the play type is worth.
    PointsMismatch { recorded: i32, derived: u32 },
}

/// One skipped or anomalous play.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Diagnostic {
    pub match_id: String,
    pub sequence_number: i64,
    pub kind: DiagnosticKind,
}

impl Diagnostic {
    /// True when the play contributed nothing to the totals.
    pub fn is_skip(&self) -> bool {
        matches!(self.kind, DiagnosticKind::Rejected(_) | DiagnosticKind::DuplicatePlay)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "match {} play #{}: ", self.match_id, self.sequence_number)?;
        match &self.kind {
            DiagnosticKind::Rejected(reason) => write!(f, "skipped, {}", reason),
            DiagnosticKind::DuplicatePlay => write!(f, "skipped, duplicate of an earlier play"),
            DiagnosticKind::SequenceReused => write!(f, "sequence number shared with a different play"),
            DiagnosticKind::PointsMismatch { recorded, derived } => write!(
                f,
                "recorded {} points but play is worth {}, using {}",
                recorded, derived, derived
            ),
        }
    }
}

/// Collects diagnostics while a match is folded.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    match_id: String,
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new(match_id: &str) -> Self {
        Self {
            match_id: match_id.to_string(),
            entries: Vec::new(),
        }
    }

    pub fn record(&mut self, sequence_number: i64, kind: DiagnosticKind) {
        self.entries.push(Diagnostic {
            match_id: self.match_id.clone(),
            sequence_number,
            kind,
        });
    }

    /// Entries ordered by sequence number, independent of ingest order.
    pub fn sorted(&self) -> Vec<Diagnostic> {
        let mut entries = self.entries.clone();
        entries.sort();
        entries
    }
}
