//! Conflict scan results

use serde::Serialize;

/// Summary reported when no chunk produced a conflict verdict
pub const NO_CONFLICTS_SUMMARY: &str = "No conflicts detected across the document.";

/// A non-blank verdict for one chunk of the scanned document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictFinding {
    /// 1-based index of the chunk the verdict is about
    pub chunk_index: usize,
    /// Reasoner output, trimmed
    pub verdict: String,
}

impl ConflictFinding {
    /// Render as a traceable line, e.g. `Chunk 4: ...`
    pub fn to_line(&self) -> String {
        format!("Chunk {}: {}", self.chunk_index, self.verdict)
    }
}

/// Document-level outcome of a conflict scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConflictReport {
    /// Findings in chunk order
    #[serde(skip)]
    pub findings: Vec<ConflictFinding>,
    /// One aggregate summary over all findings
    pub conflict_summary: String,
    /// Every finding, one `Chunk N: ...` line each
    pub complete_conflict: String,
}

impl ConflictReport {
    /// Report for a document where nothing conflicted
    pub fn no_conflicts() -> Self {
        Self {
            findings: Vec::new(),
            conflict_summary: NO_CONFLICTS_SUMMARY.to_string(),
            complete_conflict: String::new(),
        }
    }

    /// Whether any chunk conflicted
    pub fn has_conflicts(&self) -> bool {
        !self.findings.is_empty()
    }
}

/// Join findings into the `complete_conflict` text
pub fn join_findings(findings: &[ConflictFinding]) -> String {
    findings
        .iter()
        .map(ConflictFinding::to_line)
        .collect::<Vec<_>>()
        .join("\n")
}
