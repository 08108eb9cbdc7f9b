//! Splitting of raw synthesis output into reasoning, analysis and references.

/// Closes the reasoning segment emitted by reasoning models.
pub const THINK_END: &str = "</think>";
/// Opens the reasoning segment; stripped from the reasoning text.
pub const THINK_START: &str = "<think>";
/// Separates the analysis from the appended references block.
pub const REFERENCES_MARKER: &str = "References:";

/// The three user-facing parts of a synthesis.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedResponse {
    pub thinking_process: String,
    pub analysis: String,
    pub references: String,
}

/// Split `raw` on the first [`THINK_END`] and then on the first
/// [`REFERENCES_MARKER`].
///
/// Matches are literal and case-sensitive. When the reasoning marker is
/// present but nothing follows it, the analysis is the whole unsplit `raw`
/// string.
pub fn split_response(raw: &str) -> ParsedResponse {
    let (thinking_process, working) = match raw.split_once(THINK_END) {
        Some((thinking, rest)) => {
            let rest = rest.trim();
            let analysis = if rest.is_empty() { raw } else { rest };
            (thinking.replace(THINK_START, "").trim().to_string(), analysis)
        }
        None => (String::new(), raw),
    };

    let (analysis, references) = match working.split_once(REFERENCES_MARKER) {
        Some((analysis, references)) => (
            analysis.trim().to_string(),
            references.trim().to_string(),
        ),
        None => (working.to_string(), String::new()),
    };

    ParsedResponse {
        thinking_process,
        analysis,
        references,
    }
}
