//! Paragraph-level filtering and blank-line collapsing.
//!
//! Operates on an ordered sequence of normalized lines in which an empty
//! string is a blank separator. Blank separators count as positions for the
//! first-3/last-2 template-header exception, matching the long-standing
//! behavior of delivered corpora.

use crate::tables::CleanTables;

/// Collapse runs of blank separators to a single one.
fn collapse_blanks<I>(blocks: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut out: Vec<String> = Vec::new();
    let mut last_blank = false;
    for block in blocks {
        if block.is_empty() {
            if !last_blank {
                out.push(String::new());
            }
            last_blank = true;
        } else {
            out.push(block);
            last_blank = false;
        }
    }
    out
}

/// Apply noise and template-header filtering plus blank-line collapsing,
/// and join the survivors into the single-string content.
///
/// Noise paragraphs are dropped wherever they occur. Template/navigation
/// hints are dropped only among the first 3 or last 2 entries — mid-body
/// occurrences are assumed to be legitimate content and kept.
pub fn filter_blocks(blocks: &[String], tables: &CleanTables) -> String {
    let merged = collapse_blanks(blocks.iter().map(|b| b.trim().to_string()));
    let n = merged.len();

    let kept = merged.into_iter().enumerate().filter_map(|(i, p)| {
        if p.is_empty() {
            return Some(p);
        }
        if tables.noise.is_match(&p) {
            tracing::trace!(paragraph = %p, "dropped noise paragraph");
            return None;
        }
        let near_edge = i < 3 || i + 2 >= n;
        if near_edge && tables.template.is_match(&p) {
            tracing::trace!(paragraph = %p, index = i, "dropped template header");
            return None;
        }
        Some(p)
    });

    collapse_blanks(kept).join("\n").trim().to_string()
}
