//! Content cleaning: assembly, line normalization, block filtering, and PII
//! masking for corpus delivery records.
//!
//! The pipeline is a fixed sequence of pure passes over owned strings:
//!
//! 1. [`assembler::assemble`] — raw HTML fragments → ordered content blocks
//! 2. flatten — blocks → lines, with a blank separator before each heading
//! 3. [`line::LineNormalizer`] — per-line canonicalization
//! 4. [`blocks::filter_blocks`] — noise/template filtering + blank collapse
//! 5. [`pii::PiiMasker`] — pattern-based redaction
//!
//! [`canonical_content`] runs the whole sequence. Its output is a fixpoint:
//! feeding canonical content back through the pipeline yields it unchanged.

pub mod assembler;
pub mod blocks;
pub mod line;
pub mod pii;
pub mod record;
pub mod tables;

pub use assembler::{AssemblyStats, RawParts, assemble};
pub use blocks::filter_blocks;
pub use line::{LineNormalizer, LineStage};
pub use pii::PiiMasker;
pub use record::{build_record, is_image_only, record_id};
pub use tables::{CleanTables, MATH_MAP, PUNCT_MAP};

use corpuskit_shared::{ContentBlock, Lang};

/// Flatten assembled blocks into the line sequence the block filter expects.
///
/// A blank separator precedes the second and later headings, so sections
/// stay visually separated after blank-run collapsing; a cover image ahead
/// of the first heading does not earn one. Paragraph lines are normalized
/// individually; lines the normalizer drops simply do not appear. Image
/// blocks become `[Image: url]` sentinel lines and bypass normalization —
/// they are already canonical.
fn flatten(blocks: &[ContentBlock], normalizer: &LineNormalizer) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut first_heading = true;
    for block in blocks {
        match block {
            ContentBlock::Heading(h) => {
                if !first_heading {
                    lines.push(String::new());
                }
                first_heading = false;
                let h = normalizer.normalize(h);
                if !h.is_empty() {
                    lines.push(h);
                }
            }
            ContentBlock::Paragraph(ps) => {
                for p in ps {
                    let p = normalizer.normalize(p);
                    if !p.is_empty() {
                        lines.push(p);
                    }
                }
            }
            ContentBlock::Image(url) => {
                lines.push(format!("[Image: {url}]"));
            }
        }
    }
    lines
}

/// Run the full cleaning pipeline over one document's raw parts.
///
/// Returns the canonical content string (possibly empty) together with the
/// assembly stats the caller needs for rejection gating.
pub fn canonical_content(
    parts: &RawParts,
    lang: Lang,
    tables: &CleanTables,
    masker: &PiiMasker,
) -> (String, AssemblyStats) {
    let (blocks, stats) = assemble(parts);
    let normalizer = LineNormalizer::new(lang, tables);
    let lines = flatten(&blocks, &normalizer);
    let filtered = filter_blocks(&lines, tables);
    let masked = masker.mask(&filtered);
    tracing::debug!(chars = masked.chars().count(), "canonical content built");
    (masked, stats)
}
