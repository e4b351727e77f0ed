//! Per-line canonicalization pipeline.
//!
//! Each stage is a named object with a single `transform` method; the fixed
//! rule order is enforced by the order in which [`LineNormalizer::new`]
//! builds the stage list. A stage returning an empty string drops the line.

use regex::Regex;

use corpuskit_shared::Lang;

use crate::tables::{CleanTables, MATH_MAP, PUNCT_MAP};

/// One ordered stage of the line normalizer.
pub trait LineStage {
    /// Stage name, for tracing.
    fn name(&self) -> &'static str;

    /// Transform one line. Returning an empty string drops the line.
    fn transform(&self, line: String) -> String;
}

// ---------------------------------------------------------------------------
// Stage 1: Markdown ban
// ---------------------------------------------------------------------------

/// Drop lines carrying markdown image or table-row syntax outright — these
/// indicate malformed upstream extraction, not legitimate content.
struct MarkdownBan {
    md_image: Regex,
    md_table_row: Regex,
}

impl LineStage for MarkdownBan {
    fn name(&self) -> &'static str {
        "markdown-ban"
    }

    fn transform(&self, line: String) -> String {
        if self.md_image.is_match(&line) || self.md_table_row.is_match(&line) {
            return String::new();
        }
        line
    }
}

// ---------------------------------------------------------------------------
// Stage 2: Pictograph strip
// ---------------------------------------------------------------------------

struct PictographStrip {
    pictographs: Regex,
}

impl LineStage for PictographStrip {
    fn name(&self) -> &'static str {
        "pictograph-strip"
    }

    fn transform(&self, line: String) -> String {
        self.pictographs.replace_all(&line, "").into_owned()
    }
}

// ---------------------------------------------------------------------------
// Stage 3: Punctuation unification (en only)
// ---------------------------------------------------------------------------

/// Transliterate full-width CJK punctuation to half-width ASCII. Only active
/// for English-language sites; Chinese content keeps its punctuation.
struct PunctuationUnify {
    enabled: bool,
}

impl LineStage for PunctuationUnify {
    fn name(&self) -> &'static str {
        "punctuation-unify"
    }

    fn transform(&self, line: String) -> String {
        if !self.enabled {
            return line;
        }
        let mut out = String::with_capacity(line.len());
        for ch in line.chars() {
            match PUNCT_MAP.iter().find(|(from, _)| *from == ch) {
                Some((_, to)) => out.push_str(to),
                None => out.push(ch),
            }
        }
        out
    }
}

// ---------------------------------------------------------------------------
// Stage 4: List marker strip
// ---------------------------------------------------------------------------

struct ListMarkerStrip {
    list_marker: Regex,
}

impl LineStage for ListMarkerStrip {
    fn name(&self) -> &'static str {
        "list-marker-strip"
    }

    fn transform(&self, line: String) -> String {
        self.list_marker.replace(&line, "").into_owned()
    }
}

// ---------------------------------------------------------------------------
// Stage 5: Heading demotion
// ---------------------------------------------------------------------------

/// Strip leading `#` markers, demoting headings to plain text instead of
/// dropping the line.
struct HeadingDemote {
    heading_marker: Regex,
}

impl LineStage for HeadingDemote {
    fn name(&self) -> &'static str {
        "heading-demote"
    }

    fn transform(&self, line: String) -> String {
        self.heading_marker.replace(&line, "").into_owned()
    }
}

// ---------------------------------------------------------------------------
// Stage 6: Whitespace collapse
// ---------------------------------------------------------------------------

struct WhitespaceCollapse {
    whitespace: Regex,
}

impl LineStage for WhitespaceCollapse {
    fn name(&self) -> &'static str {
        "whitespace-collapse"
    }

    fn transform(&self, line: String) -> String {
        self.whitespace.replace_all(&line, " ").trim().to_string()
    }
}

// ---------------------------------------------------------------------------
// Stage 7: Math symbol substitution
// ---------------------------------------------------------------------------

/// Replace bare math symbols with ASCII/English equivalents; symbols without
/// a mapping are deleted. Unconditional at this stage — protected-span logic
/// only exists in the validator, which must tolerate delimited math from
/// other producers.
struct MathSubstitute {
    math_symbols: Regex,
    whitespace: Regex,
}

impl LineStage for MathSubstitute {
    fn name(&self) -> &'static str {
        "math-substitute"
    }

    fn transform(&self, line: String) -> String {
        if !self.math_symbols.is_match(&line) {
            return line;
        }
        let replaced = self.math_symbols.replace_all(&line, |caps: &regex::Captures| {
            let ch = caps[0].chars().next().expect("non-empty match");
            MATH_MAP
                .iter()
                .find(|(from, _)| *from == ch)
                .map(|(_, to)| *to)
                .unwrap_or("")
                .to_string()
        });
        // Replacements pad or delete; re-collapse so canonical content stays
        // stable under re-normalization.
        self.whitespace.replace_all(&replaced, " ").trim().to_string()
    }
}

// ---------------------------------------------------------------------------
// Stage 8: Punctuation-only drop
// ---------------------------------------------------------------------------

/// A line reduced to nothing but punctuation by the earlier stages carries
/// no content; drop it.
struct PunctuationOnlyDrop {
    punct_only: Regex,
}

impl LineStage for PunctuationOnlyDrop {
    fn name(&self) -> &'static str {
        "punctuation-only-drop"
    }

    fn transform(&self, line: String) -> String {
        if self.punct_only.is_match(&line) {
            return String::new();
        }
        line
    }
}

// ---------------------------------------------------------------------------
// LineNormalizer
// ---------------------------------------------------------------------------

/// The full ordered line pipeline.
pub struct LineNormalizer {
    stages: Vec<Box<dyn LineStage + Send + Sync>>,
}

impl LineNormalizer {
    /// Build the stage list in the fixed canonical order.
    pub fn new(lang: Lang, tables: &CleanTables) -> Self {
        let stages: Vec<Box<dyn LineStage + Send + Sync>> = vec![
            Box::new(MarkdownBan {
                md_image: tables.md_image.clone(),
                md_table_row: tables.md_table_row.clone(),
            }),
            Box::new(PictographStrip {
                pictographs: tables.pictographs.clone(),
            }),
            Box::new(PunctuationUnify {
                enabled: lang == Lang::En,
            }),
            Box::new(ListMarkerStrip {
                list_marker: tables.list_marker.clone(),
            }),
            Box::new(HeadingDemote {
                heading_marker: tables.heading_marker.clone(),
            }),
            Box::new(WhitespaceCollapse {
                whitespace: tables.whitespace.clone(),
            }),
            Box::new(MathSubstitute {
                math_symbols: tables.math_symbols.clone(),
                whitespace: tables.whitespace.clone(),
            }),
            Box::new(PunctuationOnlyDrop {
                punct_only: tables.punct_only.clone(),
            }),
        ];
        Self { stages }
    }

    /// Run every stage in order. Returns the canonical line, or an empty
    /// string if the line must be dropped.
    pub fn normalize(&self, line: &str) -> String {
        let mut current = line.to_string();
        for stage in &self.stages {
            current = stage.transform(current);
            if current.is_empty() {
                tracing::trace!(stage = stage.name(), "line dropped");
                return current;
            }
        }
        current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn en_normalizer() -> LineNormalizer {
        LineNormalizer::new(Lang::En, &CleanTables::default())
    }

    #[test]
    fn markdown_image_line_dropped() {
        let n = en_normalizer();
        assert_eq!(n.normalize("![tasty photo](https://x/y.jpg)"), "");
    }

    #[test]
    fn markdown_table_row_dropped() {
        let n = en_normalizer();
        assert_eq!(n.normalize("| cups | grams |"), "");
    }

    #[test]
    fn pictographs_stripped() {
        let n = en_normalizer();
        assert_eq!(n.normalize("Preheat the oven \u{1F525} to 450F"), "Preheat the oven to 450F");
        assert_eq!(n.normalize("\u{2764} so good"), "so good");
    }

    #[test]
    fn fullwidth_punctuation_unified_for_en() {
        let n = en_normalizer();
        assert_eq!(n.normalize("Mix well，then rest。"), "Mix well,then rest.");
        assert_eq!(n.normalize("（optional）"), "(optional)");
    }

    #[test]
    fn fullwidth_punctuation_kept_for_zh() {
        let n = LineNormalizer::new(Lang::Zh, &CleanTables::default());
        assert_eq!(n.normalize("加水，搅拌。"), "加水，搅拌。");
    }

    #[test]
    fn list_markers_stripped() {
        let n = en_normalizer();
        assert_eq!(n.normalize("• 1 cup flour"), "1 cup flour");
        assert_eq!(n.normalize("- 2 eggs"), "2 eggs");
        assert_eq!(n.normalize("* a pinch of salt"), "a pinch of salt");
        assert_eq!(n.normalize("▢ 3 tbsp butter"), "3 tbsp butter");
    }

    #[test]
    fn headings_demoted_not_dropped() {
        let n = en_normalizer();
        assert_eq!(n.normalize("# Ingredients"), "Ingredients");
        assert_eq!(n.normalize("### Step One"), "Step One");
    }

    #[test]
    fn whitespace_collapsed() {
        let n = en_normalizer();
        assert_eq!(n.normalize("  mix   the \t dough  "), "mix the dough");
    }

    #[test]
    fn math_symbols_substituted() {
        let n = en_normalizer();
        assert_eq!(n.normalize("±5"), "plus/minus5");
        assert_eq!(n.normalize("2×3"), "2x3");
        assert_eq!(n.normalize("bake at 180°"), "bake at 180 degrees");
        // Unmapped symbols are deleted.
        assert_eq!(n.normalize("total ∑ of parts"), "total of parts");
    }

    #[test]
    fn punctuation_only_line_dropped() {
        let n = en_normalizer();
        assert_eq!(n.normalize("---"), "");
        assert_eq!(n.normalize(".,;"), "");
    }

    #[test]
    fn already_canonical_line_unchanged() {
        let n = en_normalizer();
        let line = "Whisk the eggs with 1 cup of sugar until pale.";
        assert_eq!(n.normalize(line), line);
    }
}
