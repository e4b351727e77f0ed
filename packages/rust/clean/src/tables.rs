//! Immutable rule tables for the cleaning pipeline.
//!
//! All cleaning-stage patterns live in one [`CleanTables`] value that is
//! passed into the pure pipeline functions, so rule sets can vary per
//! language or tenant without module-level state. The noise and template
//! lists here are the *cleaning-stage* lists; the validator maintains its
//! own, deliberately more conservative, tables.

use regex::Regex;

/// Full-width CJK punctuation and its half-width replacement, applied when
/// the target language is English. `…` expands to `...`; everything else is
/// one-to-one.
pub const PUNCT_MAP: &[(char, &str)] = &[
    ('，', ","),
    ('。', "."),
    ('！', "!"),
    ('？', "?"),
    ('【', "["),
    ('】', "]"),
    ('（', "("),
    ('）', ")"),
    ('％', "%"),
    ('＃', "#"),
    ('＠', "@"),
    ('＆', "&"),
    ('：', ":"),
    ('；', ";"),
    ('、', ","),
    ('“', "\""),
    ('”', "\""),
    ('‘', "'"),
    ('’', "'"),
    ('—', "-"),
    ('…', "..."),
    ('《', "<"),
    ('》', ">"),
    ('·', "."),
];

/// Bare math symbols and their ASCII/English replacements. Symbols in the
/// match class without an entry here are deleted.
pub const MATH_MAP: &[(char, &str)] = &[
    ('±', "plus/minus"),
    ('×', "x"),
    ('÷', "divided by"),
    ('√', "square root"),
    ('∞', "infinity"),
    ('≈', "approx"),
    ('≠', "not equal"),
    ('≤', "<="),
    ('≥', ">="),
    ('°', " degrees "),
];

/// Compiled pattern tables for the line normalizer and block filter.
#[derive(Debug, Clone)]
pub struct CleanTables {
    /// Markdown image syntax — the whole line is dropped.
    pub md_image: Regex,
    /// Markdown table row — the whole line is dropped.
    pub md_table_row: Regex,
    /// Decorative pictograph blocks (symbols, dingbats, emoji).
    pub pictographs: Regex,
    /// Leading list-bullet marker plus whitespace.
    pub list_marker: Regex,
    /// Leading markdown heading marker plus whitespace.
    pub heading_marker: Regex,
    /// Any run of whitespace.
    pub whitespace: Regex,
    /// The bare math symbol class (keys of [`MATH_MAP`] plus deleted ones).
    pub math_symbols: Regex,
    /// A line made of punctuation only, left over after the other stages.
    pub punct_only: Regex,
    /// Cleaning-stage noise: matching paragraphs are dropped anywhere.
    pub noise: Regex,
    /// Template/navigation hints: dropped only near the edges of the block
    /// sequence (first 3 / last 2 paragraphs).
    pub template: Regex,
}

impl Default for CleanTables {
    fn default() -> Self {
        Self {
            md_image: Regex::new(r"!\[[^\]]*\]\([^)]+\)").expect("valid regex"),
            md_table_row: Regex::new(r"^\s*\|.+\|\s*$").expect("valid regex"),
            pictographs: Regex::new(r"[\u{2600}-\u{27FF}\u{1F300}-\u{1FAFF}]")
                .expect("valid regex"),
            list_marker: Regex::new(r"^\s*[•·▢*-]\s*").expect("valid regex"),
            heading_marker: Regex::new(r"^\s*#+\s*").expect("valid regex"),
            whitespace: Regex::new(r"\s+").expect("valid regex"),
            math_symbols: Regex::new(r"[±×÷√∑∞≈≠≤≥∫∏∆∇∂°]").expect("valid regex"),
            punct_only: Regex::new(r#"^[,:;.!?)("'`*×-]+$"#).expect("valid regex"),
            noise: Regex::new(
                r"(?i)\b(share|pinterest|facebook|instagram|advertisement|sponsored|copyright|all rights reserved|privacy policy|terms of use)\b",
            )
            .expect("valid regex"),
            template: Regex::new(
                r"(?i)\b(table of contents|jump to recipe|nutrition facts|related posts|you may also like|faq|newsletter)\b",
            )
            .expect("valid regex"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_compile() {
        let tables = CleanTables::default();
        assert!(tables.md_image.is_match("![alt](http://x/y.png)"));
        assert!(tables.md_table_row.is_match("| a | b |"));
        assert!(tables.noise.is_match("Share this on Pinterest"));
        assert!(tables.template.is_match("Jump to Recipe"));
        assert!(!tables.template.is_match("jump into the pot"));
    }

    #[test]
    fn punct_only_matches_residue_lines() {
        let tables = CleanTables::default();
        assert!(tables.punct_only.is_match("--"));
        assert!(tables.punct_only.is_match(".,!?"));
        assert!(!tables.punct_only.is_match("a."));
    }

    #[test]
    fn math_class_covers_unmapped_symbols() {
        let tables = CleanTables::default();
        assert!(tables.math_symbols.is_match("∑"));
        assert!(tables.math_symbols.is_match("±"));
        assert!(!tables.math_symbols.is_match("+"));
    }
}
