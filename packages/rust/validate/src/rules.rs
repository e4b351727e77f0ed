//! The compliance rule tables and per-rule content checks.
//!
//! Everything the validator matches against lives in one immutable
//! [`Ruleset`] value. The noise and template lists here are intentionally
//! NOT the same lists the cleaner uses: the validator's lists are more
//! conservative (fewer false positives), and the two are maintained
//! independently so pass/fail outcomes on delivered corpora stay stable.

use std::collections::HashSet;

use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;

/// Validator noise keywords, matched as case-insensitive substrings.
const NOISE_KEYWORDS: &[&str] = &[
    "home >",
    "site map",
    "copyright",
    "all rights reserved",
    "terms of use",
    "privacy policy",
    "contact us",
    "menu",
    "footer",
    "sponsored",
    "advertisement",
    "buy now",
    "add to cart",
    "shop now",
    "affiliate",
    "amazon",
    "ebay",
    "photo credit",
    "image source",
    "stock image",
    "watch the video",
    "play video",
    "related posts",
    "related recipes",
    "leave a reply",
    "comments",
    "like & share",
    "share this",
    "pin it",
    "newsletter",
    "subscribe",
    "get updates",
    "popular posts",
    "latest posts",
    "seo keywords",
    "hot posts",
    "faq",
];

/// Template/navigation hint phrases, matched as case-insensitive substrings
/// anywhere in the content (no positional exception at validation time).
const TEMPLATE_HINTS: &[&str] = &[
    "table of contents",
    "jump to recipe",
    "print recipe",
    "as seen on",
    "related posts",
    "related recipes",
];

/// Math symbols flagged when found outside a protected span.
const MATH_SYMBOLS: &str = "±×÷√∑∏≈≠≤≥∞∫∂∆∇";

/// Compiled rule tables for one validation run.
#[derive(Debug, Clone)]
pub struct Ruleset {
    // R2
    md_heading: Regex,
    template_hints: Vec<&'static str>,
    // R3
    multi_newline: Regex,
    pictograph: Regex,
    fancy_bullet: Regex,
    cjk_punct: Regex,
    bad_indent: Regex,
    leftover_bullet: Regex,
    // R4
    html_tag: Regex,
    html_entity: Regex,
    noise_keywords: Vec<&'static str>,
    noise_phrases: Vec<Regex>,
    // R5
    md_image: Regex,
    md_table_row: Regex,
    dollar_span: Regex,
    bracket_span: Regex,
    url_scan: Regex,
    image_ext: Regex,
    image_line: Regex,
    // R6
    mask_misuse: Regex,
    email: Regex,
    phone: Regex,
    card: Regex,
    ssn: Regex,
    // Structural enums and literals.
    pub allowed_langs: HashSet<&'static str>,
    pub allowed_types: HashSet<&'static str>,
    pub allowed_domains: HashSet<&'static str>,
    pub allowed_subdomains: HashSet<&'static str>,
    pub collector: &'static str,
    pub delivery_version: &'static str,
}

impl Default for Ruleset {
    fn default() -> Self {
        let re = |p: &str| Regex::new(p).expect("valid regex");
        Self {
            md_heading: re(r"(?m)^#+\s"),
            template_hints: TEMPLATE_HINTS.to_vec(),
            multi_newline: re(r"\n{2,}"),
            pictograph: re(r"[\u{1F300}-\u{1FAFF}\u{2700}-\u{27BF}\u{2600}-\u{26FF}]"),
            fancy_bullet: re(r"[•●○■□▢◆◇▪▫]"),
            cjk_punct: re("[，。！？【】（）％＃＠：；、“”‘’—…《》·]"),
            bad_indent: re(r"(?m)^(?: {4,}|\t+)\S"),
            leftover_bullet: re(r"(?m)^\s*[-*▢]\s+\S"),
            html_tag: re(r"(?s)<\s*/?\s*[a-zA-Z][^>]*>"),
            html_entity: re(r"&[a-zA-Z0-9#]+;"),
            noise_keywords: NOISE_KEYWORDS.to_vec(),
            noise_phrases: vec![re(r"(?i)\breferences\b"), re(r"(?i)\bread\s+more\b")],
            md_image: re(r"!\[[^\]]*\]\([^)]+\)"),
            md_table_row: re(r"(?m)^\s*\|.+\|\s*$"),
            dollar_span: re(r"\$(?:\\\$|[^$])+\$"),
            bracket_span: re(r"(?s)\\\[.+?\\\]"),
            url_scan: re(r"https?://\S+"),
            image_ext: re(r"(?i)\.(?:png|jpe?g|gif|webp)(?:\?|#|$)"),
            image_line: re(r"^\s*\[Image:\s*https?://[^\]\s]+\]\s*$"),
            mask_misuse: re(r"\bxxxx+\b|\bxxx@|@xxx\b"),
            email: re(r"\b[a-zA-Z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b"),
            phone: re(r"\b(?:\+?\d{1,3}[-.\s]?)?(?:\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4})\b"),
            card: re(r"\b(?:\d{4}[-\s]){3}\d{4}\b"),
            ssn: re(r"\b\d{3}-\d{2}-\d{4}\b"),
            allowed_langs: HashSet::from(["en", "zh"]),
            allowed_types: HashSet::from(["Recipe/HowTo", "HowTo", "百科", "问答"]),
            allowed_domains: HashSet::from(["Cooking", "Daily Life"]),
            allowed_subdomains: HashSet::from(["Recipes", "Cleaning"]),
            collector: "joy",
            delivery_version: "V1.0",
        }
    }
}

impl Ruleset {
    // -----------------------------------------------------------------------
    // Structural shape helpers
    // -----------------------------------------------------------------------

    /// Accept 32/40/64-character hex digests (md5/sha1/sha256 shapes).
    pub fn is_hex_id(&self, id: &str) -> bool {
        matches!(id.len(), 32 | 40 | 64) && id.chars().all(|c| c.is_ascii_hexdigit())
    }

    /// `YYYY-MM-DD`.
    pub fn is_date(&self, s: &str) -> bool {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
    }

    /// `YYYY-MM-DDThh:mm`, minute precision.
    pub fn is_datetime_minute(&self, s: &str) -> bool {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M").is_ok()
    }

    // -----------------------------------------------------------------------
    // Content rule battery (R2..R6). Each check returns the violation
    // messages found; the engine attaches tags and positions.
    // -----------------------------------------------------------------------

    /// R2: markdown headings and template/navigation phrases.
    pub fn check_r2(&self, content: &str) -> Vec<String> {
        let mut out = Vec::new();
        if self.md_heading.is_match(content) {
            out.push("markdown heading marker in content".to_string());
        }
        let lower = content.to_lowercase();
        for hint in &self.template_hints {
            if lower.contains(hint) {
                out.push(format!("template phrase \"{hint}\" in content"));
            }
        }
        out
    }

    /// R3: blank-line runs, pictographs, decorative bullets, CJK punctuation
    /// in English content, anomalous indentation.
    pub fn check_r3(&self, content: &str, lang: &str) -> Vec<String> {
        let mut out = Vec::new();
        if self.multi_newline.is_match(content) {
            out.push("2+ consecutive newlines".to_string());
        }
        if self.pictograph.is_match(content) {
            out.push("pictograph characters in content".to_string());
        }
        if self.fancy_bullet.is_match(content) {
            out.push("decorative bullet characters in content".to_string());
        }
        if lang == "en" && self.cjk_punct.is_match(content) {
            out.push("CJK punctuation in en content".to_string());
        }
        if self.bad_indent.is_match(content) {
            out.push("anomalous leading indentation".to_string());
        }
        out
    }

    /// R4: raw HTML markup and noise keywords/phrases.
    pub fn check_r4(&self, content: &str) -> Vec<String> {
        let mut out = Vec::new();
        if self.html_tag.is_match(content) || self.html_entity.is_match(content) {
            out.push("raw HTML markup in content".to_string());
        }
        let lower = content.to_lowercase();
        for kw in &self.noise_keywords {
            if lower.contains(kw) {
                out.push(format!("noise keyword \"{kw}\" in content"));
            }
        }
        for phrase in &self.noise_phrases {
            if let Some(m) = phrase.find(content) {
                out.push(format!("noise phrase \"{}\" in content", m.as_str()));
            }
        }
        out
    }

    /// R5: markdown image/table syntax, bare math symbols outside protected
    /// spans, image URLs not in canonical `[Image: URL]` form.
    pub fn check_r5(&self, content: &str) -> Vec<String> {
        let mut out = Vec::new();
        if self.md_image.is_match(content) {
            out.push("markdown image syntax in content".to_string());
        }
        if self.md_table_row.is_match(content) {
            out.push("markdown table row in content".to_string());
        }
        for sym in self.unprotected_math(content) {
            out.push(format!("bare math symbol '{sym}' outside protected span"));
        }
        for line in content.lines() {
            if self.image_line.is_match(line) {
                continue;
            }
            for m in self.url_scan.find_iter(line) {
                if self.image_ext.is_match(m.as_str()) {
                    out.push(format!("image URL not in [Image: URL] form: {}", m.as_str()));
                }
            }
        }
        out
    }

    /// R6: mask-token misuse and unmasked PII patterns.
    pub fn check_r6(&self, content: &str) -> Vec<String> {
        let mut out = Vec::new();
        if self.mask_misuse.is_match(content) {
            out.push("mask token misuse (xxxx or xxx adjacent to @)".to_string());
        }
        if self.email.is_match(content) {
            out.push("unmasked email address".to_string());
        }
        if self.phone.is_match(content) {
            out.push("unmasked phone number".to_string());
        }
        if self.card.is_match(content) {
            out.push("unmasked card number".to_string());
        }
        if self.ssn.is_match(content) {
            out.push("unmasked SSN".to_string());
        }
        out
    }

    /// R7: reserved. Never produces violations.
    pub fn check_r7(&self, _content: &str) -> Vec<String> {
        Vec::new()
    }

    /// R8: reserved. Never produces violations.
    pub fn check_r8(&self, _content: &str) -> Vec<String> {
        Vec::new()
    }

    /// Normalization-residue check, reported under R3: a line still starting
    /// with an un-stripped list marker means the upstream cleaner
    /// under-normalized.
    pub fn check_residue(&self, content: &str) -> Vec<String> {
        if self.leftover_bullet.is_match(content) {
            vec!["un-stripped list marker at line start".to_string()]
        } else {
            Vec::new()
        }
    }

    /// Math symbols remaining after protected `$...$` and `\[...\]` spans
    /// are blanked out, in order of occurrence, deduplicated.
    fn unprotected_math(&self, content: &str) -> Vec<char> {
        let masked = self.dollar_span.replace_all(content, " ");
        let masked = self.bracket_span.replace_all(&masked, " ");
        let mut seen = Vec::new();
        for ch in masked.chars() {
            if MATH_SYMBOLS.contains(ch) && !seen.contains(&ch) {
                seen.push(ch);
            }
        }
        seen
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_id_shapes() {
        let r = Ruleset::default();
        assert!(r.is_hex_id(&"a".repeat(32)));
        assert!(r.is_hex_id(&"0".repeat(40)));
        assert!(r.is_hex_id(&"f".repeat(64)));
        assert!(!r.is_hex_id(&"f".repeat(63)));
        assert!(!r.is_hex_id(&"g".repeat(64)));
    }

    #[test]
    fn date_formats() {
        let r = Ruleset::default();
        assert!(r.is_date("2026-08-30"));
        // strptime-style leniency: unpadded months parse too.
        assert!(r.is_date("2026-8-30"));
        assert!(!r.is_date("08/30/2026"));
        assert!(r.is_datetime_minute("2026-08-30T14:05"));
        assert!(!r.is_datetime_minute("2026-08-30 14:05"));
        assert!(!r.is_datetime_minute("2026-08-30T14:05:33"));
    }

    #[test]
    fn r2_flags_headings_and_template_phrases_anywhere() {
        let r = Ruleset::default();
        assert!(r.check_r2("Mix well.").is_empty());
        assert_eq!(r.check_r2("# Ingredients\nflour").len(), 1);
        // No positional exception at validation time.
        let body = "a\nb\nc\nd\nsee the Table of Contents here\ne\nf\ng";
        assert_eq!(r.check_r2(body).len(), 1);
    }

    #[test]
    fn r3_flags_hygiene_violations() {
        let r = Ruleset::default();
        assert!(r.check_r3("a\n\n\nb", "en").iter().any(|m| m.contains("newline")));
        assert!(!r.check_r3("a\nb", "en").iter().any(|m| m.contains("newline")));
        assert!(!r.check_r3("• flour", "en").is_empty());
        assert!(!r.check_r3("好吃，真的", "en").is_empty());
        assert!(r.check_r3("好吃，真的", "zh").is_empty());
        assert!(!r.check_r3("a\n    indented", "en").is_empty());
        assert!(r.check_r3("a\n   three spaces ok", "en").is_empty());
    }

    // A single blank separator line is already a double newline and gets
    // flagged, even though the cleaner emits one between sections.
    #[test]
    fn r3_flags_single_blank_separator_line() {
        let r = Ruleset::default();
        let findings = r.check_r3("first paragraph\n\nsecond paragraph", "en");
        assert_eq!(findings, vec!["2+ consecutive newlines".to_string()]);
    }

    #[test]
    fn r4_html_and_noise() {
        let r = Ruleset::default();
        assert!(!r.check_r4("some <div>html</div>").is_empty());
        assert!(!r.check_r4("salt &amp; pepper").is_empty());
        assert!(!r.check_r4("Click here to Subscribe today").is_empty());
        // Word-boundary variants: substring inside a word must not fire.
        assert!(r.check_r4("the breadmore pan").is_empty());
        assert!(!r.check_r4("read more about braising").is_empty());
        assert!(r.check_r4("Mix the dough thoroughly.").is_empty());
    }

    #[test]
    fn r5_protected_spans_honored() {
        let r = Ruleset::default();
        assert!(!r.check_r5("keep at ±5 degrees").is_empty());
        assert!(r.check_r5("keep at $±5°C$ exactly").is_empty());
        assert!(r.check_r5(r"series \[∑ x_i\] converges").is_empty());
        assert!(!r.check_r5("![x](http://y)").is_empty());
        assert!(!r.check_r5("| a | b |").is_empty());
    }

    #[test]
    fn r5_image_url_form() {
        let r = Ruleset::default();
        assert!(r.check_r5("[Image: https://x.com/a.jpg]").is_empty());
        assert!(!r.check_r5("see https://x.com/a.jpg for the result").is_empty());
        // Non-image URLs are fine outside the canonical form.
        assert!(r.check_r5("see https://x.com/about for details").is_empty());
    }

    #[test]
    fn r6_pii_and_mask_misuse() {
        let r = Ruleset::default();
        assert!(!r.check_r6("write to ann@example.com").is_empty());
        assert!(!r.check_r6("call (555) 123-4567").is_empty());
        assert!(!r.check_r6("card 1234-5678-9012-3456").is_empty());
        assert!(!r.check_r6("ssn 123-45-6789").is_empty());
        assert!(!r.check_r6("masked twice: xxxx").is_empty());
        // Each PII class reports independently, phone before card.
        let both = r.check_r6("call 555-123-4567 or pay with 1234-5678-9012-3456");
        assert_eq!(
            both,
            vec![
                "unmasked phone number".to_string(),
                "unmasked card number".to_string()
            ]
        );
        assert!(!r.check_r6("xxx@ left behind").is_empty());
        assert!(r.check_r6("properly masked: xxx").is_empty());
    }

    #[test]
    fn reserved_rules_never_fire() {
        let r = Ruleset::default();
        let nasty = "# <b>![x](y)</b> ±± xxxx 123-45-6789 ，";
        assert!(r.check_r7(nasty).is_empty());
        assert!(r.check_r8(nasty).is_empty());
    }

    #[test]
    fn residue_check_flags_leftover_bullets() {
        let r = Ruleset::default();
        assert!(!r.check_residue("- 1 cup flour").is_empty());
        assert!(!r.check_residue("ok line\n* leftover").is_empty());
        assert!(r.check_residue("well-formed line").is_empty());
    }
}
