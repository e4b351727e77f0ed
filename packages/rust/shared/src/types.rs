//! Core domain types for corpuskit delivery records.
//!
//! The record schema is the delivery contract: every required field is a
//! struct field, so the structural validator's required-field list stays in
//! sync with what the pipeline can actually produce.

use serde::{Deserialize, Serialize};

/// Fixed delivery version literal for `meta.data_info.delivery_version`.
pub const DELIVERY_VERSION: &str = "V1.0";

/// Fixed literal for `meta.collector`.
pub const COLLECTOR: &str = "joy";

/// Literal substituted for every detected piece of PII.
pub const MASK_TOKEN: &str = "xxx";

/// Minimum length of the `text` field, enforced by the validator (R9).
pub const MIN_TEXT_LEN: usize = 200;

// ---------------------------------------------------------------------------
// Lang
// ---------------------------------------------------------------------------

/// Target language of a record. Drives punctuation unification and the
/// validator's mixed-punctuation rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    #[default]
    En,
    Zh,
}

impl std::fmt::Display for Lang {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Lang::En => write!(f, "en"),
            Lang::Zh => write!(f, "zh"),
        }
    }
}

impl std::str::FromStr for Lang {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "en" => Ok(Lang::En),
            "zh" => Ok(Lang::Zh),
            other => Err(format!("unknown lang '{other}' (expected 'en' or 'zh')")),
        }
    }
}

// ---------------------------------------------------------------------------
// ContentBlock
// ---------------------------------------------------------------------------

/// One semantic unit of assembled content. Order is significant and
/// preserved end-to-end through the cleaning pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentBlock {
    /// A section label, demoted to plain text in the canonical output.
    Heading(String),
    /// An ordered run of text lines.
    Paragraph(Vec<String>),
    /// An image reference, carried as a bare URL.
    Image(String),
}

// ---------------------------------------------------------------------------
// Record schema
// ---------------------------------------------------------------------------

/// One delivery record — a single line of a JSONL batch file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    /// Hex digest (32/40/64 chars) derived from the source URL.
    pub id: String,
    /// Title and canonical content, newline-joined.
    pub text: String,
    pub meta: Meta,
}

/// The `meta` envelope of a record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meta {
    pub data_info: DataInfo,
    pub content_info: ContentInfo,
    /// Fixed literal, see [`COLLECTOR`].
    pub collector: String,
    /// `YYYY-MM-DDThh:mm` (UTC, minute precision).
    pub collected_time: String,
}

/// The `meta.data_info` section — sole transport for body text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataInfo {
    pub lang: Lang,
    pub url: String,
    /// Site domain the record was collected from.
    pub source: String,
    /// Record type, one of the allowed set (e.g. `Recipe/HowTo`).
    #[serde(rename = "type")]
    pub record_type: String,
    /// `YYYY-MM-DD` (UTC).
    pub processing_date: String,
    /// Fixed literal, see [`DELIVERY_VERSION`].
    pub delivery_version: String,
    pub title: String,
    /// Canonical content: normalized, filtered, PII-masked body text.
    pub content: String,
}

/// The `meta.content_info` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentInfo {
    pub domain: String,
    pub subdomain: String,
}

// ---------------------------------------------------------------------------
// Rule tags and error items
// ---------------------------------------------------------------------------

/// Stable identifier for one compliance rule. Consumed by downstream
/// tooling; the rendered strings must never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleTag {
    R1,
    R2,
    R3,
    R4,
    R5,
    R6,
    R7,
    R8,
    R9,
    DupUrl,
    DupId,
}

impl RuleTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleTag::R1 => "R1",
            RuleTag::R2 => "R2",
            RuleTag::R3 => "R3",
            RuleTag::R4 => "R4",
            RuleTag::R5 => "R5",
            RuleTag::R6 => "R6",
            RuleTag::R7 => "R7",
            RuleTag::R8 => "R8",
            RuleTag::R9 => "R9",
            RuleTag::DupUrl => "DUP_URL",
            RuleTag::DupId => "DUP_ID",
        }
    }
}

impl std::fmt::Display for RuleTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One validator finding. Never mutated after creation; ordering within a
/// file is emission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorItem {
    /// Path of the batch file the finding refers to.
    pub path: String,
    /// 1-based line number; 0 for file-level findings.
    pub line: usize,
    pub tag: RuleTag,
    pub message: String,
}

impl ErrorItem {
    pub fn new(
        path: impl Into<String>,
        line: usize,
        tag: RuleTag,
        message: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            line,
            tag,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ErrorItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}: ERROR [{}] {}",
            self.path, self.line, self.tag, self.message
        )
    }
}

// ---------------------------------------------------------------------------
// Rejection reasons
// ---------------------------------------------------------------------------

/// Why a source document was routed to the rejection stream instead of the
/// clean batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    /// `text` came out under the minimum character count.
    TooShort,
    /// Canonical content is a single image reference and nothing else.
    ImageOnly,
    /// Cleaning raised an error; carries the error kind.
    Exception(String),
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RejectReason::TooShort => write!(f, "too_short"),
            RejectReason::ImageOnly => write!(f, "image_only"),
            RejectReason::Exception(kind) => write!(f, "exception:{kind}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lang_roundtrip() {
        let json = serde_json::to_string(&Lang::En).expect("serialize");
        assert_eq!(json, "\"en\"");
        let parsed: Lang = serde_json::from_str("\"zh\"").expect("deserialize");
        assert_eq!(parsed, Lang::Zh);
        assert_eq!("en".parse::<Lang>().expect("parse"), Lang::En);
        assert!("fr".parse::<Lang>().is_err());
    }

    #[test]
    fn rule_tags_render_stable_strings() {
        assert_eq!(RuleTag::R9.to_string(), "R9");
        assert_eq!(RuleTag::DupUrl.to_string(), "DUP_URL");
        assert_eq!(RuleTag::DupId.to_string(), "DUP_ID");
    }

    #[test]
    fn error_item_display_format() {
        let item = ErrorItem::new("out/site.clean.jsonl", 12, RuleTag::R5, "bare math symbol");
        assert_eq!(
            item.to_string(),
            "out/site.clean.jsonl:12: ERROR [R5] bare math symbol"
        );
    }

    #[test]
    fn reject_reason_codes() {
        assert_eq!(RejectReason::TooShort.to_string(), "too_short");
        assert_eq!(RejectReason::ImageOnly.to_string(), "image_only");
        assert_eq!(
            RejectReason::Exception("Parse".into()).to_string(),
            "exception:Parse"
        );
    }

    #[test]
    fn record_serialization_shape() {
        let record = Record {
            id: "a".repeat(64),
            text: "Title\nBody".into(),
            meta: Meta {
                data_info: DataInfo {
                    lang: Lang::En,
                    url: "https://example.com/r/1".into(),
                    source: "example.com".into(),
                    record_type: "Recipe/HowTo".into(),
                    processing_date: "2026-08-30".into(),
                    delivery_version: DELIVERY_VERSION.into(),
                    title: "Title".into(),
                    content: "Body".into(),
                },
                content_info: ContentInfo {
                    domain: "Cooking".into(),
                    subdomain: "Recipes".into(),
                },
                collector: COLLECTOR.into(),
                collected_time: "2026-08-30T12:00".into(),
            },
        };

        let json = serde_json::to_string(&record).expect("serialize");
        assert!(json.contains("\"type\":\"Recipe/HowTo\""));
        assert!(json.contains("\"lang\":\"en\""));
        let parsed: Record = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed.meta.data_info.record_type, "Recipe/HowTo");
    }
}
