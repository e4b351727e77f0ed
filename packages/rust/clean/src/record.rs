//! Record construction and rejection gating.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use sha2::{Digest, Sha256};

use corpuskit_shared::{ContentInfo, DataInfo, Meta, Record, SiteConfig};

/// Deterministic record id: SHA-256 hex digest of the source URL.
pub fn record_id(url: &str) -> String {
    let digest = Sha256::digest(url.as_bytes());
    digest.iter().fold(String::with_capacity(64), |mut acc, b| {
        use std::fmt::Write;
        let _ = write!(acc, "{b:02x}");
        acc
    })
}

/// True when the canonical content is a single image reference and nothing
/// else — such documents carry no text and are routed to rejection.
pub fn is_image_only(content: &str) -> bool {
    static IMAGE_ONLY_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"(?i)^\s*\[Image:\s*https?://[^\]]+\]\s*$").expect("valid regex")
    });
    IMAGE_ONLY_RE.is_match(content)
}

/// Wrap a finished title + canonical content into a delivery record.
///
/// `now` supplies both `processing_date` and `collected_time`; pass
/// `Utc::now()` in production and a fixed instant in tests.
pub fn build_record(
    title: &str,
    content: &str,
    url: &str,
    site: &SiteConfig,
    now: DateTime<Utc>,
) -> Record {
    let text = format!("{title}\n{content}").trim().to_string();
    Record {
        id: record_id(url),
        text,
        meta: Meta {
            data_info: DataInfo {
                lang: site.lang,
                url: url.to_string(),
                source: site.domain.clone(),
                record_type: site.meta.record_type.clone(),
                processing_date: now.format("%Y-%m-%d").to_string(),
                delivery_version: site.meta.delivery_version.clone(),
                title: title.to_string(),
                content: content.to_string(),
            },
            content_info: ContentInfo {
                domain: site.meta.domain.clone(),
                subdomain: site.meta.subdomain.clone(),
            },
            collector: site.meta.collector.clone(),
            collected_time: now.format("%Y-%m-%dT%H:%M").to_string(),
        },
    }
}
