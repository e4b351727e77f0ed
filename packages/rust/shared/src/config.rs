//! Per-site configuration for corpuskit.
//!
//! Each scraped site has one TOML file describing its domain, language,
//! discovery hints, extraction selectors, and record metadata defaults.
//! Selector fields tolerate several authoring shapes (a single string, a
//! list, or an `{any = [...]}` / `{all = [...]}` table); they are resolved
//! into a flat ordered candidate list once at load time so nothing
//! downstream has to type-sniff.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CorpusError, Result};
use crate::types::{COLLECTOR, DELIVERY_VERSION, Lang};

// ---------------------------------------------------------------------------
// Selector specs
// ---------------------------------------------------------------------------

/// A selector field as authored in TOML.
///
/// `Any` and `All` keep their authored meaning for the extraction service
/// (first-match vs. every-match); both resolve to the same ordered candidate
/// list here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SelectorSpec {
    /// A single CSS selector.
    Single(String),
    /// An ordered list of fallback selectors.
    List(Vec<String>),
    /// `{any = [...]}` — first selector that matches wins.
    Any { any: Vec<String> },
    /// `{all = [...]}` — every selector contributes matches.
    All { all: Vec<String> },
}

impl SelectorSpec {
    /// Flatten into the ordered candidate list, dropping empty entries.
    pub fn candidates(&self) -> Vec<String> {
        let raw: Vec<&String> = match self {
            SelectorSpec::Single(s) => vec![s],
            SelectorSpec::List(v) => v.iter().collect(),
            SelectorSpec::Any { any } => any.iter().collect(),
            SelectorSpec::All { all } => all.iter().collect(),
        };
        raw.into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

/// `[selectors]` section, as authored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SelectorsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<SelectorSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<SelectorSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<SelectorSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<SelectorSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<SelectorSpec>,
}

/// Selector candidates after load-time resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedSelectors {
    pub title: Vec<String>,
    pub image: Vec<String>,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub notes: Vec<String>,
}

impl From<&SelectorsConfig> for ResolvedSelectors {
    fn from(cfg: &SelectorsConfig) -> Self {
        let resolve = |spec: &Option<SelectorSpec>| {
            spec.as_ref().map(|s| s.candidates()).unwrap_or_default()
        };
        Self {
            title: resolve(&cfg.title),
            image: resolve(&cfg.image),
            ingredients: resolve(&cfg.ingredients),
            instructions: resolve(&cfg.instructions),
            notes: resolve(&cfg.notes),
        }
    }
}

// ---------------------------------------------------------------------------
// Site config sections
// ---------------------------------------------------------------------------

/// `[discover]` section — hints for the external URL discovery service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoverConfig {
    /// Index/listing pages to walk for article links.
    #[serde(default)]
    pub index_pages: Vec<String>,

    /// Whether to walk the site's sitemap at all.
    #[serde(default = "default_true")]
    pub sitemap: bool,

    /// Explicit sitemap URL (e.g. a `sitemap_index.xml`), overriding the
    /// conventional `https://<domain>/sitemap.xml`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sitemap_url: Option<String>,
}

impl Default for DiscoverConfig {
    fn default() -> Self {
        Self {
            index_pages: Vec::new(),
            sitemap: true,
            sitemap_url: None,
        }
    }
}

fn default_true() -> bool {
    true
}

/// `[meta]` section — record metadata defaults for this site.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetaConfig {
    /// Record type written into `meta.data_info.type`.
    #[serde(rename = "type", default = "default_record_type")]
    pub record_type: String,

    #[serde(default = "default_domain")]
    pub domain: String,

    #[serde(default = "default_subdomain")]
    pub subdomain: String,

    #[serde(default = "default_collector")]
    pub collector: String,

    #[serde(default = "default_delivery_version")]
    pub delivery_version: String,
}

impl Default for MetaConfig {
    fn default() -> Self {
        Self {
            record_type: default_record_type(),
            domain: default_domain(),
            subdomain: default_subdomain(),
            collector: default_collector(),
            delivery_version: default_delivery_version(),
        }
    }
}

fn default_record_type() -> String {
    "Recipe/HowTo".into()
}
fn default_domain() -> String {
    "Cooking".into()
}
fn default_subdomain() -> String {
    "Recipes".into()
}
fn default_collector() -> String {
    COLLECTOR.into()
}
fn default_delivery_version() -> String {
    DELIVERY_VERSION.into()
}

/// One site's configuration, deserialized from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Site domain, e.g. `examplerecipes.com`.
    pub domain: String,

    /// Target language of the records built from this site.
    #[serde(default)]
    pub lang: Lang,

    #[serde(default)]
    pub discover: DiscoverConfig,

    #[serde(default)]
    pub selectors: SelectorsConfig,

    #[serde(default)]
    pub meta: MetaConfig,
}

impl SiteConfig {
    /// Load a site config from a TOML file and resolve its selectors.
    pub fn load(path: &Path) -> Result<(Self, ResolvedSelectors)> {
        let content =
            std::fs::read_to_string(path).map_err(|e| CorpusError::io(path, e))?;
        let config: SiteConfig = toml::from_str(&content).map_err(|e| {
            CorpusError::config(format!("failed to parse {}: {e}", path.display()))
        })?;
        let resolved = ResolvedSelectors::from(&config.selectors);
        tracing::debug!(domain = %config.domain, "loaded site config");
        Ok((config, resolved))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_spec_parses_all_shapes() {
        let toml_str = r#"
domain = "example.com"

[selectors]
title = "h1.recipe-title"
ingredients = [".wprm-recipe-ingredients", ".tasty-recipes-ingredients"]
instructions = { any = [".wprm-recipe-instructions", ".directions"] }
notes = { all = [".recipe-notes", ".cook-notes"] }
"#;
        let config: SiteConfig = toml::from_str(toml_str).expect("parse");
        let resolved = ResolvedSelectors::from(&config.selectors);

        assert_eq!(resolved.title, vec!["h1.recipe-title"]);
        assert_eq!(resolved.ingredients.len(), 2);
        assert_eq!(resolved.instructions[0], ".wprm-recipe-instructions");
        assert_eq!(resolved.notes, vec![".recipe-notes", ".cook-notes"]);
        assert!(resolved.image.is_empty());
    }

    #[test]
    fn selector_candidates_drop_blank_entries() {
        let spec = SelectorSpec::List(vec!["  .a  ".into(), "".into(), ".b".into()]);
        assert_eq!(spec.candidates(), vec![".a", ".b"]);
    }

    #[test]
    fn meta_defaults_fill_in() {
        let config: SiteConfig = toml::from_str("domain = \"example.com\"").expect("parse");
        assert_eq!(config.lang, Lang::En);
        assert_eq!(config.meta.record_type, "Recipe/HowTo");
        assert_eq!(config.meta.domain, "Cooking");
        assert_eq!(config.meta.subdomain, "Recipes");
        assert_eq!(config.meta.collector, "joy");
        assert_eq!(config.meta.delivery_version, "V1.0");
        assert!(config.discover.sitemap);
    }

    #[test]
    fn discover_overrides() {
        let toml_str = r#"
domain = "example.com"
lang = "zh"

[discover]
index_pages = ["https://example.com/recipes/"]
sitemap = false
sitemap_url = "https://example.com/sitemap_index.xml"
"#;
        let config: SiteConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.lang, Lang::Zh);
        assert!(!config.discover.sitemap);
        assert_eq!(config.discover.index_pages.len(), 1);
        assert_eq!(
            config.discover.sitemap_url.as_deref(),
            Some("https://example.com/sitemap_index.xml")
        );
    }
}
