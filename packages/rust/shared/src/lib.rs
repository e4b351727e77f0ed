//! Shared types, errors, and configuration for corpuskit.

pub mod config;
pub mod error;
pub mod types;

pub use config::{
    DiscoverConfig, MetaConfig, ResolvedSelectors, SelectorSpec, SelectorsConfig, SiteConfig,
};
pub use error::{CorpusError, Result};
pub use types::{
    COLLECTOR, ContentBlock, ContentInfo, DELIVERY_VERSION, DataInfo, ErrorItem, Lang,
    MASK_TOKEN, MIN_TEXT_LEN, Meta, Record, RejectReason, RuleTag,
};
