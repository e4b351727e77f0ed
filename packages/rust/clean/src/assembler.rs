//! Raw content assembly: extracted HTML fragments → ordered content blocks.
//!
//! Fragments arrive from the selector-driven extraction service as raw HTML
//! for up to three sections (ingredients, instructions, notes). Script,
//! style, and embedded-frame content is discarded before text extraction;
//! `<img>` elements become `[Image: url]` sentinel lines positioned where
//! the image occurred; tables are dropped entirely so no markdown-table
//! text can leak downstream.

use ego_tree::NodeRef;
use scraper::{Html, Node};
use serde::{Deserialize, Serialize};

use corpuskit_shared::ContentBlock;

/// Raw extracted fields for one source document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawParts {
    #[serde(default)]
    pub title: String,
    /// Cover image URL (usually `og:image`), prepended when present.
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub ingredients_html: Option<String>,
    #[serde(default)]
    pub instructions_html: Option<String>,
    #[serde(default)]
    pub notes_html: Option<String>,
    /// In-body image URLs collected separately (e.g. step photos).
    #[serde(default)]
    pub step_images: Vec<String>,
}

/// Side-channel facts about one assembly, used by downstream quality
/// gating (not by validation).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssemblyStats {
    /// The notes section produced no text.
    pub missing_notes: bool,
    /// Number of step-image references emitted.
    pub image_count: usize,
}

/// Elements whose entire subtree is discarded before text extraction.
const SKIP_TAGS: &[&str] = &["script", "style", "noscript", "iframe", "table"];

/// Assemble raw parts into the ordered block sequence.
pub fn assemble(parts: &RawParts) -> (Vec<ContentBlock>, AssemblyStats) {
    let mut blocks: Vec<ContentBlock> = Vec::new();

    if let Some(cover) = parts.cover_image.as_deref() {
        let cover = cover.trim();
        if !cover.is_empty() {
            blocks.push(ContentBlock::Image(cover.to_string()));
        }
    }

    let sections: [(&str, Option<&str>); 3] = [
        ("Ingredients", parts.ingredients_html.as_deref()),
        ("Instructions", parts.instructions_html.as_deref()),
        ("Notes", parts.notes_html.as_deref()),
    ];

    let mut missing_notes = true;
    for (label, html) in sections {
        let lines = html.map(fragment_lines).unwrap_or_default();
        if lines.is_empty() {
            continue;
        }
        if label == "Notes" {
            missing_notes = false;
        }
        blocks.push(ContentBlock::Heading(label.to_string()));
        blocks.push(ContentBlock::Paragraph(lines));
    }

    let mut image_count = 0;
    for url in &parts.step_images {
        if url.starts_with("http://") || url.starts_with("https://") {
            blocks.push(ContentBlock::Image(url.clone()));
            image_count += 1;
        }
    }

    tracing::debug!(
        blocks = blocks.len(),
        missing_notes,
        image_count,
        "assembled content blocks"
    );

    (
        blocks,
        AssemblyStats {
            missing_notes,
            image_count,
        },
    )
}

/// Extract plain-text lines from an HTML fragment, preserving internal line
/// breaks and replacing images with sentinel lines in place.
fn fragment_lines(html: &str) -> Vec<String> {
    let doc = Html::parse_fragment(html);
    let mut out = Vec::new();
    collect_lines(*doc.root_element(), &mut out);
    out
}

fn collect_lines(node: NodeRef<'_, Node>, out: &mut Vec<String>) {
    for child in node.children() {
        match child.value() {
            Node::Text(text) => {
                for line in text.text.split('\n') {
                    let line = line.trim();
                    if !line.is_empty() {
                        out.push(line.to_string());
                    }
                }
            }
            Node::Element(el) => {
                let name = el.name();
                if SKIP_TAGS.contains(&name) {
                    continue;
                }
                if name == "img" {
                    if let Some(src) = el.attr("data-src").or_else(|| el.attr("src")) {
                        let src = src.trim();
                        if !src.is_empty() && !src.starts_with("data:image") {
                            out.push(format!("[Image: {src}]"));
                        }
                    }
                    continue;
                }
                collect_lines(child, out);
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fragment_text_preserves_line_structure() {
        let lines = fragment_lines("<ul><li>1 cup flour</li><li>2 eggs</li></ul>");
        assert_eq!(lines, vec!["1 cup flour", "2 eggs"]);
    }

    #[test]
    fn script_and_style_content_discarded() {
        let lines = fragment_lines(
            "<div><script>var x=1;</script><style>.a{}</style><p>Mix well.</p></div>",
        );
        assert_eq!(lines, vec!["Mix well."]);
    }

    #[test]
    fn tables_dropped_entirely() {
        let lines = fragment_lines(
            "<div><table><tr><td>cups</td><td>grams</td></tr></table><p>Serve warm.</p></div>",
        );
        assert_eq!(lines, vec!["Serve warm."]);
    }

    #[test]
    fn images_become_sentinels_in_place() {
        let lines = fragment_lines(
            "<div><p>Step 1: knead.</p><img src=\"https://x.com/step1.jpg\"><p>Step 2: rest.</p></div>",
        );
        assert_eq!(
            lines,
            vec![
                "Step 1: knead.",
                "[Image: https://x.com/step1.jpg]",
                "Step 2: rest."
            ]
        );
    }

    #[test]
    fn lazy_loaded_image_src_preferred() {
        let lines = fragment_lines(
            "<img data-src=\"https://x.com/real.jpg\" src=\"data:image/gif;base64,R0\">",
        );
        assert_eq!(lines, vec!["[Image: https://x.com/real.jpg]"]);
    }

    #[test]
    fn cover_image_prepended_and_sections_labeled() {
        let parts = RawParts {
            title: "Lemon Tart".into(),
            cover_image: Some("https://x.com/cover.jpg".into()),
            ingredients_html: Some("<li>1 lemon</li>".into()),
            instructions_html: Some("<p>Zest the lemon.</p>".into()),
            notes_html: None,
            step_images: vec![
                "https://x.com/step.jpg".into(),
                "/relative/skipped.jpg".into(),
            ],
        };
        let (blocks, stats) = assemble(&parts);

        assert_eq!(
            blocks,
            vec![
                ContentBlock::Image("https://x.com/cover.jpg".into()),
                ContentBlock::Heading("Ingredients".into()),
                ContentBlock::Paragraph(vec!["1 lemon".into()]),
                ContentBlock::Heading("Instructions".into()),
                ContentBlock::Paragraph(vec!["Zest the lemon.".into()]),
                ContentBlock::Image("https://x.com/step.jpg".into()),
            ]
        );
        assert!(stats.missing_notes);
        assert_eq!(stats.image_count, 1);
    }

    #[test]
    fn absent_sections_emit_nothing() {
        let parts = RawParts {
            ingredients_html: Some("<li>1 cup flour</li>".into()),
            ..Default::default()
        };
        let (blocks, stats) = assemble(&parts);
        assert_eq!(blocks.len(), 2);
        assert!(stats.missing_notes);
        assert_eq!(stats.image_count, 0);
    }

    #[test]
    fn notes_section_clears_missing_flag() {
        let parts = RawParts {
            notes_html: Some("<p>Keeps 3 days refrigerated.</p>".into()),
            ..Default::default()
        };
        let (_, stats) = assemble(&parts);
        assert!(!stats.missing_notes);
    }
}
