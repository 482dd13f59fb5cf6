//! Headless rendering surface.
//!
//! A `Surface` holds the markup of the currently mounted page and answers the
//! DOM queries the export routine needs. Like a browser page it is queried,
//! not traversed directly: every call re-parses the mounted markup, so the
//! results always reflect what was mounted last.

use crate::accessibility::{AccessibilityNode, AccessibilityProvider, AccessibilityTree};
use crate::config::Viewport;
use crate::rendering::layout::slide_width;
use crate::view::SLIDE_ATTR;
use crate::{Error, Result};
use scraper::{ElementRef, Html, Selector};

/// A textual snapshot of the mounted page
#[derive(Debug, Clone, PartialEq)]
pub struct TextSnapshot {
    /// Document title
    pub title: String,
    /// Visible body text, one block per line
    pub text: String,
}

/// What a piece of slide content is, as far as capture is concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemRole {
    Number,
    Label,
    Heading,
    Subtitle,
    Point,
    PayoffLabel,
    Payoff,
    Text,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockItem {
    pub role: ItemRole,
    pub text: String,
}

/// Owned snapshot of one `[data-slide]` element.
///
/// Blocks are detached from the parsed document so they can be moved onto
/// the capture worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideBlock {
    /// Position among the slide blocks, 0-based
    pub index: usize,
    /// Id referenced by `aria-labelledby`, if any
    pub label_id: Option<String>,
    /// Text of the labelling heading
    pub heading: String,
    /// On-screen width in CSS pixels
    pub width: u32,
    pub items: Vec<BlockItem>,
}

#[derive(Debug, Clone)]
pub struct Surface {
    viewport: Viewport,
    last_html: Option<String>,
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| Error::RenderError(format!("Bad selector '{}': {:?}", css, e)))
}

fn collapse_ws(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn element_text(el: &ElementRef) -> String {
    collapse_ws(&el.text().collect::<String>())
}

fn has_class(el: &ElementRef, class: &str) -> bool {
    el.value()
        .attr("class")
        .map(|c| c.split_whitespace().any(|name| name == class))
        .unwrap_or(false)
}

fn parent_has_class(el: &ElementRef, class: &str) -> bool {
    el.parent()
        .and_then(ElementRef::wrap)
        .map(|p| has_class(&p, class))
        .unwrap_or(false)
}

fn classify(el: &ElementRef) -> Option<ItemRole> {
    let tag = el.value().name();
    if has_class(el, "slide-number") {
        Some(ItemRole::Number)
    } else if has_class(el, "slide-label") {
        Some(ItemRole::Label)
    } else if has_class(el, "payoff-label") {
        Some(ItemRole::PayoffLabel)
    } else if has_class(el, "subtitle") {
        Some(ItemRole::Subtitle)
    } else if matches!(tag, "h1" | "h2" | "h3" | "h4" | "h5" | "h6") {
        Some(ItemRole::Heading)
    } else if tag == "li" {
        Some(ItemRole::Point)
    } else if tag == "p" && parent_has_class(el, "payoff") {
        Some(ItemRole::Payoff)
    } else if tag == "p" {
        Some(ItemRole::Text)
    } else {
        None
    }
}

impl Surface {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            last_html: None,
        }
    }

    /// Mount `html`, replacing whatever was mounted before
    pub fn load_html(&mut self, html: impl Into<String>) {
        self.last_html = Some(html.into());
    }

    fn document(&self) -> Result<Html> {
        let html = self
            .last_html
            .as_ref()
            .ok_or_else(|| Error::RenderError("No document loaded".into()))?;
        Ok(Html::parse_document(html))
    }

    /// All slide blocks inside the main region, in document order.
    ///
    /// An empty result is not an error here; deciding what "no slides" means
    /// is left to the caller.
    pub fn slide_blocks(&self) -> Result<Vec<SlideBlock>> {
        let document = self.document()?;
        let block_sel = selector(&format!("main [{}]", SLIDE_ATTR))?;
        let width = slide_width(self.viewport);

        let mut blocks = Vec::new();
        for (index, el) in document.select(&block_sel).enumerate() {
            let label_id = el.value().attr("aria-labelledby").map(str::to_string);
            let mut items = Vec::new();
            for node in el.descendants().skip(1) {
                let Some(child) = ElementRef::wrap(node) else {
                    continue;
                };
                if let Some(role) = classify(&child) {
                    let text = element_text(&child);
                    if !text.is_empty() {
                        items.push(BlockItem { role, text });
                    }
                }
            }
            let heading = label_id
                .as_deref()
                .and_then(|id| {
                    el.descendants()
                        .filter_map(ElementRef::wrap)
                        .find(|e| e.value().id() == Some(id))
                        .map(|e| element_text(&e))
                })
                .or_else(|| {
                    items
                        .iter()
                        .find(|i| i.role == ItemRole::Heading)
                        .map(|i| i.text.clone())
                })
                .unwrap_or_default();
            blocks.push(SlideBlock {
                index,
                label_id,
                heading,
                width,
                items,
            });
        }
        log::debug!("surface query found {} slide blocks", blocks.len());
        Ok(blocks)
    }

    pub fn text_snapshot(&self) -> Result<TextSnapshot> {
        let document = self.document()?;
        let title = document
            .select(&selector("title")?)
            .next()
            .map(|n| element_text(&n))
            .unwrap_or_default();

        let block_sel = selector("h1, h2, p, li, span, button")?;
        let text = document
            .select(&block_sel)
            .filter(|el| {
                // Leaf-most blocks only, so nested spans are not printed twice
                !el.descendants()
                    .skip(1)
                    .filter_map(ElementRef::wrap)
                    .any(|c| block_sel.matches(&c))
            })
            .map(|el| element_text(&el))
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join("\n");

        Ok(TextSnapshot { title, text })
    }

    /// Banner and main landmarks, with one named region per slide block
    pub fn accessibility_tree(&self) -> Result<AccessibilityTree> {
        let document = self.document()?;
        let mut nodes = Vec::new();

        if let Some(header) = document.select(&selector("header")?).next() {
            let mut banner = AccessibilityNode::new("header", "banner", None);
            for el in header.descendants().filter_map(ElementRef::wrap) {
                match el.value().name() {
                    "h1" => banner
                        .children
                        .push(AccessibilityNode::new("h1", "heading", Some(element_text(&el)))),
                    "button" => banner
                        .children
                        .push(AccessibilityNode::new("button", "button", Some(element_text(&el)))),
                    _ if el.value().attr("role") == Some("status") => banner
                        .children
                        .push(AccessibilityNode::new("status", "status", Some(element_text(&el)))),
                    _ => {}
                }
            }
            nodes.push(banner);
        }

        if document.select(&selector("main")?).next().is_some() {
            let mut main_node = AccessibilityNode::new("main", "main", None);
            for block in self.slide_blocks()? {
                let id = block
                    .label_id
                    .clone()
                    .unwrap_or_else(|| format!("block-{}", block.index + 1));
                let name = (!block.heading.is_empty()).then(|| block.heading.clone());
                main_node
                    .children
                    .push(AccessibilityNode::new(format!("region-{}", id), "region", name));
            }
            nodes.push(main_node);
        }

        let root_id = nodes.first().map(|n| n.id.clone());
        Ok(AccessibilityTree { root_id, nodes })
    }
}

impl AccessibilityProvider for Surface {
    fn export_tree(&self) -> AccessibilityTree {
        self.accessibility_tree().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slides::{DECK, SLIDES};
    use crate::view::{render_page, ViewSnapshot};

    fn mounted() -> Surface {
        let mut s = Surface::new(Viewport::default());
        s.load_html(render_page(&DECK, SLIDES, &ViewSnapshot::default()).unwrap());
        s
    }

    #[test]
    fn query_without_document_is_an_error() {
        let s = Surface::new(Viewport::default());
        assert!(matches!(s.slide_blocks(), Err(Error::RenderError(_))));
        assert!(s.accessibility_tree().is_err());
        assert!(s.export_tree().nodes.is_empty());
    }

    #[test]
    fn blocks_follow_document_order() {
        let blocks = mounted().slide_blocks().unwrap();
        assert_eq!(blocks.len(), SLIDES.len());
        for (i, (block, slide)) in blocks.iter().zip(SLIDES).enumerate() {
            assert_eq!(block.index, i);
            assert_eq!(block.heading, slide.title);
            assert_eq!(block.label_id.as_deref(), Some(format!("slide-{}", i + 1).as_str()));
            assert_eq!(block.width, 960);
        }
    }

    #[test]
    fn block_items_are_classified() {
        let blocks = mounted().slide_blocks().unwrap();
        let roles: Vec<_> = blocks[0].items.iter().map(|i| i.role).collect();
        assert_eq!(
            roles,
            vec![
                ItemRole::Number,
                ItemRole::Label,
                ItemRole::Heading,
                ItemRole::Subtitle,
                ItemRole::Point,
                ItemRole::Point,
                ItemRole::Point,
                ItemRole::PayoffLabel,
                ItemRole::Payoff,
            ]
        );
        assert_eq!(blocks[0].items[0].text, "01");
        assert_eq!(blocks[0].items[1].text, "Slide 1");
        assert_eq!(blocks[3].items[2].text, "Fuel Creativity & Innovation");
    }

    #[test]
    fn blocks_outside_main_are_ignored() {
        let mut s = Surface::new(Viewport::default());
        s.load_html("<html><body><section data-slide><h2>Loose</h2></section><main></main></body></html>");
        assert!(s.slide_blocks().unwrap().is_empty());
    }

    #[test]
    fn snapshot_and_tree_expose_labels() {
        let s = mounted();
        let snap = s.text_snapshot().unwrap();
        assert_eq!(snap.title, DECK.kicker);
        assert!(snap.text.contains("Download PDF"));
        assert!(snap.text.contains("Grow Empathy for Stakeholders"));

        let tree = s.export_tree();
        let regions = tree.regions();
        assert_eq!(regions.len(), 5);
        assert_eq!(regions[1].name.as_deref(), Some("Grow Empathy for Stakeholders"));
        assert_eq!(tree.root_id.as_deref(), Some("header"));
    }
}
