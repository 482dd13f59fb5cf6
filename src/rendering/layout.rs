//! Block layout for slide captures.
//!
//! Text is set in a fixed 8x8 cell font at integer scales, so every size
//! here is a whole number of CSS pixels and the layout is deterministic.

use crate::config::Viewport;
use crate::rendering::raster::glyph_text;
use crate::surface::{ItemRole, SlideBlock};

/// Edge of one glyph cell at scale 1
pub const GLYPH_SIZE: u32 = 8;
pub const MAX_SLIDE_WIDTH: u32 = 960;
pub const MIN_SLIDE_WIDTH: u32 = 320;
pub const SLIDE_PADDING: u32 = 40;
/// Height of the accent bar along the top edge of a slide
pub const ACCENT_BAR: u32 = 6;

const PAGE_GUTTER: u32 = 40;
const BULLET_SIZE: u32 = 6;
const BULLET_INDENT: u32 = 24;
const PANEL_BAR: u32 = 4;
const PANEL_PADDING: u32 = 16;

#[derive(Debug, Clone, PartialEq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn bottom(&self) -> i32 {
        self.y + self.height as i32
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementType {
    Number,
    Label,
    Title,
    Subtitle,
    Point,
    Bullet,
    PayoffPanel,
    PayoffLabel,
    Payoff,
    Paragraph,
}

/// A positioned box. Text nodes carry their wrapped lines joined by `\n`.
#[derive(Debug, Clone)]
pub struct LayoutNode {
    pub rect: Rect,
    pub text: String,
    pub elem_type: ElementType,
    pub scale: u32,
}

#[derive(Debug, Clone)]
pub struct BlockLayout {
    pub width: u32,
    pub height: u32,
    pub nodes: Vec<LayoutNode>,
}

/// On-screen width of a slide block for the given viewport
pub fn slide_width(viewport: Viewport) -> u32 {
    viewport
        .width
        .saturating_sub(PAGE_GUTTER * 2)
        .clamp(MIN_SLIDE_WIDTH, MAX_SLIDE_WIDTH)
}

pub fn line_height(scale: u32) -> u32 {
    (GLYPH_SIZE + 3) * scale
}

/// Greedy word wrap by character count. Words longer than a line are split.
pub fn wrap_text(text: &str, chars_per_line: usize) -> Vec<String> {
    let chars_per_line = chars_per_line.max(1);
    let mut lines = Vec::new();
    let mut cur = String::new();
    let mut cur_len = 0usize;
    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > chars_per_line {
            if !cur.is_empty() {
                lines.push(std::mem::take(&mut cur));
                cur_len = 0;
            }
            let rest = word.split_off(chars_per_line);
            lines.push(word.into_iter().collect());
            word = rest;
        }
        if cur_len + word.len() + 1 > chars_per_line && !cur.is_empty() {
            lines.push(std::mem::take(&mut cur));
            cur_len = 0;
        }
        if !cur.is_empty() {
            cur.push(' ');
            cur_len += 1;
        }
        cur_len += word.len();
        cur.extend(word);
    }
    if !cur.is_empty() {
        lines.push(cur);
    }
    lines
}

struct Cursor {
    x: i32,
    y: u32,
    width: u32,
    nodes: Vec<LayoutNode>,
    panel: Option<(usize, u32)>,
}

impl Cursor {
    /// Place wrapped text at (x, y) and return its height
    fn text(&mut self, elem_type: ElementType, text: &str, x: i32, width: u32, scale: u32) -> u32 {
        let chars = (width / (GLYPH_SIZE * scale)) as usize;
        let lines = wrap_text(&glyph_text(text), chars);
        let height = lines.len().max(1) as u32 * line_height(scale);
        self.nodes.push(LayoutNode {
            rect: Rect {
                x,
                y: self.y as i32,
                width,
                height,
            },
            text: lines.join("\n"),
            elem_type,
            scale,
        });
        height
    }

    fn open_panel(&mut self) {
        if self.panel.is_none() {
            self.y += 8;
            self.panel = Some((self.nodes.len(), self.y));
            self.y += PANEL_PADDING;
        }
    }

    fn close_panel(&mut self) {
        if let Some((at, top)) = self.panel.take() {
            self.y += PANEL_PADDING;
            self.nodes.insert(
                at,
                LayoutNode {
                    rect: Rect {
                        x: self.x,
                        y: top as i32,
                        width: self.width,
                        height: self.y - top,
                    },
                    text: String::new(),
                    elem_type: ElementType::PayoffPanel,
                    scale: 1,
                },
            );
            self.y += 8;
        }
    }
}

/// Lay out one slide block at its on-screen width.
pub fn layout_block(block: &SlideBlock) -> BlockLayout {
    let width = block.width.max(MIN_SLIDE_WIDTH);
    let content_w = width - SLIDE_PADDING * 2;
    let left = SLIDE_PADDING as i32;
    let mut c = Cursor {
        x: left,
        y: SLIDE_PADDING + ACCENT_BAR,
        width: content_w,
        nodes: Vec::new(),
        panel: None,
    };

    let mut items = block.items.iter().peekable();
    while let Some(item) = items.next() {
        if !matches!(item.role, ItemRole::PayoffLabel | ItemRole::Payoff) {
            c.close_panel();
        }
        match item.role {
            ItemRole::Number => {
                let row = line_height(3);
                let used = c.text(ElementType::Number, &item.text, left, content_w, 3);
                // A label directly after the number shares its row, bottom aligned
                if let Some(next) = items.next_if(|n| n.role == ItemRole::Label) {
                    let num_w = glyph_text(&item.text).chars().count() as u32 * GLYPH_SIZE * 3;
                    let x = left + (num_w + 12) as i32;
                    let y = c.y;
                    c.y += row - line_height(1);
                    c.text(
                        ElementType::Label,
                        &next.text.to_uppercase(),
                        x,
                        content_w.saturating_sub(num_w + 12),
                        1,
                    );
                    c.y = y;
                }
                c.y += used + 16;
            }
            ItemRole::Label => {
                let h = c.text(ElementType::Label, &item.text.to_uppercase(), left, content_w, 1);
                c.y += h + 12;
            }
            ItemRole::Heading => {
                let h = c.text(ElementType::Title, &item.text, left, content_w, 3);
                c.y += h + 12;
            }
            ItemRole::Subtitle => {
                let h = c.text(ElementType::Subtitle, &item.text, left, content_w, 2);
                c.y += h + 20;
            }
            ItemRole::Point => {
                let bullet_y = c.y + (line_height(2) - BULLET_SIZE) / 2;
                c.nodes.push(LayoutNode {
                    rect: Rect {
                        x: left,
                        y: bullet_y as i32,
                        width: BULLET_SIZE,
                        height: BULLET_SIZE,
                    },
                    text: String::new(),
                    elem_type: ElementType::Bullet,
                    scale: 1,
                });
                let h = c.text(
                    ElementType::Point,
                    &item.text,
                    left + BULLET_INDENT as i32,
                    content_w - BULLET_INDENT,
                    2,
                );
                c.y += h + 10;
            }
            ItemRole::PayoffLabel | ItemRole::Payoff => {
                c.open_panel();
                let inset = PANEL_BAR + PANEL_PADDING;
                let x = left + inset as i32;
                let w = content_w - inset - PANEL_PADDING;
                if item.role == ItemRole::PayoffLabel {
                    let h = c.text(ElementType::PayoffLabel, &item.text.to_uppercase(), x, w, 1);
                    c.y += h + 8;
                } else {
                    let h = c.text(ElementType::Payoff, &item.text, x, w, 2);
                    c.y += h;
                }
            }
            ItemRole::Text => {
                let h = c.text(ElementType::Paragraph, &item.text, left, content_w, 2);
                c.y += h + 12;
            }
        }
    }
    c.close_panel();

    BlockLayout {
        width,
        height: c.y + SLIDE_PADDING,
        nodes: c.nodes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::BlockItem;

    fn block(items: Vec<(ItemRole, &str)>) -> SlideBlock {
        SlideBlock {
            index: 0,
            label_id: None,
            heading: String::new(),
            width: 960,
            items: items
                .into_iter()
                .map(|(role, text)| BlockItem { role, text: text.to_string() })
                .collect(),
        }
    }

    #[test]
    fn slide_width_is_clamped() {
        assert_eq!(slide_width(Viewport { width: 1280, height: 720 }), 960);
        assert_eq!(slide_width(Viewport { width: 800, height: 600 }), 720);
        assert_eq!(slide_width(Viewport { width: 200, height: 600 }), MIN_SLIDE_WIDTH);
    }

    #[test]
    fn wrap_respects_line_length() {
        let lines = wrap_text("the quick brown fox jumps over the lazy dog", 10);
        assert!(lines.iter().all(|l| l.chars().count() <= 10));
        assert_eq!(lines.join(" "), "the quick brown fox jumps over the lazy dog");
        assert_eq!(wrap_text("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
        assert!(wrap_text("   ", 4).is_empty());
    }

    #[test]
    fn number_and_label_share_a_row() {
        let layout = layout_block(&block(vec![
            (ItemRole::Number, "01"),
            (ItemRole::Label, "Slide 1"),
            (ItemRole::Heading, "Title"),
        ]));
        let number = &layout.nodes[0];
        let label = &layout.nodes[1];
        assert_eq!(number.elem_type, ElementType::Number);
        assert_eq!(label.elem_type, ElementType::Label);
        assert_eq!(label.text, "SLIDE 1");
        assert!(label.rect.x > number.rect.x);
        assert_eq!(label.rect.bottom(), number.rect.bottom());
        assert!(layout.nodes[2].rect.y > number.rect.bottom());
    }

    #[test]
    fn payoff_panel_wraps_its_text() {
        let layout = layout_block(&block(vec![
            (ItemRole::Point, "one"),
            (ItemRole::PayoffLabel, "Practical payoff"),
            (ItemRole::Payoff, "a payoff sentence"),
        ]));
        let types: Vec<_> = layout.nodes.iter().map(|n| n.elem_type).collect();
        assert_eq!(
            types,
            vec![
                ElementType::Bullet,
                ElementType::Point,
                ElementType::PayoffPanel,
                ElementType::PayoffLabel,
                ElementType::Payoff,
            ]
        );
        let panel = &layout.nodes[2].rect;
        let payoff = &layout.nodes[4].rect;
        assert!(payoff.y > panel.y);
        assert!(payoff.bottom() < panel.bottom());
        assert!(layout.height as i32 > panel.bottom());
    }

    #[test]
    fn longer_text_makes_taller_blocks() {
        let short = layout_block(&block(vec![(ItemRole::Heading, "Short")]));
        let long_title = "A considerably longer heading that cannot possibly fit on a single line at this size";
        let long = layout_block(&block(vec![(ItemRole::Heading, long_title)]));
        assert_eq!(short.width, long.width);
        assert!(long.height > short.height);
    }
}
