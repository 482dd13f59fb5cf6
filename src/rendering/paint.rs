//! Paint commands and display list construction for slide blocks

use crate::rendering::layout::{line_height, BlockLayout, ElementType, ACCENT_BAR};

pub type Rgba = (u8, u8, u8, u8);

pub const CARD: Rgba = (255, 255, 255, 255);
pub const BORDER: Rgba = (229, 224, 213, 255);
pub const ACCENT: Rgba = (154, 52, 18, 255);
pub const INK: Rgba = (31, 41, 51, 255);
pub const MUTED: Rgba = (82, 96, 109, 255);
pub const FAINT: Rgba = (107, 114, 128, 255);
pub const PANEL: Rgba = (253, 243, 231, 255);

const PANEL_BAR: u32 = 4;

#[derive(Debug, Clone, PartialEq)]
pub enum PaintCommand {
    SolidRect {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        rgba: Rgba,
    },
    Text {
        x: i32,
        y: i32,
        text: String,
        scale: u32,
        rgba: Rgba,
    },
}

fn text_color(elem_type: ElementType) -> Rgba {
    match elem_type {
        ElementType::Number | ElementType::PayoffLabel => ACCENT,
        ElementType::Label => FAINT,
        ElementType::Subtitle => MUTED,
        _ => INK,
    }
}

fn rect(x: i32, y: i32, width: u32, height: u32, rgba: Rgba) -> PaintCommand {
    PaintCommand::SolidRect {
        x,
        y,
        width,
        height,
        rgba,
    }
}

/// Build the display list for a laid out block, back to front.
///
/// Coordinates are CSS pixels relative to the block's top-left corner.
pub fn build_display_list(layout: &BlockLayout) -> Vec<PaintCommand> {
    let (w, h) = (layout.width, layout.height);
    let mut cmds = vec![
        rect(0, 0, w, h, CARD),
        rect(0, 0, w, 1, BORDER),
        rect(0, h as i32 - 1, w, 1, BORDER),
        rect(0, 0, 1, h, BORDER),
        rect(w as i32 - 1, 0, 1, h, BORDER),
        rect(0, 0, w, ACCENT_BAR, ACCENT),
    ];

    for node in &layout.nodes {
        let r = &node.rect;
        match node.elem_type {
            ElementType::Bullet => cmds.push(rect(r.x, r.y, r.width, r.height, ACCENT)),
            ElementType::PayoffPanel => {
                cmds.push(rect(r.x, r.y, r.width, r.height, PANEL));
                cmds.push(rect(r.x, r.y, PANEL_BAR, r.height, ACCENT));
            }
            t => {
                let step = line_height(node.scale) as i32;
                for (i, line) in node.text.lines().enumerate() {
                    cmds.push(PaintCommand::Text {
                        x: r.x,
                        y: r.y + i as i32 * step,
                        text: line.to_string(),
                        scale: node.scale,
                        rgba: text_color(t),
                    });
                }
            }
        }
    }
    cmds
}
