//! Software rasterizer for slide display lists.
//!
//! Pixels are stored as packed 8-bit RGB. Text uses the `font8x8` cell font;
//! each glyph row is a byte whose least significant bit is the leftmost pixel.

use crate::config::Rgb;
use crate::rendering::paint::{PaintCommand, Rgba};
use crate::rendering::Capture;
use crate::{Error, Result};
use font8x8::{UnicodeFonts, BASIC_FONTS, LATIN_FONTS};

const SAMPLES: usize = 3;

/// Bitmap for `c`, if the cell font has one
pub fn glyph(c: char) -> Option<[u8; 8]> {
    BASIC_FONTS.get(c).or_else(|| LATIN_FONTS.get(c))
}

/// Rewrite `text` so every character has a glyph.
///
/// Typographic punctuation is folded to its ASCII form; anything else
/// without a glyph becomes `?`.
pub fn glyph_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\u{2018}' | '\u{2019}' | '\u{201A}' => out.push('\''),
            '\u{201C}' | '\u{201D}' | '\u{201E}' => out.push('"'),
            '\u{2010}'..='\u{2015}' => out.push('-'),
            '\u{2026}' => out.push_str("..."),
            '\u{00A0}' | '\u{2009}' | '\u{202F}' => out.push(' '),
            c if glyph(c).is_some() => out.push(c),
            _ => out.push('?'),
        }
    }
    out
}

#[derive(Debug, Clone)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
    data: Vec<u8>,
}

fn blend(dst: u8, src: u8, alpha: u8) -> u8 {
    let a = alpha as u32;
    ((src as u32 * a + dst as u32 * (255 - a) + 127) / 255) as u8
}

impl Canvas {
    /// Allocate a canvas filled with `background`
    pub fn new(width: u32, height: u32, background: Rgb) -> Result<Canvas> {
        if width == 0 || height == 0 {
            return Err(Error::RenderError(format!("Empty canvas {}x{}", width, height)));
        }
        let len = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(SAMPLES))
            .ok_or_else(|| Error::RenderError(format!("Canvas {}x{} is too large", width, height)))?;
        let mut data = Vec::new();
        data.try_reserve_exact(len)
            .map_err(|e| Error::RenderError(format!("Can't allocate {}x{} canvas: {}", width, height, e)))?;
        for _ in 0..(width as usize * height as usize) {
            data.extend_from_slice(&[background.0, background.1, background.2]);
        }
        Ok(Canvas { width, height, data })
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn get_pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let addr = SAMPLES * (y as usize * self.width as usize + x as usize);
        Some([self.data[addr], self.data[addr + 1], self.data[addr + 2]])
    }

    /// Fill a rectangle, clipped to the canvas
    pub fn fill_rect(&mut self, x: i32, y: i32, width: u32, height: u32, rgba: Rgba) {
        let x0 = x.max(0) as i64;
        let y0 = y.max(0) as i64;
        let x1 = (x as i64 + width as i64).min(self.width as i64);
        let y1 = (y as i64 + height as i64).min(self.height as i64);
        if x0 >= x1 || y0 >= y1 || rgba.3 == 0 {
            return;
        }
        let (r, g, b, a) = rgba;
        for row in y0..y1 {
            let start = SAMPLES * (row as usize * self.width as usize + x0 as usize);
            let end = SAMPLES * (row as usize * self.width as usize + x1 as usize);
            for px in self.data[start..end].chunks_exact_mut(SAMPLES) {
                if a == 255 {
                    px.copy_from_slice(&[r, g, b]);
                } else {
                    px[0] = blend(px[0], r, a);
                    px[1] = blend(px[1], g, a);
                    px[2] = blend(px[2], b, a);
                }
            }
        }
    }

    /// Draw one line of text with its top-left corner at (x, y)
    pub fn draw_text(&mut self, x: i32, y: i32, text: &str, scale: u32, rgba: Rgba) {
        let cell = (8 * scale) as i32;
        for (i, c) in text.chars().enumerate() {
            let Some(rows) = glyph(c).or_else(|| glyph('?')) else {
                continue;
            };
            let gx = x + i as i32 * cell;
            if gx >= self.width as i32 {
                break;
            }
            for (row, bits) in rows.iter().enumerate() {
                for col in 0..8 {
                    if bits >> col & 1 == 1 {
                        self.fill_rect(
                            gx + col * scale as i32,
                            y + row as i32 * scale as i32,
                            scale,
                            scale,
                            rgba,
                        );
                    }
                }
            }
        }
    }

    pub fn encode_png(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut out, self.width, self.height);
            encoder.set_color(png::ColorType::Rgb);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder.write_header()?;
            writer.write_image_data(&self.data)?;
            writer.finish()?;
        }
        Ok(out)
    }
}

/// Rasterize a display list at `scale` device pixels per CSS pixel.
///
/// The canvas is `css_width * scale` by `css_height * scale` and is filled
/// with `background` before any command is painted.
pub fn rasterize(
    commands: &[PaintCommand],
    css_width: u32,
    css_height: u32,
    scale: u32,
    background: Rgb,
) -> Result<Capture> {
    if scale == 0 {
        return Err(Error::RenderError("Capture scale must be at least 1".into()));
    }
    let width = css_width
        .checked_mul(scale)
        .ok_or_else(|| Error::RenderError("Capture width overflow".into()))?;
    let height = css_height
        .checked_mul(scale)
        .ok_or_else(|| Error::RenderError("Capture height overflow".into()))?;
    let mut canvas = Canvas::new(width, height, background)?;
    paint_into(&mut canvas, commands, scale);
    let png_data = canvas.encode_png()?;
    Ok(Capture {
        width,
        height,
        png_data,
    })
}

/// Paint `commands` onto an existing canvas, scaling CSS coordinates
pub fn paint_into(canvas: &mut Canvas, commands: &[PaintCommand], scale: u32) {
    let s = scale as i32;
    for cmd in commands {
        match cmd {
            PaintCommand::SolidRect {
                x,
                y,
                width,
                height,
                rgba,
            } => canvas.fill_rect(x * s, y * s, width * scale, height * scale, *rgba),
            PaintCommand::Text {
                x,
                y,
                text,
                scale: text_scale,
                rgba,
            } => canvas.draw_text(x * s, y * s, text, text_scale * scale, *rgba),
        }
    }
}
