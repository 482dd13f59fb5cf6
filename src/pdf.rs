//! Paginated PDF assembly for raster pages, built on `printpdf`.
//!
//! Pages are measured in CSS pixels (1 px = 0.75 pt) and may each have their
//! own size. The page list and placed images are recorded as the export runs
//! and handed to `printpdf` in one pass by [`PdfDocument::to_bytes`].

use crate::{Error, Result};
use printpdf::image_crate::codecs::png::PngDecoder;
use printpdf::image_crate::ImageDecoder;
use printpdf::{Image, ImageTransform, Mm, Pt};
use std::io::{BufWriter, Cursor};

/// PDF points per CSS pixel
pub const PT_PER_PX: f64 = 0.75;

/// CSS pixels per inch
const CSS_DPI: f64 = 96.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Portrait,
    Landscape,
}

impl Orientation {
    /// Landscape when `width >= height`
    pub fn for_dimensions(width: f64, height: f64) -> Self {
        if width >= height {
            Orientation::Landscape
        } else {
            Orientation::Portrait
        }
    }
}

/// Page size in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageFormat {
    pub width: f64,
    pub height: f64,
}

impl PageFormat {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Apply an explicit orientation: landscape pages are made wider than
    /// tall and portrait pages taller than wide, swapping if needed.
    pub fn oriented(self, orientation: Orientation) -> Self {
        let swap = match orientation {
            Orientation::Landscape => self.width < self.height,
            Orientation::Portrait => self.width > self.height,
        };
        if swap {
            Self::new(self.height, self.width)
        } else {
            self
        }
    }
}

#[derive(Debug, Clone)]
pub struct PdfOptions {
    pub producer: String,
    pub title: Option<String>,
}

impl Default for PdfOptions {
    fn default() -> Self {
        Self {
            producer: concat!("slidepress ", env!("CARGO_PKG_VERSION")).to_string(),
            title: None,
        }
    }
}

/// A PNG placed on a page, in CSS pixels from the top-left corner
#[derive(Debug, Clone)]
struct PlacedImage {
    png_data: Vec<u8>,
    pixel_width: u32,
    pixel_height: u32,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

#[derive(Debug, Clone)]
struct Page {
    format: PageFormat,
    images: Vec<PlacedImage>,
}

#[derive(Debug, Clone)]
pub struct PdfDocument {
    options: PdfOptions,
    pages: Vec<Page>,
    current: usize,
}

fn mm(px: f64) -> Mm {
    Mm::from(Pt((px * PT_PER_PX) as _))
}

fn png_decoder(png_data: &[u8]) -> Result<PngDecoder<Cursor<&[u8]>>> {
    PngDecoder::new(Cursor::new(png_data)).map_err(|e| Error::EncodeError(format!("Bad PNG: {}", e)))
}

impl PdfDocument {
    /// Start a document whose first page has `format` in `orientation`
    pub fn new(format: PageFormat, orientation: Orientation, options: PdfOptions) -> Self {
        Self {
            options,
            pages: vec![Page {
                format: format.oriented(orientation),
                images: Vec::new(),
            }],
            current: 0,
        }
    }

    /// Append a page and make it current
    pub fn add_page(&mut self, format: PageFormat, orientation: Orientation) {
        self.pages.push(Page {
            format: format.oriented(orientation),
            images: Vec::new(),
        });
        self.current = self.pages.len() - 1;
    }

    /// Select the current page, 1-based
    pub fn set_page(&mut self, number: usize) -> Result<()> {
        if number == 0 || number > self.pages.len() {
            return Err(Error::DocumentError(format!(
                "Page {} out of range (document has {} pages)",
                number,
                self.pages.len()
            )));
        }
        self.current = number - 1;
        Ok(())
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// 1-based number of the current page
    pub fn current_page(&self) -> usize {
        self.current + 1
    }

    /// Size of the current page in CSS pixels
    pub fn page_size(&self) -> PageFormat {
        self.pages[self.current].format
    }

    /// Sizes of all pages in order
    pub fn page_sizes(&self) -> Vec<PageFormat> {
        self.pages.iter().map(|p| p.format).collect()
    }

    /// Draw a PNG on the current page with its top-left corner at (x, y),
    /// stretched to `width` x `height` CSS pixels. The PNG header is checked
    /// here; pixel data is decoded when the document is written.
    pub fn add_image_png(&mut self, png_data: &[u8], x: f64, y: f64, width: f64, height: f64) -> Result<()> {
        let (pixel_width, pixel_height) = png_decoder(png_data)?.dimensions();
        if pixel_width == 0 || pixel_height == 0 {
            return Err(Error::EncodeError("PNG has no pixels".into()));
        }
        self.pages[self.current].images.push(PlacedImage {
            png_data: png_data.to_vec(),
            pixel_width,
            pixel_height,
            x,
            y,
            width,
            height,
        });
        Ok(())
    }

    /// Serialize the document
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let first = self.pages[0].format;
        let title = self.options.title.clone().unwrap_or_default();
        let (doc, page, layer) = printpdf::PdfDocument::new(title, mm(first.width), mm(first.height), "Slide 1");
        let doc = doc.with_producer(self.options.producer.clone());

        let mut targets = vec![(page, layer)];
        for (i, page) in self.pages.iter().enumerate().skip(1) {
            targets.push(doc.add_page(
                mm(page.format.width),
                mm(page.format.height),
                format!("Slide {}", i + 1),
            ));
        }

        for (page, (page_index, layer_index)) in self.pages.iter().zip(targets) {
            let layer = doc.get_page(page_index).get_layer(layer_index);
            for placed in &page.images {
                let image = Image::try_from(png_decoder(&placed.png_data)?)
                    .map_err(|e| Error::EncodeError(format!("PNG decode failed: {}", e)))?;
                // At CSS_DPI one image pixel is one CSS pixel, so the scale
                // is the ratio of target size to pixel size.
                let transform = ImageTransform {
                    translate_x: Some(mm(placed.x)),
                    translate_y: Some(mm(page.format.height - placed.y - placed.height)),
                    scale_x: Some((placed.width / placed.pixel_width as f64) as _),
                    scale_y: Some((placed.height / placed.pixel_height as f64) as _),
                    dpi: Some(CSS_DPI as _),
                    ..Default::default()
                };
                image.add_to_layer(layer.clone(), transform);
            }
        }

        let mut writer = BufWriter::new(Vec::new());
        doc.save(&mut writer)
            .map_err(|e| Error::DocumentError(format!("PDF serialization failed: {}", e)))?;
        writer
            .into_inner()
            .map_err(|e| Error::DocumentError(format!("PDF serialization failed: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Rgb;
    use crate::rendering::raster::Canvas;

    fn png(width: u32, height: u32) -> Vec<u8> {
        Canvas::new(width, height, Rgb(200, 10, 10)).unwrap().encode_png().unwrap()
    }

    /// Page sizes in points as written in a serialized document, in page order.
    ///
    /// Reads every `/MediaBox` array; tolerant of the whitespace variations PDF
    /// writers produce.
    fn media_boxes(bytes: &[u8]) -> Vec<(f64, f64)> {
        const KEY: &[u8] = b"/MediaBox";
        let mut out = Vec::new();
        let mut at = 0;
        while let Some(pos) = find(&bytes[at..], KEY) {
            let start = at + pos + KEY.len();
            at = start;
            let rest = &bytes[start..];
            let Some(open) = rest.iter().position(|b| !b.is_ascii_whitespace()) else {
                break;
            };
            if rest[open] != b'[' {
                continue;
            }
            let Some(close) = rest[open..].iter().position(|&b| b == b']') else {
                break;
            };
            let nums: Vec<f64> = String::from_utf8_lossy(&rest[open + 1..open + close])
                .split_whitespace()
                .filter_map(|n| n.parse().ok())
                .collect();
            if let [x0, y0, x1, y1] = nums[..] {
                out.push((x1 - x0, y1 - y0));
            }
        }
        out
    }

    fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
        haystack.windows(needle.len()).position(|w| w == needle)
    }

    fn close(a: (f64, f64), b: (f64, f64)) -> bool {
        (a.0 - b.0).abs() < 0.05 && (a.1 - b.1).abs() < 0.05
    }

    #[test]
    fn orientation_follows_dimensions() {
        assert_eq!(Orientation::for_dimensions(10.0, 10.0), Orientation::Landscape);
        assert_eq!(Orientation::for_dimensions(9.0, 10.0), Orientation::Portrait);
    }

    #[test]
    fn explicit_orientation_swaps_format() {
        let f = PageFormat::new(400.0, 300.0);
        assert_eq!(f.oriented(Orientation::Landscape), f);
        assert_eq!(f.oriented(Orientation::Portrait), PageFormat::new(300.0, 400.0));
    }

    #[test]
    fn pages_keep_their_own_sizes() {
        let mut doc = PdfDocument::new(PageFormat::new(1920.0, 1080.0), Orientation::Landscape, PdfOptions::default());
        doc.add_image_png(&png(4, 2), 0.0, 0.0, 1920.0, 1080.0).unwrap();
        doc.add_page(PageFormat::new(600.0, 800.0), Orientation::Portrait);
        doc.set_page(2).unwrap();
        assert_eq!(doc.page_size(), PageFormat::new(600.0, 800.0));
        doc.add_image_png(&png(3, 4), 0.0, 0.0, 600.0, 800.0).unwrap();

        assert_eq!(doc.page_count(), 2);
        assert_eq!(
            doc.page_sizes(),
            vec![PageFormat::new(1920.0, 1080.0), PageFormat::new(600.0, 800.0)]
        );

        let bytes = doc.to_bytes().unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
        let boxes = media_boxes(&bytes);
        assert_eq!(boxes.len(), 2);
        assert!(close(boxes[0], (1440.0, 810.0)), "{:?}", boxes);
        assert!(close(boxes[1], (450.0, 600.0)), "{:?}", boxes);
    }

    #[test]
    fn set_page_rejects_out_of_range() {
        let mut doc = PdfDocument::new(PageFormat::new(10.0, 10.0), Orientation::Landscape, PdfOptions::default());
        assert!(doc.set_page(0).is_err());
        assert!(doc.set_page(2).is_err());
        doc.set_page(1).unwrap();
        assert_eq!(doc.current_page(), 1);
    }

    #[test]
    fn rejects_garbage_image() {
        let mut doc = PdfDocument::new(PageFormat::new(8.0, 8.0), Orientation::Landscape, PdfOptions::default());
        assert!(matches!(
            doc.add_image_png(b"not a png", 0.0, 0.0, 8.0, 8.0),
            Err(Error::EncodeError(_))
        ));
    }

    #[test]
    fn media_boxes_accepts_compact_and_spaced_arrays() {
        let raw = b"<</Type/Page/MediaBox[0 0 720 405.5]>> << /MediaBox [ 0 0 10 20 ] >> /MediaBox 3 0 R";
        assert_eq!(media_boxes(raw), vec![(720.0, 405.5), (10.0, 20.0)]);
    }
}
