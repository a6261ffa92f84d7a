//! Draw color-coded rectangles for each selected detection and re-encode the
//! image in the format implied by the output file name.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};

use crate::config::ColorConfig;
use crate::detection::assemble::assemble_areas;
use crate::detection::types::{AnnotatedArea, PixelRect, SelectedDetection};
use crate::errors::{WeedScopeError, WeedScopeResult};

/// Outline width in pixels.
pub const BOX_THICKNESS: i32 = 7;

pub struct Annotator {
    format: ImageFormat,
    thickness: i32,
}

/// Encoded output image plus the areas that were drawn on it.
#[derive(Debug)]
pub struct AnnotatedImage {
    pub bytes: Vec<u8>,
    pub areas: Vec<AnnotatedArea>,
    pub width: u32,
    pub height: u32,
}

impl Annotator {
    /// PNG and BMP names keep their format; anything else is written as JPEG.
    pub fn for_output(file_name: &str) -> Self {
        let format = match ImageFormat::from_path(file_name) {
            Ok(f @ (ImageFormat::Png | ImageFormat::Bmp)) => f,
            _ => ImageFormat::Jpeg,
        };
        Self {
            format,
            thickness: BOX_THICKNESS,
        }
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    pub fn content_type(&self) -> &'static str {
        self.format.to_mime_type()
    }

    pub fn annotate(
        &self,
        src_bytes: &[u8],
        selected: &[SelectedDetection],
        colors: &ColorConfig,
    ) -> WeedScopeResult<AnnotatedImage> {
        let img = image::load_from_memory(src_bytes)
            .map_err(|e| WeedScopeError::Image(format!("annotate load: {e}")))?;
        let mut canvas = img.to_rgb8();
        let (width, height) = canvas.dimensions();

        let areas = assemble_areas(selected, width, height, colors);
        for area in &areas {
            let col = parse_hex_color(&area.color)?;
            draw_rect(&mut canvas, &area.rect, col, self.thickness);
        }
        tracing::debug!(width, height, areas = areas.len(), "detected areas marked");

        let mut bytes = Vec::new();
        DynamicImage::ImageRgb8(canvas)
            .write_to(&mut Cursor::new(&mut bytes), self.format)
            .map_err(|e| WeedScopeError::Image(format!("{:?} encode: {e}", self.format)))?;

        Ok(AnnotatedImage {
            bytes,
            areas,
            width,
            height,
        })
    }
}

/// Content type for a stored artifact, judged by its file name.
pub fn content_type_for(file_name: &str) -> &'static str {
    match ImageFormat::from_path(file_name) {
        Ok(format) => format.to_mime_type(),
        Err(_) if file_name.ends_with(".json") => "application/json",
        Err(_) => "application/octet-stream",
    }
}

pub fn parse_hex_color(s: &str) -> WeedScopeResult<Rgb<u8>> {
    let hex = s.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return Err(WeedScopeError::Image(format!(
            "invalid hex color '{s}': expected 6 hex digits"
        )));
    }

    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&hex[range], 16)
            .map_err(|_| WeedScopeError::Image(format!("invalid hex color '{s}'")))
    };
    Ok(Rgb([channel(0..2)?, channel(2..4)?, channel(4..6)?]))
}

// ── Drawing primitives ─────────────────────────────────────────────────

fn draw_rect(canvas: &mut RgbImage, rect: &PixelRect, col: Rgb<u8>, thickness: i32) {
    let (w, h) = canvas.dimensions();
    let (iw, ih) = (w as i32, h as i32);

    let (x1, x2) = ordered(rect.top_left.0, rect.bottom_right.0);
    let (y1, y2) = ordered(rect.top_left.1, rect.bottom_right.1);

    // Visible spans only; boxes may extend far past the canvas.
    let xs = x1.max(0)..=x2.min(iw - 1);
    let ys = y1.max(0)..=y2.min(ih - 1);

    for t in 0..thickness {
        // Top & bottom edges
        let ty = y1.saturating_add(t);
        let by = y2.saturating_sub(t);
        for x in xs.clone() {
            set_pixel(canvas, x, ty, col);
            set_pixel(canvas, x, by, col);
        }
        // Left & right edges
        let lx = x1.saturating_add(t);
        let rx = x2.saturating_sub(t);
        for y in ys.clone() {
            set_pixel(canvas, lx, y, col);
            set_pixel(canvas, rx, y, col);
        }
    }
}

fn ordered(a: i32, b: i32) -> (i32, i32) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

fn set_pixel(canvas: &mut RgbImage, x: i32, y: i32, col: Rgb<u8>) {
    let (w, h) = canvas.dimensions();
    if x >= 0 && y >= 0 && (x as u32) < w && (y as u32) < h {
        canvas.put_pixel(x as u32, y as u32, col);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::types::{Label, NormalizedBox};

    fn blank_png(w: u32, h: u32) -> Vec<u8> {
        let img = RgbImage::from_pixel(w, h, Rgb([0, 0, 0]));
        let mut out = Vec::new();
        DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut out), ImageFormat::Png)
            .unwrap();
        out
    }

    fn selected(label: Label, bbox: NormalizedBox) -> SelectedDetection {
        SelectedDetection {
            label,
            confidence: 0.9,
            bbox,
        }
    }

    #[test]
    fn parses_hex_colors() {
        assert_eq!(parse_hex_color("#A3C566").unwrap(), Rgb([0xA3, 0xC5, 0x66]));
        assert_eq!(parse_hex_color("ff0000").unwrap(), Rgb([255, 0, 0]));
        assert!(parse_hex_color("#FFF").is_err());
        assert!(parse_hex_color("#GG0000").is_err());
        assert!(parse_hex_color("#ÿÿÿ").is_err());
    }

    #[test]
    fn output_format_follows_file_name() {
        assert_eq!(Annotator::for_output("predictions.png").format(), ImageFormat::Png);
        assert_eq!(Annotator::for_output("predictions.jpg").format(), ImageFormat::Jpeg);
        assert_eq!(Annotator::for_output("predictions").format(), ImageFormat::Jpeg);
        assert_eq!(Annotator::for_output("predictions.gif").format(), ImageFormat::Jpeg);
        assert_eq!(Annotator::for_output("a.jpeg").content_type(), "image/jpeg");
    }

    #[test]
    fn content_type_by_extension() {
        assert_eq!(content_type_for("predictions.json"), "application/json");
        assert_eq!(content_type_for("predictions.png"), "image/png");
        assert_eq!(content_type_for("predictions.jpg"), "image/jpeg");
        assert_eq!(content_type_for("predictions.bin"), "application/octet-stream");
    }

    #[test]
    fn draws_outline_in_resolved_color() {
        let src = blank_png(100, 100);
        let bbox = NormalizedBox {
            left: 0.2,
            top: 0.2,
            width: 0.6,
            height: 0.6,
        };
        let colors = ColorConfig {
            grass: "#00FF00".into(),
            weed: String::new(),
        };

        let out = Annotator::for_output("out.png")
            .annotate(&src, &[selected(Label::Grass, bbox)], &colors)
            .unwrap();

        assert_eq!((out.width, out.height), (100, 100));
        assert_eq!(out.areas.len(), 1);
        assert_eq!(out.areas[0].rect.top_left, (20, 20));
        assert_eq!(out.areas[0].rect.bottom_right, (80, 80));

        let decoded = image::load_from_memory(&out.bytes).unwrap().to_rgb8();
        assert_eq!(*decoded.get_pixel(20, 50), Rgb([0, 255, 0]));
        assert_eq!(*decoded.get_pixel(26, 50), Rgb([0, 255, 0]));
        assert_eq!(*decoded.get_pixel(27, 50), Rgb([0, 0, 0]));
        assert_eq!(*decoded.get_pixel(50, 50), Rgb([0, 0, 0]));
    }

    #[test]
    fn boxes_outside_canvas_do_not_panic() {
        let src = blank_png(16, 16);
        let wild = [
            selected(
                Label::Weed,
                NormalizedBox {
                    left: -3.0,
                    top: 2.0,
                    width: 10.0,
                    height: 10.0,
                },
            ),
            selected(
                Label::Grass,
                NormalizedBox {
                    left: f64::NEG_INFINITY,
                    top: f64::NAN,
                    width: f64::INFINITY,
                    height: 1.0,
                },
            ),
        ];
        let out = Annotator::for_output("out.jpg")
            .annotate(&src, &wild, &ColorConfig::default())
            .unwrap();
        assert_eq!(out.areas.len(), 2);
        assert!(image::load_from_memory(&out.bytes).is_ok());
    }

    #[test]
    fn undecodable_input_is_an_image_error() {
        let err = Annotator::for_output("out.jpg")
            .annotate(b"definitely not an image", &[], &ColorConfig::default())
            .unwrap_err();
        assert!(matches!(err, WeedScopeError::Image(_)));
    }
}
