use std::path::Path;

use font8x8::UnicodeFonts;
use image::{ImageFormat, RgbImage};
use vca_application::{ApplicationError, Surface};
use vca_domain::{Bitmap, LabelPrimitive, RectPrimitive};

use crate::unpack_rgb;

const GLYPH_SIZE: u32 = 8;

/// Offsets of the lit pixels of `ch` in the 8x8 font, each bit blown up to a
/// `scale`-sized square. Characters outside the font yield nothing.
pub fn glyph_cells(ch: char, scale: u32) -> impl Iterator<Item = (u32, u32)> {
    let glyph = font8x8::BASIC_FONTS.get(ch).unwrap_or([0; 8]);
    (0..GLYPH_SIZE)
        .flat_map(move |row| {
            (0..GLYPH_SIZE)
                .filter(move |col| (glyph[row as usize] >> *col) & 1 == 1)
                .map(move |col| (col, row))
        })
        .flat_map(move |(col, row)| {
            (0..scale).flat_map(move |dy| {
                (0..scale).map(move |dx| (col * scale + dx, row * scale + dy))
            })
        })
}

/// In-memory `0x00RRGGBB` surface. Everything outside the canvas is clipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PixelCanvas {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
}

impl PixelCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    pub fn to_rgb_image(&self) -> RgbImage {
        RgbImage::from_fn(self.width, self.height, |x, y| {
            image::Rgb(unpack_rgb(self.pixel(x, y).unwrap_or_default()))
        })
    }

    pub fn save_png(&self, path: &Path) -> Result<(), ApplicationError> {
        self.to_rgb_image()
            .save_with_format(path, ImageFormat::Png)
            .map_err(|error| {
                ApplicationError::Io(format!("failed to write {}: {error}", path.display()))
            })?;
        tracing::info!(path = %path.display(), width = self.width, height = self.height, "report image saved");
        Ok(())
    }

    fn set_pixel(&mut self, x: i64, y: i64, color: u32) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        let index = y as usize * self.width as usize + x as usize;
        self.pixels[index] = color;
    }

    /// Fills every pixel whose cell overlaps `[left, right) x [top, bottom)`.
    fn fill_band(&mut self, left: f64, top: f64, right: f64, bottom: f64, color: u32) {
        let x_start = left.floor().max(0.0) as i64;
        let y_start = top.floor().max(0.0) as i64;
        let x_end = right.ceil().min(self.width as f64) as i64;
        let y_end = bottom.ceil().min(self.height as f64) as i64;
        for y in y_start..y_end {
            for x in x_start..x_end {
                self.set_pixel(x, y, color);
            }
        }
    }

    fn draw_glyph(&mut self, left: i64, top: i64, ch: char, color: u32, scale: u32) {
        for (dx, dy) in glyph_cells(ch, scale) {
            self.set_pixel(
                left.saturating_add(i64::from(dx)),
                top.saturating_add(i64::from(dy)),
                color,
            );
        }
    }

    /// Anchor in pixels, pinned to a couple of cells outside the canvas.
    fn pin(&self, value: f64, extent: u32, cell: i64) -> i64 {
        let margin = cell as f64;
        value
            .floor()
            .clamp(-margin * 2.0, f64::from(extent) + margin) as i64
    }
}

impl Surface for PixelCanvas {
    fn resize(&mut self, width: u32, height: u32) {
        *self = Self::new(width, height);
    }

    fn draw_bitmap(&mut self, bitmap: &Bitmap) {
        let columns = bitmap.width().min(self.width) as usize;
        let rows = bitmap.height().min(self.height) as usize;
        let source_stride = bitmap.width() as usize;
        let target_stride = self.width as usize;
        for row in 0..rows {
            let source = &bitmap.pixels()[row * source_stride..row * source_stride + columns];
            self.pixels[row * target_stride..row * target_stride + columns].copy_from_slice(source);
        }
    }

    /// Outline centered on the rectangle's path. Negative extents are
    /// measured back from the anchor.
    fn stroke_rect(&mut self, rect: &RectPrimitive, color: u32, line_width: u32) {
        if line_width == 0 || !rect.x.is_finite() || !rect.y.is_finite() {
            return;
        }
        let left = rect.x.min(rect.x + rect.width);
        let right = rect.x.max(rect.x + rect.width);
        let top = rect.y.min(rect.y + rect.height);
        let bottom = rect.y.max(rect.y + rect.height);
        let half = line_width as f64 / 2.0;

        self.fill_band(left - half, top - half, right + half, top + half, color);
        self.fill_band(left - half, bottom - half, right + half, bottom + half, color);
        self.fill_band(left - half, top - half, left + half, bottom + half, color);
        self.fill_band(right - half, top - half, right + half, bottom + half, color);
    }

    /// Glyphs sit on the baseline at `label.y`, advancing one cell per char.
    fn fill_text(&mut self, label: &LabelPrimitive, color: u32, scale: u32) {
        if scale == 0 || !label.x.is_finite() || !label.y.is_finite() {
            return;
        }
        let cell = (GLYPH_SIZE as i64).saturating_mul(scale as i64);
        let top = self.pin(label.y, self.height, cell).saturating_sub(cell);
        if top >= self.height as i64 || top.saturating_add(cell) <= 0 {
            return;
        }
        let mut cursor = label.x.floor();
        for ch in label.text.chars() {
            if ch == '\n' {
                continue;
            }
            if cursor >= f64::from(self.width) {
                break;
            }
            if cursor + cell as f64 > 0.0 {
                let left = self.pin(cursor, self.width, cell);
                self.draw_glyph(left, top, ch, color, scale);
            }
            cursor += cell as f64;
        }
    }
}
