//! Brightness-to-character mapping.
//!
//! This module converts sampled frame buffer pixels into lines of text. A
//! fixed 10-character ramp runs from dark to bright; each sampled pixel
//! contributes exactly one character, each sampled row exactly one line.

use std::fmt;

/// Glyph ramp ordered dark to bright. Index 0 (space) renders the black
/// background, index 9 (`@`) the brightest highlights.
pub const LUMA_RAMP: &[u8; 10] = b" .:-=+*#%@";

/// Ramp index for a single brightness value: `floor(brightness / 255 * 9)`.
///
/// Computed in integer arithmetic so the result is exact for every input;
/// 0 maps to the first ramp entry, 255 to the last.
pub fn glyph_index(brightness: u8) -> usize {
    brightness as usize * (LUMA_RAMP.len() - 1) / 255
}

/// Map one pixel to its ramp character.
///
/// Brightness is the unweighted channel mean `(r + g + b) / 3`, like the
/// index formula evaluated without intermediate rounding: the sum feeds the
/// integer division directly, so fractional means still land on the right
/// side of each ramp threshold. The mean makes the mapping independent of
/// channel order, which lets the sampler feed RGBA and BGRA buffers alike.
pub fn glyph_for_pixel(r: u8, g: u8, b: u8) -> char {
    let sum = r as usize + g as usize + b as usize;
    let index = sum * (LUMA_RAMP.len() - 1) / (255 * 3);
    LUMA_RAMP[index] as char
}

/// A rendered character grid: one `char` per sampled pixel plus a newline
/// terminating every row, the last row included.
///
/// Rows are ordered top to bottom, matching the row order of the frame
/// buffer the pixels were copied from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AsciiFrame {
    width: u32,
    height: u32,
    text: String,
}

impl AsciiFrame {
    /// Build a frame from a tightly packed 4-byte-per-pixel buffer.
    ///
    /// # Arguments
    ///
    /// * `pixels` holds `width * height` pixels of 4 bytes each; the fourth
    ///   channel (alpha) is ignored
    /// * `row_stride` emits every n-th row only (1 keeps all rows), used by
    ///   the tall sampling presets to compensate for character cell aspect
    pub fn from_rgba(pixels: &[u8], width: u32, height: u32, row_stride: u32) -> Self {
        Self::from_rgba_padded(pixels, width, height, width as usize * 4, row_stride)
    }

    /// Build a frame from a buffer whose rows are padded to `bytes_per_row`.
    ///
    /// Read-back buffers carry alignment padding at the end of each row;
    /// only the leading `width * 4` bytes of a row are sampled.
    pub fn from_rgba_padded(
        pixels: &[u8],
        width: u32,
        height: u32,
        bytes_per_row: usize,
        row_stride: u32,
    ) -> Self {
        let row_stride = row_stride.max(1);
        assert!(bytes_per_row >= width as usize * 4);
        assert!(pixels.len() >= bytes_per_row * height as usize);

        let rows = height.div_ceil(row_stride);
        let mut text = String::with_capacity((width as usize + 1) * rows as usize);
        for y in (0..height).step_by(row_stride as usize) {
            let row = &pixels[y as usize * bytes_per_row..];
            for x in 0..width as usize {
                let px = &row[x * 4..x * 4 + 3];
                text.push(glyph_for_pixel(px[0], px[1], px[2]));
            }
            text.push('\n');
        }

        Self {
            width,
            height: rows,
            text,
        }
    }

    /// Grid width in characters.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Grid height in rows (after row striding).
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.lines()
    }
}

impl fmt::Display for AsciiFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
