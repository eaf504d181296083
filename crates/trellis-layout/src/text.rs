//! Text measurement for `FitText` sizing.
//!
//! The engine does not shape text itself. It asks a [`TextMeasure`]
//! implementation for the extent of a label, which in practice is the
//! host's font backend, usually behind a
//! [`TextMeasureCache`](crate::text_cache::TextMeasureCache).

use glam::Vec2;

/// Measures the rendered extent of a run of text.
pub trait TextMeasure {
    /// Width and height of `text` set in `font` at `font_size` pixels with
    /// `spacing` extra pixels between glyphs.
    fn measure(&mut self, text: &str, font: &str, font_size: f32, spacing: f32) -> Vec2;
}

impl<F> TextMeasure for F
where
    F: FnMut(&str, &str, f32, f32) -> Vec2,
{
    fn measure(&mut self, text: &str, font: &str, font_size: f32, spacing: f32) -> Vec2 {
        self(text, font, font_size, spacing)
    }
}

/// Character-count based measurer for headless use and tests.
///
/// Proportional fonts average roughly half an em per glyph; this is a
/// placeholder for real font metrics, not a substitute.
#[derive(Debug, Clone, Copy)]
pub struct EstimatedMeasurer {
    /// Average glyph advance as a fraction of the font size
    pub char_width: f32,
    /// Line height as a multiple of the font size
    pub line_height: f32,
}

impl Default for EstimatedMeasurer {
    fn default() -> Self {
        Self {
            char_width: 0.55,
            line_height: 1.2,
        }
    }
}

impl TextMeasure for EstimatedMeasurer {
    fn measure(&mut self, text: &str, _font: &str, font_size: f32, spacing: f32) -> Vec2 {
        let advance = font_size * self.char_width + spacing;
        let line_height = font_size * self.line_height;

        let mut lines = 0_u32;
        let mut widest = 0_usize;
        for line in text.split('\n') {
            lines += 1;
            widest = widest.max(line.chars().count());
        }

        Vec2::new(widest as f32 * advance, lines as f32 * line_height)
    }
}
