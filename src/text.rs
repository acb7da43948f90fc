//! Autoshrink word-wrap layout for node labels.
//!
//! Both backends measure with the same fixed monospace advance model so that
//! raster and vector output wrap identically. Layout is greedy: append the
//! next word while the row fits inside the node's padded width, otherwise
//! start a new row; if the wrapped block is taller than the padded height,
//! shrink the font by one and retry, down to a hard floor.

/// Horizontal advance per character as a fraction of the font size, matching
/// the fixed monospace stack used by the vector backend.
pub const ADVANCE_RATIO: f64 = 0.6;

/// Line height as a fraction of the font size.
pub const LINE_HEIGHT_RATIO: f64 = 1.2;

/// Shrink floor; guarantees the retry loop terminates.
pub const MIN_FONT_SIZE: f64 = 6.0;

/// Horizontal and vertical padding inside the node rectangle.
const PADDING: f64 = 16.0;

/// A wrapped, sized label block, vertically centered by the renderers.
#[derive(Clone, Debug, PartialEq)]
pub struct LabelLayout {
    pub font_size: f64,
    pub lines: Vec<String>,
}

impl LabelLayout {
    pub fn line_height(&self) -> f64 {
        self.font_size * LINE_HEIGHT_RATIO
    }

    pub fn block_height(&self) -> f64 {
        self.lines.len() as f64 * self.line_height()
    }

    /// Measured width of one wrapped line under the monospace model.
    pub fn line_width(&self, line: &str) -> f64 {
        line.chars().count() as f64 * self.font_size * ADVANCE_RATIO
    }

    /// Y offsets of each line's vertical center relative to the block center.
    pub fn line_offsets(&self) -> impl Iterator<Item = f64> + '_ {
        let line_height = self.line_height();
        let top = -self.block_height() / 2.0;
        (0..self.lines.len()).map(move |i| top + line_height * (i as f64 + 0.5))
    }
}

/// Lay out `text` inside a node of the given size.
///
/// Returns `None` for blank text. Never fails: a single overlong word is
/// placed on its own row and allowed to overflow horizontally once the floor
/// is reached.
pub fn layout_label(text: &str, width: f64, height: f64) -> Option<LabelLayout> {
    if text.trim().is_empty() {
        return None;
    }

    let max_width = (width - PADDING).max(1.0);
    let max_height = (height - PADDING).max(1.0);
    let mut font_size = (width.min(height) * 0.2).floor().max(MIN_FONT_SIZE);

    loop {
        let lines = wrap(text, max_width, font_size);
        let block_height = lines.len() as f64 * font_size * LINE_HEIGHT_RATIO;
        if block_height <= max_height || font_size <= MIN_FONT_SIZE {
            tracing::trace!(font_size, rows = lines.len(), "label layout settled");
            return Some(LabelLayout { font_size, lines });
        }
        font_size -= 1.0;
    }
}

fn wrap(text: &str, max_width: f64, font_size: f64) -> Vec<String> {
    let advance = font_size * ADVANCE_RATIO;
    let mut lines: Vec<String> = Vec::new();
    let mut row = String::new();
    let mut row_chars = 0usize;

    for word in text.split_whitespace() {
        let word_chars = word.chars().count();
        let candidate = if row.is_empty() {
            word_chars
        } else {
            row_chars + 1 + word_chars
        };
        if row.is_empty() || candidate as f64 * advance <= max_width {
            if !row.is_empty() {
                row.push(' ');
            }
            row.push_str(word);
            row_chars = candidate;
        } else {
            lines.push(std::mem::take(&mut row));
            row.push_str(word);
            row_chars = word_chars;
        }
    }
    if !row.is_empty() {
        lines.push(row);
    }
    lines
}
