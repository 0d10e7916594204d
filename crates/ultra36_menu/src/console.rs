//! Character-grid output.

use ultra36_common::TextColor;

use crate::layout::{ScreenWidth, SCREEN_ROWS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Style {
    pub color: TextColor,
    pub reverse: bool,
}

impl Style {
    pub const NORMAL: Style = Style {
        color: TextColor::White,
        reverse: false,
    };

    pub const fn new(color: TextColor) -> Self {
        Self {
            color,
            reverse: false,
        }
    }

    pub const fn reversed(self) -> Self {
        Self {
            reverse: true,
            ..self
        }
    }
}

impl Default for Style {
    fn default() -> Self {
        Style::NORMAL
    }
}

/// Text output in the style of the C128's screen editor: absolute cursor
/// positioning, one colour and reverse flag per cell.
///
/// Writes past the right edge or below the last row are dropped.
pub trait Console {
    /// Characters per row.
    fn columns(&self) -> u8;

    fn put_str(&mut self, x: u8, y: u8, text: &str, style: Style);

    /// Fill `len` cells with spaces in `style`.
    fn fill(&mut self, x: u8, y: u8, len: u8, style: Style);

    fn clear(&mut self, x: u8, y: u8, len: u8) {
        self.fill(x, y, len, Style::NORMAL);
    }
}

impl<C: Console + ?Sized> Console for &mut C {
    fn columns(&self) -> u8 {
        (**self).columns()
    }

    fn put_str(&mut self, x: u8, y: u8, text: &str, style: Style) {
        (**self).put_str(x, y, text, style)
    }

    fn fill(&mut self, x: u8, y: u8, len: u8, style: Style) {
        (**self).fill(x, y, len, style)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub style: Style,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            style: Style::NORMAL,
        }
    }
}

/// In-memory screen, `columns x 25`.
#[derive(Debug, Clone)]
pub struct TextBuffer {
    columns: u8,
    cells: Vec<Cell>,
    dirty: bool,
}

/// Two buffers are equal when they show the same thing.
impl PartialEq for TextBuffer {
    fn eq(&self, other: &Self) -> bool {
        self.columns == other.columns && self.cells == other.cells
    }
}

impl Eq for TextBuffer {}

impl TextBuffer {
    pub fn new(width: ScreenWidth) -> Self {
        let columns = width.columns();
        Self {
            columns,
            cells: vec![Cell::default(); columns as usize * SCREEN_ROWS as usize],
            dirty: true,
        }
    }

    pub fn columns(&self) -> u8 {
        self.columns
    }

    pub fn rows(&self) -> u8 {
        SCREEN_ROWS
    }

    fn index(&self, x: u8, y: u8) -> Option<usize> {
        (x < self.columns && y < SCREEN_ROWS)
            .then(|| y as usize * self.columns as usize + x as usize)
    }

    pub fn cell(&self, x: u8, y: u8) -> Cell {
        self.index(x, y)
            .map(|i| self.cells[i])
            .unwrap_or_default()
    }

    /// One row as text, trailing blanks trimmed. Rows below the screen are
    /// empty.
    pub fn row_text(&self, y: u8) -> String {
        let columns = self.columns as usize;
        let row: String = self
            .cells
            .chunks_exact(columns)
            .nth(y as usize)
            .unwrap_or_default()
            .iter()
            .map(|cell| cell.ch)
            .collect();
        row.trim_end().to_string()
    }

    pub fn contains(&self, text: &str) -> bool {
        (0..SCREEN_ROWS).any(|y| self.row_text(y).contains(text))
    }

    /// Whole screen as text, one line per row.
    pub fn dump(&self) -> String {
        (0..SCREEN_ROWS)
            .map(|y| self.row_text(y))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// True once since the last call if anything was written.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    fn set(&mut self, x: u8, y: u8, ch: char, style: Style) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = Cell { ch, style };
            self.dirty = true;
        }
    }
}

impl Console for TextBuffer {
    fn columns(&self) -> u8 {
        self.columns
    }

    fn put_str(&mut self, x: u8, y: u8, text: &str, style: Style) {
        for (offset, ch) in text.chars().enumerate() {
            let Ok(offset) = u8::try_from(offset) else {
                break;
            };
            let ch = if ch.is_ascii() && !ch.is_ascii_control() {
                ch
            } else {
                '?'
            };
            self.set(x.saturating_add(offset), y, ch, style);
        }
    }

    fn fill(&mut self, x: u8, y: u8, len: u8, style: Style) {
        for offset in 0..len {
            self.set(x.saturating_add(offset), y, ' ', style);
        }
    }
}
