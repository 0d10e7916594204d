//! Screen geometry.
//!
//! Every row and column the renderer writes to comes from here. Positions
//! depend only on the screen width and, for list items, on the item index
//! and count.

use crate::io::{Bus, KERNAL_SCREEN_COLUMNS};

pub const SCREEN_ROWS: u8 = 25;

/// Lists longer than this are split over two columns.
pub const SINGLE_COLUMN_MAX: usize = 7;

/// Left margin of list items and of the left list column.
const LIST_MARGIN: u8 = 2;

/// Rows available for list items (`LIST_TOP..=CONTENT_BOTTOM`).
const LIST_TOP: u8 = 5;
const CONTENT_TOP: u8 = 2;
const CONTENT_BOTTOM: u8 = 22;

/// Number of function-key slots on the second line.
pub const FKEY_SLOTS: u8 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScreenWidth {
    /// VIC-II, 40 columns.
    Forty,
    /// VDC, 80 columns.
    Eighty,
}

impl ScreenWidth {
    pub fn columns(self) -> u8 {
        match self {
            ScreenWidth::Forty => 40,
            ScreenWidth::Eighty => 80,
        }
    }

    pub fn from_columns(columns: u32) -> Option<Self> {
        match columns {
            40 => Some(ScreenWidth::Forty),
            80 => Some(ScreenWidth::Eighty),
            _ => None,
        }
    }

    /// Read the active screen width from the KERNAL's last-column byte.
    pub fn detect<B: Bus + ?Sized>(bus: &mut B) -> Self {
        if bus.read8(KERNAL_SCREEN_COLUMNS) == 79 {
            ScreenWidth::Eighty
        } else {
            ScreenWidth::Forty
        }
    }
}

/// Items in the left column for a list of `count` entries.
pub fn left_column_len(count: usize) -> usize {
    if count > SINGLE_COLUMN_MAX {
        count.div_ceil(2)
    } else {
        count
    }
}

/// 0 for the left column, 1 for the right.
pub fn item_column(index: usize, count: usize) -> usize {
    usize::from(index >= left_column_len(count))
}

/// x offset of a list column.
pub fn column_x(column: usize, width: ScreenWidth) -> u8 {
    if column == 0 {
        LIST_MARGIN
    } else {
        width.columns() / 2 + 1
    }
}

/// Screen position of list item `index` in a list of `count` entries.
pub fn item_position(index: usize, count: usize, width: ScreenWidth) -> (u8, u8) {
    let column = item_column(index, count);
    let row = index - column * left_column_len(count);
    (column_x(column, width), LIST_TOP + row as u8)
}

/// Characters available to one list item, including its number.
pub fn item_width(count: usize, width: ScreenWidth) -> u8 {
    if count > SINGLE_COLUMN_MAX {
        width.columns() / 2 - LIST_MARGIN - 1
    } else {
        width.columns() - 2 * LIST_MARGIN
    }
}

/// Longest list that fits in the content area.
pub fn max_list_len() -> usize {
    2 * (CONTENT_BOTTOM - LIST_TOP + 1) as usize
}

/// Named places on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Element {
    TitleBar,
    FunctionKeys,
    Heading,
    Status,
    Footer,
    InfoBody,
    VdcTitle,
    VdcRam,
    ColorHeading,
    ColorBars,
    SidHeading,
    Sid1,
    Sid2,
    SidComment,
    SweepHint1,
    SweepHint2,
    SweepPlaying1,
    SweepPlaying2,
    SweepStage,
    PortHintMssiah,
    PortHintCynthcart,
}

/// Row/column table for one screen width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    width: ScreenWidth,
}

impl Layout {
    pub fn new(width: ScreenWidth) -> Self {
        Self { width }
    }

    pub fn width(&self) -> ScreenWidth {
        self.width
    }

    pub fn columns(&self) -> u8 {
        self.width.columns()
    }

    /// Top-left corner of an element.
    pub fn position(&self, element: Element) -> (u8, u8) {
        let (x, y) = match element {
            Element::TitleBar => (0, 0),
            Element::FunctionKeys => (0, 1),
            Element::Heading => (0, 3),
            Element::Status => (0, 23),
            Element::Footer => (0, 24),
            Element::InfoBody => (2, 5),
            Element::VdcTitle => (0, 2),
            Element::VdcRam => (0, 3),
            Element::ColorHeading => (10, 5),
            Element::ColorBars => (0, 6),
            Element::SidHeading => (0, 3),
            Element::Sid1 => (0, 5),
            Element::Sid2 => (0, 6),
            Element::SidComment => (0, 8),
            Element::SweepHint1 => (0, 10),
            Element::SweepHint2 => (0, 11),
            Element::SweepPlaying1 => (0, 13),
            Element::SweepPlaying2 => (0, 14),
            Element::SweepStage => (0, 15),
            Element::PortHintMssiah => (0, 21),
            Element::PortHintCynthcart => (0, 22),
        };
        (x, y)
    }

    pub fn row(&self, element: Element) -> u8 {
        self.position(element).1
    }

    /// Rows the content area spans; everything between the function-key bar
    /// and the status line.
    pub fn content_rows(&self) -> std::ops::RangeInclusive<u8> {
        CONTENT_TOP..=CONTENT_BOTTOM
    }

    /// x that centres `len` characters.
    pub fn centered_x(&self, len: usize) -> u8 {
        (self.columns() as usize).saturating_sub(len) as u8 / 2
    }

    /// x of function-key slot `slot`.
    pub fn fkey_x(&self, slot: u8) -> u8 {
        slot * self.fkey_slot_width()
    }

    pub fn fkey_slot_width(&self) -> u8 {
        self.columns() / FKEY_SLOTS
    }

    pub fn item_position(&self, index: usize, count: usize) -> (u8, u8) {
        item_position(index, count, self.width)
    }

    pub fn item_width(&self, count: usize) -> u8 {
        item_width(count, self.width)
    }
}
