#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::new_rgb(0, 0, 0);
    pub const WHITE: Color = Color::new_rgb(255, 255, 255);

    #[inline]
    pub const fn new_rgb(r: u8, g: u8, b: u8) -> Color {
        Color { r, g, b, a: 0xff }
    }

    #[inline]
    pub const fn rgb(&self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }
}

/// The sixteen text colours of the C128, in VIC-II colour-code order.
///
/// The discriminant is the value POKEd into colour RAM or `$D020`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
#[repr(u8)]
pub enum TextColor {
    Black = 0,
    #[default]
    White = 1,
    Red = 2,
    Cyan = 3,
    Purple = 4,
    Green = 5,
    Blue = 6,
    Yellow = 7,
    Orange = 8,
    Brown = 9,
    LightRed = 10,
    Gray1 = 11,
    Gray2 = 12,
    LightGreen = 13,
    LightBlue = 14,
    Gray3 = 15,
}

impl TextColor {
    pub const ALL: [TextColor; 16] = [
        TextColor::Black,
        TextColor::White,
        TextColor::Red,
        TextColor::Cyan,
        TextColor::Purple,
        TextColor::Green,
        TextColor::Blue,
        TextColor::Yellow,
        TextColor::Orange,
        TextColor::Brown,
        TextColor::LightRed,
        TextColor::Gray1,
        TextColor::Gray2,
        TextColor::LightGreen,
        TextColor::LightBlue,
        TextColor::Gray3,
    ];

    /// Colour for a 4-bit colour code; the upper nibble is ignored like the
    /// hardware does.
    pub const fn from_code(code: u8) -> TextColor {
        TextColor::ALL[(code & 0x0F) as usize]
    }

    pub const fn code(self) -> u8 {
        self as u8
    }

    pub const fn name(self) -> &'static str {
        match self {
            TextColor::Black => "Black",
            TextColor::White => "White",
            TextColor::Red => "Red",
            TextColor::Cyan => "Cyan",
            TextColor::Purple => "Purple",
            TextColor::Green => "Green",
            TextColor::Blue => "Blue",
            TextColor::Yellow => "Yellow",
            TextColor::Orange => "Orange",
            TextColor::Brown => "Brown",
            TextColor::LightRed => "LightRed",
            TextColor::Gray1 => "Gray1",
            TextColor::Gray2 => "Gray2",
            TextColor::LightGreen => "LightGreen",
            TextColor::LightBlue => "LightBlue",
            TextColor::Gray3 => "Gray3",
        }
    }

    /// Approximate RGB for the host frontend (Pepto's VIC-II palette).
    pub const fn to_rgb(self) -> Color {
        match self {
            TextColor::Black => Color::new_rgb(0x00, 0x00, 0x00),
            TextColor::White => Color::new_rgb(0xFF, 0xFF, 0xFF),
            TextColor::Red => Color::new_rgb(0x68, 0x37, 0x2B),
            TextColor::Cyan => Color::new_rgb(0x70, 0xA4, 0xB2),
            TextColor::Purple => Color::new_rgb(0x6F, 0x3D, 0x86),
            TextColor::Green => Color::new_rgb(0x58, 0x8D, 0x43),
            TextColor::Blue => Color::new_rgb(0x35, 0x28, 0x79),
            TextColor::Yellow => Color::new_rgb(0xB8, 0xC7, 0x6F),
            TextColor::Orange => Color::new_rgb(0x6F, 0x4F, 0x25),
            TextColor::Brown => Color::new_rgb(0x43, 0x39, 0x00),
            TextColor::LightRed => Color::new_rgb(0x9A, 0x67, 0x59),
            TextColor::Gray1 => Color::new_rgb(0x44, 0x44, 0x44),
            TextColor::Gray2 => Color::new_rgb(0x6C, 0x6C, 0x6C),
            TextColor::LightGreen => Color::new_rgb(0x9A, 0xD2, 0x84),
            TextColor::LightBlue => Color::new_rgb(0x6C, 0x5E, 0xB5),
            TextColor::Gray3 => Color::new_rgb(0x95, 0x95, 0x95),
        }
    }
}
