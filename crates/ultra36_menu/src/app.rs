use std::collections::VecDeque;
use std::time::Instant;

use anyhow::Result;
use font8x8::{UnicodeFonts, BASIC_FONTS};
use ultra36_common::{App, Color, Key, TextColor};

use crate::config::{MenuConfig, PRODUCT_NAME, VERSION};
use crate::console::TextBuffer;
use crate::layout::{ScreenWidth, SCREEN_ROWS};
use crate::menu::{Menu, SessionEnd};
use crate::playback::{Playback, Shared};
use crate::sim::{SimBus, SimConfig};

/// Glyph cell edge in pixels.
pub const GLYPH_SIZE: usize = 8;
/// Border around the text area in pixels.
pub const BORDER_SIZE: usize = 16;

pub type WindowMenu = Menu<Shared<SimBus>, Shared<TextBuffer>, Playback>;

/// Frame size in pixels for a text screen of the given width.
pub fn frame_size(width: ScreenWidth) -> (usize, usize) {
    (
        width.columns() as usize * GLYPH_SIZE + 2 * BORDER_SIZE,
        SCREEN_ROWS as usize * GLYPH_SIZE + 2 * BORDER_SIZE,
    )
}

/// SDL-facing wrapper that runs the menu on the simulated machine.
///
/// Waits inside a command are replayed frame by frame, and keys pressed
/// meanwhile are held until the replay is over, as the real menu would not
/// read the keyboard before its command finished.
pub struct MenuApp {
    menu: WindowMenu,
    screen: Shared<TextBuffer>,
    machine: Shared<SimBus>,
    pending_keys: VecDeque<Key>,
    outcome: Option<SessionEnd>,
    should_exit: bool,
}

impl MenuApp {
    pub fn new(config: MenuConfig, machine: SimConfig) -> Result<Self> {
        let machine = Shared::new(SimBus::new(machine));
        let width = ScreenWidth::detect(&mut machine.clone());
        let screen = Shared::new(TextBuffer::new(width));
        let playback = Playback::new(screen.clone(), machine.clone());
        let menu = Menu::new(config, width, machine.clone(), screen.clone(), playback)?;
        Ok(Self {
            menu,
            screen,
            machine,
            pending_keys: VecDeque::new(),
            outcome: None,
            should_exit: false,
        })
    }

    /// How the session ended; `None` while it is still running.
    pub fn outcome(&self) -> Option<SessionEnd> {
        self.outcome
    }

    /// True while recorded frames are still being shown.
    pub fn is_playing(&self) -> bool {
        self.menu.delay().is_playing()
    }

    /// Text and border on screen at `now`. Held keys are processed once
    /// the replay has caught up.
    pub fn shown_at(&mut self, now: Instant) -> (TextBuffer, TextColor) {
        if self.menu.delay_mut().current(now).is_none() {
            self.drain_keys();
        }
        match self.menu.delay_mut().current(now) {
            Some(frame) => (frame.text.clone(), frame.border),
            None => (self.screen.borrow().clone(), self.machine.borrow().border()),
        }
    }

    fn drain_keys(&mut self) {
        while !self.should_exit && !self.is_playing() {
            let Some(key) = self.pending_keys.pop_front() else {
                break;
            };
            if let Some(end) = self.menu.handle_key(key) {
                self.outcome = Some(end);
                self.should_exit = true;
            }
        }
    }
}

impl App for MenuApp {
    fn init(&mut self) {
        log::info!("{PRODUCT_NAME} init");
        self.menu.start();
    }

    fn update(&mut self, screen: &mut [u8]) {
        let (text, border) = self.shown_at(Instant::now());
        rasterize(&text, border, screen);
    }

    fn handle_key_event(&mut self, key: Key, is_down: bool) {
        if !is_down || self.should_exit {
            return;
        }
        self.pending_keys.push_back(key);
        self.drain_keys();
        if self.is_playing() {
            log::debug!(
                "Replaying {} ms of waits",
                self.menu.delay().remaining().as_millis()
            );
        }
    }

    fn should_exit(&self) -> bool {
        self.should_exit
    }

    fn exit(&mut self) {
        // Closing the window counts as leaving without a choice.
        let outcome = *self.outcome.get_or_insert(SessionEnd::Cancelled);
        log::info!("{PRODUCT_NAME} exit: {outcome:?}");
    }

    fn width(&self) -> u32 {
        frame_size(self.menu.width()).0 as u32
    }

    fn height(&self) -> u32 {
        frame_size(self.menu.width()).1 as u32
    }

    fn scale(&self) -> u32 {
        match self.menu.width() {
            ScreenWidth::Forty => 3,
            ScreenWidth::Eighty => 2,
        }
    }

    fn title(&self) -> String {
        format!("{PRODUCT_NAME} {VERSION}")
    }
}

/// Draw `text` into an RGB24 `frame` framed by a `border`-coloured margin.
pub fn rasterize(text: &TextBuffer, border: TextColor, frame: &mut [u8]) {
    let columns = text.columns() as usize;
    let frame_width = columns * GLYPH_SIZE + 2 * BORDER_SIZE;
    debug_assert_eq!(
        frame.len(),
        frame_width * (SCREEN_ROWS as usize * GLYPH_SIZE + 2 * BORDER_SIZE) * 3
    );

    let border = border.to_rgb();
    for pixel in frame.chunks_exact_mut(3) {
        put_pixel(pixel, border);
    }

    for row in 0..text.rows() {
        for column in 0..text.columns() {
            let cell = text.cell(column, row);
            let glyph = BASIC_FONTS.get(cell.ch).unwrap_or([0; 8]);
            let (mut fg, mut bg) = (cell.style.color.to_rgb(), Color::BLACK);
            if cell.style.reverse {
                std::mem::swap(&mut fg, &mut bg);
            }

            let left = BORDER_SIZE + column as usize * GLYPH_SIZE;
            let top = BORDER_SIZE + row as usize * GLYPH_SIZE;
            for (dy, &bits) in glyph.iter().enumerate() {
                for dx in 0..GLYPH_SIZE {
                    // Bit 0 is the leftmost pixel.
                    let color = if bits >> dx & 1 == 1 { fg } else { bg };
                    let index = ((top + dy) * frame_width + left + dx) * 3;
                    put_pixel(&mut frame[index..index + 3], color);
                }
            }
        }
    }
}

fn put_pixel(pixel: &mut [u8], color: Color) {
    let (r, g, b) = color.rgb();
    pixel[0] = r;
    pixel[1] = g;
    pixel[2] = b;
}
