//! The menu session: screen state machine and key dispatch.

use anyhow::{bail, Context, Result};
use ultra36_common::Key;

use crate::config::MenuConfig;
use crate::console::Console;
use crate::io::{Bus, Delay};
use crate::layout::ScreenWidth;
use crate::list::{MenuList, Selection};
use crate::probe::{detect_vdc_ram, SidReport, VdcRam};
use crate::render::{Content, Redraw, Renderer};
use crate::screen::Screen;
use crate::sweep::play_filter_sweep;

#[cfg(test)]
mod tests;

/// Exit code reported when the user leaves without choosing a bank.
pub const CANCELLED_EXIT_CODE: i32 = 255;

pub const JIFFY_ITEMS: [&str; 2] = ["JiffyDOS On", "JiffyDOS Off"];

const ROM_HEADING: &str = "Select ROM bank:";
const JIFFY_HEADING: &str = "JiffyDOS setting:";

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// Left with this ROM bank selected (0-based).
    Selected(usize),
    Cancelled,
}

impl SessionEnd {
    pub fn exit_code(self) -> i32 {
        match self {
            SessionEnd::Selected(index) => index as i32,
            SessionEnd::Cancelled => CANCELLED_EXIT_CODE,
        }
    }
}

/// Blocking supply of key presses. `None` means no more input will arrive.
pub trait KeySource {
    fn next_key(&mut self) -> Option<Key>;
}

impl<K: KeySource + ?Sized> KeySource for &mut K {
    fn next_key(&mut self) -> Option<Key> {
        (**self).next_key()
    }
}

/// One run of the menu. Owns the hardware handles and everything the session
/// remembers between key presses.
pub struct Menu<B: Bus, C: Console, D: Delay> {
    config: MenuConfig,
    renderer: Renderer,
    screen: Screen,
    roms: MenuList,
    rom_selection: Selection,
    jiffy: MenuList,
    jiffy_selection: Selection,
    sid_report: Option<SidReport>,
    vdc_ram: Option<VdcRam>,
    last_redraw: Option<Redraw>,
    bus: B,
    console: C,
    delay: D,
}

impl<B: Bus, C: Console, D: Delay> Menu<B, C, D> {
    pub fn new(
        config: MenuConfig,
        width: ScreenWidth,
        bus: B,
        console: C,
        delay: D,
    ) -> Result<Self> {
        config.validate().context("invalid menu configuration")?;
        if console.columns() != width.columns() {
            bail!(
                "console is {} columns wide but the screen has {}",
                console.columns(),
                width.columns()
            );
        }
        let roms = MenuList::new(config.rom_names.iter().cloned());
        let jiffy = MenuList::new(JIFFY_ITEMS);
        log::info!(
            "Menu ready: {} ROM banks, {} columns",
            roms.len(),
            width.columns()
        );
        Ok(Self {
            renderer: Renderer::new(width),
            screen: Screen::default(),
            rom_selection: Selection::new(roms.len()),
            jiffy_selection: Selection::new(jiffy.len()),
            roms,
            jiffy,
            sid_report: None,
            vdc_ram: None,
            last_redraw: None,
            config,
            bus,
            console,
            delay,
        })
    }

    /// Like [`Menu::new`], with the screen width read from the KERNAL.
    pub fn with_detected_width(
        config: MenuConfig,
        mut bus: B,
        console: C,
        delay: D,
    ) -> Result<Self> {
        let width = ScreenWidth::detect(&mut bus);
        Self::new(config, width, bus, console, delay)
    }

    /// Draw the initial screen.
    pub fn start(&mut self) {
        self.redraw();
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Remembered cursor of a list screen.
    pub fn selection(&self, screen: Screen) -> Option<usize> {
        match screen {
            Screen::RomSelect => Some(self.rom_selection.index()),
            Screen::JiffyToggle => Some(self.jiffy_selection.index()),
            _ => None,
        }
    }

    pub fn sid_report(&self) -> Option<&SidReport> {
        self.sid_report.as_ref()
    }

    pub fn vdc_ram(&self) -> Option<VdcRam> {
        self.vdc_ram
    }

    /// What the most recent repaint did, if anything was repainted yet.
    pub fn last_redraw(&self) -> Option<Redraw> {
        self.last_redraw
    }

    pub fn config(&self) -> &MenuConfig {
        &self.config
    }

    pub fn width(&self) -> ScreenWidth {
        self.renderer.layout().width()
    }

    pub fn console(&self) -> &C {
        &self.console
    }

    pub fn console_mut(&mut self) -> &mut C {
        &mut self.console
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    pub fn delay(&self) -> &D {
        &self.delay
    }

    pub fn delay_mut(&mut self) -> &mut D {
        &mut self.delay
    }

    /// Process one key press. Returns the outcome once the session is over.
    pub fn handle_key(&mut self, key: Key) -> Option<SessionEnd> {
        log::debug!("key {key:?} on {:?}", self.screen);
        if let Some(target) = Screen::for_key(key) {
            self.switch_to(target);
            return None;
        }
        match key {
            Key::F7 => {
                self.renderer.invalidate();
                self.redraw();
                None
            }
            Key::F8 => {
                let index = self.rom_selection.index();
                log::info!("Restart requested with ROM bank #{}", index + 1);
                Some(SessionEnd::Selected(index))
            }
            Key::Escape if self.screen == Screen::RomSelect => {
                log::info!("Menu cancelled");
                Some(SessionEnd::Cancelled)
            }
            _ => {
                self.handle_screen_key(key);
                None
            }
        }
    }

    /// Feed keys from `keys` until the session ends or input runs out, which
    /// counts as a cancel.
    pub fn run<K: KeySource + ?Sized>(&mut self, keys: &mut K) -> SessionEnd {
        if self.last_redraw.is_none() {
            self.start();
        }
        while let Some(key) = keys.next_key() {
            if let Some(end) = self.handle_key(key) {
                return end;
            }
        }
        log::info!("Key input closed");
        SessionEnd::Cancelled
    }

    fn handle_screen_key(&mut self, key: Key) {
        match (self.screen, key) {
            (Screen::RomSelect, Key::Up) => {
                self.rom_selection.up();
                self.redraw();
            }
            (Screen::RomSelect, Key::Down) => {
                self.rom_selection.down();
                self.redraw();
            }
            (Screen::JiffyToggle, Key::Up) => {
                self.jiffy_selection.up();
                self.redraw();
            }
            (Screen::JiffyToggle, Key::Down) => {
                self.jiffy_selection.down();
                self.redraw();
            }
            (Screen::RomSelect, Key::Return) => self.switch_rom(),
            (Screen::JiffyToggle, Key::Return) => self.apply_jiffy(),
            (Screen::VdcInfo, Key::R) => {
                self.vdc_ram = None;
                self.renderer.invalidate_content();
                self.redraw();
            }
            (Screen::SidInfo, Key::R) => {
                self.sid_report = None;
                self.renderer.invalidate_content();
                self.redraw();
            }
            (Screen::SidInfo, Key::Num1) => self.play_sweep(1),
            (Screen::SidInfo, Key::Num2) => self.play_sweep(2),
            _ => log::debug!("{key:?} ignored on {:?}", self.screen),
        }
    }

    fn switch_to(&mut self, target: Screen) {
        if target == self.screen {
            return;
        }
        log::info!("Screen {:?} -> {target:?}", self.screen);
        self.screen = target;
        self.sid_report = None;
        self.vdc_ram = None;
        self.redraw();
    }

    /// Reconcile the display with the current state, probing hardware first
    /// if a diagnostic screen has no result yet.
    fn redraw(&mut self) {
        let Menu {
            config,
            renderer,
            screen,
            roms,
            rom_selection,
            jiffy,
            jiffy_selection,
            sid_report,
            vdc_ram,
            last_redraw,
            bus,
            console,
            ..
        } = self;

        let content = match *screen {
            Screen::RomSelect => Content::List {
                heading: ROM_HEADING,
                list: &*roms,
                selected: rom_selection.index(),
            },
            Screen::JiffyToggle => Content::List {
                heading: JIFFY_HEADING,
                list: &*jiffy,
                selected: jiffy_selection.index(),
            },
            Screen::Info => Content::Info {
                rom_count: roms.len(),
            },
            Screen::VdcInfo => Content::Vdc(*vdc_ram.get_or_insert_with(|| {
                let ram = detect_vdc_ram(&mut *bus);
                log::info!("VDC RAM: {} KB", ram.kilobytes());
                ram
            })),
            Screen::SidInfo => Content::Sid(
                &*sid_report
                    .get_or_insert_with(|| SidReport::probe(&mut *bus, &config.sid_calibration)),
            ),
        };

        *last_redraw = Some(renderer.render(console, *screen, content));
    }

    /// Show `message` on the status line while `pulses` go out, then clear it.
    fn transient(&mut self, message: &str, pulses: u32) {
        self.renderer.show_status(&mut self.console, message);
        self.config.link.send(&mut self.bus, &mut self.delay, pulses);
        self.delay.delay_ms(self.config.status_duration_ms);
        self.renderer.clear_status(&mut self.console);
    }

    fn switch_rom(&mut self) {
        let index = self.rom_selection.index();
        let message = format!("Switching to {}...", self.roms.label(index));
        let pulses = self.config.commands.rom(index);
        log::info!("ROM bank #{} requested ({pulses} pulses)", index + 1);
        self.transient(&message, pulses);
    }

    fn apply_jiffy(&mut self) {
        let enable = self.jiffy_selection.index() == 0;
        let commands = self.config.commands;
        let (message, code) = if enable {
            ("JiffyDOS enabled", commands.jiffy_on)
        } else {
            ("JiffyDOS disabled", commands.jiffy_off)
        };
        log::info!("{message} ({code} pulses)");
        self.transient(message, code as u32);
    }

    fn play_sweep(&mut self, chip: u8) {
        let Some(base) = self.sid_report.and_then(|report| report.sweep_target(chip)) else {
            log::debug!("No SID {chip} to play on");
            return;
        };
        let Menu {
            renderer,
            console,
            bus,
            delay,
            ..
        } = self;
        renderer.show_sweep_playing(console, chip);
        play_filter_sweep(bus, delay, base, |stage| {
            renderer.show_sweep_stage(console, stage)
        });
        renderer.clear_sweep_playing(console, chip);
    }
}
