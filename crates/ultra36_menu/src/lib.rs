//! Boot-time ROM selection menu for the Ultra-36 C128 ROM switcher.
//!
//! The menu talks to hardware only through [`io::Bus`], [`io::Delay`] and
//! [`console::Console`], so the same code drives a real machine, the
//! simulated one in [`sim`], or a test bench.

pub mod app;
pub mod config;
pub mod console;
pub mod io;
pub mod layout;
pub mod list;
pub mod menu;
pub mod playback;
pub mod probe;
pub mod render;
pub mod screen;
pub mod signal;
pub mod sim;
pub mod sweep;

pub use app::MenuApp;
pub use config::{load_rom_names, CommandCodes, MenuConfig};
pub use console::{Console, TextBuffer};
pub use io::{Bus, Delay};
pub use layout::ScreenWidth;
pub use menu::{KeySource, Menu, SessionEnd};
pub use playback::{Playback, Shared};
pub use probe::{SidModel, VdcRam};
pub use screen::Screen;
pub use signal::CommandLink;
pub use sim::{ScriptedKeys, SimBus, SimConfig};
