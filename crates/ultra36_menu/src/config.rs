use std::path::Path;

use anyhow::{bail, Context, Result};
use typed_builder::TypedBuilder;

use crate::layout::max_list_len;
use crate::probe::SidCalibration;
use crate::signal::CommandLink;

pub const PRODUCT_NAME: &str = "Ultra-36 ROM Menu";
pub const VERSION: &str = concat!("v", env!("CARGO_PKG_VERSION"));

/// Bank names used when no list is supplied.
pub const DEFAULT_ROM_NAMES: [&str; 7] = [
    "Stock C128 KERNAL",
    "JiffyDOS 128",
    "Action Replay",
    "Final Cartridge III",
    "Epyx Fast Load",
    "Super Snapshot",
    "Diagnostic ROM",
];

/// Pulse counts understood by the switcher's microcontroller.
///
/// Counts below `rom_offset` are reserved for feature commands; ROM bank `i`
/// is selected with `i + rom_offset` pulses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandCodes {
    pub jiffy_on: u8,
    pub jiffy_off: u8,
    pub rom_offset: u8,
}

impl Default for CommandCodes {
    fn default() -> Self {
        Self {
            jiffy_on: 1,
            jiffy_off: 2,
            rom_offset: 3,
        }
    }
}

impl CommandCodes {
    pub fn rom(&self, index: usize) -> u32 {
        index as u32 + self.rom_offset as u32
    }
}

#[derive(Debug, Clone, TypedBuilder)]
pub struct MenuConfig {
    #[builder(default = DEFAULT_ROM_NAMES.iter().map(|s| s.to_string()).collect::<Vec<_>>())]
    pub rom_names: Vec<String>,
    #[builder(default)]
    pub commands: CommandCodes,
    #[builder(default)]
    pub link: CommandLink,
    #[builder(default)]
    pub sid_calibration: SidCalibration,
    /// How long transient status messages stay up.
    #[builder(default = 1_500)]
    pub status_duration_ms: u32,
}

impl Default for MenuConfig {
    fn default() -> Self {
        MenuConfig::builder().build()
    }
}

impl MenuConfig {
    pub fn validate(&self) -> Result<()> {
        if self.rom_names.is_empty() {
            bail!("at least one ROM bank name is required");
        }
        if self.rom_names.len() > max_list_len() {
            bail!(
                "{} ROM banks configured, the menu has room for {}",
                self.rom_names.len(),
                max_list_len()
            );
        }
        if let Some(index) = self.rom_names.iter().position(|name| name.trim().is_empty()) {
            bail!("ROM bank #{} has an empty name", index + 1);
        }
        let CommandCodes {
            jiffy_on,
            jiffy_off,
            rom_offset,
        } = self.commands;
        if jiffy_on == 0 || jiffy_off == 0 || jiffy_on == jiffy_off {
            bail!("JiffyDOS commands must be distinct non-zero pulse counts");
        }
        if jiffy_on >= rom_offset || jiffy_off >= rom_offset {
            bail!("ROM offset {rom_offset} overlaps the JiffyDOS commands");
        }
        let calibration = &self.sid_calibration;
        if calibration.model_6581_min >= calibration.model_8580_min {
            bail!(
                "SID thresholds out of order: 6581 minimum {:#04X} >= 8580 minimum {:#04X}",
                calibration.model_6581_min,
                calibration.model_8580_min
            );
        }
        if calibration.sample_count == 0 {
            bail!("SID probe needs at least one OSC3 sample");
        }
        Ok(())
    }
}

/// Read ROM bank names from a text file, one per line. Blank lines and lines
/// starting with `#` are skipped.
pub fn load_rom_names(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read ROM list '{}'", path.display()))?;
    let names: Vec<String> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect();
    if names.is_empty() {
        bail!("ROM list '{}' has no entries", path.display());
    }
    log::info!("Loaded {} ROM names from '{}'", names.len(), path.display());
    Ok(names)
}
