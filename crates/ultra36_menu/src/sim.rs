//! Host-side stand-in for the parts of the C128 the menu touches.
//!
//! [`SimBus`] models the SIDs, the VDC register window, the VIC border and
//! control registers, the KERNAL screen-width byte and the strobe line well
//! enough for the probes and the menu to behave as they do on a real machine.

use std::collections::VecDeque;

use anyhow::{bail, Result};
use ultra36_common::{Key, TextColor};

use crate::io::{
    Bus, Delay, KERNAL_SCREEN_COLUMNS, VDC_ADDRESS, VDC_DATA, VDC_READY, VDC_REG_ADDRESS_HI,
    VDC_REG_ADDRESS_LO, VDC_REG_DATA, VDC_REG_MEMORY_MODE, VIC_BORDER, VIC_CONTROL1,
};
use crate::layout::ScreenWidth;
use crate::menu::KeySource;
use crate::probe::sid::{reg, SID1_BASE, SID2_CYNTHCART, SID2_MSSIAH};
use crate::probe::vdc::MODE_64K;
use crate::probe::{SidModel, VdcRam};
use crate::signal::CommandLink;

const MEMORY_SIZE: usize = 0x10000;

/// Address decode width of one SID (registers mirror every 32 bytes).
const SID_WINDOW: u16 = 0x20;
const VDC_REGISTER_COUNT: usize = 37;
/// Memory-mode value the KERNAL leaves behind at power-up.
const VDC_POWER_ON_MODE: u8 = 0x47;
/// VIC control-1 after the KERNAL's screen init (display on, 25 rows).
const VIC_POWER_ON_CONTROL: u8 = 0x1B;

/// Highest OSC3 reading each model produces with a combined waveform.
fn osc3_peak(model: SidModel) -> u8 {
    match model {
        SidModel::Absent => 0x00,
        SidModel::Mos6581 => 0x3C,
        SidModel::Mos8580 => 0xF0,
        SidModel::Unknown => 0x08,
    }
}

/// What is fitted to the simulated machine.
#[derive(Clone, Copy, Debug)]
pub struct SimConfig {
    pub width: ScreenWidth,
    pub vdc_ram: VdcRam,
    pub sid1: SidModel,
    pub sid_de00: SidModel,
    pub sid_df00: SidModel,
    pub strobe_addr: u16,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            width: ScreenWidth::Forty,
            vdc_ram: VdcRam::Kb64,
            sid1: SidModel::Mos8580,
            sid_de00: SidModel::Absent,
            sid_df00: SidModel::Absent,
            strobe_addr: CommandLink::default().strobe_addr,
        }
    }
}

/// One SID register file with a free-running oscillator 3.
struct SimSid {
    base: u16,
    model: SidModel,
    regs: [u8; SID_WINDOW as usize],
    phase: u16,
}

impl SimSid {
    fn new(base: u16, model: SidModel) -> Self {
        Self {
            base,
            model,
            regs: [0; SID_WINDOW as usize],
            phase: 0,
        }
    }

    fn read(&mut self, offset: u8) -> u8 {
        if offset == reg::OSC3_OUTPUT {
            // A stopped oscillator or one without a waveform selected holds
            // its output at zero.
            if self.regs[reg::V3_CONTROL as usize] & 0xF0 == 0 {
                return 0;
            }
            let span = osc3_peak(self.model) as u16 + 1;
            self.phase = self.phase.wrapping_add(1);
            (self.phase % span) as u8
        } else {
            self.regs[offset as usize]
        }
    }

    fn write(&mut self, offset: u8, value: u8) {
        self.regs[offset as usize] = value;
    }
}

/// VDC register file plus its private RAM.
struct SimVdc {
    regs: [u8; VDC_REGISTER_COUNT],
    ram: Vec<u8>,
    fitted: VdcRam,
    selected: u8,
}

impl SimVdc {
    fn new(fitted: VdcRam) -> Self {
        let mut regs = [0; VDC_REGISTER_COUNT];
        regs[VDC_REG_MEMORY_MODE as usize] = VDC_POWER_ON_MODE;
        Self {
            regs,
            ram: vec![0; MEMORY_SIZE],
            fitted,
            selected: 0,
        }
    }

    fn update_address(&self) -> u16 {
        u16::from_be_bytes([
            self.regs[VDC_REG_ADDRESS_HI as usize],
            self.regs[VDC_REG_ADDRESS_LO as usize],
        ])
    }

    /// With 16 KB chips, or with 64 KB chips addressed as 16 KB, the top two
    /// address lines are ignored.
    fn ram_index(&self) -> usize {
        let addr = self.update_address();
        let wide = self.regs[VDC_REG_MEMORY_MODE as usize] & MODE_64K != 0;
        if self.fitted == VdcRam::Kb64 && wide {
            addr as usize
        } else {
            (addr & 0x3FFF) as usize
        }
    }

    /// The update address advances after every data access.
    fn advance(&mut self) {
        let [hi, lo] = self.update_address().wrapping_add(1).to_be_bytes();
        self.regs[VDC_REG_ADDRESS_HI as usize] = hi;
        self.regs[VDC_REG_ADDRESS_LO as usize] = lo;
    }

    fn read_data(&mut self) -> u8 {
        match self.selected {
            VDC_REG_DATA => {
                let value = self.ram[self.ram_index()];
                self.advance();
                value
            }
            index if (index as usize) < VDC_REGISTER_COUNT => self.regs[index as usize],
            _ => 0xFF,
        }
    }

    fn write_data(&mut self, value: u8) {
        match self.selected {
            VDC_REG_DATA => {
                let index = self.ram_index();
                self.ram[index] = value;
                self.advance();
            }
            index if (index as usize) < VDC_REGISTER_COUNT => self.regs[index as usize] = value,
            _ => {}
        }
    }
}

/// Simulated C128 I/O space.
pub struct SimBus {
    memory: Vec<u8>,
    sids: Vec<SimSid>,
    vdc: SimVdc,
    strobe_addr: u16,
    pulses: u32,
}

impl Default for SimBus {
    fn default() -> Self {
        Self::new(SimConfig::default())
    }
}

impl SimBus {
    pub fn new(config: SimConfig) -> Self {
        let mut memory = vec![0; MEMORY_SIZE];
        memory[KERNAL_SCREEN_COLUMNS as usize] = config.width.columns() - 1;
        memory[VIC_CONTROL1 as usize] = VIC_POWER_ON_CONTROL;
        memory[VIC_BORDER as usize] = TextColor::LightBlue.code();

        let sids = [
            (SID1_BASE, config.sid1),
            (SID2_MSSIAH, config.sid_de00),
            (SID2_CYNTHCART, config.sid_df00),
        ]
        .into_iter()
        .filter(|(_, model)| model.is_present())
        .map(|(base, model)| SimSid::new(base, model))
        .collect();

        Self {
            memory,
            sids,
            vdc: SimVdc::new(config.vdc_ram),
            strobe_addr: config.strobe_addr,
            pulses: 0,
        }
    }

    /// Strobe pulses seen since the last call.
    pub fn take_pulses(&mut self) -> u32 {
        std::mem::take(&mut self.pulses)
    }

    pub fn pulses(&self) -> u32 {
        self.pulses
    }

    pub fn border(&self) -> TextColor {
        TextColor::from_code(self.memory[VIC_BORDER as usize])
    }

    pub fn vic_control(&self) -> u8 {
        self.memory[VIC_CONTROL1 as usize]
    }

    pub fn vdc_register(&self, reg: u8) -> u8 {
        self.vdc.regs[reg as usize]
    }

    /// True if every write register of the chip at `base` is zero. Empty
    /// sockets count as silent.
    pub fn sid_silent(&self, base: u16) -> bool {
        self.sids
            .iter()
            .find(|sid| sid.base == base)
            .map_or(true, |sid| sid.regs[..=reg::MODE_VOLUME as usize].iter().all(|&r| r == 0))
    }

    fn sid_at(&mut self, addr: u16) -> Option<(&mut SimSid, u8)> {
        self.sids
            .iter_mut()
            .find(|sid| (sid.base..sid.base + SID_WINDOW).contains(&addr))
            .map(|sid| {
                let offset = (addr - sid.base) as u8;
                (sid, offset)
            })
    }

    fn in_sid_socket(addr: u16) -> bool {
        [SID1_BASE, SID2_MSSIAH, SID2_CYNTHCART]
            .iter()
            .any(|&base| (base..base + SID_WINDOW).contains(&addr))
    }
}

impl Bus for SimBus {
    fn read8(&mut self, addr: u16) -> u8 {
        if let Some((sid, offset)) = self.sid_at(addr) {
            return sid.read(offset);
        }
        match addr {
            // Empty sockets float low.
            _ if Self::in_sid_socket(addr) => 0x00,
            VDC_ADDRESS => VDC_READY,
            VDC_DATA => self.vdc.read_data(),
            _ => self.memory[addr as usize],
        }
    }

    fn write8(&mut self, addr: u16, value: u8) {
        if let Some((sid, offset)) = self.sid_at(addr) {
            sid.write(offset, value);
            return;
        }
        match addr {
            _ if Self::in_sid_socket(addr) => {}
            VDC_ADDRESS => self.vdc.selected = value,
            VDC_DATA => self.vdc.write_data(value),
            _ => {
                if addr == self.strobe_addr {
                    self.pulses += 1;
                }
                self.memory[addr as usize] = value;
            }
        }
    }
}

/// Delay that only adds up the time it was asked to wait.
#[derive(Debug, Default, Clone, Copy)]
pub struct RecordingDelay {
    total_us: u64,
}

impl RecordingDelay {
    pub fn total_us(&self) -> u64 {
        self.total_us
    }

    pub fn total_ms(&self) -> u64 {
        self.total_us / 1_000
    }
}

impl Delay for RecordingDelay {
    fn delay_us(&mut self, us: u32) {
        self.total_us += us as u64;
    }

    fn delay_ms(&mut self, ms: u32) {
        self.total_us += ms as u64 * 1_000;
    }
}

/// Key source that replays a fixed sequence and then reports end of input.
#[derive(Debug, Default, Clone)]
pub struct ScriptedKeys {
    keys: VecDeque<Key>,
}

impl ScriptedKeys {
    pub fn new(keys: impl IntoIterator<Item = Key>) -> Self {
        Self {
            keys: keys.into_iter().collect(),
        }
    }

    /// Parse a comma or whitespace separated list of key names, e.g.
    /// `"down,down,return"`.
    pub fn parse(script: &str) -> Result<Self> {
        let mut keys = VecDeque::new();
        for name in script
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|name| !name.is_empty())
        {
            let Some(key) = Key::from_name(name) else {
                bail!("unknown key '{name}' in key script");
            };
            keys.push_back(key);
        }
        Ok(Self { keys })
    }

    pub fn remaining(&self) -> usize {
        self.keys.len()
    }
}

impl KeySource for ScriptedKeys {
    fn next_key(&mut self) -> Option<Key> {
        self.keys.pop_front()
    }
}
