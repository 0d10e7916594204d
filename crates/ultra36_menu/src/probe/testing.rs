use crate::io::Bus;

use super::sid::{reg, REGISTER_COUNT, SID1_BASE, SID2_CYNTHCART, SID2_MSSIAH};

const SID_WINDOW: u16 = 0x20;

/// I/O space with SIDs fitted at chosen addresses, each returning a fixed
/// OSC3 value. Empty SID windows read back as zero.
pub(crate) struct SidBench {
    memory: Vec<u8>,
    chips: Vec<(u16, u8)>,
    writes: Vec<(u16, u8)>,
}

impl SidBench {
    pub fn new() -> Self {
        Self {
            memory: vec![0; 0x10000],
            chips: Vec::new(),
            writes: Vec::new(),
        }
    }

    pub fn with_chip(mut self, base: u16, osc3: u8) -> Self {
        self.chips.push((base, osc3));
        self
    }

    pub fn set_osc3(&mut self, base: u16, osc3: u8) {
        for chip in self.chips.iter_mut().filter(|(b, _)| *b == base) {
            chip.1 = osc3;
        }
    }

    pub fn fill_registers(&mut self, base: u16, value: u8) {
        for offset in 0..REGISTER_COUNT as u16 {
            self.memory[(base + offset) as usize] = value;
        }
    }

    pub fn registers_zeroed(&self, base: u16) -> bool {
        (0..REGISTER_COUNT as u16).all(|offset| self.memory[(base + offset) as usize] == 0)
    }

    pub fn poke(&mut self, addr: u16, value: u8) {
        self.memory[addr as usize] = value;
    }

    pub fn peek(&self, addr: u16) -> u8 {
        self.memory[addr as usize]
    }

    pub fn writes_to(&self, addr: u16) -> Vec<u8> {
        self.writes
            .iter()
            .filter(|(a, _)| *a == addr)
            .map(|(_, v)| *v)
            .collect()
    }

    fn window(addr: u16) -> Option<u16> {
        [SID1_BASE, SID2_MSSIAH, SID2_CYNTHCART]
            .into_iter()
            .find(|&base| (base..base + SID_WINDOW).contains(&addr))
    }
}

impl Bus for SidBench {
    fn read8(&mut self, addr: u16) -> u8 {
        let Some(base) = Self::window(addr) else {
            return self.memory[addr as usize];
        };
        match self.chips.iter().find(|(b, _)| *b == base) {
            Some(&(_, osc3)) if addr - base == reg::OSC3_OUTPUT as u16 => osc3,
            Some(_) => self.memory[addr as usize],
            None => 0x00,
        }
    }

    fn write8(&mut self, addr: u16, value: u8) {
        self.writes.push((addr, value));
        self.memory[addr as usize] = value;
    }
}
