//! VDC RAM size detection.

use crate::io::{Bus, VdcPort, VDC_REG_MEMORY_MODE};

/// Memory-mode bit selecting 64 KB (4164) addressing.
pub const MODE_64K: u8 = 0x10;

/// Probe addresses. With 16 KB fitted the VDC ignores A14/A15, so `$9FFF`
/// lands on `$1FFF`.
const LOW_PROBE: u16 = 0x1FFF;
const HIGH_PROBE: u16 = 0x9FFF;
const LOW_SENTINEL: u8 = 0x00;
const HIGH_SENTINEL: u8 = 0xFF;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VdcRam {
    Kb16,
    Kb64,
}

impl VdcRam {
    pub fn kilobytes(self) -> u32 {
        match self {
            VdcRam::Kb16 => 16,
            VdcRam::Kb64 => 64,
        }
    }
}

/// Holds the memory-mode register for the duration of a probe and puts the
/// saved value back when dropped.
struct MemoryModeGuard<'a, B: Bus + ?Sized> {
    port: VdcPort<'a, B>,
    saved: u8,
}

impl<'a, B: Bus + ?Sized> MemoryModeGuard<'a, B> {
    fn force_64k(bus: &'a mut B) -> Self {
        let mut port = VdcPort::new(bus);
        let saved = port.read_register(VDC_REG_MEMORY_MODE);
        port.write_register(VDC_REG_MEMORY_MODE, saved | MODE_64K);
        Self { port, saved }
    }
}

impl<B: Bus + ?Sized> Drop for MemoryModeGuard<'_, B> {
    fn drop(&mut self) {
        self.port.write_register(VDC_REG_MEMORY_MODE, self.saved);
    }
}

/// Size the VDC's RAM by checking whether `$9FFF` aliases onto `$1FFF`.
pub fn detect_vdc_ram<B: Bus + ?Sized>(bus: &mut B) -> VdcRam {
    let mut guard = MemoryModeGuard::force_64k(bus);
    let port = &mut guard.port;

    port.write_ram(LOW_PROBE, LOW_SENTINEL);
    port.write_ram(HIGH_PROBE, HIGH_SENTINEL);
    let readback = port.read_ram(LOW_PROBE);

    let ram = if readback == LOW_SENTINEL {
        VdcRam::Kb64
    } else {
        VdcRam::Kb16
    };
    log::debug!("VDC ${LOW_PROBE:04X} read back {readback:#04X} -> {ram:?}");
    ram
}
