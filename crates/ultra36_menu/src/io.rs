//! Register-level access to the C128 I/O space.
//!
//! Everything above this module talks to hardware through [`Bus`]; the only
//! busy-wait in the crate lives in [`VdcPort`].

/// VIC-II control register 1 (bit 4 = display enable).
pub const VIC_CONTROL1: u16 = 0xD011;
/// VIC-II border colour.
pub const VIC_BORDER: u16 = 0xD020;

/// VDC address/status port. Writes select a register, reads return status.
pub const VDC_ADDRESS: u16 = 0xD600;
/// VDC data port for the selected register.
pub const VDC_DATA: u16 = 0xD601;
/// Status bit set once the VDC has latched the selected register.
pub const VDC_READY: u8 = 0x80;

/// VDC internal registers used by the menu.
pub const VDC_REG_ADDRESS_HI: u8 = 18;
pub const VDC_REG_ADDRESS_LO: u8 = 19;
pub const VDC_REG_MEMORY_MODE: u8 = 28;
pub const VDC_REG_DATA: u8 = 31;

/// KERNAL zero-page byte holding the last usable screen column (39 or 79).
pub const KERNAL_SCREEN_COLUMNS: u16 = 0x00EE;

/// Byte-wide access to the memory-mapped I/O space, one PEEK or POKE per
/// call.
///
/// Implementations are not expected to be reentrant; the menu is the only
/// caller and it is single-threaded.
pub trait Bus {
    fn read8(&mut self, addr: u16) -> u8;
    fn write8(&mut self, addr: u16, value: u8);
}

impl<B: Bus + ?Sized> Bus for &mut B {
    fn read8(&mut self, addr: u16) -> u8 {
        (**self).read8(addr)
    }

    fn write8(&mut self, addr: u16, value: u8) {
        (**self).write8(addr, value)
    }
}

/// Blocking delay source.
pub trait Delay {
    fn delay_us(&mut self, us: u32);

    fn delay_ms(&mut self, ms: u32) {
        for _ in 0..ms {
            self.delay_us(1_000);
        }
    }
}

impl<D: Delay + ?Sized> Delay for &mut D {
    fn delay_us(&mut self, us: u32) {
        (**self).delay_us(us)
    }

    fn delay_ms(&mut self, ms: u32) {
        (**self).delay_ms(ms)
    }
}

/// Handshaked access to the VDC's internal registers through
/// `$D600`/`$D601`.
///
/// Every access writes the register number, then polls the status port
/// until [`VDC_READY`] is set. There is no timeout: a missing or wedged VDC
/// stalls the caller forever. The target has no watchdog to recover with,
/// so this is a known hang rather than an error path.
pub struct VdcPort<'a, B: Bus + ?Sized> {
    bus: &'a mut B,
}

impl<'a, B: Bus + ?Sized> VdcPort<'a, B> {
    pub fn new(bus: &'a mut B) -> Self {
        Self { bus }
    }

    fn select(&mut self, reg: u8) {
        self.bus.write8(VDC_ADDRESS, reg);
        while self.bus.read8(VDC_ADDRESS) & VDC_READY == 0 {
            core::hint::spin_loop();
        }
    }

    pub fn write_register(&mut self, reg: u8, value: u8) {
        self.select(reg);
        self.bus.write8(VDC_DATA, value);
    }

    pub fn read_register(&mut self, reg: u8) -> u8 {
        self.select(reg);
        self.bus.read8(VDC_DATA)
    }

    fn set_address(&mut self, addr: u16) {
        self.write_register(VDC_REG_ADDRESS_HI, (addr >> 8) as u8);
        self.write_register(VDC_REG_ADDRESS_LO, addr as u8);
    }

    /// Store one byte of VDC RAM.
    pub fn write_ram(&mut self, addr: u16, value: u8) {
        self.set_address(addr);
        self.write_register(VDC_REG_DATA, value);
    }

    /// Fetch one byte of VDC RAM.
    pub fn read_ram(&mut self, addr: u16) -> u8 {
        self.set_address(addr);
        self.read_register(VDC_REG_DATA)
    }
}
