//! Pulse-count command channel to the switcher's microcontroller.
//!
//! A command is nothing but a number of strobes on one line. There is no
//! payload, no acknowledgement and no retry; the controller counts pulses
//! and acts once the line goes quiet.

use ultra36_common::TextColor;

use crate::io::{Bus, Delay, VIC_BORDER};

/// Strobe timing and wiring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandLink {
    /// Address whose write strobe the controller watches.
    pub strobe_addr: u16,
    /// Value written for each pulse. The controller ignores it.
    pub strobe_value: u8,
    /// How long each pulse is held (border flash included).
    pub pulse_width_ms: u32,
    /// Quiet time between consecutive pulses.
    pub pulse_spacing_ms: u32,
    /// Border colour shown while a pulse is asserted.
    pub flash_color: TextColor,
}

impl Default for CommandLink {
    fn default() -> Self {
        Self {
            strobe_addr: 0xD7FF,
            strobe_value: 0x00,
            pulse_width_ms: 20,
            pulse_spacing_ms: 60,
            flash_color: TextColor::White,
        }
    }
}

impl CommandLink {
    /// Emit `count` pulses, flashing the border on each one.
    pub fn send<B, D>(&self, bus: &mut B, delay: &mut D, count: u32)
    where
        B: Bus + ?Sized,
        D: Delay + ?Sized,
    {
        let border = bus.read8(VIC_BORDER);
        for pulse in 0..count {
            bus.write8(VIC_BORDER, self.flash_color.code());
            bus.write8(self.strobe_addr, self.strobe_value);
            delay.delay_ms(self.pulse_width_ms);
            bus.write8(VIC_BORDER, border);
            if pulse + 1 < count {
                delay.delay_ms(self.pulse_spacing_ms);
            }
        }
        log::info!("Sent {count} pulse(s) on ${:04X}", self.strobe_addr);
    }
}
