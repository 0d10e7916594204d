//! Hardware probes for the diagnostic screens.
//!
//! Probes never fail: ambiguous readings map onto explicit classifications
//! (`Absent`, `Unknown`) and every probe leaves the registers it touched as
//! it found them.

pub mod sid;
pub mod vdc;

#[cfg(test)]
pub(crate) mod testing;

use crate::io::Bus;

pub use sid::{detect_second_sid, detect_sid_model, SidCalibration, SidModel, SidSlot};
pub use vdc::{detect_vdc_ram, VdcRam};

/// Everything the SID screen shows about the fitted chips.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SidReport {
    pub primary: SidModel,
    pub secondary: Option<SidSlot>,
}

impl SidReport {
    pub fn probe<B: Bus + ?Sized>(bus: &mut B, calibration: &SidCalibration) -> Self {
        let primary = detect_sid_model(bus, sid::SID1_BASE, calibration);
        let secondary = detect_second_sid(bus, calibration);
        log::info!(
            "SID probe: primary {}, secondary {}",
            primary.name(),
            secondary.map_or_else(
                || "not detected".to_string(),
                |slot| format!("{} at ${:04X}", slot.model.name(), slot.base)
            )
        );
        Self { primary, secondary }
    }

    fn secondary_model(&self) -> SidModel {
        self.secondary.map_or(SidModel::Absent, |slot| slot.model)
    }

    /// Base address for the sweep demo on chip 1 or 2, if that chip answered.
    pub fn sweep_target(&self, chip: u8) -> Option<u16> {
        match chip {
            1 if self.primary.is_present() => Some(sid::SID1_BASE),
            2 => self.secondary.map(|slot| slot.base),
            _ => None,
        }
    }

    /// A remark about the chip pairing, if there is anything to say.
    pub fn comment(&self) -> Option<&'static str> {
        let first = self.primary;
        let second = self.secondary_model();
        if first.is_identified() && (second == SidModel::Absent || second == first) {
            Some(match first {
                SidModel::Mos6581 => "6581! You like noise?",
                _ => "8580! You like clean?",
            })
        } else if first.is_present() && second.is_present() && first != second {
            Some("Different SIDs? Someone was naughty!")
        } else {
            None
        }
    }
}
