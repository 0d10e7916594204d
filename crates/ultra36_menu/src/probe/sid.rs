//! SID presence and model detection.

use bitflags::bitflags;

use crate::io::{Bus, VIC_CONTROL1};

/// Base address of the on-board SID.
pub const SID1_BASE: u16 = 0xD400;
/// Second SID as mapped by MSSIAH / Prophet64 cartridges (IO1, pin 7).
pub const SID2_MSSIAH: u16 = 0xDE00;
/// Second SID as mapped by Cynthcart (IO2, pin 10).
pub const SID2_CYNTHCART: u16 = 0xDF00;

/// Candidate addresses for a second chip, in priority order.
pub const SID2_CANDIDATES: [u16; 2] = [SID2_MSSIAH, SID2_CYNTHCART];

/// Number of write registers (`$00..=$18`).
pub const REGISTER_COUNT: u8 = 25;

/// Register offsets from the chip base.
pub mod reg {
    pub const V1_FREQ_LO: u8 = 0x00;
    pub const V1_FREQ_HI: u8 = 0x01;
    pub const V1_PW_LO: u8 = 0x02;
    pub const V1_PW_HI: u8 = 0x03;
    pub const V1_CONTROL: u8 = 0x04;
    pub const V1_ATTACK_DECAY: u8 = 0x05;
    pub const V1_SUSTAIN_RELEASE: u8 = 0x06;
    pub const V3_FREQ_LO: u8 = 0x0E;
    pub const V3_FREQ_HI: u8 = 0x0F;
    pub const V3_CONTROL: u8 = 0x12;
    pub const FILTER_CUTOFF_LO: u8 = 0x15;
    pub const FILTER_CUTOFF_HI: u8 = 0x16;
    pub const RESONANCE_ROUTING: u8 = 0x17;
    pub const MODE_VOLUME: u8 = 0x18;
    pub const OSC3_OUTPUT: u8 = 0x1B;
}

bitflags! {
    /// Voice control register bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct VoiceControl: u8 {
        const GATE = 0x01;
        const SYNC = 0x02;
        const RING = 0x04;
        const TEST = 0x08;
        const TRIANGLE = 0x10;
        const SAWTOOTH = 0x20;
        const PULSE = 0x40;
        const NOISE = 0x80;
    }
}

bitflags! {
    /// Upper nibble of the mode/volume register.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FilterMode: u8 {
        const LOW_PASS = 0x10;
        const BAND_PASS = 0x20;
        const HIGH_PASS = 0x40;
        const VOICE3_OFF = 0x80;
    }
}

/// Volume pattern written and read back by the presence test.
const PRESENCE_PATTERN: u8 = 0x0F;
/// VIC control-1 bit that enables the display.
const DISPLAY_ENABLE: u8 = 0x10;

/// Outcome of probing one SID address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SidModel {
    Absent,
    Mos6581,
    Mos8580,
    /// Something answers the presence test but OSC3 stays near zero.
    Unknown,
}

impl SidModel {
    pub fn is_present(self) -> bool {
        self != SidModel::Absent
    }

    /// True for the two models the classifier can name.
    pub fn is_identified(self) -> bool {
        matches!(self, SidModel::Mos6581 | SidModel::Mos8580)
    }

    pub fn name(self) -> &'static str {
        match self {
            SidModel::Absent => "Not detected",
            SidModel::Mos6581 => "MOS 6581",
            SidModel::Mos8580 => "MOS 8580",
            SidModel::Unknown => "Unknown",
        }
    }
}

/// Calibration for the OSC3 model heuristic.
///
/// The classifier keeps the highest OSC3 sample seen while voice 3 runs a
/// combined triangle+sawtooth waveform. The 8580 renders combined waveforms
/// at close to full scale while the 6581 produces a weaker, noisier output,
/// so a higher peak means a cleaner (newer) chip. The default thresholds
/// were tuned on real machines and vary between boards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SidCalibration {
    /// Peaks at or above this classify as an 8580.
    pub model_8580_min: u8,
    /// Peaks at or above this (and below `model_8580_min`) classify as a 6581.
    pub model_6581_min: u8,
    /// How many OSC3 samples to take.
    pub sample_count: u16,
    /// Voice 3 frequency while sampling.
    pub osc3_frequency: u16,
    /// Voice 3 control value while sampling.
    pub osc3_waveform: VoiceControl,
    /// Blank the VIC display while sampling to keep badlines out of the way.
    pub blank_screen: bool,
}

impl Default for SidCalibration {
    fn default() -> Self {
        Self {
            model_8580_min: 0x80,
            model_6581_min: 0x20,
            sample_count: 256,
            osc3_frequency: 0xFFFF,
            osc3_waveform: VoiceControl::TRIANGLE | VoiceControl::SAWTOOTH | VoiceControl::GATE,
            blank_screen: true,
        }
    }
}

/// Map an OSC3 peak onto a model using the calibration bands.
pub fn classify(peak: u8, calibration: &SidCalibration) -> SidModel {
    if peak >= calibration.model_8580_min {
        SidModel::Mos8580
    } else if peak >= calibration.model_6581_min {
        SidModel::Mos6581
    } else {
        SidModel::Unknown
    }
}

/// Exclusive handle on one SID's register window.
///
/// All write registers are zeroed when the handle is acquired and again when
/// it is dropped, so the chip is silent on every way out of a probe or demo.
pub struct SidChip<'a, B: Bus + ?Sized> {
    bus: &'a mut B,
    base: u16,
}

impl<'a, B: Bus + ?Sized> SidChip<'a, B> {
    pub fn acquire(bus: &'a mut B, base: u16) -> Self {
        let mut chip = Self { bus, base };
        chip.silence();
        chip
    }

    pub fn write(&mut self, reg: u8, value: u8) {
        self.bus.write8(self.base + reg as u16, value);
    }

    pub fn read(&mut self, reg: u8) -> u8 {
        self.bus.read8(self.base + reg as u16)
    }

    pub fn set_voice_control(&mut self, reg: u8, control: VoiceControl) {
        self.write(reg, control.bits());
    }

    pub fn silence(&mut self) {
        for reg in 0..REGISTER_COUNT {
            self.write(reg, 0x00);
        }
    }

    /// The underlying bus, for touching other chips mid-probe.
    pub fn bus_mut(&mut self) -> &mut B {
        &mut *self.bus
    }
}

impl<B: Bus + ?Sized> Drop for SidChip<'_, B> {
    fn drop(&mut self) {
        self.silence();
    }
}

/// Probe the SID at `base` and classify it.
pub fn detect_sid_model<B: Bus + ?Sized>(
    bus: &mut B,
    base: u16,
    calibration: &SidCalibration,
) -> SidModel {
    let mut chip = SidChip::acquire(bus, base);

    chip.write(reg::MODE_VOLUME, PRESENCE_PATTERN);
    let readback = chip.read(reg::MODE_VOLUME) & 0x0F;
    if readback != PRESENCE_PATTERN {
        log::debug!("SID ${base:04X}: volume readback {readback:#04X}, treating as absent");
        return SidModel::Absent;
    }

    let saved_control = if calibration.blank_screen {
        let value = chip.bus_mut().read8(VIC_CONTROL1);
        chip.bus_mut().write8(VIC_CONTROL1, value & !DISPLAY_ENABLE);
        Some(value)
    } else {
        None
    };

    let [freq_lo, freq_hi] = calibration.osc3_frequency.to_le_bytes();
    chip.write(reg::V3_FREQ_LO, freq_lo);
    chip.write(reg::V3_FREQ_HI, freq_hi);
    chip.set_voice_control(reg::V3_CONTROL, calibration.osc3_waveform);

    let mut peak = 0u8;
    for _ in 0..calibration.sample_count {
        peak = peak.max(chip.read(reg::OSC3_OUTPUT));
    }

    chip.set_voice_control(
        reg::V3_CONTROL,
        calibration.osc3_waveform - VoiceControl::GATE,
    );

    if let Some(value) = saved_control {
        chip.bus_mut().write8(VIC_CONTROL1, value);
    }

    let model = classify(peak, calibration);
    if model == SidModel::Unknown {
        log::warn!("SID ${base:04X}: answers but OSC3 peaked at {peak:#04X}");
    } else {
        log::debug!("SID ${base:04X}: OSC3 peak {peak:#04X} -> {model:?}");
    }
    model
}

/// Where a second chip was found, and what it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SidSlot {
    pub base: u16,
    pub model: SidModel,
}

/// Look for a second SID, trying `$DE00` before `$DF00`.
///
/// The first address where something answers the presence test wins, even
/// if its model cannot be named.
pub fn detect_second_sid<B: Bus + ?Sized>(
    bus: &mut B,
    calibration: &SidCalibration,
) -> Option<SidSlot> {
    SID2_CANDIDATES.iter().find_map(|&base| {
        let model = detect_sid_model(&mut *bus, base, calibration);
        model.is_present().then_some(SidSlot { base, model })
    })
}
