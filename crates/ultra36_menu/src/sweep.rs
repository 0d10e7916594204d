//! Audible filter sweep used by the SID screen's test keys.

use crate::io::{Bus, Delay};
use crate::probe::sid::{reg, FilterMode, SidChip, VoiceControl};

/// Filter modes played in order, with their display names.
const FILTER_STAGES: [(FilterMode, &str); 4] = [
    (FilterMode::LOW_PASS, "Low-pass"),
    (FilterMode::BAND_PASS, "Band-pass"),
    (FilterMode::HIGH_PASS, "High-pass"),
    (FilterMode::LOW_PASS.union(FilterMode::HIGH_PASS), "LP+HP (Notch)"),
];

/// The cutoff register pair is 11 bits wide.
const CUTOFF_MAX: u16 = 0x800;
const CUTOFF_STEP: usize = 8;
const CUTOFF_STEP_US: u32 = 2_000;
const STAGE_PAUSE_MS: u32 = 250;

const RESONANCE_CUTOFF: u16 = 0x100;
const RESONANCE_HOLD_MS: u32 = 60;
const RESONANCE_GAP_MS: u32 = 15;

/// Resonance/routing value with voice 1 sent through the filter.
const FILTER_VOICE1: u8 = 0x01;
const MAX_VOLUME: u8 = 0x0F;

/// Progress notifications, in the order they occur.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepStage {
    Filter(&'static str),
    Resonance,
    Complete,
}

impl SweepStage {
    pub fn text(&self) -> String {
        match self {
            SweepStage::Filter(name) => format!("Filter: {name}"),
            SweepStage::Resonance => "Resonance demo...".to_string(),
            SweepStage::Complete => "Filter demo complete.".to_string(),
        }
    }
}

fn set_cutoff<B: Bus + ?Sized>(chip: &mut SidChip<'_, B>, cutoff: u16) {
    chip.write(reg::FILTER_CUTOFF_LO, (cutoff & 0x07) as u8);
    chip.write(reg::FILTER_CUTOFF_HI, (cutoff >> 3) as u8);
}

/// Play a sawtooth on voice 1 through each filter mode with a rising cutoff,
/// then step through the resonance levels. The chip is silenced afterwards.
pub fn play_filter_sweep<B, D, F>(bus: &mut B, delay: &mut D, base: u16, mut report: F)
where
    B: Bus + ?Sized,
    D: Delay + ?Sized,
    F: FnMut(SweepStage),
{
    log::info!("Filter sweep on SID ${base:04X}");
    let saw = VoiceControl::SAWTOOTH;
    let saw_gated = VoiceControl::SAWTOOTH | VoiceControl::GATE;

    {
        let mut chip = SidChip::acquire(bus, base);
        chip.write(reg::V1_FREQ_LO, 0x00);
        chip.write(reg::V1_FREQ_HI, 0x08);
        chip.write(reg::V1_PW_LO, 0x00);
        chip.write(reg::V1_PW_HI, 0x08);
        chip.write(reg::V1_ATTACK_DECAY, 0x00);
        chip.write(reg::V1_SUSTAIN_RELEASE, 0xF0);

        for (mode, name) in FILTER_STAGES {
            report(SweepStage::Filter(name));
            chip.set_voice_control(reg::V1_CONTROL, saw_gated);
            chip.write(reg::RESONANCE_ROUTING, 0x80 | FILTER_VOICE1);
            chip.write(reg::MODE_VOLUME, mode.bits() | MAX_VOLUME);

            for cutoff in (0..CUTOFF_MAX).step_by(CUTOFF_STEP) {
                set_cutoff(&mut chip, cutoff);
                delay.delay_us(CUTOFF_STEP_US);
            }

            chip.set_voice_control(reg::V1_CONTROL, saw);
            delay.delay_ms(STAGE_PAUSE_MS);
        }

        report(SweepStage::Resonance);
        set_cutoff(&mut chip, RESONANCE_CUTOFF);
        chip.write(reg::MODE_VOLUME, FilterMode::LOW_PASS.bits() | MAX_VOLUME);
        for level in 0..16u8 {
            chip.set_voice_control(reg::V1_CONTROL, saw_gated);
            chip.write(reg::RESONANCE_ROUTING, (level << 4) | FILTER_VOICE1);
            delay.delay_ms(RESONANCE_HOLD_MS);
            chip.set_voice_control(reg::V1_CONTROL, saw);
            delay.delay_ms(RESONANCE_GAP_MS);
        }
    }

    report(SweepStage::Complete);
}
