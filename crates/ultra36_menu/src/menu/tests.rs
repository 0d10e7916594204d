use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use ultra36_common::Key;

use super::{Menu, SessionEnd, CANCELLED_EXIT_CODE};
use crate::config::MenuConfig;
use crate::console::TextBuffer;
use crate::layout::ScreenWidth;
use crate::probe::sid::{SID1_BASE, SID2_MSSIAH};
use crate::probe::{SidModel, VdcRam};
use crate::render::Redraw;
use crate::screen::Screen;
use crate::sim::{RecordingDelay, ScriptedKeys, SimBus, SimConfig};

type TestMenu = Menu<SimBus, TextBuffer, RecordingDelay>;

fn menu_with(config: MenuConfig, sim: SimConfig) -> TestMenu {
    let mut menu = Menu::new(
        config,
        sim.width,
        SimBus::new(sim),
        TextBuffer::new(sim.width),
        RecordingDelay::default(),
    )
    .unwrap();
    menu.start();
    menu
}

fn menu() -> TestMenu {
    menu_with(MenuConfig::default(), SimConfig::default())
}

fn press(menu: &mut TestMenu, keys: &[Key]) -> Option<SessionEnd> {
    keys.iter().find_map(|&key| menu.handle_key(key))
}

#[test]
fn starts_on_rom_select_with_first_item() {
    let menu = menu();
    assert_eq!(menu.screen(), Screen::RomSelect);
    assert_eq!(menu.selection(Screen::RomSelect), Some(0));
    assert_eq!(menu.last_redraw(), Some(Redraw::Full));
    assert!(menu.console().contains("1. Stock C128 KERNAL"));
}

#[test]
fn down_down_return_sends_rom_command() {
    let mut menu = menu();
    assert_eq!(press(&mut menu, &[Key::Down, Key::Down]), None);
    assert_eq!(menu.selection(Screen::RomSelect), Some(2));

    assert_eq!(press(&mut menu, &[Key::Return]), None);
    assert_eq!(menu.bus_mut().take_pulses(), 2 + 3);
    // The message has come and gone and the session is still running.
    assert_eq!(menu.console().row_text(23), "");
    assert_eq!(menu.screen(), Screen::RomSelect);

    press(&mut menu, &[Key::F2]);
    assert_eq!(menu.screen(), Screen::JiffyToggle);
    assert_eq!(menu.selection(Screen::JiffyToggle), Some(0));
    assert_eq!(menu.selection(Screen::RomSelect), Some(2));
}

#[test]
fn status_message_is_held_for_the_configured_time() {
    let config = MenuConfig::builder().status_duration_ms(700).build();
    let mut menu = menu_with(config, SimConfig::default());
    press(&mut menu, &[Key::Return]);
    let link = menu.config().link;
    let signalling = 3 * link.pulse_width_ms + 2 * link.pulse_spacing_ms;
    assert_eq!(menu.delay().total_ms(), (signalling + 700) as u64);
}

#[test]
fn jiffy_toggle_sends_on_and_off() {
    let mut menu = menu();
    press(&mut menu, &[Key::F2, Key::Return]);
    assert_eq!(menu.bus_mut().take_pulses(), 1);
    press(&mut menu, &[Key::Down, Key::Return]);
    assert_eq!(menu.bus_mut().take_pulses(), 2);
    assert_eq!(menu.selection(Screen::JiffyToggle), Some(1));
}

#[test]
fn selections_survive_screen_switches() {
    let mut menu = menu();
    press(
        &mut menu,
        &[Key::Down, Key::F2, Key::Down, Key::F4, Key::F5, Key::F3, Key::F1],
    );
    assert_eq!(menu.selection(Screen::RomSelect), Some(1));
    assert_eq!(menu.selection(Screen::JiffyToggle), Some(1));
    assert!(menu.console().cell(2, 6).style.reverse);
    assert!(!menu.console().cell(2, 5).style.reverse);
}

#[test]
fn switching_to_the_active_screen_does_nothing() {
    let mut menu = menu();
    menu.console_mut().take_dirty();
    press(&mut menu, &[Key::F1]);
    assert!(!menu.console_mut().take_dirty());
    assert_eq!(menu.last_redraw(), Some(Redraw::Full));

    press(&mut menu, &[Key::F5]);
    menu.console_mut().take_dirty();
    press(&mut menu, &[Key::F5]);
    assert!(!menu.console_mut().take_dirty());
}

#[test]
fn moving_the_cursor_redraws_two_lines_only() {
    let mut menu = menu();
    press(&mut menu, &[Key::Down]);
    assert_eq!(
        menu.last_redraw(),
        Some(Redraw::Partial {
            previous: 0,
            current: 1
        })
    );
    press(&mut menu, &[Key::Up, Key::Up]);
    assert_eq!(menu.last_redraw(), Some(Redraw::Unchanged));
}

#[test]
fn escape_cancels_only_on_rom_select() {
    let mut menu = menu();
    assert_eq!(press(&mut menu, &[Key::F3, Key::Escape]), None);
    assert_eq!(menu.screen(), Screen::Info);
    let end = press(&mut menu, &[Key::F1, Key::Escape]);
    assert_eq!(end, Some(SessionEnd::Cancelled));
    assert_eq!(SessionEnd::Cancelled.exit_code(), CANCELLED_EXIT_CODE);
    assert_eq!(menu.bus_mut().take_pulses(), 0);
}

#[test]
fn restart_ends_with_current_rom_from_any_screen() {
    for screen_key in [Key::F1, Key::F2, Key::F3, Key::F4, Key::F5] {
        let mut menu = menu();
        let end = press(&mut menu, &[Key::Down, Key::Down, Key::Down, screen_key, Key::F8]);
        assert_eq!(end, Some(SessionEnd::Selected(3)));
        assert_eq!(end.map(SessionEnd::exit_code), Some(3));
        assert_eq!(menu.bus_mut().take_pulses(), 0);
    }
}

#[test]
fn unbound_keys_are_ignored() {
    let mut menu = menu();
    menu.console_mut().take_dirty();
    for key in [Key::F6, Key::Left, Key::Right, Key::Space, Key::R, Key::Num1, Key::None] {
        assert_eq!(menu.handle_key(key), None);
    }
    assert!(!menu.console_mut().take_dirty());
    assert_eq!(menu.screen(), Screen::RomSelect);
}

#[test]
fn diagnostic_screens_ignore_list_keys() {
    for screen_key in [Key::F3, Key::F4, Key::F5] {
        let mut menu = menu();
        press(&mut menu, &[screen_key]);
        let screen = menu.screen();
        menu.console_mut().take_dirty();
        press(&mut menu, &[Key::Down, Key::Up, Key::Return]);
        assert_eq!(menu.screen(), screen);
        assert_eq!(menu.selection(Screen::RomSelect), Some(0));
        assert_eq!(menu.bus_mut().take_pulses(), 0);
        assert!(!menu.console_mut().take_dirty());
    }
}

#[test]
fn forced_redraw_repaints_everything() {
    let mut menu = menu();
    press(&mut menu, &[Key::Down, Key::F7]);
    assert_eq!(menu.last_redraw(), Some(Redraw::Full));
    assert!(menu.console().row_text(0).contains("Ultra-36 ROM Menu"));
    assert!(menu.console().cell(2, 6).style.reverse);
}

#[test]
fn vdc_screen_probes_on_entry_and_retest() {
    let sim = SimConfig {
        vdc_ram: VdcRam::Kb16,
        ..SimConfig::default()
    };
    let mut menu = menu_with(MenuConfig::default(), sim);
    assert_eq!(menu.vdc_ram(), None);
    press(&mut menu, &[Key::F4]);
    assert_eq!(menu.vdc_ram(), Some(VdcRam::Kb16));
    assert!(menu.console().contains("Detected VDC RAM: 16 KB"));
    assert!(menu.console().contains("VIC-II Available Colors:"));

    press(&mut menu, &[Key::R]);
    assert_eq!(menu.last_redraw(), Some(Redraw::Full));

    press(&mut menu, &[Key::F1]);
    assert_eq!(menu.vdc_ram(), None);
}

#[test]
fn sid_screen_reports_and_sweeps() {
    let sim = SimConfig {
        sid1: SidModel::Mos8580,
        sid_de00: SidModel::Mos6581,
        ..SimConfig::default()
    };
    let mut menu = menu_with(MenuConfig::default(), sim);
    press(&mut menu, &[Key::F5]);
    let report = *menu.sid_report().unwrap();
    assert_eq!(report.primary, SidModel::Mos8580);
    assert_eq!(report.secondary.map(|slot| slot.base), Some(SID2_MSSIAH));
    assert!(menu.console().contains("SID 2: MOS 6581 at $DE00"));
    assert!(menu.console().contains("Different SIDs? Someone was naughty!"));

    press(&mut menu, &[Key::Num2]);
    assert!(menu.console().contains("Filter demo complete."));
    assert!(!menu.console().contains("Playing SID 2 test..."));
    assert!(menu.bus().sid_silent(SID2_MSSIAH));
    assert!(menu.bus().sid_silent(SID1_BASE));
}

#[test]
fn sweep_needs_a_detected_chip() {
    let mut menu = menu();
    press(&mut menu, &[Key::F5]);
    menu.console_mut().take_dirty();
    press(&mut menu, &[Key::Num2]);
    assert!(!menu.console_mut().take_dirty());
    assert_eq!(menu.delay().total_us(), 0);
}

#[test]
fn invalid_configuration_is_rejected() {
    let config = MenuConfig::builder().rom_names(Vec::new()).build();
    let result = Menu::new(
        config,
        ScreenWidth::Forty,
        SimBus::default(),
        TextBuffer::new(ScreenWidth::Forty),
        RecordingDelay::default(),
    );
    assert!(result.is_err());
}

#[test]
fn console_must_match_the_detected_width() {
    let sim = SimConfig {
        width: ScreenWidth::Eighty,
        ..SimConfig::default()
    };
    let result = Menu::with_detected_width(
        MenuConfig::default(),
        SimBus::new(sim),
        TextBuffer::new(ScreenWidth::Forty),
        RecordingDelay::default(),
    );
    let err = result.err().unwrap();
    assert!(err.to_string().contains("40 columns wide"), "{err:#}");

    let matched = Menu::with_detected_width(
        MenuConfig::default(),
        SimBus::new(sim),
        TextBuffer::new(ScreenWidth::Eighty),
        RecordingDelay::default(),
    );
    assert!(matched.is_ok());
}

#[test]
fn width_is_taken_from_the_kernal() {
    let sim = SimConfig {
        width: ScreenWidth::Eighty,
        ..SimConfig::default()
    };
    let menu = Menu::with_detected_width(
        MenuConfig::default(),
        SimBus::new(sim),
        TextBuffer::new(ScreenWidth::Eighty),
        RecordingDelay::default(),
    )
    .unwrap();
    assert_eq!(menu.width(), ScreenWidth::Eighty);
}

#[test]
fn run_replays_a_script() {
    let mut menu = menu();
    let mut keys = ScriptedKeys::parse("down,down,return,f2,f8").unwrap();
    assert_eq!(menu.run(&mut keys), SessionEnd::Selected(2));
    assert_eq!(menu.bus_mut().take_pulses(), 5);
}

#[test]
fn run_without_more_input_cancels() {
    let mut menu = menu();
    let mut keys = ScriptedKeys::parse("down").unwrap();
    assert_eq!(menu.run(&mut keys), SessionEnd::Cancelled);
    assert_eq!(menu.selection(Screen::RomSelect), Some(1));
}

#[test]
fn random_key_sequences_keep_selections_in_bounds() {
    let pool = [
        Key::Up,
        Key::Down,
        Key::Return,
        Key::F1,
        Key::F2,
        Key::F3,
        Key::F4,
        Key::F5,
        Key::F6,
        Key::F7,
        Key::Num1,
        Key::R,
        Key::Space,
    ];
    let mut rng = StdRng::seed_from_u64(0x128);
    for rom_count in [1usize, 2, 7, 8, 15, 36] {
        let names = (0..rom_count).map(|i| format!("Bank {i}")).collect();
        let config = MenuConfig::builder()
            .rom_names(names)
            .status_duration_ms(0)
            .build();
        let mut menu = menu_with(config, SimConfig::default());
        for _ in 0..300 {
            let key = *pool.choose(&mut rng).unwrap();
            assert_eq!(menu.handle_key(key), None);
            let rom = menu.selection(Screen::RomSelect).unwrap();
            let jiffy = menu.selection(Screen::JiffyToggle).unwrap();
            assert!(rom < rom_count, "{rom} >= {rom_count}");
            assert!(jiffy < 2);
        }
    }
}
