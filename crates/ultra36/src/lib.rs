use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use ultra36_menu::sim::RecordingDelay;
use ultra36_menu::{
    load_rom_names, Menu, MenuApp, MenuConfig, ScreenWidth, ScriptedKeys, SessionEnd, SidModel,
    SimBus, SimConfig, TextBuffer, VdcRam,
};
use ultra36_sdl2::{App, SdlContext, SdlInitInfo};

/// Exit code for setup failures (bad arguments, unreadable ROM list, SDL).
pub const ERROR_EXIT_CODE: i32 = 254;

pub const USAGE: &str = "\
usage: ultra36 [options]

  --cols 40|80          screen width reported by the KERNAL (default 40)
  --roms FILE           ROM bank names, one per line
  --vdc 16|64           VDC RAM fitted (default 64)
  --sid1 MODEL          SID at $D400 (default 8580)
  --sid-de00 MODEL      SID at $DE00 (default none)
  --sid-df00 MODEL      SID at $DF00 (default none)
  --keys SCRIPT         run headless, e.g. \"down,down,return,f8\"
  -h, --help            show this text

MODEL is one of none, 6581, 8580, unknown.";

#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub machine: SimConfig,
    pub rom_list: Option<PathBuf>,
    /// Key script; runs without a window when set.
    pub keys: Option<String>,
}

#[derive(Debug, Clone)]
pub enum Command {
    Run(RunOptions),
    Help,
}

fn parse_sid(value: &str) -> Result<SidModel> {
    Ok(match value.to_ascii_lowercase().as_str() {
        "none" | "absent" => SidModel::Absent,
        "6581" => SidModel::Mos6581,
        "8580" => SidModel::Mos8580,
        "unknown" => SidModel::Unknown,
        other => bail!("unknown SID model '{other}'"),
    })
}

/// Parse command-line arguments (without the program name).
pub fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<Command> {
    let mut options = RunOptions::default();
    let mut args = args.into_iter();
    while let Some(flag) = args.next() {
        if flag == "-h" || flag == "--help" {
            return Ok(Command::Help);
        }
        let value = args
            .next()
            .with_context(|| format!("missing value for '{flag}'"))?;
        let machine = &mut options.machine;
        match flag.as_str() {
            "--cols" => {
                let columns = value
                    .parse()
                    .with_context(|| format!("invalid column count '{value}'"))?;
                let Some(width) = ScreenWidth::from_columns(columns) else {
                    bail!("screen width must be 40 or 80, got {columns}");
                };
                machine.width = width;
            }
            "--vdc" => {
                machine.vdc_ram = match value.as_str() {
                    "16" => VdcRam::Kb16,
                    "64" => VdcRam::Kb64,
                    other => bail!("VDC RAM must be 16 or 64, got '{other}'"),
                }
            }
            "--sid1" => machine.sid1 = parse_sid(&value)?,
            "--sid-de00" => machine.sid_de00 = parse_sid(&value)?,
            "--sid-df00" => machine.sid_df00 = parse_sid(&value)?,
            "--roms" => options.rom_list = Some(PathBuf::from(value)),
            "--keys" => options.keys = Some(value),
            other => bail!("unknown option '{other}'"),
        }
    }
    Ok(Command::Run(options))
}

fn menu_config(options: &RunOptions) -> Result<MenuConfig> {
    Ok(match &options.rom_list {
        Some(path) => MenuConfig::builder().rom_names(load_rom_names(path)?).build(),
        None => MenuConfig::default(),
    })
}

/// Run one menu session on the simulated machine.
///
/// With a key script the session runs headless and the final screen is
/// printed to stdout; otherwise an SDL2 window is opened.
pub fn run(options: RunOptions) -> Result<SessionEnd> {
    let config = menu_config(&options)?;
    let machine = options.machine;

    match &options.keys {
        Some(script) => {
            let mut keys = ScriptedKeys::parse(script)?;
            let mut menu = Menu::with_detected_width(
                config,
                SimBus::new(machine),
                TextBuffer::new(machine.width),
                RecordingDelay::default(),
            )?;
            let end = menu.run(&mut keys);
            if keys.remaining() > 0 {
                log::warn!("{} scripted key(s) left unread", keys.remaining());
            }
            println!("{}", menu.console().dump());
            log::info!(
                "Headless session done after {} ms of simulated delay",
                menu.delay().total_ms()
            );
            Ok(end)
        }
        None => run_window(config, machine),
    }
}

fn run_window(config: MenuConfig, machine: SimConfig) -> Result<SessionEnd> {
    let mut app = MenuApp::new(config, machine)?;
    let init_info = SdlInitInfo::builder()
        .width(app.width())
        .height(app.height())
        .scale(app.scale())
        .title(app.title())
        .build();
    SdlContext::run(init_info, &mut app)?;
    Ok(app.outcome().unwrap_or(SessionEnd::Cancelled))
}

/// Line printed once the session is over.
pub fn summary(end: SessionEnd) -> String {
    match end {
        SessionEnd::Selected(index) => format!("You selected ROM bank #{}", index + 1),
        SessionEnd::Cancelled => "No ROM selected".to_string(),
    }
}
