//! Screen renderer.
//!
//! The renderer remembers what it last put on screen in a [`RenderCache`] and
//! only repaints what changed: a screen switch repaints the content area, a
//! selection change on the same list rewrites the two affected lines, and an
//! unchanged request draws nothing.

use ultra36_common::TextColor;

use crate::config::{PRODUCT_NAME, VERSION};
use crate::console::{Console, Style};
use crate::layout::{Element, Layout, ScreenWidth};
use crate::list::MenuList;
use crate::probe::{SidModel, SidReport, VdcRam};
use crate::screen::Screen;
use crate::sweep::SweepStage;

const TITLE_STYLE: Style = Style::new(TextColor::Cyan).reversed();
const FKEY_STYLE: Style = Style::new(TextColor::LightGreen);
const HEADING_STYLE: Style = Style::new(TextColor::Cyan);
const ITEM_STYLE: Style = Style::NORMAL;
const SELECTED_STYLE: Style = Style::new(TextColor::Yellow).reversed();
const STATUS_STYLE: Style = Style::new(TextColor::Yellow);
const FOOTER_STYLE: Style = Style::new(TextColor::Gray3);
const HINT_STYLE: Style = Style::new(TextColor::LightBlue);

/// Width of the colour-name column in front of each test bar.
const COLOR_LABEL_WIDTH: u8 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderState {
    /// The content area does not reflect the current screen yet.
    #[default]
    Uninitialized,
    /// The content area is fully drawn; `selected` is the highlighted line
    /// (0 on screens without a list).
    Initialized { selected: usize },
}

/// What the renderer believes is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderCache {
    pub screen: Option<Screen>,
    pub state: RenderState,
}

/// How much work a render call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redraw {
    Full,
    Partial { previous: usize, current: usize },
    Unchanged,
}

/// Content of the active screen, borrowed from the menu for one render.
#[derive(Debug, Clone, Copy)]
pub enum Content<'a> {
    List {
        heading: &'a str,
        list: &'a MenuList,
        selected: usize,
    },
    Info {
        rom_count: usize,
    },
    Vdc(VdcRam),
    Sid(&'a SidReport),
}

impl Content<'_> {
    fn selected(&self) -> usize {
        match *self {
            Content::List { selected, .. } => selected,
            _ => 0,
        }
    }
}

pub struct Renderer {
    layout: Layout,
    cache: RenderCache,
}

impl Renderer {
    pub fn new(width: ScreenWidth) -> Self {
        Self {
            layout: Layout::new(width),
            cache: RenderCache::default(),
        }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn cache(&self) -> &RenderCache {
        &self.cache
    }

    /// Forget everything; the next render repaints the whole screen.
    pub fn invalidate(&mut self) {
        self.cache = RenderCache::default();
    }

    /// Keep the title and key bars but repaint the content area next time.
    pub fn invalidate_content(&mut self) {
        self.cache.state = RenderState::Uninitialized;
    }

    /// Bring the display in line with `screen` showing `content`.
    pub fn render<C: Console + ?Sized>(
        &mut self,
        console: &mut C,
        screen: Screen,
        content: Content<'_>,
    ) -> Redraw {
        match self.cache.screen {
            None => {
                self.draw_title(console);
                self.draw_frame(console, screen);
            }
            Some(shown) if shown != screen => self.draw_frame(console, screen),
            Some(_) => {}
        }

        let redraw = match (self.cache.state, content) {
            (RenderState::Uninitialized, content) => {
                self.clear_content(console);
                self.draw_content(console, &content);
                Redraw::Full
            }
            (RenderState::Initialized { selected: previous }, Content::List { list, selected, .. })
                if previous != selected =>
            {
                self.draw_item(console, list, previous, false);
                self.draw_item(console, list, selected, true);
                Redraw::Partial {
                    previous,
                    current: selected,
                }
            }
            _ => Redraw::Unchanged,
        };

        self.cache.state = RenderState::Initialized {
            selected: content.selected(),
        };
        log::debug!("render {screen:?}: {redraw:?}");
        redraw
    }

    fn draw_title<C: Console + ?Sized>(&self, console: &mut C) {
        let columns = self.layout.columns();
        let (_, y) = self.layout.position(Element::TitleBar);
        console.fill(0, y, columns, TITLE_STYLE);
        console.put_str(
            self.layout.centered_x(PRODUCT_NAME.len()),
            y,
            PRODUCT_NAME,
            TITLE_STYLE,
        );
        let version_x = columns.saturating_sub(VERSION.len() as u8 + 1);
        console.put_str(version_x, y, VERSION, TITLE_STYLE);
    }

    /// Function-key bar and footer for a newly active screen. Resets the
    /// cache to that screen.
    fn draw_frame<C: Console + ?Sized>(&mut self, console: &mut C, screen: Screen) {
        let columns = self.layout.columns();
        let (_, bar_y) = self.layout.position(Element::FunctionKeys);
        let slot_width = self.layout.fkey_slot_width();
        console.clear(0, bar_y, columns);
        for slot_screen in Screen::ALL {
            let style = if slot_screen == screen {
                FKEY_STYLE.reversed()
            } else {
                FKEY_STYLE
            };
            let label = format!(
                "{:<width$}",
                slot_screen.label(),
                width = slot_width as usize - 1
            );
            console.put_str(self.layout.fkey_x(slot_screen.slot()), bar_y, &label, style);
        }

        let (footer_x, footer_y) = self.layout.position(Element::Footer);
        console.clear(0, footer_y, columns);
        console.put_str(footer_x, footer_y, screen.hints(), FOOTER_STYLE);

        self.cache = RenderCache {
            screen: Some(screen),
            state: RenderState::Uninitialized,
        };
        log::debug!("frame drawn for {screen:?}");
    }

    fn clear_content<C: Console + ?Sized>(&self, console: &mut C) {
        for y in self.layout.content_rows() {
            console.clear(0, y, self.layout.columns());
        }
    }

    fn draw_content<C: Console + ?Sized>(&self, console: &mut C, content: &Content<'_>) {
        match *content {
            Content::List {
                heading,
                list,
                selected,
            } => {
                self.put(console, Element::Heading, heading, HEADING_STYLE);
                for index in 0..list.len() {
                    self.draw_item(console, list, index, index == selected);
                }
            }
            Content::Info { rom_count } => self.draw_info(console, rom_count),
            Content::Vdc(ram) => self.draw_vdc(console, ram),
            Content::Sid(report) => self.draw_sid(console, report),
        }
    }

    fn put<C: Console + ?Sized>(
        &self,
        console: &mut C,
        element: Element,
        text: &str,
        style: Style,
    ) {
        let (x, y) = self.layout.position(element);
        console.put_str(x, y, text, style);
    }

    fn clear_row<C: Console + ?Sized>(&self, console: &mut C, element: Element) {
        console.clear(0, self.layout.row(element), self.layout.columns());
    }

    fn draw_item<C: Console + ?Sized>(
        &self,
        console: &mut C,
        list: &MenuList,
        index: usize,
        highlighted: bool,
    ) {
        let count = list.len();
        let (x, y) = self.layout.item_position(index, count);
        let width = self.layout.item_width(count);
        let style = if highlighted { SELECTED_STYLE } else { ITEM_STYLE };
        console.fill(x, y, width, style);
        console.put_str(x, y, &list.line(index, width), style);
    }

    fn draw_info<C: Console + ?Sized>(&self, console: &mut C, rom_count: usize) {
        self.put(console, Element::Heading, "About", HEADING_STYLE);
        let display = match self.layout.width() {
            ScreenWidth::Eighty => "80 columns (VDC)",
            ScreenWidth::Forty => "40 columns (VIC-II)",
        };
        let lines = [
            format!("{PRODUCT_NAME} {VERSION}"),
            String::new(),
            format!("Display:   {display}"),
            format!("ROM banks: {rom_count}"),
            String::new(),
            "F1  Select ROM bank".to_string(),
            "F2  JiffyDOS on/off".to_string(),
            "F3  This screen".to_string(),
            "F4  VDC RAM test".to_string(),
            "F5  SID detection".to_string(),
            "F7  Redraw screen".to_string(),
            "F8  Exit with current ROM".to_string(),
        ];
        let (x, y) = self.layout.position(Element::InfoBody);
        for (offset, line) in lines.iter().enumerate() {
            console.put_str(x, y + offset as u8, line, ITEM_STYLE);
        }
    }

    fn draw_vdc<C: Console + ?Sized>(&self, console: &mut C, ram: VdcRam) {
        let title = "VDC RAM Test Utility";
        let (_, title_y) = self.layout.position(Element::VdcTitle);
        console.put_str(self.layout.centered_x(title.len()), title_y, title, HEADING_STYLE);

        let ram_line = format!("Detected VDC RAM: {} KB", ram.kilobytes());
        self.put(console, Element::VdcRam, &ram_line, ITEM_STYLE);

        let heading = match self.layout.width() {
            ScreenWidth::Eighty => "VDC Available Colors:",
            ScreenWidth::Forty => "VIC-II Available Colors:",
        };
        self.put(console, Element::ColorHeading, heading, ITEM_STYLE);

        let (x, top) = self.layout.position(Element::ColorBars);
        let bar_width = self.layout.columns() - COLOR_LABEL_WIDTH;
        for (offset, color) in TextColor::ALL.into_iter().enumerate() {
            let y = top + offset as u8;
            let label = format!("{:<width$}", color.name(), width = COLOR_LABEL_WIDTH as usize);
            console.put_str(x, y, &label, ITEM_STYLE);
            console.fill(x + COLOR_LABEL_WIDTH, y, bar_width, Style::new(color).reversed());
        }
    }

    fn draw_sid<C: Console + ?Sized>(&self, console: &mut C, report: &SidReport) {
        self.put(console, Element::SidHeading, "SID Chip Detection", HEADING_STYLE);
        let first = format!("SID 1: {}", report.primary.name());
        self.put(console, Element::Sid1, &first, ITEM_STYLE);

        let second = match report.secondary {
            Some(slot) => format!("SID 2: {} at ${:04X}", slot.model.name(), slot.base),
            None => format!("SID 2: {}", SidModel::Absent.name()),
        };
        self.put(console, Element::Sid2, &second, ITEM_STYLE);

        if let Some(comment) = report.comment() {
            self.put(console, Element::SidComment, comment, STATUS_STYLE);
        }

        for (chip, element) in [(1u8, Element::SweepHint1), (2, Element::SweepHint2)] {
            if report.sweep_target(chip).is_some() {
                let hint = format!("Press {chip} to play filter sweep on SID {chip}");
                self.put(console, element, &hint, ITEM_STYLE);
            }
        }

        self.put(
            console,
            Element::PortHintMssiah,
            "$DE00 PIN 7  MSSIAH / PROPHET64 CARTS",
            HINT_STYLE,
        );
        self.put(
            console,
            Element::PortHintCynthcart,
            "$DF00 PIN 10 on expansion port CYNTHCART",
            HINT_STYLE,
        );
    }

    fn playing_row(chip: u8) -> Element {
        if chip == 1 {
            Element::SweepPlaying1
        } else {
            Element::SweepPlaying2
        }
    }

    pub fn show_sweep_playing<C: Console + ?Sized>(&self, console: &mut C, chip: u8) {
        let text = format!("Playing SID {chip} test...");
        self.put(console, Self::playing_row(chip), &text, STATUS_STYLE);
    }

    pub fn clear_sweep_playing<C: Console + ?Sized>(&self, console: &mut C, chip: u8) {
        self.clear_row(console, Self::playing_row(chip));
    }

    pub fn show_sweep_stage<C: Console + ?Sized>(&self, console: &mut C, stage: SweepStage) {
        self.clear_row(console, Element::SweepStage);
        self.put(console, Element::SweepStage, &stage.text(), ITEM_STYLE);
    }

    /// Put a message on the status line. It stays until [`clear_status`].
    ///
    /// [`clear_status`]: Renderer::clear_status
    pub fn show_status<C: Console + ?Sized>(&self, console: &mut C, text: &str) {
        self.clear_row(console, Element::Status);
        self.put(console, Element::Status, text, STATUS_STYLE);
    }

    pub fn clear_status<C: Console + ?Sized>(&self, console: &mut C) {
        self.clear_row(console, Element::Status);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::TextBuffer;
    use crate::probe::sid::SID2_MSSIAH;
    use crate::probe::SidSlot;

    /// Console that remembers which rows were written to.
    struct RowLog {
        screen: TextBuffer,
        rows: Vec<u8>,
    }

    impl RowLog {
        fn new(width: ScreenWidth) -> Self {
            Self {
                screen: TextBuffer::new(width),
                rows: Vec::new(),
            }
        }

        fn take_rows(&mut self) -> Vec<u8> {
            let mut rows = std::mem::take(&mut self.rows);
            rows.dedup();
            rows
        }
    }

    impl Console for RowLog {
        fn columns(&self) -> u8 {
            self.screen.columns()
        }

        fn put_str(&mut self, x: u8, y: u8, text: &str, style: Style) {
            self.rows.push(y);
            self.screen.put_str(x, y, text, style);
        }

        fn fill(&mut self, x: u8, y: u8, len: u8, style: Style) {
            self.rows.push(y);
            self.screen.fill(x, y, len, style);
        }
    }

    fn roms() -> MenuList {
        MenuList::new(["Stock", "JiffyDOS", "Action Replay", "Final Cart"])
    }

    fn list(list: &MenuList, selected: usize) -> Content<'_> {
        Content::List {
            heading: "Select ROM bank:",
            list,
            selected,
        }
    }

    #[test]
    fn first_render_draws_everything() {
        let roms = roms();
        let mut console = RowLog::new(ScreenWidth::Forty);
        let mut renderer = Renderer::new(ScreenWidth::Forty);
        let redraw = renderer.render(&mut console, Screen::RomSelect, list(&roms, 0));
        assert_eq!(redraw, Redraw::Full);
        let screen = &console.screen;
        assert!(screen.row_text(0).contains(PRODUCT_NAME));
        assert!(screen.row_text(0).ends_with(VERSION));
        assert_eq!(screen.cell(0, 0).style, TITLE_STYLE);
        assert!(screen.row_text(1).starts_with("F1 ROM"));
        assert!(screen.cell(0, 1).style.reverse);
        assert!(!screen.cell(8, 1).style.reverse);
        assert_eq!(screen.row_text(3), "Select ROM bank:");
        assert_eq!(screen.row_text(5), "  1. Stock");
        assert_eq!(screen.row_text(8), "  4. Final Cart");
        assert_eq!(screen.cell(2, 5).style, SELECTED_STYLE);
        assert_eq!(screen.cell(2, 6).style, ITEM_STYLE);
        assert_eq!(screen.row_text(24), Screen::RomSelect.hints());
    }

    #[test]
    fn selection_change_rewrites_two_lines() {
        let roms = roms();
        let mut console = RowLog::new(ScreenWidth::Forty);
        let mut renderer = Renderer::new(ScreenWidth::Forty);
        renderer.render(&mut console, Screen::RomSelect, list(&roms, 0));
        console.take_rows();

        let redraw = renderer.render(&mut console, Screen::RomSelect, list(&roms, 2));
        assert_eq!(
            redraw,
            Redraw::Partial {
                previous: 0,
                current: 2
            }
        );
        assert_eq!(console.take_rows(), vec![5, 7]);
        assert_eq!(console.screen.cell(2, 5).style, ITEM_STYLE);
        assert_eq!(console.screen.cell(2, 7).style, SELECTED_STYLE);
        assert_eq!(
            renderer.cache().state,
            RenderState::Initialized { selected: 2 }
        );
    }

    #[test]
    fn unchanged_selection_draws_nothing() {
        let roms = roms();
        let mut console = RowLog::new(ScreenWidth::Forty);
        let mut renderer = Renderer::new(ScreenWidth::Forty);
        renderer.render(&mut console, Screen::RomSelect, list(&roms, 1));
        console.take_rows();
        let redraw = renderer.render(&mut console, Screen::RomSelect, list(&roms, 1));
        assert_eq!(redraw, Redraw::Unchanged);
        assert!(console.take_rows().is_empty());
    }

    #[test]
    fn screen_change_resets_the_cache() {
        let roms = roms();
        let jiffy = MenuList::new(["JiffyDOS On", "JiffyDOS Off"]);
        let mut console = RowLog::new(ScreenWidth::Eighty);
        let mut renderer = Renderer::new(ScreenWidth::Eighty);
        renderer.render(&mut console, Screen::RomSelect, list(&roms, 3));
        let redraw = renderer.render(
            &mut console,
            Screen::JiffyToggle,
            Content::List {
                heading: "JiffyDOS setting:",
                list: &jiffy,
                selected: 0,
            },
        );
        assert_eq!(redraw, Redraw::Full);
        assert_eq!(renderer.cache().screen, Some(Screen::JiffyToggle));
        // Old list rows are gone and the key bar moved its highlight.
        assert_eq!(console.screen.row_text(7), "");
        assert_eq!(console.screen.row_text(8), "");
        assert!(console.screen.cell(16, 1).style.reverse);
        assert!(!console.screen.cell(0, 1).style.reverse);
    }

    #[test]
    fn two_column_list_partial_redraw_hits_both_columns() {
        let names: Vec<String> = (1..=10).map(|i| format!("ROM {i}")).collect();
        let roms = MenuList::new(names);
        let mut console = RowLog::new(ScreenWidth::Forty);
        let mut renderer = Renderer::new(ScreenWidth::Forty);
        renderer.render(&mut console, Screen::RomSelect, list(&roms, 4));
        assert!(console.screen.row_text(5).contains("1. ROM 1"));
        assert!(console.screen.row_text(5).contains("6. ROM 6"));
        console.take_rows();

        renderer.render(&mut console, Screen::RomSelect, list(&roms, 5));
        assert_eq!(console.take_rows(), vec![9, 5]);
        assert_eq!(console.screen.cell(21, 5).style, SELECTED_STYLE);
    }

    #[test]
    fn invalidate_forces_full_repaint() {
        let roms = roms();
        let mut console = RowLog::new(ScreenWidth::Forty);
        let mut renderer = Renderer::new(ScreenWidth::Forty);
        renderer.render(&mut console, Screen::RomSelect, list(&roms, 0));
        renderer.invalidate();
        console.take_rows();
        let redraw = renderer.render(&mut console, Screen::RomSelect, list(&roms, 0));
        assert_eq!(redraw, Redraw::Full);
        assert!(console.take_rows().contains(&0));
    }

    #[test]
    fn vdc_panel_names_ram_and_colours() {
        for (width, heading) in [
            (ScreenWidth::Forty, "VIC-II Available Colors:"),
            (ScreenWidth::Eighty, "VDC Available Colors:"),
        ] {
            let mut console = TextBuffer::new(width);
            let mut renderer = Renderer::new(width);
            renderer.render(&mut console, Screen::VdcInfo, Content::Vdc(VdcRam::Kb16));
            assert_eq!(console.row_text(3), "Detected VDC RAM: 16 KB");
            assert_eq!(console.row_text(5), format!("          {heading}"));
            assert_eq!(console.row_text(6), "Black");
            assert_eq!(console.row_text(21), "Gray3");
            let bar = console.cell(COLOR_LABEL_WIDTH, 7).style;
            assert_eq!(bar, Style::new(TextColor::White).reversed());
            assert_eq!(
                console.cell(width.columns() - 1, 21).style,
                Style::new(TextColor::Gray3).reversed()
            );
        }
    }

    #[test]
    fn sid_panel_lists_both_chips() {
        let report = SidReport {
            primary: SidModel::Mos6581,
            secondary: Some(SidSlot {
                base: SID2_MSSIAH,
                model: SidModel::Mos8580,
            }),
        };
        let mut console = TextBuffer::new(ScreenWidth::Forty);
        let mut renderer = Renderer::new(ScreenWidth::Forty);
        renderer.render(&mut console, Screen::SidInfo, Content::Sid(&report));
        assert_eq!(console.row_text(5), "SID 1: MOS 6581");
        assert_eq!(console.row_text(6), "SID 2: MOS 8580 at $DE00");
        assert_eq!(console.row_text(8), "Different SIDs? Someone was naughty!");
        assert_eq!(console.row_text(10), "Press 1 to play filter sweep on SID 1");
        assert_eq!(console.row_text(11), "Press 2 to play filter sweep on SID 2");
        assert_eq!(console.row_text(22), "$DF00 PIN 10 on expansion port CYNTHCART");
    }

    #[test]
    fn sid_panel_without_chips_offers_no_sweep() {
        let report = SidReport {
            primary: SidModel::Absent,
            secondary: None,
        };
        let mut console = TextBuffer::new(ScreenWidth::Forty);
        let mut renderer = Renderer::new(ScreenWidth::Forty);
        renderer.render(&mut console, Screen::SidInfo, Content::Sid(&report));
        assert_eq!(console.row_text(5), "SID 1: Not detected");
        assert_eq!(console.row_text(6), "SID 2: Not detected");
        assert_eq!(console.row_text(8), "");
        assert!(!console.contains("Press 1"));
    }

    #[test]
    fn status_line_comes_and_goes() {
        let roms = roms();
        let mut console = TextBuffer::new(ScreenWidth::Forty);
        let mut renderer = Renderer::new(ScreenWidth::Forty);
        renderer.render(&mut console, Screen::RomSelect, list(&roms, 0));
        let before: Vec<String> = (5..9).map(|y| console.row_text(y)).collect();
        renderer.show_status(&mut console, "Switching to Stock...");
        assert_eq!(console.row_text(23), "Switching to Stock...");
        renderer.clear_status(&mut console);
        assert_eq!(console.row_text(23), "");
        let after: Vec<String> = (5..9).map(|y| console.row_text(y)).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn info_panel_reports_display_mode() {
        let mut console = TextBuffer::new(ScreenWidth::Eighty);
        let mut renderer = Renderer::new(ScreenWidth::Eighty);
        renderer.render(&mut console, Screen::Info, Content::Info { rom_count: 7 });
        assert!(console.contains("80 columns (VDC)"));
        assert!(console.contains("ROM banks: 7"));
        assert!(console.contains(VERSION));
    }
}
