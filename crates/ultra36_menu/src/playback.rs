//! Frame-paced replay of the menu's waits for windowed frontends.
//!
//! The menu runs a command to completion inside one key press. In a window
//! that would freeze the event loop and hide everything shown during the
//! waits. [`Playback`] stands in for the delay instead: every wait captures
//! what is on screen at that moment, and the frontend shows the captured
//! frames for the recorded durations before it returns to the live screen.

use std::cell::{Ref, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::{Duration, Instant};

use ultra36_common::TextColor;

use crate::console::{Console, Style, TextBuffer};
use crate::io::{Bus, Delay};
use crate::sim::SimBus;

/// A device reachable from the menu and from the frontend at once.
#[derive(Debug)]
pub struct Shared<T>(Rc<RefCell<T>>);

impl<T> Shared<T> {
    pub fn new(value: T) -> Self {
        Self(Rc::new(RefCell::new(value)))
    }

    pub fn borrow(&self) -> Ref<'_, T> {
        self.0.borrow()
    }
}

impl<T> Clone for Shared<T> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<T: Bus> Bus for Shared<T> {
    fn read8(&mut self, addr: u16) -> u8 {
        self.0.borrow_mut().read8(addr)
    }

    fn write8(&mut self, addr: u16, value: u8) {
        self.0.borrow_mut().write8(addr, value)
    }
}

impl<T: Console> Console for Shared<T> {
    fn columns(&self) -> u8 {
        self.0.borrow().columns()
    }

    fn put_str(&mut self, x: u8, y: u8, text: &str, style: Style) {
        self.0.borrow_mut().put_str(x, y, text, style)
    }

    fn fill(&mut self, x: u8, y: u8, len: u8, style: Style) {
        self.0.borrow_mut().fill(x, y, len, style)
    }
}

/// What the machine showed during one wait.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub text: TextBuffer,
    pub border: TextColor,
}

/// [`Delay`] that records snapshots instead of blocking.
///
/// Consecutive waits that show the same picture are merged, so a long
/// sweep with an unchanged screen costs one queued frame.
pub struct Playback {
    screen: Shared<TextBuffer>,
    machine: Shared<SimBus>,
    queue: VecDeque<(Snapshot, Duration)>,
    /// When the frame at the front of the queue went up.
    front_since: Option<Instant>,
}

impl Playback {
    pub fn new(screen: Shared<TextBuffer>, machine: Shared<SimBus>) -> Self {
        Self {
            screen,
            machine,
            queue: VecDeque::new(),
            front_since: None,
        }
    }

    pub fn is_playing(&self) -> bool {
        !self.queue.is_empty()
    }

    /// Time left to show, counted from when the front frame went up.
    pub fn remaining(&self) -> Duration {
        self.queue.iter().map(|(_, duration)| *duration).sum()
    }

    /// The recorded frame due at `now`, dropping frames whose time is up.
    /// `None` once everything has been shown.
    pub fn current(&mut self, now: Instant) -> Option<&Snapshot> {
        while let Some(&(_, duration)) = self.queue.front() {
            let since = *self.front_since.get_or_insert(now);
            if now.saturating_duration_since(since) < duration {
                break;
            }
            self.queue.pop_front();
            self.front_since = Some(since + duration);
        }
        if self.queue.is_empty() {
            self.front_since = None;
        }
        self.queue.front().map(|(snapshot, _)| snapshot)
    }

    fn record(&mut self, wait: Duration) {
        let border = self.machine.borrow().border();
        let screen = self.screen.borrow();
        if let Some((last, duration)) = self.queue.back_mut() {
            if last.border == border && last.text == *screen {
                *duration += wait;
                return;
            }
        }
        let snapshot = Snapshot {
            text: screen.clone(),
            border,
        };
        drop(screen);
        self.queue.push_back((snapshot, wait));
    }
}

impl Delay for Playback {
    fn delay_us(&mut self, us: u32) {
        self.record(Duration::from_micros(us as u64));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.record(Duration::from_millis(ms as u64));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::ScreenWidth;
    use crate::sim::SimConfig;

    fn playback() -> (Playback, Shared<TextBuffer>, Shared<SimBus>) {
        let screen = Shared::new(TextBuffer::new(ScreenWidth::Forty));
        let machine = Shared::new(SimBus::new(SimConfig::default()));
        let playback = Playback::new(screen.clone(), machine.clone());
        (playback, screen, machine)
    }

    #[test]
    fn unchanged_waits_are_merged() {
        let (mut playback, mut screen, _) = playback();
        playback.delay_ms(10);
        playback.delay_us(2_000);
        screen.put_str(0, 23, "busy", Style::NORMAL);
        playback.delay_ms(5);
        playback.delay_ms(5);
        assert_eq!(playback.queue.len(), 2);
        assert_eq!(playback.remaining(), Duration::from_millis(22));
    }

    #[test]
    fn frames_are_shown_for_their_durations() {
        let (mut playback, mut screen, mut machine) = playback();
        screen.put_str(0, 23, "busy", Style::NORMAL);
        machine.write8(crate::io::VIC_BORDER, TextColor::White.code());
        playback.delay_ms(20);
        machine.write8(crate::io::VIC_BORDER, TextColor::LightBlue.code());
        playback.delay_ms(100);

        let start = Instant::now();
        let first = playback.current(start).unwrap();
        assert_eq!(first.border, TextColor::White);
        assert_eq!(first.text.row_text(23), "busy");

        let later = playback.current(start + Duration::from_millis(50)).unwrap();
        assert_eq!(later.border, TextColor::LightBlue);

        assert!(playback.current(start + Duration::from_millis(120)).is_none());
        assert!(!playback.is_playing());
    }

    #[test]
    fn a_late_frontend_skips_stale_frames() {
        let (mut playback, mut screen, _) = playback();
        for step in 0..4 {
            screen.put_str(0, 0, &step.to_string(), Style::NORMAL);
            playback.delay_ms(10);
        }
        let start = Instant::now();
        assert_eq!(playback.current(start).unwrap().text.row_text(0), "0");
        let late = playback.current(start + Duration::from_millis(35)).unwrap();
        assert_eq!(late.text.row_text(0), "3");
    }

    #[test]
    fn shared_handles_see_the_same_device() {
        let screen = Shared::new(TextBuffer::new(ScreenWidth::Eighty));
        let mut writer = screen.clone();
        writer.put_str(2, 5, "1. Stock", Style::NORMAL);
        assert_eq!(screen.borrow().row_text(5), "  1. Stock");
        assert_eq!(writer.columns(), 80);
    }
}
