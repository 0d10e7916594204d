use crate::key::Key;

/// Contract between a frontend event loop and whatever it is driving.
///
/// The frontend owns the window and the RGB24 frame; the app owns the state
/// and decides when the loop should stop.
pub trait App {
    fn init(&mut self);
    fn update(&mut self, screen: &mut [u8]);
    fn handle_key_event(&mut self, key: Key, is_down: bool);
    fn should_exit(&self) -> bool;
    fn exit(&mut self);

    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn scale(&self) -> u32;
    fn title(&self) -> String;
}
