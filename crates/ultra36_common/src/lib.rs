pub mod app;
pub mod color;
pub mod key;

pub use app::App;
pub use color::{Color, TextColor};
pub use key::Key;
