pub mod draw_window;
pub mod jwt;
pub mod password;
pub mod shuffle;
pub mod text;

pub use draw_window::*;
pub use jwt::*;
pub use password::*;
pub use shuffle::*;
pub use text::*;
