pub mod console;
pub mod timer;

pub use console::{CONSOLE_PORT, Console};
pub use timer::{TIMER_CONTROL, TIMER_STATUS, Timer};
