pub mod duration;
pub mod time;

pub use duration::{Count, count_for, elapsed_minutes};
pub use time::{BANTI_OFFSET, ClockTime, Period, WANTI_OFFSET, normalize, offset, parse_shorthand};
