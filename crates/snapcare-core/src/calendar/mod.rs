//! Calendar view model: which days are on screen and where tasks sit on
//! each day's time axis.

pub mod grid;
pub mod window;

pub use grid::{Placement, TimeGrid};
pub use window::{DayWindow, MAX_WINDOW_DAYS};
