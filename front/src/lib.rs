//! Window frontend for creating simple applications with `softpipe`.

use std::time::Duration;

pub mod minifb;

/// Window width and height in pixels.
pub type Dims = (i32, i32);

pub const VGA_640_480: Dims = (640, 480);

/// Per-frame state. The window run method passes an instance of `Frame`
/// to the callback function on every iteration of the main loop.
pub struct Frame<'a, Win> {
    /// Elapsed time since the start of the first frame.
    pub t: Duration,
    /// Elapsed time since the start of the previous frame.
    pub dt: Duration,
    /// Reference to the window object.
    pub win: &'a mut Win,
}
