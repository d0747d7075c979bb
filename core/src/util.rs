//! Supporting types: the 2D pixel buffer backing render targets.

pub mod buf;
