//! Output windows.
//!
//! - Headless display (testing): records shown frames, replays scripted keys
//! - HighGUI window through OpenCV (feature: opencv)

pub mod headless;
#[cfg(feature = "opencv")]
pub mod highgui;

pub use headless::HeadlessDisplay;
#[cfg(feature = "opencv")]
pub use highgui::HighGuiDisplay;

use std::time::Duration;

use anyhow::Result;

/// A window that shows frames and reports key presses.
pub trait Display<F: ?Sized> {
    fn show(&mut self, frame: &F) -> Result<()>;

    /// Wait up to `timeout` for a key press. `None` when no key was pressed.
    fn poll_key(&mut self, timeout: Duration) -> Result<Option<u8>>;

    /// Close all windows. Safe to call when nothing is open.
    fn close(&mut self) -> Result<()>;
}

/// Map a raw key code to its low byte; negative codes mean no key.
pub fn key_from_code(code: i32) -> Option<u8> {
    if code < 0 {
        None
    } else {
        Some((code & 0xFF) as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_codes_are_masked() {
        assert_eq!(key_from_code(-1), None);
        assert_eq!(key_from_code(32), Some(b' '));
        // modifier bits above the low byte are dropped
        assert_eq!(key_from_code(0x10_0020), Some(b' '));
        assert_eq!(key_from_code(0x71), Some(b'q'));
    }
}
