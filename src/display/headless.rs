use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{anyhow, Result};

use super::Display;
use crate::frame::{DrawCommand, Frame};

/// Display without a window.
///
/// Keeps the annotations of every shown frame and answers key polls from a
/// script. Once the script is exhausted no key is ever reported.
pub struct HeadlessDisplay {
    keys: VecDeque<Option<u8>>,
    shown: Arc<Mutex<Vec<Vec<DrawCommand>>>>,
    closes: Arc<AtomicUsize>,
    open: bool,
}

impl HeadlessDisplay {
    pub fn new() -> Self {
        Self {
            keys: VecDeque::new(),
            shown: Arc::new(Mutex::new(Vec::new())),
            closes: Arc::new(AtomicUsize::new(0)),
            open: false,
        }
    }

    /// Answers for successive key polls, oldest first.
    pub fn with_keys<I>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = Option<u8>>,
    {
        self.keys = keys.into_iter().collect();
        self
    }

    /// Press `key` on poll number `frame` (1-based), nothing before it.
    pub fn press_after(self, frame: usize, key: u8) -> Self {
        let mut keys = vec![None; frame.saturating_sub(1)];
        keys.push(Some(key));
        self.with_keys(keys)
    }

    /// Annotations of every shown frame, shared so they outlive the display.
    pub fn shown_frames(&self) -> Arc<Mutex<Vec<Vec<DrawCommand>>>> {
        Arc::clone(&self.shown)
    }

    /// Shared counter of `close` calls that actually closed a window.
    pub fn close_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.closes)
    }
}

impl Default for HeadlessDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl Display<Frame> for HeadlessDisplay {
    fn show(&mut self, frame: &Frame) -> Result<()> {
        self.open = true;
        self.shown
            .lock()
            .map_err(|_| anyhow!("headless display lock poisoned"))?
            .push(frame.annotations().to_vec());
        Ok(())
    }

    fn poll_key(&mut self, _timeout: Duration) -> Result<Option<u8>> {
        Ok(self.keys.pop_front().flatten())
    }

    fn close(&mut self) -> Result<()> {
        if self.open {
            self.open = false;
            self.closes.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }
}
