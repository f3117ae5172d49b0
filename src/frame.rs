//! Frames and the drawing surface the overlay renders onto.
//!
//! - `Frame`: owned BGR8 pixel buffer used by the synthetic pipeline and tests.
//! - `Canvas`: anything the overlay can measure and draw on (`Frame`, or an
//!   OpenCV `Mat` with the `opencv` feature).
//! - `DrawCommand`: a single rectangle or text primitive planned by the overlay.
//!
//! Frames are owned by exactly one loop iteration and are replaced on the next.

use anyhow::{anyhow, Result};

/// Number of interleaved channels in a frame (blue, green, red).
pub const CHANNELS: usize = 3;

/// Color in frame channel order (blue, green, red), each channel in `0.0..=255.0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color(pub [f64; 3]);

impl Color {
    pub const fn new(b: f64, g: f64, r: f64) -> Self {
        Self([b, g, r])
    }

    /// Saturating conversion to 8-bit channels, rounding to nearest.
    pub fn to_bgr8(self) -> [u8; 3] {
        self.0.map(|c| c.round().clamp(0.0, 255.0) as u8)
    }
}

/// Integer pixel coordinate. May lie outside the frame; drawing clips.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Rectangle {
        top_left: Point,
        bottom_right: Point,
        color: Color,
        thickness: i32,
    },
    /// `origin` is the bottom-left corner of the text baseline.
    Text {
        text: String,
        origin: Point,
        scale: f64,
        color: Color,
        thickness: i32,
    },
}

/// A surface the overlay can draw on.
pub trait Canvas {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    fn draw(&mut self, command: &DrawCommand) -> Result<()>;
}

// ----------------------------------------------------------------------------
// Frame: owned BGR8 buffer
// ----------------------------------------------------------------------------

/// Owned 8-bit BGR frame.
///
/// Rectangles are rasterized into the pixel buffer. Text is not rasterized
/// (there is no font renderer here), but every command, text included, is kept
/// in `annotations()` in the order it was drawn.
#[derive(Clone, Debug)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    annotations: Vec<DrawCommand>,
}

impl Frame {
    /// Wrap an interleaved BGR buffer of `width * height * 3` bytes.
    pub fn from_bgr(data: Vec<u8>, width: u32, height: u32) -> Result<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(CHANNELS))
            .ok_or_else(|| anyhow!("frame dimensions overflow"))?;
        if data.len() != expected {
            return Err(anyhow!(
                "expected {} BGR bytes for a {}x{} frame, received {}",
                expected,
                width,
                height,
                data.len()
            ));
        }
        Ok(Self {
            data,
            width,
            height,
            annotations: Vec::new(),
        })
    }

    /// A frame filled with a single color.
    pub fn filled(width: u32, height: u32, bgr: [u8; 3]) -> Self {
        let pixels = width as usize * height as usize;
        let mut data = Vec::with_capacity(pixels * CHANNELS);
        for _ in 0..pixels {
            data.extend_from_slice(&bgr);
        }
        Self {
            data,
            width,
            height,
            annotations: Vec::new(),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Pixel at `(x, y)`, or `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * CHANNELS;
        Some([self.data[idx], self.data[idx + 1], self.data[idx + 2]])
    }

    /// Commands drawn on this frame, oldest first.
    pub fn annotations(&self) -> &[DrawCommand] {
        &self.annotations
    }

    /// Fill the inclusive span `[x0, x1] x [y0, y1]`, clipped to the frame.
    fn fill_span(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, bgr: [u8; 3]) {
        if self.width == 0 || self.height == 0 {
            return;
        }
        let max_x = self.width as i32 - 1;
        let max_y = self.height as i32 - 1;
        let (x0, x1) = (x0.min(x1).max(0), x0.max(x1).min(max_x));
        let (y0, y1) = (y0.min(y1).max(0), y0.max(y1).min(max_y));
        if x0 > x1 || y0 > y1 {
            return;
        }
        for y in y0..=y1 {
            let row = y as usize * self.width as usize;
            for x in x0..=x1 {
                let idx = (row + x as usize) * CHANNELS;
                self.data[idx..idx + CHANNELS].copy_from_slice(&bgr);
            }
        }
    }

    fn outline(&mut self, top_left: Point, bottom_right: Point, bgr: [u8; 3], thickness: i32) {
        let thickness = thickness.max(1);
        let before = thickness / 2;
        let after = (thickness - 1) / 2;
        let (l, t, r, b) = (top_left.x, top_left.y, bottom_right.x, bottom_right.y);
        self.fill_span(l - before, t - before, r + after, t + after, bgr);
        self.fill_span(l - before, b - before, r + after, b + after, bgr);
        self.fill_span(l - before, t - before, l + after, b + after, bgr);
        self.fill_span(r - before, t - before, r + after, b + after, bgr);
    }
}

impl Canvas for Frame {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn draw(&mut self, command: &DrawCommand) -> Result<()> {
        if let DrawCommand::Rectangle {
            top_left,
            bottom_right,
            color,
            thickness,
        } = command
        {
            self.outline(*top_left, *bottom_right, color.to_bgr8(), *thickness);
        }
        self.annotations.push(command.clone());
        Ok(())
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Color = Color::new(0.0, 0.0, 255.0);

    #[test]
    fn from_bgr_rejects_wrong_length() {
        assert!(Frame::from_bgr(vec![0; 10], 2, 2).is_err());
        assert!(Frame::from_bgr(vec![0; 12], 2, 2).is_ok());
    }

    #[test]
    fn rectangle_outline_is_rasterized_and_logged() {
        let mut frame = Frame::filled(20, 20, [0, 0, 0]);
        frame
            .draw(&DrawCommand::Rectangle {
                top_left: Point::new(5, 5),
                bottom_right: Point::new(14, 14),
                color: RED,
                thickness: 2,
            })
            .unwrap();

        assert_eq!(frame.pixel(5, 5), Some([0, 0, 255]));
        assert_eq!(frame.pixel(14, 10), Some([0, 0, 255]));
        assert_eq!(frame.pixel(4, 4), Some([0, 0, 255]));
        // interior stays untouched
        assert_eq!(frame.pixel(10, 10), Some([0, 0, 0]));
        assert_eq!(frame.annotations().len(), 1);
    }

    #[test]
    fn drawing_outside_the_frame_clips() {
        let mut frame = Frame::filled(8, 8, [9, 9, 9]);
        frame
            .draw(&DrawCommand::Rectangle {
                top_left: Point::new(-20, -20),
                bottom_right: Point::new(40, 40),
                color: RED,
                thickness: 2,
            })
            .unwrap();
        assert_eq!(frame.pixel(3, 3), Some([9, 9, 9]));
    }

    #[test]
    fn text_is_logged_without_touching_pixels() {
        let mut frame = Frame::filled(4, 4, [1, 2, 3]);
        let before = frame.as_bytes().to_vec();
        frame
            .draw(&DrawCommand::Text {
                text: "FPS:1.00".to_string(),
                origin: Point::new(1, 1),
                scale: 0.5,
                color: RED,
                thickness: 2,
            })
            .unwrap();
        assert_eq!(frame.as_bytes(), &before[..]);
        assert_eq!(frame.annotations().len(), 1);
    }

    #[test]
    fn color_conversion_saturates() {
        assert_eq!(Color::new(-4.0, 254.6, 300.0).to_bgr8(), [0, 255, 255]);
    }
}
