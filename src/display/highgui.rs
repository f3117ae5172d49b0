#![cfg(feature = "opencv")]

use std::time::Duration;

use anyhow::{Context, Result};
use opencv::{
    core::{self, Mat, Scalar},
    highgui, imgproc,
    prelude::*,
};

use super::{key_from_code, Display};
use crate::frame::{Canvas, Color, DrawCommand};

/// OpenCV HighGUI window.
pub struct HighGuiDisplay {
    window: String,
    open: bool,
}

impl HighGuiDisplay {
    pub fn new(window: impl Into<String>) -> Self {
        Self {
            window: window.into(),
            open: false,
        }
    }
}

impl Display<Mat> for HighGuiDisplay {
    fn show(&mut self, frame: &Mat) -> Result<()> {
        highgui::imshow(&self.window, frame)
            .with_context(|| format!("failed to show window {:?}", self.window))?;
        self.open = true;
        Ok(())
    }

    fn poll_key(&mut self, timeout: Duration) -> Result<Option<u8>> {
        // wait_key(0) blocks forever, so never ask for less than a millisecond
        let millis = i32::try_from(timeout.as_millis()).unwrap_or(i32::MAX).max(1);
        let code = highgui::wait_key(millis).context("failed to poll keyboard")?;
        Ok(key_from_code(code))
    }

    fn close(&mut self) -> Result<()> {
        if self.open {
            self.open = false;
            highgui::destroy_all_windows().context("failed to close windows")?;
        }
        Ok(())
    }
}

fn scalar(color: Color) -> Scalar {
    let [b, g, r] = color.0;
    Scalar::new(b, g, r, 0.0)
}

impl Canvas for Mat {
    fn width(&self) -> u32 {
        self.cols().max(0) as u32
    }

    fn height(&self) -> u32 {
        self.rows().max(0) as u32
    }

    fn draw(&mut self, command: &DrawCommand) -> Result<()> {
        match command {
            DrawCommand::Rectangle {
                top_left,
                bottom_right,
                color,
                thickness,
            } => imgproc::rectangle_points(
                self,
                core::Point::new(top_left.x, top_left.y),
                core::Point::new(bottom_right.x, bottom_right.y),
                scalar(*color),
                *thickness,
                imgproc::LINE_8,
                0,
            )
            .context("failed to draw rectangle")?,
            DrawCommand::Text {
                text,
                origin,
                scale,
                color,
                thickness,
            } => imgproc::put_text(
                self,
                text,
                core::Point::new(origin.x, origin.y),
                imgproc::FONT_HERSHEY_SIMPLEX,
                *scale,
                scalar(*color),
                *thickness,
                imgproc::LINE_8,
                false,
            )
            .context("failed to draw text")?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::Point;
    use opencv::core::Vec3b;

    fn blank(width: i32, height: i32) -> Mat {
        Mat::new_rows_cols_with_default(height, width, core::CV_8UC3, Scalar::all(0.0)).unwrap()
    }

    fn pixel(mat: &Mat, x: i32, y: i32) -> [u8; 3] {
        mat.at_2d::<Vec3b>(y, x).unwrap().0
    }

    #[test]
    fn mat_reports_its_size() {
        let mat = blank(480, 360);
        assert_eq!((Canvas::width(&mat), Canvas::height(&mat)), (480, 360));
    }

    #[test]
    fn rectangle_lands_on_the_mat_in_bgr() {
        let mut mat = blank(64, 48);
        mat.draw(&DrawCommand::Rectangle {
            top_left: Point::new(10, 10),
            bottom_right: Point::new(50, 40),
            color: Color::new(255.0, 0.0, 0.0),
            thickness: 2,
        })
        .unwrap();

        assert_eq!(pixel(&mat, 30, 10), [255, 0, 0]);
        assert_eq!(pixel(&mat, 10, 25), [255, 0, 0]);
        assert_eq!(pixel(&mat, 30, 25), [0, 0, 0]);
        assert_eq!(pixel(&mat, 2, 2), [0, 0, 0]);
    }
}
