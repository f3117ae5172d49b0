//! Overlay planning.
//!
//! Turns detections and the frame rate into `DrawCommand`s. Nothing here
//! touches pixels; canvases execute the commands.

use crate::detect::{class_label, Detection, NormalizedBox};
use crate::frame::{Color, DrawCommand, Point};
use crate::palette::Palette;

pub const BOX_THICKNESS: i32 = 2;
pub const LABEL_SCALE: f64 = 1.0;
pub const LABEL_THICKNESS: i32 = 2;

/// Labels sit this far above the box top...
pub const LABEL_RAISE: i32 = 15;
/// ...unless that would put them at or above this line, then they drop inside the box.
pub const LABEL_MIN_Y: i32 = 15;
pub const LABEL_DROP: i32 = 25;

pub const FPS_ORIGIN: Point = Point::new(10, 15);
pub const FPS_SCALE: f64 = 0.5;
pub const FPS_COLOR: Color = Color::new(1.0, 1.0, 1.0);
pub const FPS_THICKNESS: i32 = 2;

/// Bounding box in pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelBox {
    pub start_x: i32,
    pub start_y: i32,
    pub end_x: i32,
    pub end_y: i32,
}

impl PixelBox {
    /// Scale a normalized box by the frame size, truncating toward zero.
    pub fn from_normalized(bbox: NormalizedBox, width: u32, height: u32) -> Self {
        let (w, h) = (f64::from(width), f64::from(height));
        Self {
            start_x: (f64::from(bbox.x1) * w) as i32,
            start_y: (f64::from(bbox.y1) * h) as i32,
            end_x: (f64::from(bbox.x2) * w) as i32,
            end_y: (f64::from(bbox.y2) * h) as i32,
        }
    }

    pub fn top_left(&self) -> Point {
        Point::new(self.start_x, self.start_y)
    }

    pub fn bottom_right(&self) -> Point {
        Point::new(self.end_x, self.end_y)
    }
}

/// Vertical label position for a box whose top edge is `start_y`.
pub fn label_origin_y(start_y: i32) -> i32 {
    let raised = start_y - LABEL_RAISE;
    if raised > LABEL_MIN_Y {
        raised
    } else {
        start_y + LABEL_DROP
    }
}

pub fn label_text(label: &str, confidence: f32) -> String {
    format!("{}: {:.2}%", label, f64::from(confidence) * 100.0)
}

pub fn fps_text(fps: f64) -> String {
    format!("FPS:{:.2}", fps)
}

/// Plans boxes, labels and the FPS counter using a fixed palette.
#[derive(Clone, Debug)]
pub struct Overlay {
    palette: Palette,
}

impl Overlay {
    pub fn new(palette: Palette) -> Self {
        Self { palette }
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// A rectangle and a label per detection, in detection order.
    ///
    /// Detections are expected to be thresholded already.
    pub fn plan(&self, detections: &[Detection], width: u32, height: u32) -> Vec<DrawCommand> {
        let mut commands = Vec::with_capacity(detections.len() * 2);
        for detection in detections {
            let (Some(label), Some(color)) = (
                class_label(detection.class_id),
                self.palette.color(detection.class_id),
            ) else {
                log::warn!("no label for class id {}", detection.class_id);
                continue;
            };
            let pixels = PixelBox::from_normalized(detection.bbox, width, height);
            commands.push(DrawCommand::Rectangle {
                top_left: pixels.top_left(),
                bottom_right: pixels.bottom_right(),
                color,
                thickness: BOX_THICKNESS,
            });
            commands.push(DrawCommand::Text {
                text: label_text(label, detection.confidence),
                origin: Point::new(pixels.start_x, label_origin_y(pixels.start_y)),
                scale: LABEL_SCALE,
                color,
                thickness: LABEL_THICKNESS,
            });
        }
        commands
    }

    pub fn fps(&self, fps: f64) -> DrawCommand {
        DrawCommand::Text {
            text: fps_text(fps),
            origin: FPS_ORIGIN,
            scale: FPS_SCALE,
            color: FPS_COLOR,
            thickness: FPS_THICKNESS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detection(class_id: usize, confidence: f32) -> Detection {
        Detection {
            class_id,
            confidence,
            bbox: NormalizedBox {
                x1: 0.25,
                y1: 0.25,
                x2: 0.75,
                y2: 0.75,
            },
        }
    }

    #[test]
    fn label_goes_above_box_when_there_is_room() {
        assert_eq!(label_origin_y(31), 16);
        assert_eq!(label_origin_y(100), 85);
    }

    #[test]
    fn label_drops_below_top_near_the_edge() {
        assert_eq!(label_origin_y(30), 55);
        assert_eq!(label_origin_y(29), 54);
        assert_eq!(label_origin_y(0), 25);
    }

    #[test]
    fn text_formats() {
        assert_eq!(label_text("person", 0.9), "person: 90.00%");
        assert_eq!(label_text("dog", 0.12345), "dog: 12.35%");
        assert_eq!(fps_text(29.97), "FPS:29.97");
        assert_eq!(fps_text(0.0), "FPS:0.00");
    }

    #[test]
    fn boxes_scale_and_truncate() {
        let bbox = NormalizedBox {
            x1: 0.1,
            y1: 0.5,
            x2: 0.999,
            y2: 1.0,
        };
        let pixels = PixelBox::from_normalized(bbox, 480, 360);
        assert_eq!(
            pixels,
            PixelBox {
                start_x: 48,
                start_y: 180,
                end_x: 479,
                end_y: 360
            }
        );
    }

    #[test]
    fn plan_emits_box_then_label_in_class_color() {
        let overlay = Overlay::new(Palette::seeded(1));
        let commands = overlay.plan(&[detection(15, 0.9)], 480, 360);
        let color = overlay.palette().color(15).unwrap();

        assert_eq!(
            commands,
            vec![
                DrawCommand::Rectangle {
                    top_left: Point::new(120, 90),
                    bottom_right: Point::new(360, 270),
                    color,
                    thickness: BOX_THICKNESS,
                },
                DrawCommand::Text {
                    text: "person: 90.00%".to_string(),
                    origin: Point::new(120, 75),
                    scale: LABEL_SCALE,
                    color,
                    thickness: LABEL_THICKNESS,
                },
            ]
        );
    }

    #[test]
    fn same_class_same_color_across_frames() {
        let overlay = Overlay::new(Palette::random());
        let a = overlay.plan(&[detection(7, 0.5)], 480, 360);
        let b = overlay.plan(&[detection(7, 0.6)], 480, 360);
        let color_of = |commands: &[DrawCommand]| match &commands[0] {
            DrawCommand::Rectangle { color, .. } => *color,
            other => panic!("expected rectangle, got {:?}", other),
        };
        assert_eq!(color_of(&a), color_of(&b));
    }

    #[test]
    fn fps_command_is_fixed_in_place() {
        let overlay = Overlay::new(Palette::seeded(0));
        match overlay.fps(12.5) {
            DrawCommand::Text { text, origin, .. } => {
                assert_eq!(text, "FPS:12.50");
                assert_eq!(origin, FPS_ORIGIN);
            }
            other => panic!("expected text, got {:?}", other),
        }
    }
}
