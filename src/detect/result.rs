use anyhow::{anyhow, Result};

use crate::detect::labels::CLASS_COUNT;

/// Values per candidate row: image index, class id, confidence, x1, y1, x2, y2.
pub const SSD_ROW_LEN: usize = 7;

/// Bounding box in normalized `0..1` coordinates (top-left, bottom-right).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NormalizedBox {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Detection {
    pub class_id: usize,
    pub confidence: f32,
    pub bbox: NormalizedBox,
}

/// Raw output of an SSD `DetectionOutput` layer, shape `[1, 1, N, 7]`, flattened.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SsdOutput {
    values: Vec<f32>,
}

impl SsdOutput {
    /// Wrap a flattened output tensor. The length must be a whole number of rows.
    pub fn from_raw(values: Vec<f32>) -> Result<Self> {
        if values.len() % SSD_ROW_LEN != 0 {
            return Err(anyhow!(
                "detection tensor has {} values, not a multiple of {}",
                values.len(),
                SSD_ROW_LEN
            ));
        }
        Ok(Self { values })
    }

    pub fn from_rows(rows: &[[f32; SSD_ROW_LEN]]) -> Self {
        Self {
            values: rows.iter().flatten().copied().collect(),
        }
    }

    /// Number of candidate rows (N).
    pub fn len(&self) -> usize {
        self.values.len() / SSD_ROW_LEN
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f32]> {
        self.values.chunks_exact(SSD_ROW_LEN)
    }

    /// Candidates whose confidence is strictly greater than `threshold`.
    ///
    /// Rows with a class id outside the label table are skipped.
    pub fn detections_above(&self, threshold: f32) -> Vec<Detection> {
        self.rows()
            .filter(|row| row[2] > threshold)
            .filter_map(|row| {
                let Some(class_id) = class_index(row[1]) else {
                    log::warn!("skipping detection with invalid class id {}", row[1]);
                    return None;
                };
                Some(Detection {
                    class_id,
                    confidence: row[2],
                    bbox: NormalizedBox {
                        x1: row[3],
                        y1: row[4],
                        x2: row[5],
                        y2: row[6],
                    },
                })
            })
            .collect()
    }
}

/// Class ids arrive as floats; truncate like an integer cast and bounds-check.
fn class_index(raw: f32) -> Option<usize> {
    if !raw.is_finite() || raw < 0.0 {
        return None;
    }
    let idx = raw as usize;
    (idx < CLASS_COUNT).then_some(idx)
}
