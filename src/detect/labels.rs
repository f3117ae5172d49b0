/// Number of classes MobileNet-SSD (PASCAL VOC) was trained on, background included.
pub const CLASS_COUNT: usize = 21;

/// Class labels indexed by the class id the network reports. Index 0 is background.
pub const CLASS_LABELS: [&str; CLASS_COUNT] = [
    "background",
    "aeroplane",
    "bicycle",
    "bird",
    "boat",
    "bottle",
    "bus",
    "car",
    "cat",
    "chair",
    "cow",
    "diningtable",
    "dog",
    "horse",
    "motorbike",
    "person",
    "pottedplant",
    "sheep",
    "sofa",
    "train",
    "tvmonitor",
];

/// Label for a class id, `None` when the id is out of range.
pub fn class_label(class_id: usize) -> Option<&'static str> {
    CLASS_LABELS.get(class_id).copied()
}
