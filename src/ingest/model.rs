//! Record types for the unified in-memory annotation representation.
//!
//! Readers for every source format produce the same [`TrainingSet`] shape,
//! so the downstream training pipeline never sees format-specific details.
//!
//! Construction is deliberately permissive: a bounding box with `x1 >= x2`
//! or `y1 >= y2` is representable and is passed through untouched.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Reserved pseudo-class for hard-negative background regions.
///
/// When present, it is always assigned the highest class index so the
/// model's background slot is last.
pub const BACKGROUND_CLASS: &str = "bg";

/// One labeled object instance: a class name and a pixel-space box with
/// `(x1, y1)` the top-left corner and `(x2, y2)` the bottom-right corner.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationRecord {
    /// Class name of the labeled object.
    pub class_name: String,
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl AnnotationRecord {
    /// Creates a new annotation record.
    pub fn new(class_name: impl Into<String>, x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self {
            class_name: class_name.into(),
            x1,
            y1,
            x2,
            y2,
        }
    }
}

/// Dataset-split tag attached to an image by flat-file ingestion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageSet {
    Trainval,
    Test,
}

impl fmt::Display for ImageSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageSet::Trainval => write!(f, "trainval"),
            ImageSet::Test => write!(f, "test"),
        }
    }
}

/// One image together with every labeled object found for it.
///
/// Width and height come from the decoded image file, never from
/// annotation metadata.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ImageRecord {
    /// Path of the image file as it should be opened by the trainer.
    pub filepath: String,

    /// Width of the image in pixels.
    pub width: u32,

    /// Height of the image in pixels.
    pub height: u32,

    /// Labeled objects, in the order they were read.
    pub bboxes: Vec<AnnotationRecord>,

    /// Split tag, present only for flat-file ingestion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imageset: Option<ImageSet>,
}

impl ImageRecord {
    /// Creates a new image record with no annotations.
    pub fn new(filepath: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            filepath: filepath.into(),
            width,
            height,
            bboxes: Vec::new(),
            imageset: None,
        }
    }

    /// Sets the dataset-split tag for this image.
    pub fn with_imageset(mut self, imageset: ImageSet) -> Self {
        self.imageset = Some(imageset);
        self
    }
}

/// The full result of one ingestion run.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TrainingSet {
    /// Image records in first-registration order.
    pub images: Vec<ImageRecord>,

    /// Class name to number of retained object instances.
    pub class_counts: BTreeMap<String, usize>,

    /// Class name to dense index, assigned in first-seen order. If
    /// [`BACKGROUND_CLASS`] is present it holds the highest index.
    pub class_mapping: BTreeMap<String, usize>,
}

impl TrainingSet {
    /// Total number of annotation records across all images.
    pub fn total_boxes(&self) -> usize {
        self.images.iter().map(|image| image.bboxes.len()).sum()
    }
}
