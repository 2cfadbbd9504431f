//! Keyed accumulator shared by both ingestion operations.

use std::collections::{BTreeMap, HashMap};

use super::model::{AnnotationRecord, ImageRecord, TrainingSet, BACKGROUND_CLASS};

/// Accumulates per-object records into a [`TrainingSet`].
///
/// Image metadata is fixed at first registration; later records for the
/// same key only append boxes. Class indices are handed out densely in
/// first-seen order, and [`Accumulator::finish`] moves the background
/// pseudo-class to the top index.
#[derive(Debug, Default)]
pub(crate) struct Accumulator {
    images: Vec<ImageRecord>,
    index_by_key: HashMap<String, usize>,
    class_counts: BTreeMap<String, usize>,
    class_mapping: BTreeMap<String, usize>,
    found_bg: bool,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one object of `class_name`, assigning the next dense index if
    /// the class has not been seen before. Prints a one-time notice when
    /// the background pseudo-class is first encountered.
    pub fn record_class(&mut self, class_name: &str) {
        *self.class_counts.entry(class_name.to_string()).or_insert(0) += 1;

        if !self.class_mapping.contains_key(class_name) {
            if class_name == BACKGROUND_CLASS && !self.found_bg {
                println!(
                    "Found class name with special name bg. Will be treated as a \
                     background region (this is usually for hard negative mining)."
                );
                self.found_bg = true;
            }
            let next_index = self.class_mapping.len();
            self.class_mapping.insert(class_name.to_string(), next_index);
        }
    }

    /// Index of the image registered under `key`, if any.
    pub fn image_index(&self, key: &str) -> Option<usize> {
        self.index_by_key.get(key).copied()
    }

    /// Register a new image under `key` and return its index.
    pub fn insert_image(&mut self, key: &str, record: ImageRecord) -> usize {
        let index = self.images.len();
        self.images.push(record);
        self.index_by_key.insert(key.to_string(), index);
        index
    }

    /// Append a box to the image at `index`.
    pub fn push_bbox(&mut self, index: usize, bbox: AnnotationRecord) {
        self.images[index].bboxes.push(bbox);
    }

    /// Finalize the accumulated data.
    ///
    /// If the background pseudo-class was seen and does not already hold
    /// the maximum index, it is swapped with the unique class that does.
    /// All other indices are untouched. Indices are a dense permutation of
    /// `0..count`, so the holder of the maximum index is unique.
    pub fn finish(mut self) -> TrainingSet {
        if self.found_bg {
            let last = self.class_mapping.len() - 1;
            if let Some(&bg_index) = self.class_mapping.get(BACKGROUND_CLASS) {
                if bg_index != last {
                    let key_to_switch = self
                        .class_mapping
                        .iter()
                        .find(|(_, &index)| index == last)
                        .map(|(name, _)| name.clone());
                    if let Some(key_to_switch) = key_to_switch {
                        self.class_mapping.insert(key_to_switch, bg_index);
                        self.class_mapping
                            .insert(BACKGROUND_CLASS.to_string(), last);
                    }
                }
            }
        }

        TrainingSet {
            images: self.images,
            class_counts: self.class_counts,
            class_mapping: self.class_mapping,
        }
    }
}
