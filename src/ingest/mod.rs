//! Annotation ingestion: format readers and the unified record types.
//!
//! Both readers produce the same [`TrainingSet`] shape:
//!
//! - [`read_voc_dir`]: a dataset root with `images/` and `labels/`
//!   subdirectories, one Pascal-VOC-style XML file per image.
//! - [`read_flat_csv`]: a flat text file with one
//!   `filename,x1,y1,x2,y2,class_name` record per line.
//!
//! Ingestion is a one-shot batch scan: the first I/O or parse failure
//! aborts it, so a training run never starts from a partially read
//! dataset.

mod accumulate;
pub mod flat_csv;
mod model;
pub mod voc_dir;

pub use flat_csv::read_flat_csv;
pub use model::{AnnotationRecord, ImageRecord, ImageSet, TrainingSet, BACKGROUND_CLASS};
pub use voc_dir::{read_voc_dir, VocIngestOptions};

use std::path::Path;

use crate::error::AnnofeedError;

/// Read pixel dimensions `(width, height)` from an image file.
pub(crate) fn read_image_dimensions(path: &Path) -> Result<(u32, u32), AnnofeedError> {
    let size = imagesize::size(path).map_err(|source| AnnofeedError::ImageDimensionRead {
        path: path.to_path_buf(),
        source,
    })?;

    Ok((size.width as u32, size.height as u32))
}
