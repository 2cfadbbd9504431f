//! Flat annotation file reader.
//!
//! One object per line, comma-separated:
//!
//! ```text
//! filename,x1,y1,x2,y2,class_name
//! ```
//!
//! Coordinates may be floating-point text and are truncated toward zero.
//! Unlike the structured-directory reader there is no class filter, and
//! `filename` is opened literally with no existence pre-check: an
//! unreadable image is the only failure mode for a bad path. A line with
//! the wrong number of fields aborts the ingestion.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use rand::rngs::StdRng;
use rand::{Rng, RngExt, SeedableRng};
use serde::Deserialize;

use super::accumulate::Accumulator;
use super::model::{AnnotationRecord, ImageRecord, ImageSet, TrainingSet};
use super::read_image_dimensions;
use crate::error::AnnofeedError;

/// A single line of the flat annotation format.
#[derive(Debug, Deserialize)]
struct FlatRow {
    filename: String,
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    class_name: String,
}

/// Read a flat annotation file into a [`TrainingSet`].
///
/// Every distinct image is assigned a dataset-split tag when first seen:
/// `trainval` with probability 5/6, `test` with 1/6. Pass a `seed` to make
/// the assignment reproducible.
pub fn read_flat_csv(path: &Path, seed: Option<u64>) -> Result<TrainingSet, AnnofeedError> {
    match seed {
        Some(seed) => read_with_rng(path, &mut StdRng::seed_from_u64(seed)),
        None => read_with_rng(path, &mut rand::rng()),
    }
}

fn read_with_rng<R: Rng>(path: &Path, rng: &mut R) -> Result<TrainingSet, AnnofeedError> {
    let file = File::open(path).map_err(AnnofeedError::Io)?;
    let reader = BufReader::new(file);

    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut acc = Accumulator::new();

    println!("Parsing annotation files");

    for result in csv_reader.deserialize() {
        let row: FlatRow = result.map_err(|source| AnnofeedError::FlatCsvParse {
            path: path.to_path_buf(),
            source,
        })?;

        acc.record_class(&row.class_name);

        let image_index = match acc.image_index(&row.filename) {
            Some(index) => index,
            None => {
                let (width, height) = read_image_dimensions(Path::new(&row.filename))?;
                let record = ImageRecord::new(row.filename.clone(), width, height)
                    .with_imageset(draw_imageset(rng));
                acc.insert_image(&row.filename, record)
            }
        };

        acc.push_bbox(
            image_index,
            AnnotationRecord::new(
                row.class_name,
                row.x1 as i32,
                row.y1 as i32,
                row.x2 as i32,
                row.y2 as i32,
            ),
        );
    }

    Ok(acc.finish())
}

/// Draw the per-image split tag: trainval 5/6, test 1/6.
fn draw_imageset<R: Rng>(rng: &mut R) -> ImageSet {
    if rng.random_range(0..6) > 0 {
        ImageSet::Trainval
    } else {
        ImageSet::Test
    }
}
