//! Pascal-VOC-style annotation directory reader.
//!
//! This module supports the layout with an `images/` directory of JPEG
//! files and a `labels/` directory containing one XML file per image, same
//! base name. Each XML file holds zero or more `<object>` elements with a
//! `<name>` and a `<bndbox>` of `xmin`/`ymin`/`xmax`/`ymax` pixel
//! coordinates.
//!
//! Image width and height are read from the image files themselves, not
//! from the XML, so a `<size>` element is neither required nor trusted.

use std::collections::BTreeSet;
use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use roxmltree::Node;
use walkdir::WalkDir;

use super::accumulate::Accumulator;
use super::model::{AnnotationRecord, ImageRecord, TrainingSet};
use super::read_image_dimensions;
use crate::error::AnnofeedError;

const IMAGE_EXTENSION: &str = "jpg";

/// Options for structured-directory ingestion.
#[derive(Clone, Debug)]
pub struct VocIngestOptions {
    /// Classes to retain; objects of any other class are discarded at
    /// parse time. `None` keeps every class.
    ///
    /// The historical loader hardcoded a `person`-only filter; exposing it
    /// here is a deliberate generalization, with the default preserving
    /// the original behavior.
    pub keep_classes: Option<BTreeSet<String>>,
}

impl Default for VocIngestOptions {
    fn default() -> Self {
        Self {
            keep_classes: Some(BTreeSet::from(["person".to_string()])),
        }
    }
}

impl VocIngestOptions {
    /// Keep every class (disables the allow-list).
    pub fn keep_all() -> Self {
        Self { keep_classes: None }
    }

    fn retains(&self, class_name: &str) -> bool {
        match &self.keep_classes {
            Some(keep) => keep.contains(class_name),
            None => true,
        }
    }
}

/// Read an `images/` + `labels/` annotation directory into a
/// [`TrainingSet`].
///
/// Annotation files whose paired image is missing from `images/` are
/// skipped whole. Malformed XML, a missing field, or an undecodable image
/// aborts the ingestion.
pub fn read_voc_dir(root: &Path, options: &VocIngestOptions) -> Result<TrainingSet, AnnofeedError> {
    let layout = discover_layout(root)?;
    let label_files = collect_label_files(&layout.labels_dir)?;

    let mut acc = Accumulator::new();
    let mut object_count: usize = 0;

    println!("Parsing annotation files");

    for label_path in label_files {
        let objects = parse_label_xml(&label_path)?;

        let Some(stem) = label_path.file_stem() else {
            continue;
        };
        let image_name = format!("{}.{}", stem.to_string_lossy(), IMAGE_EXTENSION);
        let image_path = layout.images_dir.join(&image_name);

        // The paired image must exist; otherwise the whole annotation file
        // is dropped.
        if !image_path.exists() {
            continue;
        }

        for object in objects {
            if !options.retains(&object.name) {
                continue;
            }

            object_count += 1;
            print!("\ridx={object_count}");
            let _ = std::io::stdout().flush();

            acc.record_class(&object.name);

            let image_index = match acc.image_index(&image_name) {
                Some(index) => index,
                None => {
                    let (width, height) = read_image_dimensions(&image_path)?;
                    let record =
                        ImageRecord::new(image_path.to_string_lossy().into_owned(), width, height);
                    acc.insert_image(&image_name, record)
                }
            };

            acc.push_bbox(
                image_index,
                AnnotationRecord::new(
                    object.name,
                    object.xmin,
                    object.ymin,
                    object.xmax,
                    object.ymax,
                ),
            );
        }
    }

    if object_count > 0 {
        println!();
    }

    Ok(acc.finish())
}

#[derive(Clone, Debug)]
struct VocLayout {
    images_dir: PathBuf,
    labels_dir: PathBuf,
}

#[derive(Debug)]
struct ParsedObject {
    name: String,
    xmin: i32,
    ymin: i32,
    xmax: i32,
    ymax: i32,
}

fn discover_layout(root: &Path) -> Result<VocLayout, AnnofeedError> {
    if !root.is_dir() {
        return Err(AnnofeedError::VocLayoutInvalid {
            path: root.to_path_buf(),
            message: "input must be a directory".to_string(),
        });
    }

    let images_dir = root.join("images");
    let labels_dir = root.join("labels");

    if !labels_dir.is_dir() {
        return Err(AnnofeedError::VocLayoutInvalid {
            path: root.to_path_buf(),
            message: "expected a labels/ directory under the dataset root".to_string(),
        });
    }
    if !images_dir.is_dir() {
        return Err(AnnofeedError::VocLayoutInvalid {
            path: root.to_path_buf(),
            message: "expected an images/ directory under the dataset root".to_string(),
        });
    }

    Ok(VocLayout {
        images_dir,
        labels_dir,
    })
}

/// Enumerate annotation files in `labels/`, flat, skipping dotfiles.
///
/// Files are sorted by name so ingestion order does not depend on the
/// filesystem's directory-entry order.
fn collect_label_files(dir: &Path) -> Result<Vec<PathBuf>, AnnofeedError> {
    let mut files = Vec::new();

    for entry in fs::read_dir(dir).map_err(AnnofeedError::Io)? {
        let entry = entry.map_err(AnnofeedError::Io)?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let hidden = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.starts_with('.'));
        if hidden {
            continue;
        }
        files.push(path);
    }

    files.sort_by_cached_key(|path| {
        path.file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default()
    });

    let mut nested = Vec::new();
    for entry in WalkDir::new(dir).follow_links(true).min_depth(2) {
        let entry = entry.map_err(|source| AnnofeedError::VocLayoutInvalid {
            path: dir.to_path_buf(),
            message: format!("failed while traversing labels directory: {source}"),
        })?;
        if entry.file_type().is_file() {
            nested.push(entry.path().to_path_buf());
        }
    }

    if !nested.is_empty() {
        eprintln!(
            "Warning: labels/ is scanned flat (non-recursive); skipping {} nested file(s)",
            nested.len()
        );
    }

    Ok(files)
}

fn parse_label_xml(path: &Path) -> Result<Vec<ParsedObject>, AnnofeedError> {
    let xml = fs::read_to_string(path).map_err(AnnofeedError::Io)?;
    parse_label_xml_str(&xml, path)
}

fn parse_label_xml_str(xml: &str, path: &Path) -> Result<Vec<ParsedObject>, AnnofeedError> {
    let document = roxmltree::Document::parse(xml).map_err(|source| AnnofeedError::VocXmlParse {
        path: path.to_path_buf(),
        message: source.to_string(),
    })?;

    let mut objects = Vec::new();
    for object in document
        .descendants()
        .filter(|node| node.is_element() && node.tag_name().name() == "object")
    {
        let name = required_child_text(object, "name", path, "<object>")?;
        let bndbox = required_child_element(object, "bndbox", path, "<object>")?;

        let xmin = parse_required_i32(bndbox, "xmin", path, "<bndbox>")?;
        let ymin = parse_required_i32(bndbox, "ymin", path, "<bndbox>")?;
        let xmax = parse_required_i32(bndbox, "xmax", path, "<bndbox>")?;
        let ymax = parse_required_i32(bndbox, "ymax", path, "<bndbox>")?;

        objects.push(ParsedObject {
            name,
            xmin,
            ymin,
            xmax,
            ymax,
        });
    }

    Ok(objects)
}

fn required_child_element<'a, 'input>(
    node: Node<'a, 'input>,
    tag: &str,
    path: &Path,
    context: &str,
) -> Result<Node<'a, 'input>, AnnofeedError> {
    child_element(node, tag).ok_or_else(|| AnnofeedError::VocXmlParse {
        path: path.to_path_buf(),
        message: format!("missing <{tag}> in {context}"),
    })
}

fn required_child_text(
    node: Node<'_, '_>,
    tag: &str,
    path: &Path,
    context: &str,
) -> Result<String, AnnofeedError> {
    optional_child_text(node, tag).ok_or_else(|| AnnofeedError::VocXmlParse {
        path: path.to_path_buf(),
        message: format!("missing <{tag}> in {context}"),
    })
}

fn parse_required_i32(
    node: Node<'_, '_>,
    tag: &str,
    path: &Path,
    context: &str,
) -> Result<i32, AnnofeedError> {
    let raw = required_child_text(node, tag, path, context)?;
    raw.parse::<i32>().map_err(|_| AnnofeedError::VocXmlParse {
        path: path.to_path_buf(),
        message: format!("invalid <{tag}> value '{raw}' in {context}; expected integer"),
    })
}

fn child_element<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|child| child.is_element() && child.tag_name().name() == tag)
}

fn optional_child_text(node: Node<'_, '_>, tag: &str) -> Option<String> {
    child_element(node, tag)
        .and_then(|child| child.text())
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(ToOwned::to_owned)
}
