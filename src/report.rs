//! Ingest summary report and terminal formatting.
//!
//! The report is observational only: it summarizes what a completed
//! ingestion produced, as text (Display) or JSON (Serialize).

use serde::Serialize;
use std::fmt;

use crate::ingest::TrainingSet;

/// Summary of one ingestion run.
#[derive(Clone, Debug, Serialize)]
pub struct IngestReport {
    /// Summary counts for the ingested data.
    pub summary: SummarySection,
    /// Per-class table, sorted by class index.
    pub classes: Vec<ClassEntry>,
}

/// Summary counts for the ingested data.
#[derive(Clone, Debug, Default, Serialize)]
pub struct SummarySection {
    /// Number of registered images.
    pub images: usize,
    /// Total number of retained annotation records.
    pub annotations: usize,
    /// Number of distinct classes.
    pub classes: usize,
}

/// One class with its dense index and occurrence count.
#[derive(Clone, Debug, Serialize)]
pub struct ClassEntry {
    /// Dense class index.
    pub index: usize,
    /// Class name.
    pub name: String,
    /// Number of annotation records with this class.
    pub count: usize,
}

impl IngestReport {
    /// Build a report from an ingested training set.
    pub fn from_training_set(set: &TrainingSet) -> Self {
        let mut classes: Vec<ClassEntry> = set
            .class_mapping
            .iter()
            .map(|(name, &index)| ClassEntry {
                index,
                name: name.clone(),
                count: set.class_counts.get(name).copied().unwrap_or(0),
            })
            .collect();
        classes.sort_by_key(|entry| entry.index);

        let summary = SummarySection {
            images: set.images.len(),
            annotations: set.total_boxes(),
            classes: set.class_mapping.len(),
        };

        Self { summary, classes }
    }
}

impl fmt::Display for IngestReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Ingest summary")?;
        writeln!(f, "  images:      {}", self.summary.images)?;
        writeln!(f, "  annotations: {}", self.summary.annotations)?;
        writeln!(f, "  classes:     {}", self.summary.classes)?;

        if !self.classes.is_empty() {
            writeln!(f)?;
            writeln!(f, "  idx  class                 count")?;
            for entry in &self.classes {
                writeln!(f, "  {:<4} {:<21} {}", entry.index, entry.name, entry.count)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::{AnnotationRecord, ImageRecord};

    fn sample_set() -> TrainingSet {
        let mut image = ImageRecord::new("images/img1.jpg", 640, 480);
        image
            .bboxes
            .push(AnnotationRecord::new("person", 1, 2, 3, 4));
        image.bboxes.push(AnnotationRecord::new("car", 5, 6, 7, 8));

        let mut set = TrainingSet {
            images: vec![image],
            ..Default::default()
        };
        set.class_counts.insert("person".to_string(), 1);
        set.class_counts.insert("car".to_string(), 1);
        set.class_mapping.insert("person".to_string(), 0);
        set.class_mapping.insert("car".to_string(), 1);
        set
    }

    #[test]
    fn report_counts_and_class_table_sorted_by_index() {
        let report = IngestReport::from_training_set(&sample_set());

        assert_eq!(report.summary.images, 1);
        assert_eq!(report.summary.annotations, 2);
        assert_eq!(report.summary.classes, 2);

        assert_eq!(report.classes[0].name, "person");
        assert_eq!(report.classes[0].index, 0);
        assert_eq!(report.classes[1].name, "car");
        assert_eq!(report.classes[1].count, 1);
    }

    #[test]
    fn report_renders_text() {
        let report = IngestReport::from_training_set(&sample_set());
        let text = report.to_string();

        assert!(text.contains("Ingest summary"));
        assert!(text.contains("images:      1"));
        assert!(text.contains("person"));
    }
}
