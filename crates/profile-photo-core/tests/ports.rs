//! Driving a batch through the source and output ports.

#![allow(clippy::unwrap_used)]

use profile_photo_core::domain::{PhotoMetadata, PhotoUpload};
use profile_photo_core::ports::{PhotoSource, ResultOutput};
use profile_photo_core::PhotoAnalyzer;
use profile_photo_test_support::{
    FaceBuilder, MockPhotoSource, MockResultOutput, SyntheticImageBuilder,
};

fn write_all(output: &dyn ResultOutput, source: &dyn PhotoSource) {
    let photos = source.photos().map(Result::unwrap);
    let batch = PhotoAnalyzer::default().analyze_batch(photos);
    for entry in &batch.entries {
        output.write_entry(entry).unwrap();
    }
    output.write_summary(&batch.summary).unwrap();
    output.flush().unwrap();
}

#[test]
fn test_source_to_output() {
    let img = SyntheticImageBuilder::portrait_scene(180, 240);
    let source = MockPhotoSource::new(vec![
        PhotoUpload::new("portrait", SyntheticImageBuilder::png(&img)).with_metadata(
            PhotoMetadata::with_faces(vec![FaceBuilder::portrait(180, 240)]),
        ),
        PhotoUpload::new("empty", Vec::new()),
    ]);
    let output = MockResultOutput::new();

    write_all(&output, &source);

    assert_eq!(source.iteration_count(), 1);
    assert_eq!(output.flush_count(), 1);

    let entries = output.entries();
    assert_eq!(entries.len(), 2);
    assert!(entries[0].success);
    assert!(!entries[1].success);
    assert!(entries[1].error.as_deref().unwrap().contains("empty"));

    let summaries = output.summaries();
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].best_photo_id.as_deref(), Some("portrait"));
}

#[test]
fn test_empty_source() {
    let source = MockPhotoSource::empty();
    let output = MockResultOutput::new();

    write_all(&output, &source);

    assert!(output.entries().is_empty());
    assert_eq!(output.summaries()[0].total, 0);
    assert_eq!(source.count_hint(), Some(0));
}
