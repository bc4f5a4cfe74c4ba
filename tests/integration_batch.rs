//! Integration tests for directory batches.
//!
//! These tests write real image files and run them through listing,
//! pairing, decoding, scoring and reporting:
//! - End-to-end scores for known images
//! - Corrupt and empty files recorded as errors
//! - Batch-level precondition on mismatched directories

use image::{Rgb, RgbImage, Rgba, RgbaImage};
use pixel_similarity::core::batch::{BatchRunner, FailureKind};
use pixel_similarity::core::scanner::{pair_directories, PairBy, WalkDirScanner};
use pixel_similarity::core::scorer::ScorerConfig;
use pixel_similarity::error::BatchError;
use pixel_similarity::events::null_sender;
use pixel_similarity::{score_batch, score_files};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write_solid(dir: &Path, name: &str, width: u32, height: u32, value: u8) -> PathBuf {
    let path = dir.join(name);
    RgbImage::from_pixel(width, height, Rgb([value; 3]))
        .save(&path)
        .unwrap();
    path
}

fn paired(dir_a: &Path, dir_b: &Path, pair_by: PairBy) -> (Vec<PathBuf>, Vec<PathBuf>) {
    let pairs = pair_directories(
        &WalkDirScanner::default(),
        dir_a,
        dir_b,
        pair_by,
        &null_sender(),
    )
    .unwrap();
    (pairs.paths_a, pairs.paths_b)
}

#[test]
fn black_versus_white_files_score_zero() {
    let temp_dir = TempDir::new().unwrap();
    let black = write_solid(temp_dir.path(), "black.png", 2, 2, 0);
    let white = write_solid(temp_dir.path(), "white.png", 2, 2, 255);

    let score = score_files(&black, &white, ScorerConfig::default()).unwrap();

    assert_eq!(format!("{:.2}", score.similarity), "0.00");
    assert!(score.note().is_none());
}

#[test]
fn same_file_scores_one_hundred() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_solid(temp_dir.path(), "grey.png", 5, 3, 128);

    let score = score_files(&path, &path, ScorerConfig::default()).unwrap();

    assert_eq!(score.similarity, 100.0);
}

#[test]
fn alpha_only_changes_count_when_enabled() {
    let temp_dir = TempDir::new().unwrap();
    let opaque = temp_dir.path().join("opaque.png");
    let clear = temp_dir.path().join("clear.png");
    RgbaImage::from_pixel(4, 4, Rgba([10, 20, 30, 255]))
        .save(&opaque)
        .unwrap();
    RgbaImage::from_pixel(4, 4, Rgba([10, 20, 30, 0]))
        .save(&clear)
        .unwrap();

    let rgb = score_files(&opaque, &clear, ScorerConfig::new()).unwrap();
    let rgba = score_files(&opaque, &clear, ScorerConfig::new().include_alpha(true)).unwrap();

    assert_eq!(rgb.similarity, 100.0);
    assert_eq!(rgba.similarity, 75.0);
}

#[test]
fn directory_batch_reports_scores_and_errors() {
    let dir_a = TempDir::new().unwrap();
    let dir_b = TempDir::new().unwrap();

    write_solid(dir_a.path(), "01.png", 4, 4, 0);
    write_solid(dir_b.path(), "01.png", 4, 4, 0);

    write_solid(dir_a.path(), "02.png", 4, 4, 0);
    write_solid(dir_b.path(), "02.png", 4, 4, 255);

    write_solid(dir_a.path(), "03.png", 10, 10, 60);
    write_solid(dir_b.path(), "03.png", 20, 20, 60);

    write_solid(dir_a.path(), "04.png", 4, 4, 0);
    fs::write(dir_b.path().join("04.png"), b"this is not a valid image file").unwrap();

    let (paths_a, paths_b) = paired(dir_a.path(), dir_b.path(), PairBy::Index);
    let report = BatchRunner::builder()
        .threads(2)
        .build()
        .score_batch(&paths_a, &paths_b)
        .unwrap();

    assert_eq!(report.total, 4);
    assert_eq!(report.successful, 3);
    assert_eq!(report.errors.len() + report.successful, report.total);
    assert_eq!(report.failures[0].index, 3);
    assert_eq!(report.failures[0].kind, FailureKind::Load);
    assert_eq!(report.min, Some(0.0));
    assert_eq!(report.max, Some(100.0));
    assert_eq!(
        report.notes,
        vec!["pair 2: image B resized from 20x20 to 10x10".to_string()]
    );
    assert_eq!(report.status().to_string(), "3/4 succeeded");
}

#[test]
fn name_pairing_ignores_listing_order() {
    let dir_a = TempDir::new().unwrap();
    let dir_b = TempDir::new().unwrap();
    write_solid(dir_a.path(), "a.png", 3, 3, 9);
    write_solid(dir_a.path(), "b.png", 3, 3, 9);
    write_solid(dir_b.path(), "b.png", 3, 3, 9);
    write_solid(dir_b.path(), "c.png", 3, 3, 9);

    let (paths_a, paths_b) = paired(dir_a.path(), dir_b.path(), PairBy::Name);
    let report = score_batch(&paths_a, &paths_b).unwrap();

    assert_eq!(report.total, 1);
    assert_eq!(report.average, Some(100.0));
}

#[test]
fn uneven_directories_fail_the_batch() {
    let dir_a = TempDir::new().unwrap();
    let dir_b = TempDir::new().unwrap();
    write_solid(dir_a.path(), "1.png", 2, 2, 0);
    write_solid(dir_a.path(), "2.png", 2, 2, 0);
    write_solid(dir_b.path(), "1.png", 2, 2, 0);

    let (paths_a, paths_b) = paired(dir_a.path(), dir_b.path(), PairBy::Index);
    let result = score_batch(&paths_a, &paths_b);

    assert!(matches!(
        result,
        Err(BatchError::BatchSizeMismatch { left: 2, right: 1 })
    ));
}

#[test]
fn batch_of_unreadable_files_reports_no_successes() {
    let dir = TempDir::new().unwrap();
    let broken = dir.path().join("broken.png");
    fs::write(&broken, b"nope").unwrap();

    let report = score_batch(&[broken.clone()], &[broken]).unwrap();

    assert_eq!(report.successful, 0);
    assert_eq!(report.average, None);
    assert!(report
        .status()
        .to_string()
        .starts_with("no successful comparisons"));
}
