//! Integration tests for scanning.
//!
//! These tests verify end-to-end scan behavior including:
//! - Duplicate and low-quality detection
//! - Unreadable files and missing roots
//! - Determinism and idempotence

use image::{DynamicImage, ImageBuffer, ImageFormat, Luma};
use image_hygiene::core::pipeline::{CancellationToken, Scanner};
use image_hygiene::error::ScanError;
use image_hygiene::{scan, HygieneError};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use tempfile::TempDir;

#[derive(Clone, Copy)]
enum Layout {
    BrightLeft,
    BrightTop,
}

/// Sharp image: a hard edge plus a fine checkerboard, saved as PNG bytes
fn create_sharp_image(path: &Path, layout: Layout) {
    let img = ImageBuffer::from_fn(64, 64, |x, y| {
        let bright = match layout {
            Layout::BrightLeft => x < 32,
            Layout::BrightTop => y < 32,
        };
        let base: i32 = if bright { 200 } else { 60 };
        let noise = if (x + y) % 2 == 0 { 40 } else { -40 };
        Luma([(base + noise) as u8])
    });
    DynamicImage::ImageLuma8(img)
        .save_with_format(path, ImageFormat::Png)
        .unwrap();
}

/// Blurry image: a smooth diagonal gradient
fn create_blurry_image(path: &Path) {
    let img = ImageBuffer::from_fn(64, 64, |x, y| Luma([(x + y) as u8]));
    DynamicImage::ImageLuma8(img)
        .save_with_format(path, ImageFormat::Png)
        .unwrap();
}

fn create_file(path: &Path, content: &[u8]) {
    let mut file = File::create(path).unwrap();
    file.write_all(content).unwrap();
}

#[test]
fn finds_copy_and_blurry_image() {
    let temp_dir = TempDir::new().unwrap();
    let a = temp_dir.path().join("a.jpg");
    let b = temp_dir.path().join("b.jpg");
    let c = temp_dir.path().join("c.jpg");
    create_sharp_image(&a, Layout::BrightLeft);
    fs::copy(&a, &b).unwrap();
    create_blurry_image(&c);

    let report = scan(temp_dir.path()).unwrap();

    assert_eq!(report.total_images, 3);
    assert_eq!(report.duplicates.len(), 1);
    assert_eq!(report.duplicates[0].original, a);
    assert_eq!(report.duplicates[0].duplicate, b);
    assert_eq!(report.low_quality.len(), 1);
    assert_eq!(report.low_quality[0].file, c);
    assert!(report.low_quality[0].blur_score < 100.0);
    assert!(report.deleted_files.is_none());

    // Scanning never touches the files
    assert!(a.exists() && b.exists() && c.exists());
}

#[test]
fn nested_folders_are_scanned() {
    let temp_dir = TempDir::new().unwrap();
    let nested = temp_dir.path().join("2023").join("holiday");
    fs::create_dir_all(&nested).unwrap();

    let a = temp_dir.path().join("a.png");
    create_sharp_image(&a, Layout::BrightLeft);
    fs::copy(&a, nested.join("a.png")).unwrap();

    let report = scan(temp_dir.path()).unwrap();

    assert_eq!(report.total_images, 2);
    assert_eq!(report.duplicates.len(), 1);
    assert_eq!(report.duplicates[0].duplicate, nested.join("a.png"));
}

#[test]
fn distinct_images_form_no_pairs() {
    let temp_dir = TempDir::new().unwrap();
    create_sharp_image(&temp_dir.path().join("left.png"), Layout::BrightLeft);
    create_sharp_image(&temp_dir.path().join("top.png"), Layout::BrightTop);

    let report = scan(temp_dir.path()).unwrap();

    assert_eq!(report.total_images, 2);
    assert!(report.duplicates.is_empty());
    assert!(report.low_quality.is_empty());
}

#[test]
fn corrupt_file_still_counts() {
    let temp_dir = TempDir::new().unwrap();
    create_sharp_image(&temp_dir.path().join("good.png"), Layout::BrightLeft);
    create_file(
        &temp_dir.path().join("corrupt.jpg"),
        b"this is not a valid image file",
    );

    let report = scan(temp_dir.path()).unwrap();

    assert_eq!(report.total_images, 2);
    assert!(report.duplicates.is_empty());
    assert_eq!(report.unreadable.len(), 1);
    assert_eq!(report.unreadable[0].file, temp_dir.path().join("corrupt.jpg"));
}

#[test]
fn non_image_files_are_ignored() {
    let temp_dir = TempDir::new().unwrap();
    create_sharp_image(&temp_dir.path().join("photo.png"), Layout::BrightLeft);
    create_file(&temp_dir.path().join("notes.txt"), b"not an image");
    create_file(&temp_dir.path().join("README"), b"no extension");

    let report = scan(temp_dir.path()).unwrap();
    assert_eq!(report.total_images, 1);
}

#[test]
fn uppercase_extensions_match() {
    let temp_dir = TempDir::new().unwrap();
    create_sharp_image(&temp_dir.path().join("IMG_001.PNG"), Layout::BrightLeft);
    fs::copy(
        temp_dir.path().join("IMG_001.PNG"),
        temp_dir.path().join("IMG_002.JPG"),
    )
    .unwrap();

    let report = scan(temp_dir.path()).unwrap();
    assert_eq!(report.total_images, 2);
    assert_eq!(report.duplicates.len(), 1);
}

#[test]
fn hidden_files_can_be_excluded() {
    let temp_dir = TempDir::new().unwrap();
    create_sharp_image(&temp_dir.path().join("a.png"), Layout::BrightLeft);
    fs::copy(temp_dir.path().join("a.png"), temp_dir.path().join(".b.png")).unwrap();

    let with_hidden = scan(temp_dir.path()).unwrap();
    assert_eq!(with_hidden.total_images, 2);

    let scanner = Scanner::builder().include_hidden(false).build().unwrap();
    let without_hidden = scanner.run(temp_dir.path()).unwrap();
    assert_eq!(without_hidden.total_images, 1);
    assert!(without_hidden.duplicates.is_empty());
}

#[test]
fn missing_root_is_an_error() {
    let result = scan("/nonexistent/path/that/does/not/exist");
    assert!(matches!(
        result,
        Err(HygieneError::Scan(ScanError::RootNotFound { .. }))
    ));
}

#[test]
fn file_root_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let file = temp_dir.path().join("a.png");
    create_sharp_image(&file, Layout::BrightLeft);

    let result = scan(&file);
    assert!(matches!(
        result,
        Err(HygieneError::Scan(ScanError::NotADirectory { .. }))
    ));
}

#[test]
fn scan_is_idempotent() {
    let temp_dir = TempDir::new().unwrap();
    create_sharp_image(&temp_dir.path().join("a.png"), Layout::BrightLeft);
    fs::copy(temp_dir.path().join("a.png"), temp_dir.path().join("b.png")).unwrap();
    create_blurry_image(&temp_dir.path().join("c.png"));

    let first = scan(temp_dir.path()).unwrap();
    let second = scan(temp_dir.path()).unwrap();

    assert_eq!(first, second);
}

#[test]
fn results_do_not_depend_on_thread_count() {
    let temp_dir = TempDir::new().unwrap();
    create_sharp_image(&temp_dir.path().join("a.png"), Layout::BrightLeft);
    create_sharp_image(&temp_dir.path().join("m.png"), Layout::BrightTop);
    for name in ["b.png", "c.png", "d.png", "e.png"] {
        fs::copy(temp_dir.path().join("a.png"), temp_dir.path().join(name)).unwrap();
    }
    fs::copy(temp_dir.path().join("m.png"), temp_dir.path().join("z.png")).unwrap();

    let baseline = Scanner::builder().threads(1).build().unwrap();
    let expected = baseline.run(temp_dir.path()).unwrap();
    assert_eq!(expected.duplicates.len(), 5);

    for threads in [2, 4, 8] {
        let scanner = Scanner::builder().threads(threads).build().unwrap();
        assert_eq!(scanner.run(temp_dir.path()).unwrap(), expected);
    }
}

#[test]
fn custom_threshold_changes_low_quality() {
    let temp_dir = TempDir::new().unwrap();
    create_blurry_image(&temp_dir.path().join("c.png"));

    let lenient = Scanner::builder().sharpness_threshold(0.0).build().unwrap();
    assert!(lenient.run(temp_dir.path()).unwrap().low_quality.is_empty());

    let default = scan(temp_dir.path()).unwrap();
    assert_eq!(default.low_quality.len(), 1);
}

#[test]
fn cancelled_scan_returns_no_report() {
    let temp_dir = TempDir::new().unwrap();
    create_sharp_image(&temp_dir.path().join("a.png"), Layout::BrightLeft);

    let token = CancellationToken::new();
    let scanner = Scanner::builder().cancellation(token.clone()).build().unwrap();
    token.cancel();

    assert!(matches!(
        scanner.run(temp_dir.path()),
        Err(ScanError::Cancelled)
    ));
}

#[cfg(unix)]
#[test]
fn unreadable_subfolder_is_skipped() {
    use std::os::unix::fs::PermissionsExt;

    let temp_dir = TempDir::new().unwrap();
    create_sharp_image(&temp_dir.path().join("a.png"), Layout::BrightLeft);
    let private = temp_dir.path().join("private");
    fs::create_dir(&private).unwrap();
    create_sharp_image(&private.join("b.png"), Layout::BrightTop);
    fs::set_permissions(&private, fs::Permissions::from_mode(0o000)).unwrap();

    // Root ignores permission bits; nothing to test there.
    if fs::read_dir(&private).is_ok() {
        fs::set_permissions(&private, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let report = scan(temp_dir.path()).unwrap();
    fs::set_permissions(&private, fs::Permissions::from_mode(0o755)).unwrap();

    assert_eq!(report.total_images, 1);
    assert_eq!(report.walk_errors.len(), 1);
}

#[cfg(target_os = "linux")]
#[test]
fn non_utf8_file_name_keeps_the_report_serializable() {
    use image_hygiene::ScanResponse;
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let temp_dir = TempDir::new().unwrap();
    let a = temp_dir.path().join("a.png");
    create_sharp_image(&a, Layout::BrightLeft);
    let odd = temp_dir.path().join(OsStr::from_bytes(b"b\xff.png"));
    fs::copy(&a, &odd).unwrap();

    let report = scan(temp_dir.path()).unwrap();
    assert_eq!(report.duplicates.len(), 1);

    let json = serde_json::to_string(&ScanResponse::from(report)).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["summary"]["duplicates_found"], 1);
    assert!(value["details"]["duplicates"][0]["duplicate"]
        .as_str()
        .unwrap()
        .ends_with("b\u{FFFD}.png"));
}
