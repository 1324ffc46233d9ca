//! Custom assertions for testing

use std::fs;
use std::path::Path;

/// Assert that two floating point values are approximately equal
pub fn assert_approx_eq(left: f64, right: f64, tolerance: f64) {
    let diff = (left - right).abs();
    assert!(
        diff <= tolerance,
        "Values not approximately equal: {left} != {right} (diff: {diff}, tolerance: {tolerance})"
    );
}

/// Element-wise [`assert_approx_eq`]
pub fn assert_all_approx_eq(left: &[f64], right: &[f64], tolerance: f64) {
    assert_eq!(left.len(), right.len(), "length mismatch");
    for (l, r) in left.iter().zip(right) {
        assert_approx_eq(*l, *r, tolerance);
    }
}

/// Assert two files hold the same bytes
pub fn assert_same_bytes(left: &Path, right: &Path) {
    let l = fs::read(left).unwrap_or_else(|e| panic!("reading {}: {e}", left.display()));
    let r = fs::read(right).unwrap_or_else(|e| panic!("reading {}: {e}", right.display()));
    assert!(l == r, "{} and {} differ", left.display(), right.display());
}

/// Assert no file exists anywhere under `dir`
pub fn assert_no_files(dir: &Path) {
    if !dir.exists() {
        return;
    }
    for entry in fs::read_dir(dir).unwrap_or_else(|e| panic!("listing {}: {e}", dir.display())) {
        let path = entry.expect("directory entry").path();
        if path.is_dir() {
            assert_no_files(&path);
        } else {
            panic!("unexpected file {}", path.display());
        }
    }
}
