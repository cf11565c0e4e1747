//! End-to-end tests: STL files on disk through the batch driver.

use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use nalgebra::Point3;
use shellscan::io::stl;
use shellscan::prelude::*;
use shellscan::scan::{FileOutcome, Relocation};

// =============================================================================
// Fixtures
// =============================================================================

/// The 12 triangles of an axis-aligned cube with its minimum corner at `origin`.
fn cube(origin: [f64; 3], size: f64) -> Vec<[Point3<f64>; 3]> {
    let [x, y, z] = origin;
    let c = |i: usize| {
        Point3::new(
            x + size * (i & 1) as f64,
            y + size * ((i >> 1) & 1) as f64,
            z + size * ((i >> 2) & 1) as f64,
        )
    };
    // Corner bits: x = 1, y = 2, z = 4.
    let quads = [
        [0, 2, 3, 1], // bottom
        [4, 5, 7, 6], // top
        [0, 1, 5, 4], // front
        [2, 6, 7, 3], // back
        [0, 4, 6, 2], // left
        [1, 3, 7, 5], // right
    ];
    quads
        .iter()
        .flat_map(|q| [[c(q[0]), c(q[1]), c(q[2])], [c(q[0]), c(q[2]), c(q[3])]])
        .collect()
}

fn write_stl(dir: &Path, name: &str, triangles: &[[Point3<f64>; 3]]) {
    let mesh: TriangleMesh = weld_triangles(triangles);
    stl::save(&mesh, dir.join(name)).unwrap();
}

fn counting_listener() -> (ScanListener, Arc<AtomicUsize>, Arc<AtomicUsize>) {
    let lines = Arc::new(AtomicUsize::new(0));
    let failures = Arc::new(AtomicUsize::new(0));
    let (l, f) = (Arc::clone(&lines), Arc::clone(&failures));
    let listener = ScanListener::new(move |report| {
        l.fetch_add(1, Ordering::Relaxed);
        if matches!(report.outcome, FileOutcome::Failed(_)) {
            f.fetch_add(1, Ordering::Relaxed);
        }
    });
    (listener, lines, failures)
}

// =============================================================================
// Tests
// =============================================================================

#[test]
fn cube_files_are_classified() {
    let dir = tempfile::tempdir().unwrap();
    let mut pair = cube([0.0, 0.0, 0.0], 1.0);
    pair.extend(cube([3.0, 0.0, 0.0], 1.0));

    write_stl(dir.path(), "single.stl", &cube([0.0, 0.0, 0.0], 2.0));
    write_stl(dir.path(), "pair.STL", &pair);

    let summary =
        scan_directory(dir.path(), &ScanOptions::default(), &ScanListener::none()).unwrap();

    assert_eq!(summary.total, 2);
    assert_eq!(summary.single_shell, 1);
    assert_eq!(summary.multi_shell, 1);
    assert_eq!(summary.failed, 0);

    let shells: Vec<_> = summary
        .files
        .iter()
        .map(|r| (r.file_name().into_owned(), r.shells()))
        .collect();
    assert_eq!(
        shells,
        vec![
            ("pair.STL".to_string(), Some(2)),
            ("single.stl".to_string(), Some(1)),
        ]
    );
}

#[test]
fn broken_files_are_skipped_and_reported_once() {
    let dir = tempfile::tempdir().unwrap();
    write_stl(dir.path(), "a_good.stl", &cube([0.0, 0.0, 0.0], 1.0));

    // Truncated: valid header but the last record is cut short.
    let mut bytes = Vec::new();
    stl::write(&weld_triangles::<u32>(&cube([0.0, 0.0, 0.0], 1.0)), &mut bytes).unwrap();
    bytes.truncate(bytes.len() - 20);
    fs::write(dir.path().join("b_truncated.stl"), &bytes).unwrap();

    // Garbage shorter than a header.
    fs::write(dir.path().join("c_garbage.stl"), b"not a mesh").unwrap();

    // Parses, but contains no triangles.
    write_stl(dir.path(), "d_empty.stl", &[]);

    write_stl(dir.path(), "e_good.stl", &cube([5.0, 5.0, 5.0], 1.0));

    let (listener, lines, failures) = counting_listener();
    let summary = scan_directory(dir.path(), &ScanOptions::default(), &listener).unwrap();

    assert_eq!(summary.total, 2);
    assert_eq!(summary.single_shell, 2);
    assert_eq!(summary.multi_shell, 0);
    assert_eq!(summary.failed, 3);
    assert_eq!(lines.load(Ordering::Relaxed), 5);
    assert_eq!(failures.load(Ordering::Relaxed), 3);

    let reasons: Vec<_> = summary
        .failures()
        .map(|r| match &r.outcome {
            FileOutcome::Failed(MeshError::Parse { .. }) => "parse",
            FileOutcome::Failed(MeshError::EmptyMesh) => "empty",
            _ => "other",
        })
        .collect();
    assert_eq!(reasons, vec!["parse", "parse", "empty"]);

    // The file after the broken ones still got its ordinal.
    let last = summary.files.last().unwrap();
    assert_eq!(last.ordinal, Some(2));
}

#[test]
fn empty_directory_gives_zero_summary() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("readme.txt"), "nothing to see").unwrap();

    let summary =
        scan_directory(dir.path(), &ScanOptions::default(), &ScanListener::none()).unwrap();
    assert_eq!(summary.total, 0);
    assert_eq!(summary.multi_shell, 0);
    assert_eq!(summary.single_shell, 0);
    assert_eq!(summary.failed, 0);
    assert!(summary.files.is_empty());
}

#[test]
fn counters_always_add_up() {
    let dir = tempfile::tempdir().unwrap();
    for i in 0..6 {
        let mut triangles = Vec::new();
        for k in 0..(i % 3 + 1) {
            triangles.extend(cube([k as f64 * 4.0, 0.0, 0.0], 1.0));
        }
        write_stl(dir.path(), &format!("part_{}.stl", i), &triangles);
    }
    fs::write(dir.path().join("part_x.stl"), [0u8; 90]).unwrap();

    for options in [
        ScanOptions::default(),
        ScanOptions::default().with_sort(false),
        ScanOptions::default().with_parallel(true),
    ] {
        let summary = scan_directory(dir.path(), &options, &ScanListener::none()).unwrap();
        assert_eq!(summary.multi_shell + summary.single_shell, summary.total);
        assert_eq!(summary.total, 6);
        assert_eq!(summary.single_shell, 2);
        assert_eq!(summary.failed, 1);
    }
}

#[test]
fn quarantine_keeps_good_files_in_place() {
    let dir = tempfile::tempdir().unwrap();
    let mut pair = cube([0.0, 0.0, 0.0], 1.0);
    pair.extend(cube([0.0, 0.0, 2.0], 1.0));
    write_stl(dir.path(), "pair.stl", &pair);
    write_stl(dir.path(), "solid.stl", &cube([0.0, 0.0, 0.0], 1.0));

    let options = ScanOptions::default().with_quarantine("flagged");
    let summary = scan_directory(dir.path(), &options, &ScanListener::none()).unwrap();

    assert_eq!(summary.multi_shell, 1);
    assert!(dir.path().join("flagged").join("pair.stl").is_file());
    assert!(dir.path().join("solid.stl").is_file());

    // A second scan does not descend into the quarantine folder.
    let again = scan_directory(dir.path(), &options, &ScanListener::none()).unwrap();
    assert_eq!(again.total, 1);
    assert_eq!(again.multi_shell, 0);
    assert!(again.files.iter().all(|r| !matches!(
        r.outcome,
        FileOutcome::NeedsRepair { relocation: Relocation::Moved(_), .. }
    )));
}

#[test]
fn cubes_touching_at_a_corner() {
    let dir = tempfile::tempdir().unwrap();
    let mut touching = cube([0.0, 0.0, 0.0], 1.0);
    touching.extend(cube([1.0, 1.0, 1.0], 1.0));
    write_stl(dir.path(), "corner.stl", &touching);

    let by_edge =
        scan_directory(dir.path(), &ScanOptions::default(), &ScanListener::none()).unwrap();
    assert_eq!(by_edge.multi_shell, 1);

    let options = ScanOptions::default().with_connectivity(Connectivity::Vertex);
    let by_vertex = scan_directory(dir.path(), &options, &ScanListener::none()).unwrap();
    assert_eq!(by_vertex.single_shell, 1);
}

#[test]
fn file_vanishing_mid_scan_is_an_open_failure() {
    let dir = tempfile::tempdir().unwrap();
    write_stl(dir.path(), "a.stl", &cube([0.0, 0.0, 0.0], 1.0));
    write_stl(dir.path(), "b.stl", &cube([0.0, 0.0, 0.0], 1.0));
    write_stl(dir.path(), "c.stl", &cube([0.0, 0.0, 0.0], 1.0));

    // b.stl is listed as a candidate, then removed before it is opened.
    let doomed = dir.path().join("b.stl");
    let (counting, lines, failures) = counting_listener();
    let listener = ScanListener::new(move |report| {
        if report.file_name() == "a.stl" {
            fs::remove_file(&doomed).unwrap();
        }
        counting.notify(report);
    });

    let summary = scan_directory(dir.path(), &ScanOptions::default(), &listener).unwrap();

    assert_eq!(summary.total, 2);
    assert_eq!(summary.single_shell, 2);
    assert_eq!(summary.multi_shell, 0);
    assert_eq!(summary.failed, 1);
    assert_eq!(lines.load(Ordering::Relaxed), 3);
    assert_eq!(failures.load(Ordering::Relaxed), 1);

    let failed: Vec<_> = summary.failures().collect();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].file_name(), "b.stl");
    assert_eq!(failed[0].ordinal, None);
    assert!(matches!(
        &failed[0].outcome,
        FileOutcome::Failed(MeshError::Open { path, .. }) if path.ends_with("b.stl")
    ));
    assert_eq!(summary.files[2].ordinal, Some(2));
}
