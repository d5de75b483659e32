//! End-to-end spectral solver runs against an on-disk data tree.
//!
//! Builds a miniature database (camera, measured illuminant, observer,
//! training set) in a temp directory and drives the solver the way the
//! command-line front end does.

use idt_math::Mat3;
use idt_solver::{SolverError, SpectralSolver};
use idt_spectral::{SpectralData, SpectralShape, Spectrum, MAIN_SET};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn bump(peak: f64, width: f64, gain: f64) -> Spectrum {
    let shape = SpectralShape::DEFAULT;
    let values = shape
        .wavelengths()
        .map(|wl| {
            let t = (f64::from(wl) - peak) / width;
            gain * (-t * t).exp()
        })
        .collect();
    Spectrum::from_values(shape, values).unwrap()
}

fn flat(value: f64) -> Spectrum {
    Spectrum::from_values(SpectralShape::DEFAULT, vec![value; 81]).unwrap()
}

/// Lays out `camera/`, `illuminant/`, `cmf/`, and `training/` underneath a
/// temp directory, in the same shape a real database uses.
fn write_database() -> TempDir {
    let dir = TempDir::new().unwrap();

    fs::create_dir(dir.path().join("camera")).unwrap();
    fs::create_dir(dir.path().join("illuminant")).unwrap();
    fs::create_dir(dir.path().join("cmf")).unwrap();
    fs::create_dir(dir.path().join("training")).unwrap();

    let mut camera = SpectralData {
        manufacturer: Some("Acme".into()),
        model: Some("Starlight S1".into()),
        units: Some("relative".into()),
        ..Default::default()
    };
    camera.push_channel(MAIN_SET, "R", bump(600.0, 50.0, 0.9)).unwrap();
    camera.push_channel(MAIN_SET, "G", bump(540.0, 45.0, 1.0)).unwrap();
    camera.push_channel(MAIN_SET, "B", bump(460.0, 40.0, 0.8)).unwrap();
    camera.save(dir.path().join("camera/acme_starlight_s1.json")).unwrap();

    // A warm measured source, deliberately not expressible as a daylight
    // or blackbody name.
    let mut studio = SpectralData {
        illuminant: Some("studio-tungsten".into()),
        ..Default::default()
    };
    let warm_values = SpectralShape::DEFAULT
        .wavelengths()
        .map(|wl| 0.2 + 0.8 * (f64::from(wl) - 380.0) / 400.0)
        .collect();
    studio
        .push_channel(
            MAIN_SET,
            "power",
            Spectrum::from_values(SpectralShape::DEFAULT, warm_values).unwrap(),
        )
        .unwrap();
    studio.save(dir.path().join("illuminant/studio_tungsten.json")).unwrap();

    let mut observer = SpectralData::default();
    let x = &bump(595.0, 40.0, 1.05) + &bump(445.0, 25.0, 0.35);
    observer.push_channel(MAIN_SET, "X", x).unwrap();
    observer.push_channel(MAIN_SET, "Y", bump(555.0, 45.0, 1.0)).unwrap();
    observer.push_channel(MAIN_SET, "Z", bump(450.0, 30.0, 1.7)).unwrap();
    observer.save(dir.path().join("cmf/cmf_synth.json")).unwrap();

    let mut training = SpectralData::default();
    for i in 0..24 {
        let peak = 420.0 + 340.0 * f64::from(i) / 23.0;
        let gain = 0.2 + 0.6 * f64::from(i) / 23.0;
        let patch = &bump(peak, 80.0, gain) + &flat(0.05);
        training
            .push_channel(MAIN_SET, format!("patch_{i:03}"), patch)
            .unwrap();
    }
    training.save(dir.path().join("training/training_synth.json")).unwrap();

    dir
}

fn solver_for(dir: &TempDir) -> SpectralSolver {
    SpectralSolver::new(vec![dir.path().to_path_buf()])
}

#[test]
fn finds_camera_case_insensitively() {
    let dir = write_database();
    let mut solver = solver_for(&dir);

    solver.find_camera("acme", "starlight s1").unwrap();
    assert_eq!(solver.camera().unwrap().manufacturer(), "Acme");

    assert!(matches!(
        solver.find_camera("acme", "other"),
        Err(SolverError::CameraNotFound { .. })
    ));
}

#[test]
fn finds_measured_illuminant_by_tag() {
    let dir = write_database();
    let mut solver = solver_for(&dir);

    solver.find_illuminant("Studio-Tungsten").unwrap();
    assert_eq!(solver.illuminant().unwrap().tag(), "studio-tungsten");
}

#[test]
fn solves_idt_from_files() {
    let dir = write_database();
    let mut solver = solver_for(&dir);

    solver.find_camera("acme", "starlight s1").unwrap();
    solver.load_observer("cmf/cmf_synth.json").unwrap();
    solver.load_training("training/training_synth.json").unwrap();

    solver.find_illuminant("studio-tungsten").unwrap();
    solver.calculate_wb().unwrap();
    solver.calculate_idt_matrix().unwrap();

    let wb = solver.wb_multipliers();
    assert_eq!(wb[1], 1.0);

    let idt = solver.idt_matrix();
    assert_ne!(idt, Mat3::IDENTITY);
    for i in 0..3 {
        let row_sum: f64 = idt.m[i].iter().sum();
        assert!((row_sum - 1.0).abs() < 1e-12);
    }
}

#[test]
fn wb_match_prefers_the_measured_source() {
    let dir = write_database();

    // Multipliers computed under the measured source...
    let mut reference = solver_for(&dir);
    reference.find_camera("acme", "starlight s1").unwrap();
    reference.find_illuminant("studio-tungsten").unwrap();
    reference.calculate_wb().unwrap();
    let wb = reference.wb_multipliers();

    // ...must select that source over every generated candidate.
    let mut matched = solver_for(&dir);
    matched.find_camera("acme", "starlight s1").unwrap();
    matched.find_illuminant_by_wb(wb).unwrap();
    assert_eq!(matched.illuminant().unwrap().tag(), "studio-tungsten");
}

#[test]
fn enumerates_supported_hardware() {
    let dir = write_database();
    let solver = solver_for(&dir);

    assert_eq!(
        solver.supported_cameras(),
        vec![("Acme".to_string(), "Starlight S1".to_string())]
    );
    assert_eq!(solver.supported_illuminants(), vec!["studio-tungsten".to_string()]);
}

#[test]
fn missing_relative_file_reports_not_found() {
    let dir = write_database();
    let mut solver = solver_for(&dir);

    let error = solver.load_observer("cmf/no_such_file.json").unwrap_err();
    assert!(error.to_string().contains("not found"));
}

#[test]
fn search_paths_resolve_in_order() {
    let dir = write_database();
    let empty = TempDir::new().unwrap();

    // An empty directory ahead of the real one only produces warnings.
    let mut solver = SpectralSolver::new(vec![
        empty.path().to_path_buf(),
        dir.path().to_path_buf(),
    ]);
    solver.find_camera("acme", "starlight s1").unwrap();

    let data: SpectralData = solver.load_spectral_data(PathBuf::from("cmf/cmf_synth.json")).unwrap();
    assert!(!data.main().is_empty());
}
