//! The spectral IDT solver.
//!
//! Derives a 3x3 input device transform from measured camera spectral
//! sensitivities by simulating the camera and a reference observer viewing
//! a reflectance training set under a chosen illuminant, then fitting the
//! matrix that best maps the camera's responses onto the observer's, in
//! CIE L\*a\*b\* to weight errors perceptually.
//!
//! A solver is configured with a list of search directories holding
//! `camera/*.json` and `illuminant/*.json` records, plus observer and
//! training data. The usual sequence:
//!
//! ```text
//! find_camera -> load_observer/load_training
//!   -> find_illuminant (by name) + calculate_wb
//!      or find_illuminant_by_wb (from camera metadata)
//!   -> calculate_idt_matrix
//! ```
//!
//! Each row of the fitted matrix sums to exactly 1 by construction: the
//! optimisation variables are the first two entries of each row and the
//! third is their complement, so neutral camera values stay neutral.

use crate::{solve, NllsOptions, ResidualFn, SolverError, SolverResult};
use idt_colorimetry::{xyz_to_lab, ACES_RGB_TO_XYZ, ACES_WHITE_XYZ};
use idt_math::{cat_matrix, Mat3, Real, Vec3};
use idt_spectral::{
    blackbody_illuminant, daylight_illuminant, generate_illuminant, parse_illuminant_name,
    CameraRecord, IlluminantRecord, ObserverRecord, SpectralData, Spectrum, TrainingRecord,
};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

// ---------------------------------------------------------------------------
// Pipeline helpers
// ---------------------------------------------------------------------------

/// Scales the illuminant so the camera's dominant channel integrates to 1
/// against it.
///
/// The dominant channel is the one with the largest peak sensitivity.
/// Scaling is idempotent: applying it twice leaves the illuminant unchanged.
fn scale_illuminant(camera: &CameraRecord, illuminant: &mut IlluminantRecord) {
    let peaks = Vec3::new(
        camera.red().max(),
        camera.green().max(),
        camera.blue().max(),
    );
    let dominant = match peaks.argmax() {
        0 => camera.red(),
        1 => camera.green(),
        _ => camera.blue(),
    };

    let scale = 1.0 / (dominant * illuminant.power()).integrate();
    illuminant.scale_power(scale);
}

/// White-balance multipliers of `camera` under `illuminant`.
///
/// The illuminant is first normalised against the camera's dominant channel
/// (see [`scale_illuminant`]); the multipliers are `[g/r, 1, g/b]`, so the
/// green channel is always 1 by construction.
fn white_balance(camera: &CameraRecord, illuminant: &mut IlluminantRecord) -> [f64; 3] {
    scale_illuminant(camera, illuminant);

    let power = illuminant.power();
    let r = (camera.red() * power).integrate();
    let g = (camera.green() * power).integrate();
    let b = (camera.blue() * power).integrate();

    [g / r, 1.0, g / b]
}

/// Spectral radiances of the training patches under the illuminant.
fn training_radiances(illuminant: &IlluminantRecord, training: &TrainingRecord) -> Vec<Spectrum> {
    let power = illuminant.power();
    training.patches().map(|patch| patch * power).collect()
}

/// White-balanced linear camera responses to the training radiances.
fn camera_responses(
    camera: &CameraRecord,
    wb_multipliers: [f64; 3],
    radiances: &[Spectrum],
) -> Vec<[f64; 3]> {
    radiances
        .iter()
        .map(|radiance| {
            [
                (radiance * camera.red()).integrate() * wb_multipliers[0],
                (radiance * camera.green()).integrate() * wb_multipliers[1],
                (radiance * camera.blue()).integrate() * wb_multipliers[2],
            ]
        })
        .collect()
}

/// Observer tristimulus values of the training radiances, adapted from the
/// illuminant's white to the ACES white.
fn observer_tristimulus(
    observer: &ObserverRecord,
    illuminant: &IlluminantRecord,
    radiances: &[Spectrum],
) -> Vec<[f64; 3]> {
    let power = illuminant.power();

    let y_integral = (observer.y_bar() * power).integrate();
    let scale = 1.0 / y_integral;

    // The illuminant's adopted white, normalised to Y = 1.
    let white = Vec3::new(
        (observer.x_bar() * power).integrate() / y_integral,
        1.0,
        (observer.z_bar() * power).integrate() / y_integral,
    );
    let adapt = cat_matrix(white, ACES_WHITE_XYZ);

    radiances
        .iter()
        .map(|radiance| {
            let xyz = Vec3::new(
                (radiance * observer.x_bar()).integrate() * scale,
                (radiance * observer.y_bar()).integrate() * scale,
                (radiance * observer.z_bar()).integrate() * scale,
            );
            (adapt * xyz).to_array()
        })
        .collect()
}

/// Sum of squared relative errors between two multiplier triples.
fn relative_sse(predicted: &[f64; 3], target: &[f64; 3]) -> f64 {
    predicted
        .iter()
        .zip(target)
        .map(|(p, t)| (p / t - 1.0).powi(2))
        .sum()
}

// ---------------------------------------------------------------------------
// Fit objective
// ---------------------------------------------------------------------------

/// Expands the six optimisation variables into the row-sum-1 matrix.
fn expand_params<T: Real>(b: &[T; 6]) -> [[T; 3]; 3] {
    let one = T::from_f64(1.0);
    [
        [b[0], b[1], one - b[0] - b[1]],
        [b[2], b[3], one - b[2] - b[3]],
        [b[4], b[5], one - b[4] - b[5]],
    ]
}

/// L*a*b* residuals between the observer targets and the matrixed camera
/// responses.
struct IdtObjective {
    camera_rgb: Vec<[f64; 3]>,
    target_lab: Vec<[f64; 3]>,
}

impl ResidualFn<6> for IdtObjective {
    fn residuals<T: Real>(&self, params: &[T; 6]) -> Vec<T> {
        let m = expand_params(params);
        let aces = ACES_RGB_TO_XYZ.m;

        let mut residuals = Vec::with_capacity(self.camera_rgb.len() * 3);
        for (rgb, target) in self.camera_rgb.iter().zip(&self.target_lab) {
            let rgb = [
                T::from_f64(rgb[0]),
                T::from_f64(rgb[1]),
                T::from_f64(rgb[2]),
            ];

            // Camera RGB -> ACES RGB through the candidate matrix.
            let mut aces_rgb = [T::from_f64(0.0); 3];
            for i in 0..3 {
                aces_rgb[i] = m[i][0] * rgb[0] + m[i][1] * rgb[1] + m[i][2] * rgb[2];
            }

            // ACES RGB -> XYZ through the fixed primaries matrix.
            let mut xyz = [T::from_f64(0.0); 3];
            for i in 0..3 {
                xyz[i] = T::from_f64(aces[i][0]) * aces_rgb[0]
                    + T::from_f64(aces[i][1]) * aces_rgb[1]
                    + T::from_f64(aces[i][2]) * aces_rgb[2];
            }

            let lab = xyz_to_lab(xyz, ACES_WHITE_XYZ);
            for j in 0..3 {
                residuals.push(T::from_f64(target[j]) - lab[j]);
            }
        }
        residuals
    }
}

// ---------------------------------------------------------------------------
// Solver
// ---------------------------------------------------------------------------

/// Derives IDT matrices from camera spectral sensitivity data.
///
/// See the [module documentation](self) for the call sequence. Outputs are
/// left at identity until the corresponding calculation succeeds.
#[derive(Debug, Clone)]
pub struct SpectralSolver {
    search_directories: Vec<PathBuf>,

    /// Camera sensitivities, set by [`find_camera`](Self::find_camera) or
    /// [`set_camera`](Self::set_camera).
    camera: Option<CameraRecord>,
    /// Chosen illuminant, set by the `find_illuminant` family.
    illuminant: Option<IlluminantRecord>,
    /// Observer colour matching functions.
    observer: Option<ObserverRecord>,
    /// Reflectance training set.
    training: Option<TrainingRecord>,

    wb_multipliers: [f64; 3],
    idt_matrix: Mat3,

    // Illuminant pool for WB matching, built lazily.
    all_illuminants: Vec<IlluminantRecord>,
}

impl SpectralSolver {
    /// Creates a solver that resolves data files against `search_directories`.
    pub fn new(search_directories: Vec<PathBuf>) -> Self {
        Self {
            search_directories,
            camera: None,
            illuminant: None,
            observer: None,
            training: None,
            wb_multipliers: [1.0, 1.0, 1.0],
            idt_matrix: Mat3::IDENTITY,
            all_illuminants: Vec::new(),
        }
    }

    // -- data access --------------------------------------------------------

    /// The solved white-balance multipliers (identity until solved).
    pub fn wb_multipliers(&self) -> [f64; 3] {
        self.wb_multipliers
    }

    /// The solved IDT matrix (identity until solved).
    pub fn idt_matrix(&self) -> Mat3 {
        self.idt_matrix
    }

    /// The chosen illuminant, if any.
    pub fn illuminant(&self) -> Option<&IlluminantRecord> {
        self.illuminant.as_ref()
    }

    /// The loaded camera, if any.
    pub fn camera(&self) -> Option<&CameraRecord> {
        self.camera.as_ref()
    }

    /// Sets the camera record directly.
    pub fn set_camera(&mut self, camera: CameraRecord) {
        self.camera = Some(camera);
    }

    /// Sets the illuminant record directly.
    pub fn set_illuminant(&mut self, illuminant: IlluminantRecord) {
        self.illuminant = Some(illuminant);
    }

    /// Sets the observer record directly.
    pub fn set_observer(&mut self, observer: ObserverRecord) {
        self.observer = Some(observer);
    }

    /// Sets the training record directly.
    pub fn set_training(&mut self, training: TrainingRecord) {
        self.training = Some(training);
    }

    // -- file resolution ----------------------------------------------------

    /// All JSON files of a data type (`camera`, `illuminant`, ...) across
    /// the search directories.
    fn collect_data_files(&self, data_type: &str) -> Vec<PathBuf> {
        let mut result = Vec::new();

        for directory in &self.search_directories {
            if !directory.is_dir() {
                warn!(directory = %directory.display(), "database location is not a directory");
                continue;
            }

            let type_path = directory.join(data_type);
            let entries = match std::fs::read_dir(&type_path) {
                Ok(entries) => entries,
                Err(_) => {
                    warn!(directory = %type_path.display(), "data directory does not exist");
                    continue;
                }
            };

            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "json") {
                    result.push(path);
                }
            }
        }

        result
    }

    /// Loads a spectral data file, resolving relative paths against the
    /// search directories.
    pub fn load_spectral_data(&self, file_path: impl AsRef<Path>) -> SolverResult<SpectralData> {
        let file_path = file_path.as_ref();

        if file_path.is_absolute() {
            return Ok(SpectralData::load(file_path)?);
        }

        for directory in &self.search_directories {
            let candidate = directory.join(file_path);
            if candidate.exists() {
                return Ok(SpectralData::load(candidate)?);
            }
        }

        Err(SolverError::Spectral(idt_spectral::SpectralError::Io(
            std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("'{}' not found in any search directory", file_path.display()),
            ),
        )))
    }

    /// Loads the observer colour matching functions from a data file.
    pub fn load_observer(&mut self, file_path: impl AsRef<Path>) -> SolverResult<()> {
        let data = self.load_spectral_data(file_path)?;
        self.observer = Some(ObserverRecord::from_data(data)?);
        Ok(())
    }

    /// Loads the reflectance training set from a data file.
    pub fn load_training(&mut self, file_path: impl AsRef<Path>) -> SolverResult<()> {
        let data = self.load_spectral_data(file_path)?;
        self.training = Some(TrainingRecord::from_data(data)?);
        Ok(())
    }

    // -- lookups ------------------------------------------------------------

    /// Finds a camera record by make and model, case-insensitively.
    pub fn find_camera(&mut self, make: &str, model: &str) -> SolverResult<()> {
        for path in self.collect_data_files("camera") {
            let data = match SpectralData::load(&path) {
                Ok(data) => data,
                Err(error) => {
                    warn!(path = %path.display(), %error, "skipping unreadable camera file");
                    continue;
                }
            };

            let matches = data
                .manufacturer
                .as_deref()
                .is_some_and(|m| m.eq_ignore_ascii_case(make))
                && data.model.as_deref().is_some_and(|m| m.eq_ignore_ascii_case(model));
            if !matches {
                continue;
            }

            debug!(path = %path.display(), "camera record found");
            self.camera = Some(CameraRecord::from_data(data)?);
            return Ok(());
        }

        Err(SolverError::CameraNotFound {
            make: make.to_string(),
            model: model.to_string(),
        })
    }

    /// Finds an illuminant by name.
    ///
    /// Daylight (`d55`) and blackbody (`3200k`) names are synthesised;
    /// anything else is matched against the `illuminant` tag of the records
    /// in the search directories, case-insensitively.
    pub fn find_illuminant(&mut self, name: &str) -> SolverResult<()> {
        if parse_illuminant_name(name).is_some() {
            self.illuminant = Some(generate_illuminant(name)?);
            return Ok(());
        }

        for path in self.collect_data_files("illuminant") {
            let data = match SpectralData::load(&path) {
                Ok(data) => data,
                Err(error) => {
                    warn!(path = %path.display(), %error, "skipping unreadable illuminant file");
                    continue;
                }
            };

            if !data
                .illuminant
                .as_deref()
                .is_some_and(|tag| tag.eq_ignore_ascii_case(name))
            {
                continue;
            }

            self.illuminant = Some(IlluminantRecord::from_data(data)?);
            return Ok(());
        }

        Err(SolverError::IlluminantNotFound(name.to_string()))
    }

    /// Every known illuminant: generated daylights (4000 K to 25000 K in
    /// 500 K steps), generated blackbodies (1500 K to 4000 K in 500 K
    /// steps), and every record in the search directories.
    fn illuminant_pool(&mut self) -> &[IlluminantRecord] {
        if self.all_illuminants.is_empty() {
            let mut pool = Vec::new();

            for cct in (4000..=25000).step_by(500) {
                let tag = format!("d{}", cct / 100);
                pool.push(
                    daylight_illuminant(f64::from(cct), tag).expect("pool CCT in daylight band"),
                );
            }

            for cct in (1500..4000).step_by(500) {
                let tag = format!("{cct}k");
                pool.push(
                    blackbody_illuminant(f64::from(cct), tag).expect("pool CCT in blackbody band"),
                );
            }

            for path in self.collect_data_files("illuminant") {
                let record = SpectralData::load(&path)
                    .map_err(SolverError::from)
                    .and_then(|data| Ok(IlluminantRecord::from_data(data)?));
                match record {
                    Ok(record) => pool.push(record),
                    Err(error) => {
                        warn!(path = %path.display(), %error, "skipping unreadable illuminant file");
                    }
                }
            }

            self.all_illuminants = pool;
        }

        &self.all_illuminants
    }

    /// Chooses the illuminant whose predicted white-balance multipliers
    /// best match `wb`, by sum of squared relative errors.
    ///
    /// The matched illuminant and its predicted multipliers are retained,
    /// so a subsequent [`calculate_idt_matrix`](Self::calculate_idt_matrix)
    /// needs no further white-balance step.
    pub fn find_illuminant_by_wb(&mut self, wb: [f64; 3]) -> SolverResult<()> {
        let camera = self.camera.clone().ok_or(SolverError::Precondition {
            what: "camera",
            operation: "find_illuminant_by_wb",
        })?;

        let mut best: Option<(f64, IlluminantRecord, [f64; 3])> = None;

        for candidate in self.illuminant_pool() {
            let mut candidate = candidate.clone();
            let predicted = white_balance(&camera, &mut candidate);
            let sse = relative_sse(&predicted, &wb);

            if best.as_ref().map_or(true, |(best_sse, _, _)| sse < *best_sse) {
                best = Some((sse, candidate, predicted));
            }
        }

        let (sse, chosen, predicted) = best.expect("generated pool is never empty");
        info!(
            illuminant = chosen.tag(),
            sse, "best illuminant match for white-balance multipliers"
        );

        self.illuminant = Some(chosen);
        self.wb_multipliers = predicted;
        Ok(())
    }

    // -- calculations -------------------------------------------------------

    /// Computes white-balance multipliers for the configured camera and
    /// illuminant.
    ///
    /// Scales the stored illuminant as a side effect (the same scaling the
    /// IDT pipeline expects), then stores `[g/r, 1, g/b]`.
    pub fn calculate_wb(&mut self) -> SolverResult<()> {
        let camera = self.camera.as_ref().ok_or(SolverError::Precondition {
            what: "camera",
            operation: "calculate_wb",
        })?;
        let illuminant = self.illuminant.as_mut().ok_or(SolverError::Precondition {
            what: "illuminant",
            operation: "calculate_wb",
        })?;

        self.wb_multipliers = white_balance(camera, illuminant);
        Ok(())
    }

    /// Fits the IDT matrix for the configured camera, illuminant, observer,
    /// and training set.
    ///
    /// On success the matrix is stored (each row summing to exactly 1) and
    /// returned by [`idt_matrix`](Self::idt_matrix); on failure the stored
    /// matrix remains identity.
    pub fn calculate_idt_matrix(&mut self) -> SolverResult<()> {
        let camera = self.camera.as_ref().ok_or(SolverError::Precondition {
            what: "camera",
            operation: "calculate_idt_matrix",
        })?;
        let illuminant = self.illuminant.as_ref().ok_or(SolverError::Precondition {
            what: "illuminant",
            operation: "calculate_idt_matrix",
        })?;
        let observer = self.observer.as_ref().ok_or(SolverError::Precondition {
            what: "observer",
            operation: "calculate_idt_matrix",
        })?;
        let training = self.training.as_ref().ok_or(SolverError::Precondition {
            what: "training data",
            operation: "calculate_idt_matrix",
        })?;

        let radiances = training_radiances(illuminant, training);
        let camera_rgb = camera_responses(camera, self.wb_multipliers, &radiances);
        let target_lab = observer_tristimulus(observer, illuminant, &radiances)
            .into_iter()
            .map(|xyz| xyz_to_lab(xyz, ACES_WHITE_XYZ))
            .collect();

        let objective = IdtObjective { camera_rgb, target_lab };

        let mut params = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];
        let summary = solve(&objective, &mut params, &NllsOptions::default());

        if !summary.is_success() {
            warn!(
                iterations = summary.iterations,
                final_cost = summary.final_cost,
                "IDT fit made no successful step"
            );
            return Err(SolverError::SolveFailed);
        }

        let m = expand_params(&params);
        self.idt_matrix = Mat3::from_rows(m);

        info!(
            iterations = summary.iterations,
            final_cost = summary.final_cost,
            "IDT matrix solved"
        );
        Ok(())
    }

    // -- enumeration --------------------------------------------------------

    /// Lists `(make, model)` pairs of every readable camera record in the
    /// search directories.
    pub fn supported_cameras(&self) -> Vec<(String, String)> {
        let mut cameras = Vec::new();
        for path in self.collect_data_files("camera") {
            if let Ok(header) = SpectralData::load_header(&path) {
                if let (Some(make), Some(model)) = (header.manufacturer, header.model) {
                    cameras.push((make, model));
                }
            }
        }
        cameras.sort();
        cameras
    }

    /// Lists the illuminant tags of every readable illuminant record in the
    /// search directories.
    pub fn supported_illuminants(&self) -> Vec<String> {
        let mut illuminants = Vec::new();
        for path in self.collect_data_files("illuminant") {
            if let Ok(header) = SpectralData::load_header(&path) {
                if let Some(tag) = header.illuminant {
                    illuminants.push(tag);
                }
            }
        }
        illuminants.sort();
        illuminants
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use idt_spectral::{SpectralShape, MAIN_SET};

    /// A smooth bump centred on `peak` nanometres.
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

    fn synthetic_camera() -> CameraRecord {
        let mut data = SpectralData {
            manufacturer: Some("acme".into()),
            model: Some("starlight".into()),
            ..Default::default()
        };
        data.push_channel(MAIN_SET, "R", bump(600.0, 50.0, 0.9)).unwrap();
        data.push_channel(MAIN_SET, "G", bump(540.0, 45.0, 1.0)).unwrap();
        data.push_channel(MAIN_SET, "B", bump(460.0, 40.0, 0.8)).unwrap();
        CameraRecord::from_data(data).unwrap()
    }

    fn synthetic_observer() -> ObserverRecord {
        let mut data = SpectralData::default();
        // A loose stand-in for the 1931 CMFs: double-lobed X, single Y/Z.
        let x = {
            let a = bump(595.0, 40.0, 1.05);
            let b = bump(445.0, 25.0, 0.35);
            &a + &b
        };
        data.push_channel(MAIN_SET, "X", x).unwrap();
        data.push_channel(MAIN_SET, "Y", bump(555.0, 45.0, 1.0)).unwrap();
        data.push_channel(MAIN_SET, "Z", bump(450.0, 30.0, 1.7)).unwrap();
        ObserverRecord::from_data(data).unwrap()
    }

    fn synthetic_training(patches: usize) -> TrainingRecord {
        let mut data = SpectralData::default();
        for i in 0..patches {
            // Reflectances sweeping from blue-ish to red-ish, plus a ramp
            // in overall reflectivity.
            let peak = 420.0 + 340.0 * (i as f64) / (patches as f64 - 1.0);
            let gain = 0.2 + 0.6 * (i as f64) / (patches as f64 - 1.0);
            let base = bump(peak, 80.0, gain);
            let floor = Spectrum::from_values(SpectralShape::DEFAULT, vec![0.05; 81]).unwrap();
            data.push_channel(MAIN_SET, format!("patch_{i:03}"), &base + &floor)
                .unwrap();
        }
        TrainingRecord::from_data(data).unwrap()
    }

    fn configured_solver() -> SpectralSolver {
        let mut solver = SpectralSolver::new(vec![]);
        solver.set_camera(synthetic_camera());
        solver.set_observer(synthetic_observer());
        solver.set_training(synthetic_training(24));
        solver
    }

    #[test]
    fn test_wb_green_is_unity() {
        let mut solver = configured_solver();
        solver.find_illuminant("d55").unwrap();
        solver.calculate_wb().unwrap();

        let wb = solver.wb_multipliers();
        assert_eq!(wb[1], 1.0);
        assert!(wb[0] > 0.0 && wb[2] > 0.0);
    }

    #[test]
    fn test_wb_requires_camera_and_illuminant() {
        let mut solver = SpectralSolver::new(vec![]);
        assert!(matches!(
            solver.calculate_wb(),
            Err(SolverError::Precondition { what: "camera", .. })
        ));

        solver.set_camera(synthetic_camera());
        assert!(matches!(
            solver.calculate_wb(),
            Err(SolverError::Precondition { what: "illuminant", .. })
        ));
    }

    #[test]
    fn test_illuminant_scaling_is_idempotent() {
        let camera = synthetic_camera();
        let mut illuminant = generate_illuminant("d65").unwrap();

        scale_illuminant(&camera, &mut illuminant);
        let once: Vec<f64> = illuminant.power().values().to_vec();
        scale_illuminant(&camera, &mut illuminant);

        for (a, b) in once.iter().zip(illuminant.power().values()) {
            assert!((a - b).abs() < 1e-12);
        }
    }

    #[test]
    fn test_idt_requires_all_inputs() {
        let mut solver = configured_solver();
        // No illuminant chosen yet.
        assert!(matches!(
            solver.calculate_idt_matrix(),
            Err(SolverError::Precondition { what: "illuminant", .. })
        ));
        assert_eq!(solver.idt_matrix(), Mat3::IDENTITY);
    }

    #[test]
    fn test_idt_rows_sum_to_one() {
        let mut solver = configured_solver();
        solver.find_illuminant("d55").unwrap();
        solver.calculate_wb().unwrap();
        solver.calculate_idt_matrix().unwrap();

        let idt = solver.idt_matrix();
        assert_ne!(idt, Mat3::IDENTITY);
        for i in 0..3 {
            let row_sum: f64 = idt.m[i].iter().sum();
            // By construction (the third entry is the complement of the
            // first two), not just to solver tolerance.
            assert!((row_sum - 1.0).abs() < 1e-12, "row {i} sums to {row_sum}");
        }
    }

    #[test]
    fn test_idt_recovers_exactly_representable_matrix() {
        // When the observer targets are generated through a known
        // row-sum-1 matrix, the fit must recover it to solver precision.
        let camera = synthetic_camera();
        let illuminant = {
            let mut illuminant = generate_illuminant("d65").unwrap();
            scale_illuminant(&camera, &mut illuminant);
            illuminant
        };
        let training = synthetic_training(24);

        let truth = Mat3::from_rows([
            [0.85, 0.10, 0.05],
            [0.04, 1.06, -0.10],
            [0.02, -0.12, 1.10],
        ]);

        let wb = {
            let mut illuminant = illuminant.clone();
            white_balance(&camera, &mut illuminant)
        };
        let radiances = training_radiances(&illuminant, &training);
        let camera_rgb = camera_responses(&camera, wb, &radiances);
        let target_lab = camera_rgb
            .iter()
            .map(|rgb| {
                let mapped = truth * Vec3::from_array(*rgb);
                let xyz = ACES_RGB_TO_XYZ * mapped;
                xyz_to_lab(xyz.to_array(), ACES_WHITE_XYZ)
            })
            .collect();

        let objective = IdtObjective { camera_rgb, target_lab };
        let mut params = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];
        let summary = solve(&objective, &mut params, &NllsOptions::default());

        assert!(summary.is_success());
        let solved = Mat3::from_rows(expand_params(&params));
        for i in 0..3 {
            for j in 0..3 {
                assert!(
                    (solved.m[i][j] - truth.m[i][j]).abs() < 1e-6,
                    "solved {:?}",
                    solved
                );
            }
        }
    }

    #[test]
    fn test_find_illuminant_by_wb_is_idempotent() {
        // Feeding back the multipliers of a known illuminant must pick that
        // illuminant from the pool. 6500 K is on the pool's own grid, where
        // it carries the tag "d65".
        let mut solver = configured_solver();
        solver.find_illuminant("d6500").unwrap();
        solver.calculate_wb().unwrap();
        let wb = solver.wb_multipliers();

        let mut matched = configured_solver();
        matched.find_illuminant_by_wb(wb).unwrap();

        assert_eq!(matched.illuminant().unwrap().tag(), "d65");
        let rematched = matched.wb_multipliers();
        assert_eq!(rematched[1], 1.0);
        for (a, b) in wb.iter().zip(rematched) {
            assert!((a - b).abs() < 1e-9, "{a} vs {b}");
        }
    }

    #[test]
    fn test_find_illuminant_by_wb_requires_camera() {
        let mut solver = SpectralSolver::new(vec![]);
        assert!(matches!(
            solver.find_illuminant_by_wb([1.8, 1.0, 1.4]),
            Err(SolverError::Precondition { what: "camera", .. })
        ));
    }

    #[test]
    fn test_find_illuminant_unknown_name() {
        let mut solver = SpectralSolver::new(vec![]);
        assert!(matches!(
            solver.find_illuminant("studio-led"),
            Err(SolverError::IlluminantNotFound(_))
        ));
    }
}
