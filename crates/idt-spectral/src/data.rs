//! The named spectral-data store and its JSON codec.
//!
//! A [`SpectralData`] record maps set names to ordered sequences of named
//! [`Spectrum`] channels. The only set the solvers consume is `"main"`;
//! its layout depends on the record's role (camera sensitivities carry
//! `R`/`G`/`B`, illuminants a single `power`, observers `X`/`Y`/`Z`, and
//! training sets one channel per reflectance patch).
//!
//! # File format
//!
//! ```json
//! {
//!   "header": {
//!     "manufacturer": "...", "model": "...", "illuminant": "...",
//!     "spectral_shape": { "start": 380, "end": 780, "step": 5 }
//!   },
//!   "spectral_data": {
//!     "units": "relative",
//!     "index": { "main": ["R", "G", "B"] },
//!     "data": { "R": [ ... 81 floats ... ], "G": [...], "B": [...] }
//!   }
//! }
//! ```
//!
//! Sample counts are validated against the declared shape at load time;
//! channels listed in the index must be present in `data`.

use crate::{SpectralError, SpectralResult, SpectralShape, Spectrum};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Name of the set every solver input reads.
pub const MAIN_SET: &str = "main";

/// A named collection of spectra plus identifying header attributes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpectralData {
    /// Camera manufacturer (camera records only).
    pub manufacturer: Option<String>,
    /// Camera model (camera records only).
    pub model: Option<String>,
    /// Illuminant tag, e.g. `"d55"` or `"3200k"` (illuminant records only).
    pub illuminant: Option<String>,
    /// Measurement units, carried through verbatim.
    pub units: Option<String>,
    /// Wavelength grid shared by every channel in the record.
    pub shape: SpectralShape,
    pub sets: BTreeMap<String, Vec<(String, Spectrum)>>,
}

// ---------------------------------------------------------------------------
// JSON schema mirror
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize, Default)]
struct HeaderSchema {
    #[serde(skip_serializing_if = "Option::is_none")]
    manufacturer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    illuminant: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    units: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    spectral_shape: Option<SpectralShape>,
}

#[derive(Debug, Serialize, Deserialize)]
struct DataSchema {
    #[serde(skip_serializing_if = "Option::is_none")]
    units: Option<String>,
    index: BTreeMap<String, Vec<String>>,
    data: BTreeMap<String, Vec<f64>>,
}

#[derive(Debug, Serialize, Deserialize)]
struct FileSchema {
    header: HeaderSchema,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    spectral_data: Option<DataSchema>,
}

impl SpectralData {
    /// Creates an empty record over the default shape.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a record from a JSON file, validating the spectral payload.
    pub fn load(path: impl AsRef<Path>) -> SpectralResult<Self> {
        Self::load_impl(path.as_ref(), true)
    }

    /// Loads only the identifying header of a record.
    ///
    /// Used to enumerate supported cameras and illuminants without paying
    /// for full payload validation. A `spectral_data` section is parsed if
    /// present but not required.
    pub fn load_header(path: impl AsRef<Path>) -> SpectralResult<Self> {
        Self::load_impl(path.as_ref(), false)
    }

    fn load_impl(path: &Path, strict: bool) -> SpectralResult<Self> {
        let content = fs::read_to_string(path)?;
        let file: FileSchema = serde_json::from_str(&content)?;

        let shape = file.header.spectral_shape.unwrap_or_default();
        if shape.step <= 0 || shape.end < shape.start {
            return Err(SpectralError::Schema(format!(
                "invalid spectral_shape ({}..{} step {})",
                shape.start, shape.end, shape.step
            )));
        }
        let mut record = Self {
            manufacturer: file.header.manufacturer,
            model: file.header.model,
            illuminant: file.header.illuminant,
            units: file.header.units,
            shape,
            sets: BTreeMap::new(),
        };

        let payload = match file.spectral_data {
            Some(payload) => payload,
            None if strict => {
                return Err(SpectralError::Schema(format!(
                    "'{}' has no spectral_data section",
                    path.display()
                )));
            }
            None => return Ok(record),
        };

        if payload.units.is_some() {
            record.units = payload.units;
        }

        for (set_name, channel_names) in payload.index {
            let mut channels = Vec::with_capacity(channel_names.len());
            for name in channel_names {
                let values = payload.data.get(&name).ok_or_else(|| {
                    SpectralError::Schema(format!(
                        "channel '{name}' is listed in index.{set_name} but missing from data"
                    ))
                })?;
                let spectrum =
                    Spectrum::from_values(shape, values.clone()).map_err(|e| match e {
                        SpectralError::ShapeMismatch { expected, actual, .. } => {
                            SpectralError::ShapeMismatch {
                                channel: name.clone(),
                                expected,
                                actual,
                            }
                        }
                        other => other,
                    })?;
                channels.push((name, spectrum));
            }
            record.sets.insert(set_name, channels);
        }

        Ok(record)
    }

    /// Writes the record back out as JSON.
    ///
    /// The output round-trips: loading the written file reproduces this
    /// record exactly.
    pub fn save(&self, path: impl AsRef<Path>) -> SpectralResult<()> {
        let mut index = BTreeMap::new();
        let mut data = BTreeMap::new();
        for (set_name, channels) in &self.sets {
            index.insert(
                set_name.clone(),
                channels.iter().map(|(name, _)| name.clone()).collect(),
            );
            for (name, spectrum) in channels {
                data.insert(name.clone(), spectrum.values().to_vec());
            }
        }

        let file = FileSchema {
            header: HeaderSchema {
                manufacturer: self.manufacturer.clone(),
                model: self.model.clone(),
                illuminant: self.illuminant.clone(),
                units: None,
                spectral_shape: Some(self.shape),
            },
            spectral_data: Some(DataSchema {
                units: self.units.clone(),
                index,
                data,
            }),
        };

        let json = serde_json::to_string_pretty(&file)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// The ordered channels of a named set, or `None` if the set is absent.
    pub fn set(&self, name: &str) -> Option<&[(String, Spectrum)]> {
        self.sets.get(name).map(Vec::as_slice)
    }

    /// The ordered channels of the `"main"` set (empty if absent).
    pub fn main(&self) -> &[(String, Spectrum)] {
        self.set(MAIN_SET).unwrap_or(&[])
    }

    /// Looks up a channel of the `"main"` set by name.
    pub fn channel(&self, name: &str) -> SpectralResult<&Spectrum> {
        self.main()
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, s)| s)
            .ok_or_else(|| SpectralError::MissingChannel(name.to_string()))
    }

    /// Mutable lookup of a channel of the `"main"` set.
    pub fn channel_mut(&mut self, name: &str) -> SpectralResult<&mut Spectrum> {
        self.sets
            .get_mut(MAIN_SET)
            .and_then(|channels| channels.iter_mut().find(|(n, _)| n == name))
            .map(|(_, s)| s)
            .ok_or_else(|| SpectralError::MissingChannel(name.to_string()))
    }

    /// Appends a channel to a set, validating its shape against the record.
    pub fn push_channel(
        &mut self,
        set: &str,
        name: impl Into<String>,
        spectrum: Spectrum,
    ) -> SpectralResult<()> {
        let name = name.into();
        if spectrum.shape() != self.shape {
            return Err(SpectralError::ShapeMismatch {
                channel: name,
                expected: self.shape.sample_count(),
                actual: spectrum.shape().sample_count(),
            });
        }
        self.sets.entry(set.to_string()).or_default().push((name, spectrum));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat(value: f64) -> Spectrum {
        Spectrum::from_values(SpectralShape::DEFAULT, vec![value; 81]).unwrap()
    }

    fn camera_record() -> SpectralData {
        let mut record = SpectralData {
            manufacturer: Some("acme".into()),
            model: Some("model-x".into()),
            units: Some("relative".into()),
            ..Default::default()
        };
        record.push_channel(MAIN_SET, "R", flat(0.3)).unwrap();
        record.push_channel(MAIN_SET, "G", flat(0.6)).unwrap();
        record.push_channel(MAIN_SET, "B", flat(0.2)).unwrap();
        record
    }

    #[test]
    fn test_channel_lookup() {
        let record = camera_record();
        assert_eq!(record.channel("G").unwrap().values()[0], 0.6);
        assert!(matches!(
            record.channel("A"),
            Err(SpectralError::MissingChannel(_))
        ));
    }

    #[test]
    fn test_main_preserves_order() {
        let record = camera_record();
        let names: Vec<&str> = record.main().iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, ["R", "G", "B"]);
    }

    #[test]
    fn test_push_channel_rejects_wrong_shape() {
        let mut record = SpectralData::new();
        let odd = Spectrum::zeros(SpectralShape { start: 400, end: 700, step: 10 });
        assert!(matches!(
            record.push_channel(MAIN_SET, "R", odd),
            Err(SpectralError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_save_load_round_trip() {
        let record = camera_record();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("camera.json");

        record.save(&path).unwrap();
        let reloaded = SpectralData::load(&path).unwrap();

        assert_eq!(record, reloaded);
    }

    #[test]
    fn test_strict_load_requires_payload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("header_only.json");
        fs::write(&path, r#"{ "header": { "manufacturer": "acme", "model": "m" } }"#).unwrap();

        assert!(matches!(
            SpectralData::load(&path),
            Err(SpectralError::Schema(_))
        ));

        let header = SpectralData::load_header(&path).unwrap();
        assert_eq!(header.manufacturer.as_deref(), Some("acme"));
        assert!(header.main().is_empty());
    }

    #[test]
    fn test_load_rejects_degenerate_shape() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("degenerate.json");
        fs::write(
            &path,
            r#"{ "header": { "spectral_shape": { "start": 380, "end": 780, "step": 0 } } }"#,
        )
        .unwrap();

        assert!(matches!(
            SpectralData::load_header(&path),
            Err(SpectralError::Schema(_))
        ));
    }

    #[test]
    fn test_load_rejects_missing_indexed_channel() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(
            &path,
            r#"{
                "header": { "spectral_shape": { "start": 380, "end": 780, "step": 5 } },
                "spectral_data": {
                    "index": { "main": ["power"] },
                    "data": {}
                }
            }"#,
        )
        .unwrap();

        assert!(matches!(
            SpectralData::load(&path),
            Err(SpectralError::Schema(_))
        ));
    }

    #[test]
    fn test_load_rejects_wrong_sample_count() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("short.json");
        let samples: Vec<String> = (0..10).map(|_| "1.0".to_string()).collect();
        fs::write(
            &path,
            format!(
                r#"{{
                    "header": {{ "spectral_shape": {{ "start": 380, "end": 780, "step": 5 }} }},
                    "spectral_data": {{
                        "index": {{ "main": ["power"] }},
                        "data": {{ "power": [{}] }}
                    }}
                }}"#,
                samples.join(", ")
            ),
        )
        .unwrap();

        assert!(matches!(
            SpectralData::load(&path),
            Err(SpectralError::ShapeMismatch { expected: 81, actual: 10, .. })
        ));
    }
}
