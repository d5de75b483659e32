//! Typed views over [`SpectralData`] records.
//!
//! The store itself is stringly indexed; the solver inputs are not. Each
//! wrapper validates the `"main"` channel layout its role requires once at
//! construction, after which channel access is infallible.
//!
//! | role | layout |
//! |------|--------|
//! | [`CameraRecord`] | exactly `R`, `G`, `B` |
//! | [`IlluminantRecord`] | exactly `power` |
//! | [`ObserverRecord`] | exactly `X`, `Y`, `Z` |
//! | [`TrainingRecord`] | one or more reflectance patches |

use crate::{SpectralData, SpectralError, SpectralResult, Spectrum, MAIN_SET};

fn require_layout(data: &SpectralData, role: &str, channels: &[&str]) -> SpectralResult<()> {
    let main = data.main();
    if main.len() != channels.len() {
        return Err(SpectralError::InvalidLayout(format!(
            "{role} record needs {} channels in '{MAIN_SET}', found {}",
            channels.len(),
            main.len()
        )));
    }
    for &name in channels {
        data.channel(name)?;
    }
    Ok(())
}

/// Camera spectral sensitivities: `R`, `G`, `B` response curves.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraRecord {
    data: SpectralData,
}

impl CameraRecord {
    /// Validates the channel layout and wraps the record.
    pub fn from_data(data: SpectralData) -> SpectralResult<Self> {
        require_layout(&data, "camera", &["R", "G", "B"])?;
        Ok(Self { data })
    }

    /// Camera manufacturer from the record header.
    pub fn manufacturer(&self) -> &str {
        self.data.manufacturer.as_deref().unwrap_or("")
    }

    /// Camera model from the record header.
    pub fn model(&self) -> &str {
        self.data.model.as_deref().unwrap_or("")
    }

    /// Red channel response.
    pub fn red(&self) -> &Spectrum {
        self.data.channel("R").expect("validated at construction")
    }

    /// Green channel response.
    pub fn green(&self) -> &Spectrum {
        self.data.channel("G").expect("validated at construction")
    }

    /// Blue channel response.
    pub fn blue(&self) -> &Spectrum {
        self.data.channel("B").expect("validated at construction")
    }

    /// The underlying record.
    pub fn data(&self) -> &SpectralData {
        &self.data
    }
}

/// An illuminant's spectral power distribution.
#[derive(Debug, Clone, PartialEq)]
pub struct IlluminantRecord {
    data: SpectralData,
}

impl IlluminantRecord {
    /// Validates the channel layout and wraps the record.
    pub fn from_data(data: SpectralData) -> SpectralResult<Self> {
        require_layout(&data, "illuminant", &["power"])?;
        Ok(Self { data })
    }

    /// The illuminant tag, e.g. `"d55"` or `"3200k"`.
    pub fn tag(&self) -> &str {
        self.data.illuminant.as_deref().unwrap_or("")
    }

    /// The spectral power distribution.
    pub fn power(&self) -> &Spectrum {
        self.data.channel("power").expect("validated at construction")
    }

    /// Scales the power distribution in place.
    pub fn scale_power(&mut self, scale: f64) {
        let power = self
            .data
            .channel_mut("power")
            .expect("validated at construction");
        *power *= scale;
    }

    /// The underlying record.
    pub fn data(&self) -> &SpectralData {
        &self.data
    }
}

/// Observer colour matching functions: `X`, `Y`, `Z` curves.
#[derive(Debug, Clone, PartialEq)]
pub struct ObserverRecord {
    data: SpectralData,
}

impl ObserverRecord {
    /// Validates the channel layout and wraps the record.
    pub fn from_data(data: SpectralData) -> SpectralResult<Self> {
        require_layout(&data, "observer", &["X", "Y", "Z"])?;
        Ok(Self { data })
    }

    /// The X̄ colour matching function.
    pub fn x_bar(&self) -> &Spectrum {
        self.data.channel("X").expect("validated at construction")
    }

    /// The Ȳ colour matching function.
    pub fn y_bar(&self) -> &Spectrum {
        self.data.channel("Y").expect("validated at construction")
    }

    /// The Z̄ colour matching function.
    pub fn z_bar(&self) -> &Spectrum {
        self.data.channel("Z").expect("validated at construction")
    }
}

/// A training set of reflectance patches.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingRecord {
    data: SpectralData,
}

impl TrainingRecord {
    /// Validates that at least one patch is present and wraps the record.
    pub fn from_data(data: SpectralData) -> SpectralResult<Self> {
        if data.main().is_empty() {
            return Err(SpectralError::InvalidLayout(
                "training record has no reflectance patches".into(),
            ));
        }
        Ok(Self { data })
    }

    /// Number of reflectance patches.
    pub fn len(&self) -> usize {
        self.data.main().len()
    }

    /// True if the record holds no patches (never, once constructed).
    pub fn is_empty(&self) -> bool {
        self.data.main().is_empty()
    }

    /// Iterates the patches in file order.
    pub fn patches(&self) -> impl Iterator<Item = &Spectrum> {
        self.data.main().iter().map(|(_, s)| s)
    }
}
