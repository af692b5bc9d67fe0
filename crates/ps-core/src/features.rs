use std::collections::HashMap;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::{Result, Stage};
use crate::numeric::ensure_finite;

/// Mean spectral centroid (Hz).
pub const FO: &str = "MDVP:Fo(Hz)";
/// Maximum spectral centroid (Hz).
pub const FHI: &str = "MDVP:Fhi(Hz)";
/// Minimum spectral centroid (Hz).
pub const FLO: &str = "MDVP:Flo(Hz)";
/// Jitter proxy: mean zero-crossing rate.
pub const JITTER_PERCENT: &str = "MDVP:Jitter(%)";
/// Jitter proxy / 100.
pub const JITTER_ABS: &str = "MDVP:Jitter(Abs)";
/// Jitter proxy / 2.
pub const RAP: &str = "MDVP:RAP";
/// Jitter proxy / 4.
pub const PPQ: &str = "MDVP:PPQ";
/// Jitter proxy × 3.
pub const DDP: &str = "Jitter:DDP";
/// Shimmer proxy: mean short-term RMS energy.
pub const SHIMMER: &str = "MDVP:Shimmer";
/// 20 · log10(shimmer + ε).
pub const SHIMMER_DB: &str = "MDVP:Shimmer(dB)";
/// Shimmer proxy / 3.
pub const APQ3: &str = "Shimmer:APQ3";
/// Shimmer proxy / 5.
pub const APQ5: &str = "Shimmer:APQ5";
/// Shimmer proxy / 2.
pub const APQ: &str = "MDVP:APQ";
/// Shimmer proxy × 3.
pub const DDA: &str = "Shimmer:DDA";
/// Percussive-component noise ratio.
pub const NHR: &str = "NHR";
/// Harmonic-component noise ratio.
pub const HNR: &str = "HNR";
/// Placeholder constant, never computed.
pub const RPDE: &str = "RPDE";
/// Placeholder constant, never computed.
pub const DFA: &str = "DFA";
/// Mean spectral bandwidth (Hz).
pub const SPREAD1: &str = "spread1";
/// Standard deviation of spectral bandwidth (Hz).
pub const SPREAD2: &str = "spread2";
/// Placeholder constant, never computed.
pub const D2: &str = "D2";
/// Mean spectral rolloff (Hz).
pub const PPE: &str = "PPE";

/// The 22 field names the assembler produces, in canonical training order.
///
/// These strings are a contract with the classifier artifact: renaming one is
/// a schema break, not a refactor.
pub const FEATURE_NAMES: [&str; 22] = [
    FO, FHI, FLO, JITTER_PERCENT, JITTER_ABS, RAP, PPQ, DDP, SHIMMER, SHIMMER_DB, APQ3, APQ5, APQ,
    DDA, NHR, HNR, RPDE, DFA, SPREAD1, SPREAD2, D2, PPE,
];

/// Named acoustic measures produced by the assembler.
///
/// Every stored value is finite: [`FeatureMapping::insert`] rejects NaN and
/// infinities. Serialised as a JSON object whose keys follow
/// [`FEATURE_NAMES`], then any extra fields in sorted order, so the same
/// waveform always yields the same bytes.
///
/// # Example
/// ```
/// use ps_core::features::FeatureMapping;
/// let mut m = FeatureMapping::new();
/// m.insert("NHR", 0.25).unwrap();
/// assert_eq!(m.get("NHR"), Some(0.25));
/// assert!(m.insert("HNR", f64::NAN).is_err());
/// ```
#[derive(Clone, Debug, Default)]
pub struct FeatureMapping {
    values: HashMap<String, f64>,
}

impl FeatureMapping {
    /// Empty mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a finite value, replacing any previous one.
    ///
    /// # Errors
    /// Returns [`crate::ScreeningError::NumericDegeneracy`] naming `name` if
    /// `value` is not finite.
    pub fn insert(&mut self, name: &str, value: f64) -> Result<()> {
        let value = ensure_finite(value, name, Stage::Assemble)?;
        self.values.insert(name.to_owned(), value);
        Ok(())
    }

    /// Value of `name`, if present.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// `true` if no field has been inserted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Fields of the known vocabulary, in vocabulary order, skipping absent ones.
    pub fn iter_known(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        FEATURE_NAMES
            .iter()
            .filter_map(|&name| self.get(name).map(|v| (name, v)))
    }

    /// Fields outside the vocabulary, sorted by name.
    fn iter_extra(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        let mut extra: Vec<_> = self
            .values
            .iter()
            .filter(|(name, _)| !FEATURE_NAMES.contains(&name.as_str()))
            .map(|(name, &v)| (name.as_str(), v))
            .collect();
        extra.sort_unstable_by(|a, b| a.0.cmp(b.0));
        extra.into_iter()
    }
}

impl Serialize for FeatureMapping {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (name, value) in self.iter_known() {
            map.serialize_entry(name, &value)?;
        }
        for (name, value) in self.iter_extra() {
            map.serialize_entry(name, &value)?;
        }
        map.end()
    }
}
