//! Intensity and emphasis shaping.
//!
//! Every weight is scaled by a global intensity and then by an optional
//! per-shape emphasis multiplier, capping at 1.0 after each step.

use std::collections::BTreeMap;

use facesync_animation_model::frame::{Frame, Sequence};
use facesync_common::config::default_emphasis;
use facesync_common::error::{FacesyncError, FacesyncResult};
use serde::{Deserialize, Serialize};

/// Per-shape emphasis multipliers. Shapes without an entry are left at 1.0.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmphasisMap(BTreeMap<String, f64>);

impl EmphasisMap {
    /// An empty map (every multiplier is 1.0).
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in map: mouth and jaw opens up 30%, smiles up 20%,
    /// funnel and pucker up 25%, squints down 20%.
    pub fn builtin() -> Self {
        Self(default_emphasis())
    }

    /// Build a map, rejecting non-finite or non-positive multipliers.
    pub fn from_map(map: BTreeMap<String, f64>) -> FacesyncResult<Self> {
        let mut emphasis = Self::new();
        for (name, multiplier) in map {
            emphasis.insert(name, multiplier)?;
        }
        Ok(emphasis)
    }

    pub fn insert(&mut self, name: impl Into<String>, multiplier: f64) -> FacesyncResult<()> {
        let name = name.into();
        if !multiplier.is_finite() || multiplier <= 0.0 {
            return Err(FacesyncError::config(format!(
                "emphasis multiplier for {name} must be positive, got {multiplier}"
            )));
        }
        self.0.insert(name, multiplier);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.0.get(name).copied()
    }

    /// Overlay `overrides` onto a copy of this map.
    pub fn merged_with(&self, overrides: &EmphasisMap) -> EmphasisMap {
        let mut merged = self.clone();
        merged
            .0
            .extend(overrides.0.iter().map(|(k, v)| (k.clone(), *v)));
        merged
    }

    /// Check every stored multiplier (maps built through serde skip `insert`).
    pub fn validate(&self) -> FacesyncResult<()> {
        match self.0.iter().find(|(_, m)| !m.is_finite() || **m <= 0.0) {
            Some((name, multiplier)) => Err(FacesyncError::config(format!(
                "emphasis multiplier for {name} must be positive, got {multiplier}"
            ))),
            None => Ok(()),
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

/// Scale every weight by `intensity` and then by its emphasis entry.
///
/// Weights are capped at 1.0 after each multiplication. No lower bound is
/// applied: a negative input weight stays negative.
pub fn normalize(frames: &[Frame], intensity: f64, emphasis: &EmphasisMap) -> Sequence {
    frames
        .iter()
        .map(|frame| {
            let blendshapes = frame
                .blendshapes
                .iter()
                .map(|(name, &weight)| {
                    let mut shaped = (weight * intensity).min(1.0);
                    if let Some(multiplier) = emphasis.get(name) {
                        shaped = (shaped * multiplier).min(1.0);
                    }
                    (name.clone(), shaped)
                })
                .collect();
            Frame::new(frame.time, blendshapes)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn frame(time: f64, weights: &[(&str, f64)]) -> Frame {
        Frame::new(
            time,
            weights.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
        )
    }

    #[test]
    fn test_unit_intensity_without_emphasis_is_identity() {
        let frames = vec![
            frame(0.0, &[("jawOpen", 0.4), ("eyeBlinkLeft", 0.0)]),
            frame(1.0 / 60.0, &[("jawOpen", 0.9), ("eyeBlinkLeft", 1.0)]),
        ];
        assert_eq!(normalize(&frames, 1.0, &EmphasisMap::new()), frames);
    }

    #[test]
    fn test_intensity_then_emphasis() {
        let mut emphasis = EmphasisMap::new();
        emphasis.insert("jawOpen", 1.3).unwrap();
        let frames = vec![frame(0.0, &[("jawOpen", 0.5), ("mouthClose", 0.5)])];

        let out = normalize(&frames, 1.2, &emphasis);
        assert!((out[0].weight("jawOpen").unwrap() - 0.78).abs() < 1e-12);
        assert!((out[0].weight("mouthClose").unwrap() - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_cap_applies_before_emphasis() {
        // 0.9 * 2.0 caps to 1.0, then the 0.8 damping gives 0.8 rather than 1.0.
        let mut emphasis = EmphasisMap::new();
        emphasis.insert("eyeSquintLeft", 0.8).unwrap();
        let frames = vec![frame(0.0, &[("eyeSquintLeft", 0.9)])];

        let out = normalize(&frames, 2.0, &emphasis);
        assert!((out[0].weight("eyeSquintLeft").unwrap() - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_negative_weights_are_not_clamped() {
        let frames = vec![frame(0.0, &[("jawOpen", -0.2)])];
        let out = normalize(&frames, 1.5, &EmphasisMap::builtin());
        assert!((out[0].weight("jawOpen").unwrap() - (-0.2 * 1.5 * 1.3)).abs() < 1e-12);
    }

    #[test]
    fn test_empty_sequence() {
        assert!(normalize(&[], 1.5, &EmphasisMap::builtin()).is_empty());
    }

    #[test]
    fn test_emphasis_rejects_non_positive() {
        let mut emphasis = EmphasisMap::new();
        assert!(emphasis.insert("jawOpen", 0.0).is_err());
        assert!(emphasis.insert("jawOpen", -1.0).is_err());
        assert!(emphasis.insert("jawOpen", f64::NAN).is_err());
        assert!(emphasis.is_empty());
    }

    #[test]
    fn test_merged_with_overrides_defaults() {
        let mut overrides = EmphasisMap::new();
        overrides.insert("jawOpen", 1.5).unwrap();
        overrides.insert("browInnerUp", 1.1).unwrap();

        let merged = EmphasisMap::builtin().merged_with(&overrides);
        assert_eq!(merged.get("jawOpen"), Some(1.5));
        assert_eq!(merged.get("browInnerUp"), Some(1.1));
        assert_eq!(merged.get("mouthOpen"), Some(1.3));
        assert_eq!(EmphasisMap::builtin().get("jawOpen"), Some(1.3));
    }

    #[test]
    fn test_validate_catches_deserialized_zero() {
        let emphasis: EmphasisMap = serde_json::from_str(r#"{"jawOpen":0.0}"#).unwrap();
        assert!(emphasis.validate().is_err());
        assert!(EmphasisMap::builtin().validate().is_ok());
    }

    proptest! {
        #[test]
        fn prop_weights_never_exceed_one(
            weights in proptest::collection::vec(0.0f64..1.0, 1..20),
            intensity in 0.01f64..5.0,
            multiplier in 0.01f64..5.0,
        ) {
            let frames: Vec<Frame> = weights
                .iter()
                .enumerate()
                .map(|(i, w)| frame(i as f64 / 60.0, &[("jawOpen", *w), ("mouthClose", *w)]))
                .collect();
            let mut emphasis = EmphasisMap::new();
            emphasis.insert("jawOpen", multiplier).unwrap();

            for out in normalize(&frames, intensity, &emphasis) {
                for weight in out.blendshapes.values() {
                    prop_assert!(*weight <= 1.0);
                }
            }
        }
    }
}
