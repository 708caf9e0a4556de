//! Three-point temporal smoothing of blendshape weights.
//!
//! Each interior frame is replaced by a `[0.25, 0.5, 0.25]` weighted average
//! of itself and its two neighbors, taken from the unsmoothed input (one
//! pass, not iterated). The first and last frames are kept as-is.

use facesync_animation_model::frame::{Frame, Sequence};
use facesync_common::error::{FacesyncError, FacesyncResult};

const NEIGHBOR_WEIGHT: f64 = 0.25;
const CENTER_WEIGHT: f64 = 0.5;

/// Smooth a normalized sequence.
///
/// Returns the input unchanged when `enabled` is false or the sequence has
/// two frames or fewer. A shape missing from either neighbor of an interior
/// frame is an error, since averaging against a default would skew it.
pub fn smooth(frames: &[Frame], enabled: bool) -> FacesyncResult<Sequence> {
    if !enabled || frames.len() <= 2 {
        return Ok(frames.to_vec());
    }

    let mut result = Vec::with_capacity(frames.len());
    result.push(frames[0].clone());

    for (offset, window) in frames.windows(3).enumerate() {
        let index = offset + 1;
        let (prev, curr, next) = (&window[0], &window[1], &window[2]);

        let blendshapes = curr
            .blendshapes
            .iter()
            .map(|(name, &weight)| {
                let before = neighbor_weight(prev, name, index - 1)?;
                let after = neighbor_weight(next, name, index + 1)?;
                let smoothed =
                    before * NEIGHBOR_WEIGHT + weight * CENTER_WEIGHT + after * NEIGHBOR_WEIGHT;
                Ok((name.clone(), smoothed))
            })
            .collect::<FacesyncResult<_>>()?;

        result.push(Frame::new(curr.time, blendshapes));
    }

    result.push(frames[frames.len() - 1].clone());
    Ok(result)
}

fn neighbor_weight(frame: &Frame, name: &str, index: usize) -> FacesyncResult<f64> {
    frame.weight(name).ok_or_else(|| {
        FacesyncError::invalid_frame(format!(
            "frame {index} at {:.4}s is missing blendshape {name}",
            frame.time
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(values: &[f64]) -> Vec<Frame> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| Frame::neutral(i as f64 / 60.0, &["jawOpen"]).with_weight("jawOpen", *v))
            .collect()
    }

    #[test]
    fn test_three_point_average() {
        let frames = single(&[0.2, 0.8, 0.4]);
        let out = smooth(&frames, true).unwrap();

        // 0.25 * 0.2 + 0.5 * 0.8 + 0.25 * 0.4
        assert_eq!(out.len(), 3);
        assert!((out[1].weight("jawOpen").unwrap() - 0.55).abs() < 1e-12);
        assert_eq!(out[0], frames[0]);
        assert_eq!(out[2], frames[2]);
    }

    #[test]
    fn test_single_pass_uses_unsmoothed_neighbors() {
        let frames = single(&[0.0, 1.0, 0.0, 1.0]);
        let out = smooth(&frames, true).unwrap();

        // Frame 2 averages the original frame 1 (1.0), not its smoothed 0.5.
        assert!((out[1].weight("jawOpen").unwrap() - 0.5).abs() < 1e-12);
        assert!((out[2].weight("jawOpen").unwrap() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_short_sequences_pass_through() {
        let two = single(&[0.0, 1.0]);
        assert_eq!(smooth(&two, true).unwrap(), two);
        assert!(smooth(&[], true).unwrap().is_empty());
    }

    #[test]
    fn test_disabled_passes_through() {
        let frames = single(&[0.2, 0.8, 0.4, 0.9]);
        assert_eq!(smooth(&frames, false).unwrap(), frames);
    }

    #[test]
    fn test_time_is_preserved() {
        let frames = single(&[0.1, 0.3, 0.5, 0.7, 0.9]);
        let out = smooth(&frames, true).unwrap();
        for (a, b) in out.iter().zip(&frames) {
            assert_eq!(a.time, b.time);
        }
    }

    #[test]
    fn test_missing_neighbor_shape_is_an_error() {
        let mut frames = single(&[0.2, 0.8, 0.4]);
        frames[1].blendshapes.insert("mouthClose".to_string(), 0.3);

        let err = smooth(&frames, true).unwrap_err();
        assert!(matches!(err, FacesyncError::InvalidFrame { .. }));
        assert!(err.to_string().contains("mouthClose"));
    }
}
