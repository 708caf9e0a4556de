//! Folding micro-expression overlays into the base timeline.

use facesync_animation_model::frame::Frame;
use facesync_common::clock::FrameClock;

use crate::idle::MicroExpressionFrame;
use crate::pause::Pause;

/// Merge overlays for one pause into `frames` in place.
///
/// Each overlay lands on the nearest base frame. Overlays that land outside
/// the pause (or the sequence) are dropped. Weights combine by maximum, so an
/// overlay can only raise a base weight, and where a blink and an expression
/// touch the same frame the stronger contribution wins per shape.
///
/// Returns the number of overlay frames applied.
pub fn merge_overlays(
    frames: &mut [Frame],
    pause: &Pause,
    overlays: &[MicroExpressionFrame],
    clock: &FrameClock,
) -> usize {
    let mut applied = 0;

    for overlay in overlays {
        let Some(target) = clock.index_of(overlay.time) else {
            continue;
        };
        if !pause.contains(target) || target >= frames.len() {
            continue;
        }

        let base = &mut frames[target].blendshapes;
        for (name, &weight) in &overlay.blendshapes {
            let slot = base.entry(name.clone()).or_insert(0.0);
            *slot = slot.max(weight);
        }
        applied += 1;
    }

    applied
}
