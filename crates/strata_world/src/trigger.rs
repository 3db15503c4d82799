//! Streaming trigger.
//!
//! Decides when a reference point has moved far enough from the chunk it
//! was last streamed around to warrant another pass. Checked on a fixed
//! interval rather than every frame.

use strata_core::{ChunkCoord, ChunkDims};

/// Periodic "has the reference left its chunk" check.
#[derive(Clone, Copy, Debug)]
pub struct StreamingTrigger {
    dims: ChunkDims,
    interval: f32,
    elapsed: f32,
    anchor: Option<ChunkCoord>,
}

impl StreamingTrigger {
    /// Creates a trigger checking every `interval` seconds.
    #[must_use]
    pub const fn new(dims: ChunkDims, interval: f32) -> Self {
        Self {
            dims,
            interval,
            elapsed: 0.0,
            anchor: None,
        }
    }

    /// Seconds between checks.
    #[must_use]
    pub const fn interval(&self) -> f32 {
        self.interval
    }

    /// Chunk of the last streamed position.
    #[must_use]
    pub const fn anchor(&self) -> Option<ChunkCoord> {
        self.anchor
    }

    /// Records `position` as streamed and restarts the interval.
    pub fn reset(&mut self, position: [f32; 3]) {
        self.anchor = Some(ChunkCoord::from_world(position.map(|v| v.floor() as i32), self.dims));
        self.elapsed = 0.0;
    }

    /// True if `position` has left the anchor chunk.
    ///
    /// Horizontally the distance is measured from the chunk centre and must
    /// exceed one chunk width; vertically it is measured from the chunk
    /// origin and must exceed one chunk height. Without an anchor a pass is
    /// always due.
    #[must_use]
    pub fn should_recompute(&self, position: [f32; 3]) -> bool {
        let Some(anchor) = self.anchor else {
            return true;
        };

        let origin = anchor.origin(self.dims);
        let size = self.dims.size_xz as f32;
        let half = size / 2.0;
        let centre_x = origin[0] as f32 + half;
        let centre_z = origin[2] as f32 + half;

        (centre_x - position[0]).abs() > size
            || (centre_z - position[2]).abs() > size
            || (origin[1] as f32 - position[1]).abs() > self.dims.height as f32
    }

    /// Advances the clock by `dt` seconds; on each elapsed interval checks
    /// `position` and, if a pass is due, re-anchors to it.
    ///
    /// Returns true when the caller should run a streaming pass.
    pub fn tick(&mut self, dt: f32, position: [f32; 3]) -> bool {
        self.elapsed += dt;
        if self.elapsed < self.interval {
            return false;
        }
        self.elapsed = 0.0;

        if self.should_recompute(position) {
            self.reset(position);
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trigger() -> StreamingTrigger {
        StreamingTrigger::new(ChunkDims::new(16, 100), 1.0)
    }

    #[test]
    fn test_unanchored_is_due() {
        assert!(trigger().should_recompute([0.0, 0.0, 0.0]));
    }

    #[test]
    fn test_horizontal_threshold_from_centre() {
        let mut trigger = trigger();
        trigger.reset([3.0, 60.0, 3.0]);
        assert_eq!(trigger.anchor(), Some(ChunkCoord::new(0, 0, 0)));

        // Centre is x = 8; 24 is exactly one chunk away.
        assert!(!trigger.should_recompute([24.0, 60.0, 8.0]));
        assert!(trigger.should_recompute([24.5, 60.0, 8.0]));
        assert!(trigger.should_recompute([8.0, 60.0, -8.5]));
    }

    #[test]
    fn test_vertical_threshold_from_origin() {
        let mut trigger = trigger();
        trigger.reset([3.0, 60.0, 3.0]);
        assert!(!trigger.should_recompute([8.0, 100.0, 8.0]));
        assert!(trigger.should_recompute([8.0, 100.5, 8.0]));
        assert!(!trigger.should_recompute([8.0, -1.0, 8.0]));
    }

    #[test]
    fn test_tick_waits_for_interval() {
        let mut trigger = trigger();
        assert!(!trigger.tick(0.5, [0.0; 3]));
        assert!(trigger.tick(0.5, [0.0; 3]), "first check has no anchor");
        assert_eq!(trigger.anchor(), Some(ChunkCoord::new(0, 0, 0)));

        // Far away, but the interval has just restarted.
        assert!(!trigger.tick(0.25, [500.0, 0.0, 0.0]));
        assert!(trigger.tick(0.75, [500.0, 0.0, 0.0]));
        assert_eq!(trigger.anchor(), Some(ChunkCoord::new(31, 0, 0)));
    }

    #[test]
    fn test_tick_without_movement_stays_quiet() {
        let mut trigger = trigger();
        trigger.reset([1.0, 1.0, 1.0]);
        for _ in 0..10 {
            assert!(!trigger.tick(1.0, [2.0, 1.0, 2.0]));
        }
    }
}
