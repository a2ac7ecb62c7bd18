//! The over-sequence: per-level sets of cubes whose complements over-approximate the states
//! reachable from the initial state in a bounded number of steps.
use car_formula::{is_subset, Cube, Lit};

/// An ordered sequence of frames, plus the level up to which the frame solver has loaded them.
///
/// Frame `k`, as a set of states, is the complement of the cubes stored at exactly level `k`, and
/// over-approximates the states reachable from the initial state within `k` steps. The frames
/// are mutually independent: unlike an IC3-style trace, a cube blocked at one level says nothing
/// about any other level, and the same cube may legitimately be stored at several. Frame 0 is
/// seeded so that it permits exactly the initial state.
pub struct OverSequence {
    frames: Vec<Vec<Cube>>,
    effective_level: usize,
}

impl OverSequence {
    /// Creates a sequence with a single, empty frame 0.
    pub fn new() -> OverSequence {
        OverSequence {
            frames: vec![Vec::new()],
            effective_level: 0,
        }
    }

    /// Number of frames currently allocated.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// The highest frame index whose cubes have been loaded into the frame solver.
    pub fn effective_level(&self) -> usize {
        self.effective_level
    }

    pub fn set_effective_level(&mut self, level: usize) {
        self.effective_level = level;
    }

    /// The cubes stored at this level.
    pub fn frame(&self, level: usize) -> &[Cube] {
        self.frames.get(level).map_or(&[], |f| f.as_slice())
    }

    /// Inserts `cube` at `level`, growing the sequence if needed.
    ///
    /// Idempotent and subsumption-aware within the frame: if a cube already stored at `level`
    /// subsumes the new one, the insertion is a no-op; any stored cube at `level` that the new
    /// cube subsumes is dropped as redundant. Cubes at other levels are never touched, since
    /// each frame stands on its own.
    ///
    /// Returns whether the cube was actually added.
    pub fn insert(&mut self, cube: Cube, level: usize) -> bool {
        while self.frames.len() <= level {
            self.frames.push(Vec::new());
        }

        for existing in &self.frames[level] {
            if is_subset(existing, &cube) {
                return false;
            }
        }
        self.frames[level].retain(|existing| !is_subset(&cube, existing));
        self.frames[level].push(cube);
        true
    }

    /// Whether some cube stored at `level` is a subset of `latches`.
    ///
    /// `latches` may be a full assignment or, when partial-state generalization is enabled, a
    /// sub-cube; both are canonical (sorted, duplicate-free) sequences, so the same subset test
    /// correctly implements both the position-indexed full-assignment check and the
    /// set-membership partial-cube check.
    pub fn is_blocked_by_frame(&self, latches: &[Lit], level: usize) -> bool {
        self.frame(level)
            .iter()
            .any(|cube| is_subset(cube, latches))
    }

    /// Walks the frames upward from `start` and returns the index just below the first frame
    /// that does not block `latches`, or `len() - 1` if every frame from `start` up blocks. A
    /// result of `-1` therefore means the state escapes even frame 0, i.e. the initial state
    /// satisfies its cube.
    pub fn get_new_level(&self, latches: &[Lit], start: usize) -> i64 {
        for level in start..self.frames.len() {
            if !self.is_blocked_by_frame(latches, level) {
                return level as i64 - 1;
            }
        }
        self.frames.len() as i64 - 1
    }
}
