//! Per-reply eligibility checks: the probability gate and length bounds.

use rand::Rng;

/// Fires with a fixed probability given in percent.
///
/// A uniform sample `u` in `[0, 1)` fires iff `u < percent / 100`, so 0 never
/// fires and 100 always fires.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbabilityGate {
    percent: f64,
}

impl ProbabilityGate {
    /// Create a gate; `percent` is clamped into `[0, 100]`, NaN closes the gate.
    pub fn new(percent: f64) -> Self {
        let percent = if percent.is_nan() {
            0.0
        } else {
            percent.clamp(0.0, 100.0)
        };
        Self { percent }
    }

    pub fn percent(&self) -> f64 {
        self.percent
    }

    /// Decide for an explicit sample in `[0, 1)`.
    pub fn admits(&self, sample: f64) -> bool {
        sample < self.percent / 100.0
    }

    /// Draw one sample from `rng` and decide.
    pub fn roll<R: Rng + ?Sized>(&self, rng: &mut R) -> bool {
        self.admits(rng.gen::<f64>())
    }
}

/// Result of checking trimmed reply text against [`LengthBounds`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthCheck {
    Empty,
    TooLong { length: usize },
    TooShort { length: usize },
    Within { length: usize },
}

/// Inclusive character-count bounds for speakable text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthBounds {
    pub min: usize,
    pub max: usize,
}

impl LengthBounds {
    pub fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    /// Check `text`, counting Unicode scalar values.
    pub fn check(&self, text: &str) -> LengthCheck {
        let length = text.chars().count();
        if length == 0 {
            LengthCheck::Empty
        } else if length > self.max {
            LengthCheck::TooLong { length }
        } else if length < self.min {
            LengthCheck::TooShort { length }
        } else {
            LengthCheck::Within { length }
        }
    }
}
