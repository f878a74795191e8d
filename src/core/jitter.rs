use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;

/// Source of the tie-break jitter added on top of a match score
///
/// Scoring itself is pure; whatever randomness the ranking shows comes
/// from the source the caller passes in.
pub trait JitterSource {
    /// Draw a value uniformly from `0..=max`
    fn next_jitter(&mut self, max: u8) -> u8;
}

/// Always returns zero, for fully deterministic rankings
#[derive(Debug, Clone, Copy, Default)]
pub struct NoJitter;

impl JitterSource for NoJitter {
    fn next_jitter(&mut self, _max: u8) -> u8 {
        0
    }
}

/// Reproducible jitter from a seeded generator
#[derive(Debug, Clone)]
pub struct SeededJitter {
    rng: StdRng,
}

impl SeededJitter {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl JitterSource for SeededJitter {
    fn next_jitter(&mut self, max: u8) -> u8 {
        self.rng.random_range(0..=max)
    }
}

/// Jitter from the thread-local generator; differs on every call
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRngJitter;

impl JitterSource for ThreadRngJitter {
    fn next_jitter(&mut self, max: u8) -> u8 {
        rand::rng().random_range(0..=max)
    }
}

/// Which jitter source a matcher hands out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JitterMode {
    None,
    Random,
    Seeded,
}

impl std::str::FromStr for JitterMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" => Ok(JitterMode::None),
            "random" => Ok(JitterMode::Random),
            "seeded" => Ok(JitterMode::Seeded),
            other => Err(format!("unknown jitter mode: {}", other)),
        }
    }
}

/// Jitter configuration for a matcher
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JitterPolicy {
    pub mode: JitterMode,
    /// Seed used in `Seeded` mode when the caller doesn't supply one
    pub seed: u64,
}

impl JitterPolicy {
    pub fn new(mode: JitterMode, seed: u64) -> Self {
        Self { mode, seed }
    }

    /// Build a fresh source; a per-call seed always wins over the mode
    pub fn source(&self, seed: Option<u64>) -> Box<dyn JitterSource + Send> {
        if let Some(seed) = seed {
            return Box::new(SeededJitter::new(seed));
        }

        match self.mode {
            JitterMode::None => Box::new(NoJitter),
            JitterMode::Random => Box::new(ThreadRngJitter),
            JitterMode::Seeded => Box::new(SeededJitter::new(self.seed)),
        }
    }
}

impl Default for JitterPolicy {
    fn default() -> Self {
        Self {
            mode: JitterMode::Random,
            seed: 0,
        }
    }
}
