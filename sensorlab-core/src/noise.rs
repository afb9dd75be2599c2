//! ## sensorlab-core::noise
//! **Uniform noise sources for sensor jitter**
//!
//! The engine only asks for a uniform sample in `[0, 1)` and scales it
//! itself, so sources stay interchangeable. Seeded sources make runs
//! reproducible; `FixedNoise` pins the sample for exact arithmetic in tests.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Trait for noise sources.
pub trait NoiseSource: Send {
    /// Returns a uniform sample in `[0, 1)`.
    fn sample(&mut self) -> f64;
}

/// `SmallRng`-backed source.
#[derive(Debug, Clone)]
pub struct SeededNoise {
    rng: SmallRng,
}

impl SeededNoise {
    /// Deterministic source: equal seeds yield equal sequences.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Source seeded from the thread-local generator.
    pub fn from_entropy() -> Self {
        Self {
            rng: SmallRng::from_rng(&mut rand::rng()),
        }
    }
}

impl NoiseSource for SeededNoise {
    #[inline]
    fn sample(&mut self) -> f64 {
        self.rng.random::<f64>()
    }
}

/// Always returns the same sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedNoise(pub f64);

impl FixedNoise {
    /// Sample that cancels out to zero perturbation.
    pub const CENTERED: FixedNoise = FixedNoise(0.5);
}

impl NoiseSource for FixedNoise {
    #[inline]
    fn sample(&mut self) -> f64 {
        self.0
    }
}

/// Seeded source when a seed is given, entropy otherwise.
pub fn noise_for_seed(seed: Option<u64>) -> Box<dyn NoiseSource> {
    match seed {
        Some(seed) => Box::new(SeededNoise::new(seed)),
        None => Box::new(SeededNoise::from_entropy()),
    }
}
