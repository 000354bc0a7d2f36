//! Source of randomness for choosing a maintainer.

use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Picks an index in `0..len`. Callers guarantee `len > 0`.
pub trait MaintainerPicker: Send + Sync {
    fn pick(&self, len: usize) -> usize;
}

/// Uniform pick from the thread-local RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomPicker;

impl MaintainerPicker for RandomPicker {
    fn pick(&self, len: usize) -> usize {
        rand::thread_rng().gen_range(0..len)
    }
}

/// Deterministic uniform pick, for reproducible runs and tests.
#[derive(Debug)]
pub struct SeededPicker {
    rng: Mutex<StdRng>,
}

impl SeededPicker {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl MaintainerPicker for SeededPicker {
    fn pick(&self, len: usize) -> usize {
        let mut rng = self.rng.lock().unwrap_or_else(|p| p.into_inner());
        rng.gen_range(0..len)
    }
}
