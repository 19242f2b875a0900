//! Random number sources for recommendation selection.
//!
//! Services never share an RNG between requests. Each operation asks its
//! [`RngSource`] for a fresh generator and owns it for the operation's lifetime.
//! Randomness here only provides variety; it is not used for anything
//! security-sensitive.

use rand::SeedableRng;
use rand::rngs::StdRng;

/// Hands out a new generator per operation.
pub trait RngSource: Send + Sync {
    fn rng(&self) -> StdRng;
}

/// Seeds every generator from the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct EntropyRngSource;

impl RngSource for EntropyRngSource {
    fn rng(&self) -> StdRng {
        StdRng::from_os_rng()
    }
}

/// Seeds every generator with the same value, making selections reproducible.
#[derive(Debug, Clone, Copy)]
pub struct SeededRngSource {
    seed: u64,
}

impl SeededRngSource {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl RngSource for SeededRngSource {
    fn rng(&self) -> StdRng {
        StdRng::seed_from_u64(self.seed)
    }
}
