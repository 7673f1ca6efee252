//! Token generation for refills. The engine only sees the `TokenSource` trait so tests can script it.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Supplies the kind of each freshly refilled token.
pub trait TokenSource {
    fn next_kind(&mut self) -> u8;
}

/// Uniform random kinds in `0..kinds`, reproducible from a seed.
#[derive(Debug, Clone)]
pub struct RandomTokens {
    rng: ChaCha8Rng,
    kinds: u8,
    seed: u64,
}

impl RandomTokens {
    pub fn seeded(seed: u64, kinds: u8) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            kinds: kinds.max(1),
            seed,
        }
    }

    /// Fresh random seed; read it back with [`RandomTokens::seed`] to replay a game.
    pub fn from_entropy(kinds: u8) -> Self {
        Self::seeded(rand::random(), kinds)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl TokenSource for RandomTokens {
    fn next_kind(&mut self) -> u8 {
        self.rng.gen_range(0..self.kinds)
    }
}

/// Replays a fixed list of kinds, cycling when exhausted.
#[derive(Debug, Clone)]
pub struct ScriptedTokens {
    script: Vec<u8>,
    pos: usize,
}

impl ScriptedTokens {
    pub fn new(script: Vec<u8>) -> Self {
        Self { script, pos: 0 }
    }
}

impl TokenSource for ScriptedTokens {
    fn next_kind(&mut self) -> u8 {
        if self.script.is_empty() {
            return 0;
        }
        let k = self.script[self.pos % self.script.len()];
        self.pos += 1;
        k
    }
}
