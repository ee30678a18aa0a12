// Counter-seeded LCG with PCG output permutation, the generator used by
// production Monte Carlo transport codes. State is a single u64, so every
// worker can own its stream and sampling stays reproducible per stream.

use rand::{RngCore, SeedableRng};

/// LCG multiplier.
const PRN_MULT: u64 = 6364136223846793005;
/// LCG additive constant.
const PRN_ADD: u64 = 1442695040888963407;
/// Seed stride between worker streams.
const PRN_STRIDE: u64 = 152917;

/// A per-worker random stream for collision sampling.
///
/// The base generator is an LCG whose output is whitened with a PCG
/// permutation (RXS-M-XS variant). Construction is free, so concurrent
/// samplers should each hold their own `StreamRng` rather than share one;
/// [`StreamRng::worker_stream`] derives reproducible, distinct streams for
/// any number of workers from a single base seed.
#[derive(Clone, Copy, Debug)]
pub struct StreamRng {
    state: u64,
}

impl StreamRng {
    /// Create a stream from a seed.
    #[inline]
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// The stream for worker `index`, derived from a common base seed.
    /// Equal `(base_seed, index)` pairs always yield the same sequence.
    #[inline]
    pub fn worker_stream(base_seed: u64, index: u64) -> Self {
        Self::new(base_seed.wrapping_add(index.wrapping_mul(PRN_STRIDE)))
    }

    /// A uniform f64 in [0, 1).
    #[inline(always)]
    pub fn random(&mut self) -> f64 {
        // Equivalent to ldexp(next_u64, -64).
        (self.next_u64() as f64) * 5.421010862427522e-20
    }

    /// Restart the stream from a new seed.
    #[inline]
    pub fn reseed(&mut self, seed: u64) {
        self.state = seed;
    }
}

impl SeedableRng for StreamRng {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        Self {
            state: u64::from_le_bytes(seed),
        }
    }
}

impl RngCore for StreamRng {
    #[inline(always)]
    fn next_u32(&mut self) -> u32 {
        self.next_u64() as u32
    }

    #[inline(always)]
    fn next_u64(&mut self) -> u64 {
        // Advance the LCG, then permute the raw state.
        self.state = PRN_MULT.wrapping_mul(self.state).wrapping_add(PRN_ADD);
        let word = ((self.state >> ((self.state >> 59) + 5)) ^ self.state)
            .wrapping_mul(12605985483714917081);
        (word >> 43) ^ word
    }

    #[inline]
    fn fill_bytes(&mut self, dest: &mut [u8]) {
        let mut left = dest;
        while left.len() >= 8 {
            let bytes = self.next_u64().to_le_bytes();
            left[..8].copy_from_slice(&bytes);
            left = &mut left[8..];
        }
        if !left.is_empty() {
            let bytes = self.next_u64().to_le_bytes();
            left.copy_from_slice(&bytes[..left.len()]);
        }
    }

    #[inline]
    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}
