// Seedable, splittable source of randomness.
//
// Every property run owns exactly one RandomSource; component and
// element generation draw from derived child sources so that recursive
// structure does not perturb the parent stream.

use crate::errors::GenerationError;
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

#[derive(Debug, Clone)]
pub struct RandomSource {
    rng: ChaCha8Rng,
}

impl RandomSource {
    pub fn new(seed: u64) -> RandomSource {
        RandomSource {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Derive an independent child source. The child's seed is drawn
    /// from this stream, so both remain reproducible under the run's
    /// seed without sharing state.
    pub fn split(&mut self) -> RandomSource {
        RandomSource::new(self.rng.gen())
    }

    pub fn next_u64(&mut self) -> u64 {
        self.rng.gen()
    }

    pub fn next_i64(&mut self) -> i64 {
        self.rng.gen()
    }

    /// Uniform draw from the unit interval `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        self.rng.gen()
    }

    pub fn next_bool(&mut self) -> bool {
        self.rng.gen()
    }

    pub fn next_bytes(&mut self, n: usize) -> Vec<u8> {
        let mut buf = vec![0u8; n];
        self.rng.fill_bytes(&mut buf);
        buf
    }

    /// Uniform draw from `[0, 2^bits)`. `bits` may be at most 128.
    pub fn next_bits(&mut self, bits: u32) -> u128 {
        assert!(bits <= 128);
        if bits == 0 {
            return 0;
        }
        let raw = if bits <= 64 {
            self.rng.gen::<u64>() as u128
        } else {
            ((self.rng.gen::<u64>() as u128) << 64) | self.rng.gen::<u64>() as u128
        };
        if bits == 128 {
            raw
        } else {
            raw & ((1u128 << bits) - 1)
        }
    }

    /// Uniform draw from `[lo, hi]` inclusive.
    pub fn next_i64_bounded(&mut self, lo: i64, hi: i64) -> Result<i64, GenerationError> {
        self.next_i128_bounded(lo as i128, hi as i128).map(|v| v as i64)
    }

    /// Uniform draw from `[lo, hi]` inclusive. Samples an offset of
    /// `bit_length(hi - lo)` bits and rejects draws past `hi`, so
    /// non-power-of-two ranges stay uniform.
    pub fn next_i128_bounded(&mut self, lo: i128, hi: i128) -> Result<i128, GenerationError> {
        if lo > hi {
            return Err(GenerationError::invalid_range(lo, hi));
        }
        // Two's complement subtraction gives the inclusive span minus
        // one as an exact u128 for any i128 pair.
        let span = (hi as u128).wrapping_sub(lo as u128);
        if span == u128::MAX {
            // Full domain: every bit pattern is a valid value.
            return Ok(self.next_bits(128) as i128);
        }
        let offset = self.next_u128_at_most(span);
        Ok(lo.wrapping_add(offset as i128))
    }

    /// Uniform draw from `[0, max]` inclusive.
    fn next_u128_at_most(&mut self, max: u128) -> u128 {
        let bits = 128 - max.leading_zeros();
        if bits == 0 {
            return 0;
        }
        loop {
            let probe = self.next_bits(bits);
            if probe <= max {
                return probe;
            }
        }
    }

    /// Standard normal draw via Box-Muller, for gaussian-biased counts.
    pub fn next_gaussian(&mut self) -> f64 {
        loop {
            let u = self.next_f64();
            if u > 0.0 {
                let v = self.next_f64();
                return (-2.0 * u.ln()).sqrt() * (2.0 * std::f64::consts::PI * v).cos();
            }
        }
    }
}
