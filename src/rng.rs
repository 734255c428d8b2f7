use rand::{Error, RngCore, SeedableRng};

const MULTIPLIER: u64 = 1_103_515_245;
const INCREMENT: u64 = 12_345;
const MODULUS: u64 = 1 << 31;

/// Linear congruential generator with the classic ANSI C constants.
///
/// Every step is exact integer arithmetic, so a seed produces the same
/// sequence on every platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lcg {
    state: u64,
}

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self {
            state: seed % MODULUS,
        }
    }

    pub fn state(&self) -> u64 {
        self.state
    }

    fn step(&mut self) -> u64 {
        self.state = (MULTIPLIER * self.state + INCREMENT) % MODULUS;
        self.state
    }

    /// Advances the generator and returns `state / (m - 1)`.
    pub fn next_f64(&mut self) -> f64 {
        self.step() as f64 / (MODULUS - 1) as f64
    }

    /// `floor(next_f64() * len)`, clamped so a draw of exactly 1.0 stays in range.
    pub fn next_index(&mut self, len: usize) -> usize {
        let index = (self.next_f64() * len as f64).floor() as usize;

        index.min(len.saturating_sub(1))
    }

    /// Uniform float in `[low, low + span)`.
    pub fn next_span(&mut self, low: f64, span: f64) -> f64 {
        low + self.next_f64() * span
    }
}

impl RngCore for Lcg {
    // The state is only 31 bits wide and its low bits are weak, so each word
    // takes the top 16 bits of two steps.
    fn next_u32(&mut self) -> u32 {
        let high = (self.step() >> 15) as u32;
        let low = (self.step() >> 15) as u32;

        (high << 16) | low
    }

    fn next_u64(&mut self) -> u64 {
        let high = self.next_u32() as u64;
        let low = self.next_u32() as u64;

        (high << 32) | low
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.next_u32().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for Lcg {
    type Seed = [u8; 4];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u32::from_le_bytes(seed) as u64)
    }

    fn seed_from_u64(state: u64) -> Self {
        Self::new(state)
    }
}
