//! Mulberry32 pseudo-random stream
//!
//! A 32-bit state advanced by a fixed odd constant each call, then scrambled
//! with xor/shift/multiply steps. Pure integer arithmetic, so the same seed
//! yields the same sequence everywhere.

use serde::{Deserialize, Serialize};

/// Weyl increment added to the state on every draw
const INCREMENT: u32 = 0x6D2B_79F5;

/// 2^32 as a float, maps a u32 into [0, 1)
const U32_SPAN: f64 = 4_294_967_296.0;

/// Deterministic Mulberry32 generator, owned by a single generation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mulberry32 {
    state: u32,
}

impl Mulberry32 {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Reset to the start of the sequence for `seed`
    pub fn reseed(&mut self, seed: u32) {
        self.state = seed;
    }

    /// Next raw 32-bit output
    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(INCREMENT);
        let mut t = self.state;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        t ^ (t >> 14)
    }

    /// Uniform f64 in [0, 1)
    pub fn next_f64(&mut self) -> f64 {
        self.next_u32() as f64 / U32_SPAN
    }

    /// Uniform f64 in [lo, hi)
    pub fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + self.next_f64() * (hi - lo)
    }

    /// Fair coin: true when the draw lands in the lower half
    pub fn coin(&mut self) -> bool {
        self.next_f64() < 0.5
    }
}
