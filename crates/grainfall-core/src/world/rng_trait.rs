//! RNG trait abstraction for the simulation
//!
//! Every probabilistic rule draws from a [`SimRng`] handed in by the caller:
//! - `rand::thread_rng()` in normal play
//! - a seeded `Xoshiro256StarStar` for reproducible runs and tests
//! - hand-written fakes in unit tests that need a fixed outcome

/// Random number source for the simulation
pub trait SimRng {
    /// Generate random boolean with 50% probability
    fn gen_bool(&mut self) -> bool;

    /// Generate random f32 in [0.0, 1.0)
    fn gen_f32(&mut self) -> f32;

    /// Check if random value is less than probability threshold
    fn check_probability(&mut self, probability: f32) -> bool {
        self.gen_f32() < probability
    }

    /// Uniform index in `0..len`. `len` must be non-zero.
    fn gen_index(&mut self, len: usize) -> usize {
        ((self.gen_f32() * len as f32) as usize).min(len - 1)
    }
}

// Blanket implementation for any type implementing rand::Rng
impl<T: ?Sized + rand::Rng> SimRng for T {
    fn gen_bool(&mut self) -> bool {
        rand::Rng::r#gen(self)
    }

    fn gen_f32(&mut self) -> f32 {
        rand::Rng::r#gen(self)
    }

    fn gen_index(&mut self, len: usize) -> usize {
        rand::Rng::gen_range(self, 0..len)
    }
}
