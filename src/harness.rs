//! Wall-clock measurement of repeated decode passes.

use std::hint::black_box;
use std::time::Instant;

/// Configuration for one benchmark run: repeat count, value seed, and the
/// range of size exponents (row count = 2^exponent) to sweep.
#[derive(Clone, Debug)]
pub struct BenchConfig {
    pub trials: u32,
    pub seed: u64,
    pub min_exp: u32,
    pub max_exp: u32,
    pub step: u32,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            trials: 100,
            seed: 42,
            min_exp: 10,
            max_exp: 20,
            step: 2,
        }
    }
}

impl BenchConfig {
    pub fn size_exponents(&self) -> impl Iterator<Item = u32> {
        (self.min_exp..=self.max_exp).step_by(self.step.max(1) as usize)
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Measured {
    pub trials: u32,
    pub total_ns: u128,
    pub mean_ns: f64,
}

/// Run `f` back-to-back `trials` times and return the mean wall-clock cost
/// per pass, in nanoseconds.
///
/// There is no warm-up phase: first-call overhead is part of the steady
/// repeated-invocation behavior being measured. The first `Err` from `f`
/// aborts the measurement and propagates unmodified; no partial average is
/// ever produced.
pub fn measure<T, E>(trials: u32, mut f: impl FnMut() -> Result<T, E>) -> Result<Measured, E> {
    let trials = trials.max(1);

    let start = Instant::now();
    for _ in 0..trials {
        black_box(f()?);
    }
    let total_ns = start.elapsed().as_nanos();

    Ok(Measured {
        trials,
        total_ns,
        mean_ns: total_ns as f64 / trials as f64,
    })
}
