use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use rand_distr::StandardNormal;

use marten_core::{Array, Result, Shape};

// random — Array construction by sampling
//
// Unseeded calls draw from the thread RNG. `seed` installs a global StdRng
// so a test run (or an analysis script) becomes reproducible; every
// subsequent call draws from that generator in sequence.

static GLOBAL_RNG: Mutex<Option<StdRng>> = Mutex::new(None);

/// Seed the global generator. All later sampling calls draw from a
/// `StdRng` seeded with this value, making them reproducible.
pub fn seed(value: u64) {
    let mut guard = GLOBAL_RNG.lock().expect("rng lock poisoned");
    *guard = Some(StdRng::seed_from_u64(value));
}

fn with_rng<T>(f: impl FnOnce(&mut dyn RngCore) -> T) -> T {
    let mut guard = GLOBAL_RNG.lock().expect("rng lock poisoned");
    match guard.as_mut() {
        Some(rng) => f(rng),
        None => f(&mut rand::thread_rng()),
    }
}

/// Array of f64 samples uniform in `[0, 1)`.
pub fn uniform(shape: impl Into<Shape>) -> Result<Array> {
    let shape = shape.into();
    let data: Vec<f64> = with_rng(|rng| (0..shape.elem_count()).map(|_| rng.gen()).collect());
    Array::from_vec(data, shape)
}

/// Array of f64 samples from the standard normal distribution.
pub fn normal(shape: impl Into<Shape>) -> Result<Array> {
    let shape = shape.into();
    let data: Vec<f64> = with_rng(|rng| {
        (0..shape.elem_count())
            .map(|_| rng.sample(StandardNormal))
            .collect()
    });
    Array::from_vec(data, shape)
}

/// Array of i32 samples uniform in the half-open range `[low, high)`.
pub fn integers(low: i32, high: i32, shape: impl Into<Shape>) -> Result<Array> {
    let shape = shape.into();
    let data: Vec<i32> = with_rng(|rng| {
        (0..shape.elem_count())
            .map(|_| rng.gen_range(low..high))
            .collect()
    });
    Array::from_vec(data, shape)
}
