use rand::distributions::Distribution;
use rand::rngs::StdRng;
use rand::SeedableRng;
use statrs::distribution::Normal;

/// Piecewise-constant levels with additive Gaussian noise.
///
/// Each `(mean, len)` pair contributes `len` samples drawn from
/// `N(mean, noise_sd^2)`.
pub fn noisy_steps(seed: u64, levels: &[(f64, usize)], noise_sd: f64) -> Vec<f64> {
    assert!(noise_sd > 0.0, "noise_sd must be positive");
    let mut rng = StdRng::seed_from_u64(seed);
    let mut series = Vec::with_capacity(levels.iter().map(|&(_, len)| len).sum());
    for &(mean, len) in levels {
        let normal = Normal::new(mean, noise_sd).unwrap();
        series.extend((0..len).map(|_| normal.sample(&mut rng)));
    }
    series
}

/// Alternating `low`/`high` blocks of `block` samples each.
pub fn alternating_blocks(n_blocks: usize, block: usize, low: f64, high: f64) -> Vec<(f64, usize)> {
    (0..n_blocks)
        .map(|i| (if i % 2 == 0 { low } else { high }, block))
        .collect()
}
