use noise::{NoiseFn, Perlin};

/// Seeded 3D gradient noise remapped to `[0, 1]`.
///
/// Sampling is a pure function of the seed and the coordinates, so a single
/// source can be shared freely across worker threads.
#[derive(Clone, Copy, Debug)]
pub struct NoiseSource {
    perlin: Perlin,
    seed: u32,
}

impl NoiseSource {
    pub fn new(seed: u32) -> Self {
        NoiseSource {
            perlin: Perlin::new(seed),
            seed,
        }
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Noise at `(x, y, z)` in `[0, 1]`.
    pub fn sample(&self, x: f64, y: f64, z: f64) -> f64 {
        let value = self.perlin.get([x, y, z]);
        ((value + 1.0) / 2.0).clamp(0.0, 1.0)
    }
}
