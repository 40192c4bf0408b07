//! # Noise Field
//!
//! Seeded coherent noise for terrain generation. Samples are normalised to
//! `[0, 1]` and scaled relative to the chunk width, so biome scale parameters
//! read as "features per chunk" rather than "features per voxel".

use noise::{NoiseFn, Perlin};

/// Keeps integer voxel positions off the Perlin lattice, where the noise is zero.
const LATTICE_NUDGE: f64 = 0.1;

/// Deterministic 2D/3D noise sampler.
#[derive(Clone, Debug)]
pub struct NoiseField {
    perlin: Perlin,
    chunk_width: f64,
}

impl NoiseField {
    /// Creates a noise field for the given seed and chunk width.
    pub fn new(seed: u32, chunk_width: i32) -> Self {
        NoiseField {
            perlin: Perlin::new(seed),
            chunk_width: chunk_width as f64,
        }
    }

    /// Samples 2D noise at a horizontal voxel position.
    ///
    /// # Arguments
    /// * `x`, `z` - Horizontal world position
    /// * `offset` - Shifts the sampled region, decorrelating independent layers
    /// * `scale` - Frequency of the noise relative to one chunk width
    ///
    /// # Returns
    /// A value in `[0, 1]`.
    pub fn sample_2d(&self, x: f64, z: f64, offset: f64, scale: f64) -> f64 {
        let sample_x = (x + LATTICE_NUDGE) / self.chunk_width * scale + offset;
        let sample_z = (z + LATTICE_NUDGE) / self.chunk_width * scale + offset;
        self.perlin_01(sample_x, sample_z)
    }

    /// Samples 3D noise at a voxel position and compares it to a threshold.
    ///
    /// The 3D value is the mean of the six axis-pair projections of 2D noise.
    ///
    /// # Returns
    /// `true` if the sampled value exceeds `threshold`.
    pub fn sample_3d(&self, position: [f64; 3], offset: f64, scale: f64, threshold: f64) -> bool {
        let x = (position[0] + offset + LATTICE_NUDGE) * scale;
        let y = (position[1] + offset + LATTICE_NUDGE) * scale;
        let z = (position[2] + offset + LATTICE_NUDGE) * scale;

        let sum = self.perlin_01(x, y)
            + self.perlin_01(y, z)
            + self.perlin_01(x, z)
            + self.perlin_01(y, x)
            + self.perlin_01(z, y)
            + self.perlin_01(z, x);

        sum / 6.0 > threshold
    }

    fn perlin_01(&self, a: f64, b: f64) -> f64 {
        ((self.perlin.get([a, b]) + 1.0) * 0.5).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn samples_stay_in_unit_range() {
        let field = NoiseField::new(1337, 16);
        for i in 0..200 {
            let value = field.sample_2d(i as f64 * 3.7, i as f64 * -1.3, 0.0, 0.25);
            assert!((0.0..=1.0).contains(&value), "sample {value} out of range");
        }
    }

    #[test]
    fn same_seed_same_samples() {
        let a = NoiseField::new(42, 16);
        let b = NoiseField::new(42, 16);
        for i in 0..50 {
            let position = [i as f64, (i * 2) as f64, (i * 3) as f64];
            assert_eq!(a.sample_2d(position[0], position[2], 0.5, 0.3), b.sample_2d(position[0], position[2], 0.5, 0.3));
            assert_eq!(a.sample_3d(position, 0.0, 0.1, 0.5), b.sample_3d(position, 0.0, 0.1, 0.5));
        }
    }

    #[test]
    fn thresholds_outside_the_range_are_constant() {
        let field = NoiseField::new(3, 16);
        let position = [12.0, 40.0, 7.0];
        assert!(field.sample_3d(position, 0.0, 0.1, -1.0));
        assert!(!field.sample_3d(position, 0.0, 0.1, 1.0));
    }
}
