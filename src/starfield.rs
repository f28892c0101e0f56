use glam::{Mat4, Vec3};
use rand::Rng;

/// Half-extent of the cube the star positions are sampled from.
pub const FIELD_RANGE: f32 = 20.0;

/// Warm yellow flat color applied to every star.
pub const STAR_COLOR: [f32; 3] = [254.0 / 255.0, 1.0, 166.0 / 255.0];

/// Fixed star base positions, rotated rigidly as one shell around the origin.
///
/// The base positions never change after generation; orbital motion is
/// derived each frame by combining the shared shell angle with each base
/// position, so the field keeps its shape forever.
#[derive(Debug, Clone, PartialEq)]
pub struct Starfield {
    stars: Vec<Vec3>,
}

impl Starfield {
    /// Samples `count` positions uniformly from `[-range, range]^3`.
    pub fn generate<R: Rng>(count: usize, range: f32, rng: &mut R) -> Self {
        debug_assert!(range > 0.0);
        let stars = (0..count)
            .map(|_| {
                Vec3::new(
                    rng.gen_range(-range..range),
                    rng.gen_range(-range..range),
                    rng.gen_range(-range..range),
                )
            })
            .collect();
        Self { stars }
    }

    pub fn len(&self) -> usize {
        self.stars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.stars
    }

    /// Per-star model matrices for the shared shell angle:
    /// `rotate_y(angle) * translate(base)`. At angle zero each matrix maps
    /// the origin back onto the star's base position.
    pub fn model_matrices(&self, angle: f32) -> Vec<Mat4> {
        let rotation = Mat4::from_rotation_y(angle);
        self.stars
            .iter()
            .map(|&base| rotation * Mat4::from_translation(base))
            .collect()
    }
}
