use std::f32::consts::{PI, TAU};

use anyhow::{ensure, Result};
use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// Interleaved vertex layout shared by every mesh the renderer draws.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Vertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

/// GPU ready vertex/index arrays for a latitude/longitude sphere.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SphereMesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl SphereMesh {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }
}

/// Builds a UV sphere with `slices` segments of longitude and `stacks`
/// segments of latitude.
///
/// Stack `i` maps to the polar angle `PI * i / stacks` (zero at the north
/// pole), slice `j` to the azimuth `TAU * j / slices`. The seam column and
/// both poles are duplicated so that texture coordinates stay continuous;
/// the triangles touching a pole collapse to a point, which the rasterizer
/// discards for free.
pub fn sphere(radius: f32, slices: u32, stacks: u32) -> Result<SphereMesh> {
    ensure!(radius > 0.0, "sphere radius must be positive, got {radius}");
    ensure!(
        slices >= 1 && stacks >= 1,
        "sphere needs at least one slice and one stack, got {slices}x{stacks}"
    );

    let mut vertices = Vec::with_capacity(((stacks + 1) * (slices + 1)) as usize);
    for stack in 0..=stacks {
        let phi = PI * stack as f32 / stacks as f32;
        for slice in 0..=slices {
            let theta = TAU * slice as f32 / slices as f32;
            vertices.push(Vertex {
                position: [
                    radius * theta.cos() * phi.sin(),
                    radius * phi.cos(),
                    radius * theta.sin() * phi.sin(),
                ],
                uv: [
                    slice as f32 / slices as f32,
                    stack as f32 / stacks as f32,
                ],
            });
        }
    }

    // Two triangles per cell, row-major: index(i, j) = i * (slices + 1) + j.
    let row = slices + 1;
    let mut indices = Vec::with_capacity((stacks * slices * 6) as usize);
    for stack in 0..stacks {
        for slice in 0..slices {
            let i0 = stack * row + slice;
            let i1 = (stack + 1) * row + slice;
            indices.extend_from_slice(&[i0, i1, i0 + 1, i0 + 1, i1, i1 + 1]);
        }
    }

    Ok(SphereMesh { vertices, indices })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_match_parameterization() {
        for (slices, stacks) in [(1, 1), (3, 2), (4, 2), (16, 8), (72, 36)] {
            let mesh = sphere(1.0, slices, stacks).unwrap();
            assert_eq!(
                mesh.vertex_count(),
                ((stacks + 1) * (slices + 1)) as usize,
                "vertex count for {slices}x{stacks}"
            );
            assert_eq!(
                mesh.index_count(),
                (stacks * slices * 6) as usize,
                "index count for {slices}x{stacks}"
            );
        }
    }

    #[test]
    fn documented_example_dimensions() {
        let mesh = sphere(1.0, 4, 2).unwrap();
        assert_eq!(mesh.vertex_count(), 15);
        assert_eq!(mesh.index_count(), 48);
    }

    #[test]
    fn every_index_references_a_vertex() {
        let mesh = sphere(2.0, 7, 5).unwrap();
        let count = mesh.vertex_count() as u32;
        assert!(mesh.indices.iter().all(|&index| index < count));
    }

    #[test]
    fn poles_sit_on_the_vertical_axis() {
        let radius = 3.0;
        let mesh = sphere(radius, 12, 6).unwrap();
        let row = 12 + 1;
        for slice in 0..row {
            let north = mesh.vertices[slice as usize].position;
            assert!(north[0].abs() < 1e-5 && north[2].abs() < 1e-5);
            assert!((north[1] - radius).abs() < 1e-5);

            let south = mesh.vertices[(6 * row + slice) as usize].position;
            assert!(south[0].abs() < 1e-5 && south[2].abs() < 1e-5);
            assert!((south[1] + radius).abs() < 1e-5);
        }
    }

    #[test]
    fn uvs_stay_in_unit_square() {
        let mesh = sphere(1.0, 9, 4).unwrap();
        for vertex in &mesh.vertices {
            assert!((0.0..=1.0).contains(&vertex.uv[0]));
            assert!((0.0..=1.0).contains(&vertex.uv[1]));
        }
    }

    #[test]
    fn vertices_lie_on_the_sphere() {
        let radius = 1.5;
        let mesh = sphere(radius, 10, 5).unwrap();
        for vertex in &mesh.vertices {
            let [x, y, z] = vertex.position;
            let length = (x * x + y * y + z * z).sqrt();
            assert!((length - radius).abs() < 1e-4);
        }
    }

    #[test]
    fn generation_is_deterministic() {
        let a = sphere(1.0, 24, 12).unwrap();
        let b = sphere(1.0, 24, 12).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn rejects_degenerate_parameters() {
        assert!(sphere(0.0, 4, 2).is_err());
        assert!(sphere(-1.0, 4, 2).is_err());
        assert!(sphere(1.0, 0, 2).is_err());
        assert!(sphere(1.0, 4, 0).is_err());
    }
}
