//! Test-only helpers for building engine inputs.

use crate::core::geometry::Point3D;
use crate::core::matrix::{Matrix, parse_matrix};

/// Parse a matrix literal, panicking on malformed test input.
pub fn matrix(text: &str) -> Matrix {
    parse_matrix(text).unwrap_or_else(|err| panic!("bad test matrix '{}': {}", text, err))
}

pub fn point(x: f64, y: f64, z: f64) -> Point3D {
    Point3D::new(x, y, z)
}

/// Deterministic pseudo-random square matrix with small integer entries.
pub fn square_matrix(size: usize, seed: u64) -> Matrix {
    let mut state = seed
        .wrapping_mul(6364136223846793005)
        .wrapping_add(1442695040888963407);
    let rows = (0..size)
        .map(|_| {
            (0..size)
                .map(|_| {
                    state = state
                        .wrapping_mul(6364136223846793005)
                        .wrapping_add(1442695040888963407);
                    ((state >> 33) % 19) as f64 - 9.0
                })
                .collect()
        })
        .collect();
    Matrix::from_rows(rows).unwrap_or_else(|err| panic!("square matrix: {}", err))
}

