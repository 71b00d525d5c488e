//! Canned example inputs, one set per operation.

use std::collections::BTreeMap;

use crate::core::types::{InputField, Operation};

/// Example inputs for `operation`, covering every field it requires.
pub fn example_pairs(operation: Operation) -> &'static [(InputField, &'static str)] {
    use InputField::{
        Base, Direction, Exponent, Index, LinePoint, Matrix, MatrixA, MatrixB, P1, P2, P3, P4,
        Plane, Point, Radicand, Scalar,
    };
    match operation {
        Operation::Determinant => &[(Matrix, "2 -1 0; 1 3 2; 0 1 4")],
        Operation::Add => &[(MatrixA, "1 2; 3 4"), (MatrixB, "5 6; 7 8")],
        Operation::Subtract => &[(MatrixA, "1 2; 3 4"), (MatrixB, "4 3; 2 1")],
        Operation::ScalarMultiply => &[(Matrix, "1 -2; 0 3"), (Scalar, "2,5")],
        Operation::Multiply => &[(MatrixA, "1 2 3; 4 5 6"), (MatrixB, "7 8; 9 10; 11 12")],
        Operation::Power => &[(Base, "2"), (Exponent, "10")],
        Operation::Root => &[(Radicand, "72"), (Index, "2")],
        Operation::Distance => &[(P1, "0 0 0"), (P2, "3 4 0")],
        Operation::Collinear => &[(P1, "0 0 0"), (P2, "1 2 3"), (P3, "2 4 6")],
        Operation::Coplanar => &[
            (P1, "0 0 0"),
            (P2, "1 0 0"),
            (P3, "0 1 0"),
            (P4, "1 1 0"),
        ],
        Operation::PlaneFromPoints => &[(P1, "1 0 0"), (P2, "0 1 0"), (P3, "0 0 1")],
        Operation::PointToPlane => &[(Point, "1 2 3"), (Plane, "1 1 1 -1")],
        Operation::LineFromPoints => &[(P1, "1 2 3"), (P2, "4 6 3")],
        Operation::PointToLine => &[
            (Point, "5 3 4"),
            (LinePoint, "0 0 0"),
            (Direction, "2 0 0"),
        ],
    }
}

pub fn example_inputs(operation: Operation) -> BTreeMap<InputField, String> {
    example_pairs(operation)
        .iter()
        .map(|(field, value)| (*field, (*value).to_string()))
        .collect()
}
