//! Shared deterministic types for the solver core.
//!
//! These types define stable contracts between engines and their callers. They
//! hold no engine state and must remain deterministic across calls.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::matrix::Matrix;
use crate::core::notation::{Latex, Notation, PlainText};

/// Every operation the solver can dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Determinant,
    Add,
    Subtract,
    ScalarMultiply,
    Multiply,
    Power,
    Root,
    Distance,
    Collinear,
    Coplanar,
    PlaneFromPoints,
    PointToPlane,
    LineFromPoints,
    PointToLine,
}

impl Operation {
    pub const ALL: [Operation; 14] = [
        Operation::Determinant,
        Operation::Add,
        Operation::Subtract,
        Operation::ScalarMultiply,
        Operation::Multiply,
        Operation::Power,
        Operation::Root,
        Operation::Distance,
        Operation::Collinear,
        Operation::Coplanar,
        Operation::PlaneFromPoints,
        Operation::PointToPlane,
        Operation::LineFromPoints,
        Operation::PointToLine,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Determinant => "determinant",
            Operation::Add => "add",
            Operation::Subtract => "subtract",
            Operation::ScalarMultiply => "scalar_multiply",
            Operation::Multiply => "multiply",
            Operation::Power => "power",
            Operation::Root => "root",
            Operation::Distance => "distance",
            Operation::Collinear => "collinear",
            Operation::Coplanar => "coplanar",
            Operation::PlaneFromPoints => "plane_from_points",
            Operation::PointToPlane => "point_to_plane",
            Operation::LineFromPoints => "line_from_points",
            Operation::PointToLine => "point_to_line",
        }
    }

    /// Input fields the operation reads, in the order a form would show them.
    pub fn required_inputs(self) -> &'static [InputField] {
        use InputField::{
            Base, Direction, Exponent, Index, LinePoint, Matrix, MatrixA, MatrixB, P1, P2, P3, P4,
            Plane, Point, Radicand, Scalar,
        };
        match self {
            Operation::Determinant => &[Matrix],
            Operation::Add | Operation::Subtract | Operation::Multiply => &[MatrixA, MatrixB],
            Operation::ScalarMultiply => &[Matrix, Scalar],
            Operation::Power => &[Base, Exponent],
            Operation::Root => &[Radicand, Index],
            Operation::Distance | Operation::LineFromPoints => &[P1, P2],
            Operation::Collinear | Operation::PlaneFromPoints => &[P1, P2, P3],
            Operation::Coplanar => &[P1, P2, P3, P4],
            Operation::PointToPlane => &[Point, Plane],
            Operation::PointToLine => &[Point, LinePoint, Direction],
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().replace('-', "_");
        Operation::ALL
            .into_iter()
            .find(|op| op.as_str() == normalized)
            .ok_or_else(|| format!("unknown operation '{}'", s))
    }
}

/// A named text input, as entered by the user before parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputField {
    Matrix,
    MatrixA,
    MatrixB,
    Scalar,
    Base,
    Exponent,
    Radicand,
    Index,
    P1,
    P2,
    P3,
    P4,
    Point,
    Plane,
    LinePoint,
    Direction,
}

impl InputField {
    pub fn label(self) -> &'static str {
        match self {
            InputField::Matrix => "matrix",
            InputField::MatrixA => "matrix A",
            InputField::MatrixB => "matrix B",
            InputField::Scalar => "scalar",
            InputField::Base => "base",
            InputField::Exponent => "exponent",
            InputField::Radicand => "radicand",
            InputField::Index => "root index",
            InputField::P1 => "point P1",
            InputField::P2 => "point P2",
            InputField::P3 => "point P3",
            InputField::P4 => "point P4",
            InputField::Point => "point",
            InputField::Plane => "plane coefficients",
            InputField::LinePoint => "line point",
            InputField::Direction => "line direction",
        }
    }
}

/// Which text dialect engines write their trace lines in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotationKind {
    #[default]
    Plain,
    Latex,
}

impl NotationKind {
    pub fn notation(self) -> &'static dyn Notation {
        match self {
            NotationKind::Plain => &PlainText,
            NotationKind::Latex => &Latex,
        }
    }
}

/// Numeric tolerance for zero tests and verification passes.
///
/// A value is negligible when `|value| < max(absolute, relative * scale)`, where
/// `scale` is the magnitude the value was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tolerance {
    pub absolute: f64,
    pub relative: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            absolute: 1e-4,
            relative: 1e-9,
        }
    }
}

impl Tolerance {
    pub fn threshold(&self, scale: f64) -> f64 {
        self.absolute.max(self.relative * scale.abs())
    }

    pub fn is_negligible(&self, value: f64, scale: f64) -> bool {
        value.abs() < self.threshold(scale)
    }

    pub fn approx_eq(&self, left: f64, right: f64) -> bool {
        self.is_negligible(left - right, left.abs().max(right.abs()))
    }
}

/// Engine-facing settings snapshot, immutable for the duration of a call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settings {
    /// Displayed (and returned) values are rounded to this many decimals.
    pub decimal_places: u32,
    pub notation: NotationKind,
    /// Largest side length the determinant engine accepts.
    pub max_determinant_size: usize,
    pub tolerance: Tolerance,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            decimal_places: 6,
            notation: NotationKind::Plain,
            max_determinant_size: 5,
            tolerance: Tolerance::default(),
        }
    }
}

impl Settings {
    pub fn notation(&self) -> &'static dyn Notation {
        self.notation.notation()
    }

    /// Round to `decimal_places`, folding `-0` into `0`.
    pub fn round(&self, value: f64) -> f64 {
        let factor = 10f64.powi(self.decimal_places as i32);
        let scaled = value * factor;
        if !scaled.is_finite() {
            return value;
        }
        let rounded = scaled.round() / factor;
        if rounded == 0.0 { 0.0 } else { rounded }
    }

    pub fn num(&self, value: f64) -> String {
        format!("{}", self.round(value))
    }

    /// Like [`Settings::num`], parenthesizing negatives so they read as operands.
    pub fn term(&self, value: f64) -> String {
        let rounded = self.round(value);
        if rounded < 0.0 {
            format!("({})", rounded)
        } else {
            format!("{}", rounded)
        }
    }

    pub fn matrix(&self, matrix: &Matrix) -> String {
        let cells: Vec<Vec<String>> = matrix
            .rows()
            .iter()
            .map(|row| row.iter().map(|value| self.num(*value)).collect())
            .collect();
        self.notation().matrix(&cells)
    }

    pub fn vector(&self, components: [f64; 3]) -> String {
        let cells = components.map(|value| self.num(value));
        self.notation().vector(&cells)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_folds_negative_zero() {
        let settings = Settings::default();
        assert_eq!(settings.num(-0.0000001), "0");
        assert_eq!(settings.num(0.1 + 0.2), "0.3");
    }

    #[test]
    fn term_parenthesizes_negatives() {
        let settings = Settings::default();
        assert_eq!(settings.term(-3.0), "(-3)");
        assert_eq!(settings.term(2.5), "2.5");
    }

    #[test]
    fn tolerance_scales_with_magnitude() {
        let tol = Tolerance::default();
        assert!(tol.is_negligible(5e-5, 1.0));
        assert!(!tol.is_negligible(5e-4, 1.0));
        assert!(tol.is_negligible(5e-4, 1e6));
    }

    #[test]
    fn operation_parses_kebab_and_snake_case() {
        assert_eq!(
            "point-to-line".parse::<Operation>(),
            Ok(Operation::PointToLine)
        );
        assert_eq!("root".parse::<Operation>(), Ok(Operation::Root));
        assert!("integral".parse::<Operation>().is_err());
    }

    #[test]
    fn every_operation_has_inputs() {
        for op in Operation::ALL {
            assert!(!op.required_inputs().is_empty(), "{op}");
        }
    }
}
