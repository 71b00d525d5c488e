//! Single entry point dispatching a typed request to its engine.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::arithmetic;
use crate::core::determinant::solve_determinant;
use crate::core::error::{ErrorKind, SolveError};
use crate::core::geometry::{self, Line3D, Plane, Point3D};
use crate::core::matrix::{Matrix, parse_fixed, parse_matrix, parse_number};
use crate::core::radical;
use crate::core::trace::{Solution, StepTrace};
use crate::core::types::{InputField, Operation, Settings};

/// One engine call with its inputs. Matrices travel as text in the grammar of
/// [`parse_matrix`] so parse failures surface as part of the outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "operation", rename_all = "snake_case")]
pub enum SolveRequest {
    Determinant {
        matrix: String,
    },
    Add {
        matrix_a: String,
        matrix_b: String,
    },
    Subtract {
        matrix_a: String,
        matrix_b: String,
    },
    ScalarMultiply {
        matrix: String,
        scalar: f64,
    },
    Multiply {
        matrix_a: String,
        matrix_b: String,
    },
    Power {
        base: f64,
        exponent: f64,
    },
    Root {
        radicand: f64,
        index: f64,
    },
    Distance {
        p1: Point3D,
        p2: Point3D,
    },
    Collinear {
        p1: Point3D,
        p2: Point3D,
        p3: Point3D,
    },
    Coplanar {
        p1: Point3D,
        p2: Point3D,
        p3: Point3D,
        p4: Point3D,
    },
    PlaneFromPoints {
        p1: Point3D,
        p2: Point3D,
        p3: Point3D,
    },
    PointToPlane {
        point: Point3D,
        plane: Plane,
    },
    LineFromPoints {
        p1: Point3D,
        p2: Point3D,
    },
    PointToLine {
        point: Point3D,
        line: Line3D,
    },
}

impl SolveRequest {
    pub fn operation(&self) -> Operation {
        match self {
            SolveRequest::Determinant { .. } => Operation::Determinant,
            SolveRequest::Add { .. } => Operation::Add,
            SolveRequest::Subtract { .. } => Operation::Subtract,
            SolveRequest::ScalarMultiply { .. } => Operation::ScalarMultiply,
            SolveRequest::Multiply { .. } => Operation::Multiply,
            SolveRequest::Power { .. } => Operation::Power,
            SolveRequest::Root { .. } => Operation::Root,
            SolveRequest::Distance { .. } => Operation::Distance,
            SolveRequest::Collinear { .. } => Operation::Collinear,
            SolveRequest::Coplanar { .. } => Operation::Coplanar,
            SolveRequest::PlaneFromPoints { .. } => Operation::PlaneFromPoints,
            SolveRequest::PointToPlane { .. } => Operation::PointToPlane,
            SolveRequest::LineFromPoints { .. } => Operation::LineFromPoints,
            SolveRequest::PointToLine { .. } => Operation::PointToLine,
        }
    }
}

/// Result payload of a successful call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum SolveValue {
    Number(f64),
    Boolean(bool),
    Matrix(Matrix),
    Plane(Plane),
    Line(Line3D),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorReport {
    pub kind: ErrorKind,
    pub message: String,
}

/// Exactly one of `result` and `error` is set. On failure the trace is empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolveResponse {
    pub result: Option<SolveValue>,
    pub trace: StepTrace,
    pub error: Option<ErrorReport>,
}

impl SolveResponse {
    pub fn success(solution: Solution<SolveValue>) -> Self {
        Self {
            result: Some(solution.value),
            trace: solution.trace,
            error: None,
        }
    }

    pub fn failure(err: &SolveError) -> Self {
        Self {
            result: None,
            trace: StepTrace::new(),
            error: Some(ErrorReport {
                kind: err.kind(),
                message: err.to_string(),
            }),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

impl From<Result<Solution<SolveValue>, SolveError>> for SolveResponse {
    fn from(result: Result<Solution<SolveValue>, SolveError>) -> Self {
        match result {
            Ok(solution) => SolveResponse::success(solution),
            Err(err) => SolveResponse::failure(&err),
        }
    }
}

/// Run `request` against its engine. Never panics on user input; every
/// failure becomes an error outcome.
pub fn solve(request: &SolveRequest, settings: &Settings) -> SolveResponse {
    let operation = request.operation();
    let result = dispatch(request, settings);
    match &result {
        Ok(solution) => debug!(%operation, lines = solution.trace.len(), "solved"),
        Err(err) => debug!(%operation, kind = ?err.kind(), error = %err, "solve failed"),
    }
    result.into()
}

fn dispatch(
    request: &SolveRequest,
    settings: &Settings,
) -> Result<Solution<SolveValue>, SolveError> {
    let number = |s: Solution<f64>| s.map(SolveValue::Number);
    let boolean = |s: Solution<bool>| s.map(SolveValue::Boolean);
    let matrix = |s: Solution<Matrix>| s.map(SolveValue::Matrix);
    match request {
        SolveRequest::Determinant { matrix: text } => {
            let m = parse_matrix(text)?;
            solve_determinant(&m, settings).map(number)
        }
        SolveRequest::Add { matrix_a, matrix_b } => {
            let (a, b) = parse_pair(matrix_a, matrix_b)?;
            arithmetic::add(&a, &b, settings).map(matrix)
        }
        SolveRequest::Subtract { matrix_a, matrix_b } => {
            let (a, b) = parse_pair(matrix_a, matrix_b)?;
            arithmetic::subtract(&a, &b, settings).map(matrix)
        }
        SolveRequest::ScalarMultiply { matrix: text, scalar } => {
            let m = parse_matrix(text)?;
            arithmetic::scalar_multiply(&m, *scalar, settings).map(matrix)
        }
        SolveRequest::Multiply { matrix_a, matrix_b } => {
            let (a, b) = parse_pair(matrix_a, matrix_b)?;
            arithmetic::multiply(&a, &b, settings).map(matrix)
        }
        SolveRequest::Power { base, exponent } => {
            radical::power(*base, *exponent, settings).map(number)
        }
        SolveRequest::Root { radicand, index } => {
            radical::root(*radicand, *index, settings).map(number)
        }
        SolveRequest::Distance { p1, p2 } => geometry::distance(*p1, *p2, settings).map(number),
        SolveRequest::Collinear { p1, p2, p3 } => {
            geometry::collinear(*p1, *p2, *p3, settings).map(boolean)
        }
        SolveRequest::Coplanar { p1, p2, p3, p4 } => {
            geometry::coplanar(*p1, *p2, *p3, *p4, settings).map(boolean)
        }
        SolveRequest::PlaneFromPoints { p1, p2, p3 } => {
            geometry::plane_from_points(*p1, *p2, *p3, settings)
                .map(|s| s.map(SolveValue::Plane))
        }
        SolveRequest::PointToPlane { point, plane } => {
            geometry::distance_point_to_plane(*point, *plane, settings).map(number)
        }
        SolveRequest::LineFromPoints { p1, p2 } => {
            geometry::line_from_points(*p1, *p2, settings).map(|s| s.map(SolveValue::Line))
        }
        SolveRequest::PointToLine { point, line } => {
            geometry::distance_point_to_line(*point, *line, settings).map(number)
        }
    }
}

fn parse_pair(a: &str, b: &str) -> Result<(Matrix, Matrix), SolveError> {
    let left = parse_matrix(a).map_err(|err| relabel(err, "matrix A"))?;
    let right = parse_matrix(b).map_err(|err| relabel(err, "matrix B"))?;
    Ok((left, right))
}

fn relabel(err: SolveError, what: &str) -> SolveError {
    match err {
        SolveError::Parse { reason, .. } => SolveError::parse(what, reason),
        other => other,
    }
}

/// Build a request from raw text inputs keyed by field.
///
/// A missing or blank field is a parse error naming the field.
pub fn build_request(
    operation: Operation,
    inputs: &BTreeMap<InputField, String>,
) -> Result<SolveRequest, SolveError> {
    let text = |field: InputField| -> Result<String, SolveError> {
        match inputs.get(&field) {
            Some(value) if !value.trim().is_empty() => Ok(value.clone()),
            _ => Err(SolveError::parse(field.label(), "no value given")),
        }
    };
    let number = |field: InputField| -> Result<f64, SolveError> {
        parse_number(&text(field)?, field.label())
    };
    let point = |field: InputField| -> Result<Point3D, SolveError> {
        parse_fixed::<3>(&text(field)?, field.label()).map(Point3D::from)
    };

    Ok(match operation {
        Operation::Determinant => SolveRequest::Determinant {
            matrix: text(InputField::Matrix)?,
        },
        Operation::Add => SolveRequest::Add {
            matrix_a: text(InputField::MatrixA)?,
            matrix_b: text(InputField::MatrixB)?,
        },
        Operation::Subtract => SolveRequest::Subtract {
            matrix_a: text(InputField::MatrixA)?,
            matrix_b: text(InputField::MatrixB)?,
        },
        Operation::ScalarMultiply => SolveRequest::ScalarMultiply {
            matrix: text(InputField::Matrix)?,
            scalar: number(InputField::Scalar)?,
        },
        Operation::Multiply => SolveRequest::Multiply {
            matrix_a: text(InputField::MatrixA)?,
            matrix_b: text(InputField::MatrixB)?,
        },
        Operation::Power => SolveRequest::Power {
            base: number(InputField::Base)?,
            exponent: number(InputField::Exponent)?,
        },
        Operation::Root => SolveRequest::Root {
            radicand: number(InputField::Radicand)?,
            index: number(InputField::Index)?,
        },
        Operation::Distance => SolveRequest::Distance {
            p1: point(InputField::P1)?,
            p2: point(InputField::P2)?,
        },
        Operation::Collinear => SolveRequest::Collinear {
            p1: point(InputField::P1)?,
            p2: point(InputField::P2)?,
            p3: point(InputField::P3)?,
        },
        Operation::Coplanar => SolveRequest::Coplanar {
            p1: point(InputField::P1)?,
            p2: point(InputField::P2)?,
            p3: point(InputField::P3)?,
            p4: point(InputField::P4)?,
        },
        Operation::PlaneFromPoints => SolveRequest::PlaneFromPoints {
            p1: point(InputField::P1)?,
            p2: point(InputField::P2)?,
            p3: point(InputField::P3)?,
        },
        Operation::PointToPlane => SolveRequest::PointToPlane {
            point: point(InputField::Point)?,
            plane: parse_fixed::<4>(&text(InputField::Plane)?, InputField::Plane.label())
                .map(Plane::from)?,
        },
        Operation::LineFromPoints => SolveRequest::LineFromPoints {
            p1: point(InputField::P1)?,
            p2: point(InputField::P2)?,
        },
        Operation::PointToLine => SolveRequest::PointToLine {
            point: point(InputField::Point)?,
            line: Line3D {
                point: point(InputField::LinePoint)?,
                direction: point(InputField::Direction)?,
            },
        },
    })
}

/// Human-readable form of a result value.
pub fn render_value(value: &SolveValue, settings: &Settings) -> String {
    match value {
        SolveValue::Number(number) => settings.num(*number),
        SolveValue::Boolean(true) => "yes".to_string(),
        SolveValue::Boolean(false) => "no".to_string(),
        SolveValue::Matrix(matrix) => settings.matrix(matrix),
        SolveValue::Plane(plane) => geometry::equation(settings, plane),
        SolveValue::Line(line) => format!(
            "r(t) = {} + t {} {}",
            settings.vector(line.point.components()),
            settings.notation().dot(),
            settings.vector(line.direction.components())
        ),
    }
}
