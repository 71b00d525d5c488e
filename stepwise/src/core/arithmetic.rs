//! Matrix addition, subtraction, scalar multiplication and matrix products.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::error::SolveError;
use crate::core::matrix::{Matrix, have_same_dimensions};
use crate::core::trace::{Solution, StepTrace};
use crate::core::types::Settings;

/// Elementwise binary operation shared by addition and subtraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementwiseOp {
    Add,
    Subtract,
}

impl ElementwiseOp {
    fn symbol(self) -> &'static str {
        match self {
            ElementwiseOp::Add => "+",
            ElementwiseOp::Subtract => "-",
        }
    }

    fn apply(self, left: f64, right: f64) -> f64 {
        match self {
            ElementwiseOp::Add => left + right,
            ElementwiseOp::Subtract => left - right,
        }
    }

    fn expression(self) -> &'static str {
        match self {
            ElementwiseOp::Add => "A + B",
            ElementwiseOp::Subtract => "A - B",
        }
    }
}

pub fn add(a: &Matrix, b: &Matrix, settings: &Settings) -> Result<Solution<Matrix>, SolveError> {
    elementwise(ElementwiseOp::Add, a, b, settings)
}

pub fn subtract(
    a: &Matrix,
    b: &Matrix,
    settings: &Settings,
) -> Result<Solution<Matrix>, SolveError> {
    elementwise(ElementwiseOp::Subtract, a, b, settings)
}

/// Suffix for a self-check line.
fn mark(holds: bool) -> &'static str {
    if holds { " ✓" } else { " ✗" }
}

fn raw_elementwise(op: ElementwiseOp, a: &Matrix, b: &Matrix) -> Matrix {
    Matrix::from_fn(a.row_count(), a.col_count(), |i, j| {
        op.apply(a.get(i, j), b.get(i, j))
    })
}

/// `a ± b` with a sampled derivation and a property check keyed to the operands.
pub fn elementwise(
    op: ElementwiseOp,
    a: &Matrix,
    b: &Matrix,
    settings: &Settings,
) -> Result<Solution<Matrix>, SolveError> {
    if !have_same_dimensions(a, b) {
        return Err(SolveError::Dimension {
            operation: op.expression(),
            left: a.shape(),
            right: b.shape(),
            requirement: "both matrices must have the same dimensions",
        });
    }
    let raw = raw_elementwise(op, a, b);
    if !raw.all_finite() {
        return Err(SolveError::Numerical("matrix element".to_string()));
    }
    let result = raw.map(|value| settings.round(value));
    debug!(?op, shape = %a.shape(), "elementwise matrix operation");

    let n = settings.notation();
    let shape = a.shape();
    let symbol = op.symbol();
    let expr = op.expression();
    let mut trace = StepTrace::new();
    trace.line(format!("Matrix A ({}):", shape));
    trace.line(settings.matrix(a));
    trace.line(format!("Matrix B ({}):", b.shape()));
    trace.line(settings.matrix(b));
    trace.line(format!(
        "Both matrices are {}, so {} is defined and is also {}.",
        shape, expr, shape
    ));
    trace.line(format!(
        "Each element is ({}){} = {} {} {}.",
        expr,
        n.subscripted("", "ij"),
        n.subscripted("a", "ij"),
        symbol,
        n.subscripted("b", "ij")
    ));

    let last = (a.row_count() - 1, a.col_count() - 1);
    let mut samples = vec![(0, 0)];
    if last != (0, 0) {
        samples.push(last);
    }
    for (i, j) in samples {
        trace.line(format!(
            "Element ({}, {}): {} {} {} = {} {} {} = {}",
            i + 1,
            j + 1,
            n.element("a", i + 1, j + 1),
            symbol,
            n.element("b", i + 1, j + 1),
            settings.num(a.get(i, j)),
            symbol,
            settings.term(b.get(i, j)),
            settings.num(raw.get(i, j))
        ));
    }
    trace.line(format!("Result {}:", expr));
    trace.line(settings.matrix(&result));

    trace.begin_verification();
    match op {
        ElementwiseOp::Add => {
            let swapped = raw_elementwise(ElementwiseOp::Add, b, a);
            trace.line(format!(
                "Commutativity: B + A gives {}, the same matrix as A + B{}",
                settings.matrix(&swapped.map(|value| settings.round(value))),
                mark(swapped == raw)
            ));
            trace.line(format!(
                "For example {} + {} = {} + {} = {}.",
                n.element("b", 1, 1),
                n.element("a", 1, 1),
                settings.num(b.get(0, 0)),
                settings.term(a.get(0, 0)),
                settings.num(swapped.get(0, 0))
            ));
        }
        ElementwiseOp::Subtract => {
            let swapped = raw_elementwise(ElementwiseOp::Subtract, b, a);
            if swapped == raw {
                trace.line("Here A = B, so A - B = B - A is the zero matrix.");
            } else {
                trace.line(format!(
                    "Subtraction is not commutative: B - A = {} {} A - B; instead B - A = -(A - B).",
                    settings.matrix(&swapped.map(|value| settings.round(value))),
                    n.not_equal()
                ));
            }
            let negated = b.map(|value| -value);
            let via_addition = raw_elementwise(ElementwiseOp::Add, a, &negated);
            trace.line(format!(
                "Relation to addition: A - B = A + (-B), and A + (-B) = {}{}",
                settings.matrix(&via_addition.map(|value| settings.round(value))),
                mark(via_addition == raw)
            ));
        }
    }
    trace.line(match op {
        ElementwiseOp::Add => format!(
            "Associativity: (A + B) + C = A + (B + C) for any {} matrix C.",
            shape
        ),
        ElementwiseOp::Subtract => format!(
            "Associativity: subtraction is not associative; (A - B) - C = A - (B + C) for any {} matrix C.",
            shape
        ),
    });

    Ok(Solution::new(result, trace))
}

/// `k · m` with every element's computation listed.
pub fn scalar_multiply(
    matrix: &Matrix,
    scalar: f64,
    settings: &Settings,
) -> Result<Solution<Matrix>, SolveError> {
    let raw = matrix.map(|value| scalar * value);
    if !raw.all_finite() {
        return Err(SolveError::Numerical("matrix element".to_string()));
    }
    let result = raw.map(|value| settings.round(value));
    debug!(shape = %matrix.shape(), scalar, "scalar multiplication");

    let n = settings.notation();
    let k = settings.num(scalar);
    let mut trace = StepTrace::new();
    trace.line(format!("Matrix A ({}):", matrix.shape()));
    trace.line(settings.matrix(matrix));
    trace.line(format!("Scalar k = {}", k));
    trace.line(format!(
        "Multiply every element by k: (kA){} = k {} {}.",
        n.subscripted("", "ij"),
        n.dot(),
        n.subscripted("a", "ij")
    ));
    for i in 0..matrix.row_count() {
        for j in 0..matrix.col_count() {
            trace.line(format!(
                "Element ({}, {}): {} {} {} = {}",
                i + 1,
                j + 1,
                k,
                n.times(),
                settings.term(matrix.get(i, j)),
                settings.num(raw.get(i, j))
            ));
        }
    }
    trace.line("Result kA:");
    trace.line(settings.matrix(&result));

    trace.begin_verification();
    trace.line("Distributivity: k(A + B) = kA + kB and (k + l)A = kA + lA.");
    let first = matrix.get(0, 0);
    let shifted = (scalar + 1.0) * first;
    trace.line(format!(
        "With l = 1 on element (1, 1): ({} + 1) {} {} = {} = {} + {}{}",
        k,
        n.times(),
        settings.term(first),
        settings.num(shifted),
        settings.num(raw.get(0, 0)),
        settings.term(first),
        mark(settings.tolerance.approx_eq(shifted, raw.get(0, 0) + first))
    ));
    trace.line("Associativity: (kl)A = k(lA) for any scalar l.");
    trace.line(format!(
        "Identity: 1 {} A = A, since multiplying by 1 leaves every element unchanged.",
        n.dot()
    ));
    let total: f64 = matrix.rows().iter().flatten().sum();
    let scaled_total: f64 = raw.rows().iter().flatten().sum();
    trace.line(format!(
        "Element sums: k {} {} = {} and the elements of kA sum to {}{}",
        n.times(),
        settings.term(total),
        settings.num(scalar * total),
        settings.num(scaled_total),
        mark(settings.tolerance.approx_eq(scalar * total, scaled_total))
    ));

    Ok(Solution::new(result, trace))
}

fn raw_product(a: &Matrix, b: &Matrix) -> Matrix {
    Matrix::from_fn(a.row_count(), b.col_count(), |i, j| {
        (0..a.col_count()).fold(0.0, |sum, k| sum + a.get(i, k) * b.get(k, j))
    })
}

/// `a · b`, expanding every result element as a sum of products.
pub fn multiply(
    a: &Matrix,
    b: &Matrix,
    settings: &Settings,
) -> Result<Solution<Matrix>, SolveError> {
    if a.col_count() != b.row_count() {
        return Err(SolveError::Dimension {
            operation: "AB",
            left: a.shape(),
            right: b.shape(),
            requirement: "the columns of A must equal the rows of B",
        });
    }
    let raw = raw_product(a, b);
    if !raw.all_finite() {
        return Err(SolveError::Numerical("matrix element".to_string()));
    }
    let result = raw.map(|value| settings.round(value));
    debug!(left = %a.shape(), right = %b.shape(), "matrix product");

    let n = settings.notation();
    let mut trace = StepTrace::new();
    trace.line(format!("Matrix A ({}):", a.shape()));
    trace.line(settings.matrix(a));
    trace.line(format!("Matrix B ({}):", b.shape()));
    trace.line(settings.matrix(b));
    trace.line(format!(
        "A is {} and B is {}: the inner dimensions match ({} = {}), so AB is {}.",
        a.shape(),
        b.shape(),
        a.col_count(),
        b.row_count(),
        result.shape()
    ));
    trace.line(format!(
        "Each element (AB){} = Σₖ {} {} {}: row i of A times column j of B.",
        n.subscripted("", "ij"),
        n.subscripted("a", "ik"),
        n.dot(),
        n.subscripted("b", "kj")
    ));
    for i in 0..a.row_count() {
        for j in 0..b.col_count() {
            let products: Vec<String> = (0..a.col_count())
                .map(|k| {
                    format!(
                        "({} {} {})",
                        settings.num(a.get(i, k)),
                        n.times(),
                        settings.num(b.get(k, j))
                    )
                })
                .collect();
            trace.line(format!(
                "(AB){} = {} = {}",
                n.subscripted("", &format!("{}{}", i + 1, j + 1)),
                products.join(" + "),
                settings.num(raw.get(i, j))
            ));
        }
    }
    trace.line("Result AB:");
    trace.line(settings.matrix(&result));

    trace.begin_verification();
    trace.line(format!(
        "Matrix multiplication is not commutative: AB {} BA in general.",
        n.not_equal()
    ));
    if b.col_count() == a.row_count() {
        let reversed = raw_product(b, a);
        if reversed == raw {
            trace.line("For these particular operands BA happens to equal AB.");
        } else {
            trace.line(format!(
                "Here BA = {} ({}), which differs from AB.",
                settings.matrix(&reversed.map(|value| settings.round(value))),
                reversed.shape()
            ));
        }
    } else {
        trace.line(format!(
            "Here BA is not even defined: B has {} columns but A has {} rows.",
            b.col_count(),
            a.row_count()
        ));
    }
    trace.line("Associativity: (AB)C = A(BC) whenever the products are defined.");
    trace.line("Distributivity over addition: A(B + C) = AB + AC and (A + B)C = AC + BC.");

    Ok(Solution::new(result, trace))
}
