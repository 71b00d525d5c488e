//! Determinants by cofactor (Laplace) expansion along the first row.
//!
//! The expansion is O(n!) by construction. The trace exists to show cofactor
//! expansion specifically, so there is no elimination shortcut; the engine
//! call rejects sides above [`Settings::max_determinant_size`] before any work.

use tracing::debug;

use crate::core::error::{SolveError, ensure_finite};
use crate::core::matrix::{Matrix, is_square_matrix, submatrix};
use crate::core::trace::{Solution, StepTrace};
use crate::core::types::Settings;

/// One first-row term of a Laplace expansion.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpansionTerm {
    /// Zero-based column of the expanded element.
    pub column: usize,
    pub element: f64,
    pub submatrix: Matrix,
    pub minor: f64,
    /// `(-1)^column`, as `1.0` or `-1.0`.
    pub sign: f64,
    pub cofactor: f64,
    /// `element * cofactor`.
    pub term: f64,
}

/// Determinant of a square matrix, or `None` when it is not square.
///
/// Applies no size limit; callers that need the guard go through
/// [`solve_determinant`].
pub fn determinant(matrix: &Matrix) -> Option<f64> {
    if !is_square_matrix(matrix) {
        return None;
    }
    Some(expand(matrix))
}

/// First-row expansion terms of a square matrix of side ≥ 2.
///
/// The engine sums exactly these terms, so a trace built from them is
/// consistent with the result by construction.
pub fn first_row_expansion(matrix: &Matrix) -> Vec<ExpansionTerm> {
    (0..matrix.col_count())
        .filter_map(|column| {
            let sub = submatrix(matrix, 0, column)?;
            let minor = expand(&sub);
            let sign = cofactor_sign(column);
            let cofactor = sign * minor;
            let element = matrix.get(0, column);
            Some(ExpansionTerm {
                column,
                element,
                submatrix: sub,
                minor,
                sign,
                cofactor,
                term: element * cofactor,
            })
        })
        .collect()
}

fn expand(matrix: &Matrix) -> f64 {
    match matrix.row_count() {
        1 => matrix.get(0, 0),
        2 => two_by_two(matrix),
        _ => first_row_expansion(matrix)
            .iter()
            .fold(0.0, |sum, term| sum + term.term),
    }
}

fn two_by_two(matrix: &Matrix) -> f64 {
    matrix.get(0, 0) * matrix.get(1, 1) - matrix.get(0, 1) * matrix.get(1, 0)
}

fn cofactor_sign(column: usize) -> f64 {
    if column % 2 == 0 { 1.0 } else { -1.0 }
}

/// Hadamard's bound `Π ‖rowᵢ‖`, the natural magnitude of a determinant.
fn hadamard_bound(matrix: &Matrix) -> f64 {
    matrix
        .rows()
        .iter()
        .map(|row| row.iter().map(|value| value * value).sum::<f64>())
        .map(f64::sqrt)
        .product()
}

/// Compute `det(matrix)` with a full expansion trace and a singularity check.
pub fn solve_determinant(
    matrix: &Matrix,
    settings: &Settings,
) -> Result<Solution<f64>, SolveError> {
    let shape = matrix.shape();
    if !is_square_matrix(matrix) {
        return Err(SolveError::domain(format!(
            "a determinant needs a square matrix; a {} matrix is not square",
            shape
        )));
    }
    let size = matrix.row_count();
    let limit = settings.max_determinant_size;
    if size > limit {
        return Err(SolveError::domain(format!(
            "a {} matrix is too large; the limit is {}×{}",
            shape, limit, limit
        )));
    }
    debug!(size, "expanding determinant");

    let n = settings.notation();
    let mut trace = StepTrace::new();
    trace.line(format!("Matrix A ({}):", shape));
    trace.line(settings.matrix(matrix));

    let value = match size {
        1 => {
            trace.line("The determinant of a 1×1 matrix is its only element.");
            trace.line(format!("det(A) = {}", settings.num(matrix.get(0, 0))));
            matrix.get(0, 0)
        }
        2 => {
            trace.line(format!(
                "For a 2×2 matrix, det(A) = {}{}{} - {}{}{}.",
                n.element("a", 1, 1),
                n.dot(),
                n.element("a", 2, 2),
                n.element("a", 1, 2),
                n.dot(),
                n.element("a", 2, 1)
            ));
            let value = two_by_two(matrix);
            trace.line(format!(
                "det(A) = {} = {}",
                substitution(matrix, settings),
                settings.num(value)
            ));
            value
        }
        _ => laplace_trace(matrix, settings, &mut trace),
    };
    let value = ensure_finite(value, "determinant")?;
    let rounded = settings.round(value);

    trace.begin_verification();
    verify(matrix, value, settings, &mut trace);
    Ok(Solution::new(rounded, trace))
}

/// `(a × d) - (b × c) = p - q` for a 2×2 matrix.
fn substitution(matrix: &Matrix, settings: &Settings) -> String {
    let times = settings.notation().times();
    let main = matrix.get(0, 0) * matrix.get(1, 1);
    let anti = matrix.get(0, 1) * matrix.get(1, 0);
    format!(
        "({} {} {}) - ({} {} {}) = {} - {}",
        settings.num(matrix.get(0, 0)),
        times,
        settings.term(matrix.get(1, 1)),
        settings.num(matrix.get(0, 1)),
        times,
        settings.term(matrix.get(1, 0)),
        settings.num(main),
        settings.term(anti)
    )
}

fn laplace_trace(matrix: &Matrix, settings: &Settings, trace: &mut StepTrace) -> f64 {
    let n = settings.notation();
    let size = matrix.row_count();
    trace.line(format!(
        "Expand along row 1: det(A) = Σⱼ (-1)^(1+j) {} {} {} {} for j = 1..{}.",
        n.dot(),
        n.subscripted("a", "1j"),
        n.dot(),
        n.subscripted("M", "1j"),
        size
    ));

    let terms = first_row_expansion(matrix);
    for term in &terms {
        let j = term.column + 1;
        let a = n.element("a", 1, j);
        let m = n.element("M", 1, j);
        let c = n.element("C", 1, j);
        trace.line(format!("Column {}: delete row 1 and column {}:", j, j));
        trace.line(settings.matrix(&term.submatrix));
        if term.submatrix.row_count() == 2 {
            trace.line(format!(
                "{} = {} = {}",
                m,
                substitution(&term.submatrix, settings),
                settings.num(term.minor)
            ));
        } else {
            trace.line(format!(
                "{} = {} (the {} minor, expanded the same way along its first row)",
                m,
                settings.num(term.minor),
                term.submatrix.shape()
            ));
        }
        trace.line(format!(
            "{} = (-1)^(1+{}) {} {} = {} {} {} = {}",
            c,
            j,
            n.dot(),
            m,
            if term.sign > 0.0 { "+1" } else { "-1" },
            n.dot(),
            settings.term(term.minor),
            settings.num(term.cofactor)
        ));
        trace.line(format!(
            "{} {} {} = {} {} {} = {}",
            a,
            n.dot(),
            c,
            settings.num(term.element),
            n.times(),
            settings.term(term.cofactor),
            settings.num(term.term)
        ));
    }

    let value = terms.iter().fold(0.0, |sum, term| sum + term.term);
    let summands: Vec<String> = terms.iter().map(|term| settings.term(term.term)).collect();
    trace.line(format!(
        "det(A) = {} = {}",
        summands.join(" + "),
        settings.num(value)
    ));
    value
}

fn verify(matrix: &Matrix, value: f64, settings: &Settings, trace: &mut StepTrace) {
    let n = settings.notation();
    let size = matrix.row_count();
    let displayed = settings.num(value);

    if size > 1 {
        let transposed = matrix.transpose();
        let check = expand(&transposed);
        let agrees = settings.tolerance.approx_eq(check, value);
        trace.line(format!(
            "Cross-check: expanding det({}) along its first row (the first column of A) gives {}{}.",
            n.transpose("A"),
            settings.num(check),
            if agrees { " ✓" } else { ", which disagrees" }
        ));
    }

    if settings
        .tolerance
        .is_negligible(value, hadamard_bound(matrix))
    {
        trace.line(format!(
            "det(A) = {}, so A is singular: its rows (and columns) are linearly dependent.",
            displayed
        ));
        trace.line(
            "A has no inverse; the system Ax = b has either no solution or infinitely many.",
        );
        if size == 3 {
            trace.line(
                "The rows of A lie in a common plane, so the parallelepiped they span has zero volume.",
            );
        }
    } else {
        trace.line(format!(
            "det(A) = {} {} 0, so A is invertible: its rows (and columns) are linearly independent.",
            displayed,
            n.not_equal()
        ));
        trace.line("The system Ax = b has exactly one solution for every b.");
        if size == 3 {
            trace.line(format!(
                "The parallelepiped spanned by the rows of A has volume {} = {}.",
                n.abs("det(A)"),
                settings.num(value.abs())
            ));
        }
    }
}
