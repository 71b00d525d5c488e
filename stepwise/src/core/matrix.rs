//! Matrix values and the text grammar they are parsed from.
//!
//! Grammar: rows separated by `;`, values separated by whitespace, each value a
//! signed decimal literal. Comma decimal separators are normalized to `.`
//! before parsing, so `1,5 2` reads as `[1.5, 2]`.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::core::error::SolveError;

static DECIMAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?(?:\d+(?:\.\d*)?|\.\d+)$").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shape {
    pub rows: usize,
    pub cols: usize,
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}×{}", self.rows, self.cols)
    }
}

/// Non-empty rectangular grid of numbers. Never mutated after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<f64>>", into = "Vec<Vec<f64>>")]
pub struct Matrix {
    rows: Vec<Vec<f64>>,
}

impl Matrix {
    /// Build a matrix, rejecting empty or ragged grids.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, SolveError> {
        if is_valid_matrix(&rows) {
            return Ok(Self { rows });
        }
        let expected = rows.first().map_or(0, Vec::len);
        match rows.iter().position(|row| row.len() != expected) {
            Some(index) if expected > 0 => Err(SolveError::Ragged {
                row: index + 1,
                expected,
                found: rows[index].len(),
            }),
            _ => Err(SolveError::parse(
                "matrix",
                "a matrix needs at least one value",
            )),
        }
    }

    /// Build an `rows × cols` matrix from an element function.
    pub(crate) fn from_fn(rows: usize, cols: usize, f: impl Fn(usize, usize) -> f64) -> Self {
        Self {
            rows: (0..rows)
                .map(|i| (0..cols).map(|j| f(i, j)).collect())
                .collect(),
        }
    }

    /// The `size × size` identity. A size of zero is treated as one.
    pub fn identity(size: usize) -> Self {
        let size = size.max(1);
        Self::from_fn(size, size, |i, j| if i == j { 1.0 } else { 0.0 })
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn col_count(&self) -> usize {
        self.rows[0].len()
    }

    pub fn shape(&self) -> Shape {
        Shape {
            rows: self.row_count(),
            cols: self.col_count(),
        }
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.rows[row][col]
    }

    pub fn transpose(&self) -> Self {
        Self::from_fn(self.col_count(), self.row_count(), |i, j| self.get(j, i))
    }

    pub fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        Self::from_fn(self.row_count(), self.col_count(), |i, j| f(self.get(i, j)))
    }

    pub(crate) fn all_finite(&self) -> bool {
        self.rows.iter().flatten().all(|value| value.is_finite())
    }
}

impl TryFrom<Vec<Vec<f64>>> for Matrix {
    type Error = SolveError;

    fn try_from(rows: Vec<Vec<f64>>) -> Result<Self, Self::Error> {
        Matrix::from_rows(rows)
    }
}

impl From<Matrix> for Vec<Vec<f64>> {
    fn from(matrix: Matrix) -> Self {
        matrix.rows
    }
}

/// True iff the grid is non-empty and every row has the same length.
pub fn is_valid_matrix(rows: &[Vec<f64>]) -> bool {
    match rows.first() {
        Some(first) if !first.is_empty() => rows.iter().all(|row| row.len() == first.len()),
        _ => false,
    }
}

pub fn is_square_matrix(matrix: &Matrix) -> bool {
    matrix.row_count() == matrix.col_count()
}

pub fn have_same_dimensions(left: &Matrix, right: &Matrix) -> bool {
    left.shape() == right.shape()
}

/// `matrix` without `row` and `col`.
///
/// Returns `None` when either index is out of range or the result would be
/// empty.
pub fn submatrix(matrix: &Matrix, row: usize, col: usize) -> Option<Matrix> {
    if row >= matrix.row_count() || col >= matrix.col_count() {
        return None;
    }
    if matrix.row_count() < 2 || matrix.col_count() < 2 {
        return None;
    }
    let rows = matrix
        .rows()
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != row)
        .map(|(_, values)| {
            values
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != col)
                .map(|(_, value)| *value)
                .collect()
        })
        .collect();
    Some(Matrix { rows })
}

/// Parse `"1 2; 3 4"` into a matrix.
///
/// Empty segments left by a trailing `;` are ignored.
pub fn parse_matrix(text: &str) -> Result<Matrix, SolveError> {
    let normalized = normalize_decimal_commas(text);
    let mut rows = Vec::new();
    for (index, segment) in normalized.split(';').enumerate() {
        if segment.trim().is_empty() {
            continue;
        }
        rows.push(parse_values(segment, &format!("matrix row {}", index + 1))?);
    }
    if rows.is_empty() {
        return Err(SolveError::parse("matrix", "no values given"));
    }
    Matrix::from_rows(rows)
}

/// Parse a single signed decimal literal.
pub fn parse_number(text: &str, what: &str) -> Result<f64, SolveError> {
    let normalized = normalize_decimal_commas(text);
    let token = normalized.trim();
    if token.is_empty() {
        return Err(SolveError::parse(what, "no value given"));
    }
    parse_literal(token, what)
}

/// Parse exactly `N` whitespace-separated literals.
pub fn parse_fixed<const N: usize>(text: &str, what: &str) -> Result<[f64; N], SolveError> {
    let normalized = normalize_decimal_commas(text);
    let values = parse_values(&normalized, what)?;
    let found = values.len();
    values
        .try_into()
        .map_err(|_| SolveError::parse(what, format!("expected {} values, found {}", N, found)))
}

fn parse_values(segment: &str, what: &str) -> Result<Vec<f64>, SolveError> {
    segment
        .split_whitespace()
        .map(|token| parse_literal(token, what))
        .collect()
}

fn parse_literal(token: &str, what: &str) -> Result<f64, SolveError> {
    if !DECIMAL_RE.is_match(token) {
        return Err(SolveError::parse(
            what,
            format!("'{}' is not a decimal number", token),
        ));
    }
    token
        .parse::<f64>()
        .map_err(|err| SolveError::parse(what, format!("'{}': {}", token, err)))
}

fn normalize_decimal_commas(text: &str) -> String {
    text.replace(',', ".")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ErrorKind;

    #[test]
    fn parse_matrix_reads_rows_and_columns() {
        let matrix = parse_matrix("1 2 3; -4 5.5 +6").expect("parse");
        assert_eq!(matrix.shape(), Shape { rows: 2, cols: 3 });
        assert_eq!(matrix.get(1, 0), -4.0);
        assert_eq!(matrix.get(1, 1), 5.5);
        assert_eq!(matrix.get(1, 2), 6.0);
    }

    #[test]
    fn parse_matrix_normalizes_comma_decimals() {
        let matrix = parse_matrix("1,5 2; 3 4,25").expect("parse");
        assert_eq!(matrix.get(0, 0), 1.5);
        assert_eq!(matrix.get(1, 1), 4.25);
    }

    #[test]
    fn parse_matrix_ignores_trailing_separator() {
        let matrix = parse_matrix("1 2; 3 4;").expect("parse");
        assert_eq!(matrix.row_count(), 2);
    }

    #[test]
    fn parse_matrix_rejects_ragged_rows() {
        let err = parse_matrix("1 2; 3").expect_err("ragged");
        assert_eq!(err.kind(), ErrorKind::Dimension);
        assert!(err.to_string().contains("row 2"));
    }

    #[test]
    fn parse_matrix_rejects_garbage() {
        for text in ["", "  ;  ", "1 x; 2 3", "1e3 2", "--1"] {
            let err = parse_matrix(text).expect_err(text);
            assert_eq!(err.kind(), ErrorKind::Parse, "{text}");
        }
    }

    #[test]
    fn parse_fixed_requires_exact_count() {
        assert_eq!(parse_fixed::<3>("1 2,5 -3", "point"), Ok([1.0, 2.5, -3.0]));
        assert!(parse_fixed::<3>("1 2", "point").is_err());
        assert!(parse_fixed::<3>("1 2 3 4", "point").is_err());
    }

    #[test]
    fn validity_and_shape_predicates() {
        assert!(is_valid_matrix(&[vec![1.0, 2.0], vec![3.0, 4.0]]));
        assert!(!is_valid_matrix(&[vec![1.0, 2.0], vec![3.0]]));
        assert!(!is_valid_matrix(&[]));

        let square = parse_matrix("1 2; 3 4").expect("parse");
        let wide = parse_matrix("1 2 3; 4 5 6").expect("parse");
        assert!(is_square_matrix(&square));
        assert!(!is_square_matrix(&wide));
        assert!(!have_same_dimensions(&square, &wide));
        assert!(have_same_dimensions(&wide, &wide.clone()));
    }

    #[test]
    fn submatrix_removes_row_and_column() {
        let matrix = parse_matrix("1 2 3; 4 5 6; 7 8 9").expect("parse");
        let minor = submatrix(&matrix, 0, 1).expect("submatrix");
        assert_eq!(minor, parse_matrix("4 6; 7 9").expect("parse"));
        assert!(submatrix(&matrix, 3, 0).is_none());
        assert!(submatrix(&Matrix::identity(1), 0, 0).is_none());
    }

    #[test]
    fn transpose_swaps_shape() {
        let matrix = parse_matrix("1 2 3; 4 5 6").expect("parse");
        let transposed = matrix.transpose();
        assert_eq!(transposed.shape(), Shape { rows: 3, cols: 2 });
        assert_eq!(transposed.get(2, 1), 6.0);
    }

    #[test]
    fn deserialize_rejects_ragged_grid() {
        let ok: Matrix = serde_json::from_str("[[1, 2], [3, 4]]").expect("matrix");
        assert_eq!(ok.get(1, 0), 3.0);
        assert!(serde_json::from_str::<Matrix>("[[1, 2], [3]]").is_err());
    }
}
