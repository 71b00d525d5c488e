//! Algebraic properties every engine must satisfy, checked through the public
//! engine functions.

use stepwise::core::arithmetic::{add, multiply, subtract};
use stepwise::core::determinant::{determinant, solve_determinant};
use stepwise::core::error::ErrorKind;
use stepwise::core::geometry::{collinear, coplanar, distance};
use stepwise::core::matrix::Matrix;
use stepwise::core::radical::{power, root};
use stepwise::core::types::{NotationKind, Settings};
use stepwise::test_support::{matrix, point, square_matrix};

fn settings() -> Settings {
    Settings::default()
}

#[test]
fn determinant_is_invariant_under_transpose() {
    for size in 1..=5 {
        for seed in 0..4 {
            let a = square_matrix(size, seed);
            assert_eq!(
                determinant(&a.transpose()),
                determinant(&a),
                "size {size} seed {seed}"
            );
        }
    }
}

#[test]
fn identity_determinant_is_one() {
    for size in 1..=5 {
        let solution = solve_determinant(&Matrix::identity(size), &settings()).expect("solve");
        assert_eq!(solution.value, 1.0, "size {size}");
    }
}

#[test]
fn two_by_two_determinant() {
    let solution = solve_determinant(&matrix("2 1; 3 4"), &settings()).expect("solve");
    assert_eq!(solution.value, 5.0);
}

#[test]
fn determinant_above_the_limit_is_rejected_before_expansion() {
    let err = solve_determinant(&square_matrix(6, 1), &settings()).expect_err("too large");
    assert_eq!(err.kind(), ErrorKind::Domain);
    let relaxed = Settings {
        max_determinant_size: 6,
        ..settings()
    };
    assert!(solve_determinant(&square_matrix(6, 1), &relaxed).is_ok());
}

#[test]
fn addition_commutes_and_subtraction_does_not() {
    for seed in 0..5 {
        let a = square_matrix(3, seed);
        let b = square_matrix(3, seed + 100);
        assert_ne!(a, b);
        let ab = add(&a, &b, &settings()).expect("a + b").value;
        let ba = add(&b, &a, &settings()).expect("b + a").value;
        assert_eq!(ab, ba);
        let a_minus_b = subtract(&a, &b, &settings()).expect("a - b").value;
        let b_minus_a = subtract(&b, &a, &settings()).expect("b - a").value;
        assert_ne!(a_minus_b, b_minus_a);
    }
}

#[test]
fn subtraction_scenario() {
    let result = subtract(&matrix("1 2; 3 4"), &matrix("4 3; 2 1"), &settings()).expect("solve");
    assert_eq!(result.value, matrix("-3 -1; 1 3"));
}

#[test]
fn multiplication_is_associative() {
    let a = matrix("1 2 -1; 0 3 2");
    let b = matrix("2 0; 1 -1; 4 5");
    let c = matrix("1 2; -3 0,5");
    let ab = multiply(&a, &b, &settings()).expect("ab").value;
    let bc = multiply(&b, &c, &settings()).expect("bc").value;
    let ab_c = multiply(&ab, &c, &settings()).expect("(ab)c").value;
    let a_bc = multiply(&a, &bc, &settings()).expect("a(bc)").value;
    assert_eq!(ab_c.shape(), a_bc.shape());
    let right_side = a_bc.rows().iter().flatten();
    for (left, right) in ab_c.rows().iter().flatten().zip(right_side) {
        assert!((left - right).abs() < 1e-9, "{left} vs {right}");
    }
}

#[test]
fn shape_mismatch_names_both_shapes() {
    let err = multiply(&matrix("1 2"), &matrix("1 2"), &settings()).expect_err("mismatch");
    assert_eq!(err.kind(), ErrorKind::Dimension);
    let message = err.to_string();
    assert!(message.contains("1×2"), "{message}");
}

#[test]
fn zero_exponent_rules() {
    for base in [-7.5, -1.0, 0.25, 3.0, 1e8] {
        assert_eq!(power(base, 0.0, &settings()).expect("x^0").value, 1.0);
    }
    assert_eq!(power(0.0, 0.0, &settings()).expect("0^0").value, 1.0);
    let err = power(0.0, -1.0, &settings()).expect_err("0^-1");
    assert_eq!(err.kind(), ErrorKind::Domain);
}

#[test]
fn root_undoes_power() {
    for x in [-3.0, 0.5, 2.0, 7.25] {
        for n in 1..=5 {
            if x < 0.0 && n % 2 == 0 {
                continue;
            }
            let n = f64::from(n);
            let raised = power(x, n, &settings()).expect("power").value;
            let back = root(raised, n, &settings()).expect("root").value;
            assert!(
                (back - x).abs() < 1e-4,
                "root(power({x}, {n}), {n}) = {back}"
            );
        }
    }
}

#[test]
fn cube_root_of_eight() {
    let solution = root(8.0, 3.0, &settings()).expect("solve");
    assert_eq!(solution.value, 2.0);
    assert!(
        solution
            .trace
            .lines()
            .any(|line| line.contains("no irrational factor remains"))
    );
}

#[test]
fn repeated_point_is_collinear() {
    for (p, q) in [
        (point(0.0, 0.0, 0.0), point(1.0, 2.0, 3.0)),
        (point(-5.5, 2.0, 1e3), point(4.0, -4.0, 0.0)),
    ] {
        assert!(collinear(p, p, q, &settings()).expect("solve").value);
    }
}

#[test]
fn fourth_point_in_the_plane_is_coplanar() {
    let solution = coplanar(
        point(0.0, 0.0, 0.0),
        point(1.0, 0.0, 0.0),
        point(0.0, 1.0, 0.0),
        point(1.0, 1.0, 0.0),
        &settings(),
    )
    .expect("solve");
    assert!(solution.value);
}

#[test]
fn large_coordinates_use_a_relative_tolerance() {
    let scale = 1e6;
    let solution = collinear(
        point(0.0, 0.0, 0.0),
        point(scale, scale, scale),
        point(2.0 * scale, 2.0 * scale, 2.0 * scale + 1e-3),
        &settings(),
    )
    .expect("solve");
    assert!(solution.value);
}

#[test]
fn distance_scenario() {
    let solution =
        distance(point(0.0, 0.0, 0.0), point(3.0, 4.0, 0.0), &settings()).expect("solve");
    assert_eq!(solution.value, 5.0);
}

#[test]
fn latex_notation_changes_symbols_not_values() {
    let latex = Settings {
        notation: NotationKind::Latex,
        ..settings()
    };
    let plain = solve_determinant(&matrix("2 -1 0; 1 3 2; 0 1 4"), &settings()).expect("plain");
    let typeset = solve_determinant(&matrix("2 -1 0; 1 3 2; 0 1 4"), &latex).expect("latex");
    assert_eq!(plain.value, typeset.value);
    assert_eq!(plain.trace.len(), typeset.trace.len());
    assert!(
        typeset
            .trace
            .lines()
            .any(|line| line.contains("\\begin{bmatrix}"))
    );
    assert!(!plain.trace.lines().any(|line| line.contains('\\')));
}
