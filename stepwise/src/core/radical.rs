//! Powers and roots with radical simplification.

use tracing::debug;

use crate::core::error::{SolveError, ensure_finite};
use crate::core::trace::{Solution, StepTrace};
use crate::core::types::Settings;

/// Largest odd denominator tried when reading a fractional exponent as `p/q`.
const MAX_ODD_DENOMINATOR: i64 = 99;

/// Largest radicand magnitude the trial-division simplifier factors.
const MAX_SIMPLIFIED_RADICAND: f64 = 1e12;

/// Exponents up to this magnitude are shown as repeated multiplication.
const MAX_EXPANDED_EXPONENT: f64 = 10.0;

/// Relative tolerance for reading an exponent as an exact fraction.
const FRACTION_TOLERANCE: f64 = 1e-9;

/// `exponent` as `p/q` for the first `q` in `denominators` with `p/q`
/// matching `exponent`. A zero numerator never matches a non-zero exponent.
fn as_fraction(exponent: f64, denominators: impl IntoIterator<Item = i64>) -> Option<(i64, i64)> {
    denominators.into_iter().find_map(|q| {
        let p = (exponent * q as f64).round();
        let error = (p / q as f64 - exponent).abs();
        (p != 0.0 && error <= FRACTION_TOLERANCE * exponent.abs()).then_some((p as i64, q))
    })
}

/// `exponent` as `p/q` with the smallest odd `q`, if it is such a fraction.
fn odd_denominator(exponent: f64) -> Option<(i64, i64)> {
    as_fraction(exponent, (1..=MAX_ODD_DENOMINATOR).step_by(2))
}

fn is_integer(value: f64) -> bool {
    value.fract() == 0.0 && value.abs() <= f64::from(i32::MAX)
}

/// Real-valued `base^exponent`, or `None` when no real value exists.
///
/// Negative bases only admit exponents `p/q` with odd `q`; the result is
/// `sign^p · |base|^(p/q)` instead of the naive `powf`, which yields NaN.
fn real_power(base: f64, exponent: f64) -> Option<f64> {
    if is_integer(exponent) {
        return Some(base.powi(exponent as i32));
    }
    if base >= 0.0 {
        return Some(base.powf(exponent));
    }
    let (numerator, _) = odd_denominator(exponent)?;
    let magnitude = base.abs().powf(exponent);
    Some(if numerator % 2 == 0 {
        magnitude
    } else {
        -magnitude
    })
}

/// Real `index`-th root for an integer index.
fn integer_root(radicand: f64, index: i64) -> f64 {
    let magnitude = match index.abs() {
        2 => radicand.abs().sqrt(),
        3 => radicand.abs().cbrt(),
        n => radicand.abs().powf(1.0 / n as f64),
    };
    let signed = if radicand < 0.0 {
        -magnitude
    } else {
        magnitude
    };
    if index < 0 { 1.0 / signed } else { signed }
}

/// Split `value` as `coefficient^index × remaining`, with `remaining` free of
/// perfect `index`-th powers. Returns `(coefficient, factor, remaining)` where
/// `factor = coefficient^index`.
pub fn extract_perfect_power(value: u64, index: u32) -> (u64, u64, u64) {
    let mut rest = value;
    let mut coefficient = 1u64;
    let mut factor = 1u64;
    let mut remaining = 1u64;
    let mut prime = 2u64;
    while prime * prime <= rest {
        let mut count = 0u32;
        while rest % prime == 0 {
            rest /= prime;
            count += 1;
        }
        if count > 0 {
            let whole = count / index;
            coefficient *= prime.pow(whole);
            factor *= prime.pow(whole * index);
            remaining *= prime.pow(count % index);
        }
        prime += 1;
    }
    remaining *= rest;
    (coefficient, factor, remaining)
}

fn ordinal(n: i64) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{}{}", n, suffix)
}

/// `base^exponent` with domain guards and a re-rooting check.
pub fn power(base: f64, exponent: f64, settings: &Settings) -> Result<Solution<f64>, SolveError> {
    let n = settings.notation();
    let b = settings.num(base);
    let e = settings.num(exponent);
    let expr = n.power(&b, &e);

    if base == 0.0 && exponent == 0.0 {
        let mut trace = StepTrace::new();
        trace.line(format!("Compute {}.", expr));
        trace.line(format!(
            "{} = 1 by convention: 0^0 is defined as 1, not derived from the exponent rules.",
            expr
        ));
        return Ok(Solution::new(1.0, trace));
    }
    if base == 0.0 && exponent < 0.0 {
        return Err(SolveError::domain(format!(
            "{} is undefined: 0 raised to a negative power divides by zero",
            expr
        )));
    }
    let value = real_power(base, exponent).ok_or_else(|| {
        SolveError::domain(format!(
            "{} has no real value: a negative base needs an integer exponent or a fraction with an odd denominator",
            expr
        ))
    })?;
    let value = ensure_finite(value, "power")?;
    let rounded = settings.round(value);
    debug!(base, exponent, "power");

    let mut trace = StepTrace::new();
    trace.line(format!("Compute {}.", expr));
    if exponent == 0.0 {
        trace.line("Any non-zero number raised to the power 0 is 1.");
    } else if is_integer(exponent) && exponent > 0.0 {
        if exponent == 1.0 {
            trace.line(format!(
                "A number to the power 1 is itself: {} = {}",
                expr, b
            ));
        } else if exponent <= MAX_EXPANDED_EXPONENT {
            let factors = vec![settings.term(base); exponent as usize];
            trace.line(format!(
                "{} = {} = {}",
                expr,
                factors.join(&format!(" {} ", n.times())),
                settings.num(value)
            ));
        } else {
            trace.line(format!(
                "{} is {} multiplied by itself {} times: {}",
                expr,
                b,
                e,
                settings.num(value)
            ));
        }
    } else if is_integer(exponent) {
        let positive = settings.num(-exponent);
        let denominator = base.powi(-exponent as i32);
        trace.line(format!(
            "A negative exponent means the reciprocal: {} = 1 / {} = 1 / {} = {}",
            expr,
            n.power(&b, &positive),
            settings.num(denominator),
            settings.num(value)
        ));
    } else if let Some((p, q)) = odd_denominator(exponent).filter(|_| base < 0.0) {
        let root = integer_root(base, q);
        trace.line(format!(
            "Write the exponent as {}/{}: {} = ({})^{}.",
            p,
            q,
            expr,
            n.root(&q.to_string(), &b),
            p
        ));
        trace.line(format!(
            "The index {} is odd, so the root of a negative number is real: {} = -{} = {}",
            q,
            n.root(&q.to_string(), &b),
            n.root(&q.to_string(), &settings.num(base.abs())),
            settings.num(root)
        ));
        trace.line(format!(
            "{} = {}",
            n.power(&settings.num(root), &p.to_string()),
            settings.num(value)
        ));
    } else if let Some((p, q)) =
        odd_denominator(exponent).or_else(|| as_fraction(exponent, (2..=10).step_by(2)))
    {
        let root = base.powf(1.0 / q as f64);
        trace.line(format!(
            "Write the exponent as {}/{}: {} = ({})^{}.",
            p,
            q,
            expr,
            n.root(&q.to_string(), &b),
            p
        ));
        trace.line(format!(
            "{} = {}",
            n.root(&q.to_string(), &b),
            settings.num(root)
        ));
        trace.line(format!(
            "{} = {}",
            n.power(&settings.num(root), &p.to_string()),
            settings.num(value)
        ));
    } else {
        trace.line(format!(
            "For an irrational exponent use logarithms: {} = e^({} {} ln {}) = {}",
            expr,
            e,
            n.dot(),
            b,
            settings.num(value)
        ));
    }
    trace.line(format!("Result: {} = {}", expr, settings.num(rounded)));

    if exponent != 0.0 {
        trace.begin_verification();
        let inverse = 1.0 / exponent;
        let reciprocal = format!("1/{}", settings.term(exponent));
        let check = n.power(&settings.num(rounded), &reciprocal);
        let even_numerator = odd_denominator(exponent).is_some_and(|(p, _)| p % 2 == 0);
        let target = if even_numerator { base.abs() } else { base };
        let tolerance = settings.tolerance;
        let holds = |v: f64| v.is_finite() && tolerance.approx_eq(v, target);
        match real_power(rounded, inverse) {
            None => trace.line(format!(
                "A negative result has no real {} root, so the check is skipped.",
                e
            )),
            Some(recovered) if !recovered.is_finite() => {
                trace.line(cannot_check(&check, rounded, settings))
            }
            Some(recovered) => {
                trace.line(format!(
                    "Check: raise the result to {}: {} = {}",
                    reciprocal,
                    check,
                    settings.num(recovered)
                ));
                if holds(recovered) && target == base {
                    trace.line(format!("This matches the base {} ✓", b));
                } else if holds(recovered) {
                    trace.line(format!(
                        "This matches {} ✓ (an even power hides the sign of the base)",
                        n.abs(&b)
                    ));
                } else {
                    trace.line(format!(
                        "This differs from {} by {} ✗",
                        settings.num(target),
                        settings.num((recovered - target).abs())
                    ));
                    if real_power(value, inverse).is_some_and(holds) {
                        trace.line(rounding_note(settings));
                    }
                }
            }
        }
    }

    Ok(Solution::new(rounded, trace))
}

/// `index`-th root of `radicand`, simplified to `k·ⁿ√r` when possible.
pub fn root(radicand: f64, index: f64, settings: &Settings) -> Result<Solution<f64>, SolveError> {
    let n = settings.notation();
    let r = settings.num(radicand);
    let idx = settings.num(index);
    let expr = n.root(&idx, &r);

    if index == 0.0 {
        return Err(SolveError::domain("the root index must be non-zero"));
    }
    if radicand == 0.0 && index < 0.0 {
        return Err(SolveError::domain(format!(
            "{} is undefined: a negative index takes the reciprocal of 0",
            expr
        )));
    }
    let integer_index = is_integer(index).then_some(index as i64);
    let value = match integer_index {
        Some(k) if radicand < 0.0 && k % 2 == 0 => {
            return Err(SolveError::domain(format!(
                "{} has no real value: an even root of a negative number is not real",
                expr
            )));
        }
        Some(k) => integer_root(radicand, k),
        None => real_power(radicand, 1.0 / index).ok_or_else(|| {
            SolveError::domain(format!(
                "{} has no real value: a negative radicand needs an odd integer index",
                expr
            ))
        })?,
    };
    let value = ensure_finite(value, "root")?;
    let rounded = settings.round(value);
    debug!(radicand, index, "root");

    let mut trace = StepTrace::new();
    trace.line(format!("Compute {}.", expr));
    match integer_index {
        Some(1) => trace.line("The 1st root of a number is the number itself."),
        Some(k) if k < 0 => trace.line(format!(
            "A negative index means the reciprocal: {} = 1 / {}.",
            expr,
            n.root(&settings.num(-index), &r)
        )),
        Some(k) => {
            if radicand < 0.0 {
                trace.line(format!(
                    "The index {} is odd, so the root of a negative number is real: {} = -{}.",
                    k,
                    expr,
                    n.root(&idx, &settings.num(radicand.abs()))
                ));
            }
            simplification_trace(radicand, k, settings, &mut trace);
        }
        None => trace.line(format!(
            "A non-integer index is a fractional power: {} = {}.",
            expr,
            n.power(&r, &format!("1/{}", idx))
        )),
    }
    trace.line(format!("Result: {} = {}", expr, settings.num(rounded)));

    trace.begin_verification();
    let check = n.power(&settings.num(rounded), &idx);
    let tolerance = settings.tolerance;
    let holds = |v: f64| v.is_finite() && tolerance.approx_eq(v, radicand);
    match real_power(rounded, index).filter(|back| back.is_finite()) {
        Some(back) => {
            trace.line(format!(
                "Check: raise the result to the index: {} = {}",
                check,
                settings.num(back)
            ));
            if holds(back) {
                trace.line(format!("This matches the radicand {} ✓", r));
            } else {
                trace.line(format!(
                    "This differs from the radicand {} by {} ✗",
                    r,
                    settings.num((back - radicand).abs())
                ));
                if real_power(value, index).is_some_and(holds) {
                    trace.line(rounding_note(settings));
                }
            }
        }
        None => trace.line(cannot_check(&check, rounded, settings)),
    }

    Ok(Solution::new(rounded, trace))
}

fn cannot_check(check: &str, rounded: f64, settings: &Settings) -> String {
    format!(
        "The result rounds to {} at {} decimal places and {} has no finite real value, so the check cannot be done at this precision.",
        settings.num(rounded),
        settings.decimal_places,
        check
    )
}

fn rounding_note(settings: &Settings) -> String {
    format!(
        "The unrounded result passes the check, so the difference comes from rounding to {} decimal places.",
        settings.decimal_places
    )
}

fn simplification_trace(radicand: f64, index: i64, settings: &Settings, trace: &mut StepTrace) {
    let n = settings.notation();
    let magnitude = radicand.abs();
    if magnitude.fract() != 0.0 {
        trace.line("The radicand is not an integer, so no radical simplification applies.");
        return;
    }
    if magnitude > MAX_SIMPLIFIED_RADICAND || magnitude < 2.0 {
        return;
    }
    let idx = index.to_string();
    let nth = ordinal(index);
    let (coefficient, factor, remaining) = extract_perfect_power(magnitude as u64, index as u32);
    let sign = if radicand < 0.0 { "-" } else { "" };

    if factor == 1 {
        trace.line(format!(
            "{} has no perfect {} power factor greater than 1, so the radical cannot be simplified.",
            magnitude, nth
        ));
    } else if remaining == 1 {
        trace.line(format!(
            "{} = {} is a perfect {} power, so the root is exact and no irrational factor remains.",
            magnitude,
            n.power(&coefficient.to_string(), &idx),
            nth
        ));
        trace.line(format!(
            "{} = {}{}",
            n.root(&idx, &magnitude.to_string()),
            sign,
            coefficient
        ));
    } else {
        trace.line(format!(
            "Factor the radicand: {} = {} {} {}, where {} = {} is the largest perfect {} power factor.",
            magnitude,
            factor,
            n.times(),
            remaining,
            factor,
            n.power(&coefficient.to_string(), &idx),
            nth
        ));
        trace.line(format!(
            "{} = {} {} {} = {}{}{}",
            n.root(&idx, &magnitude.to_string()),
            n.root(&idx, &factor.to_string()),
            n.dot(),
            n.root(&idx, &remaining.to_string()),
            sign,
            coefficient,
            n.root(&idx, &remaining.to_string())
        ));
        trace.line(format!(
            "{} has no perfect {} power factor, so {} stays irrational.",
            remaining,
            nth,
            n.root(&idx, &remaining.to_string())
        ));
    }
}
