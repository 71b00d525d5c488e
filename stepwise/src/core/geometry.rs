//! 3D analytic geometry: points, planes and lines.

use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::error::{SolveError, ensure_finite};
use crate::core::trace::{Solution, StepTrace};
use crate::core::types::Settings;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point3D {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3D {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn components(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    pub fn scale(self, k: f64) -> Self {
        Self::new(self.x * k, self.y * k, self.z * k)
    }

    pub fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(self, other: Self) -> Self {
        Self::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    pub fn norm(self) -> f64 {
        self.dot(self).sqrt()
    }

    pub fn map(self, f: impl Fn(f64) -> f64) -> Self {
        Self::new(f(self.x), f(self.y), f(self.z))
    }

    fn is_finite(self) -> bool {
        self.components().iter().all(|value| value.is_finite())
    }
}

impl From<[f64; 3]> for Point3D {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self::new(x, y, z)
    }
}

impl Add for Point3D {
    type Output = Point3D;

    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl Sub for Point3D {
    type Output = Point3D;

    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

/// `a·x + b·y + c·z + d = 0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
}

impl Plane {
    pub fn normal(&self) -> Point3D {
        Point3D::new(self.a, self.b, self.c)
    }

    /// Left-hand side of the plane equation at `p`.
    pub fn evaluate(&self, p: Point3D) -> f64 {
        self.normal().dot(p) + self.d
    }

    fn is_finite(&self) -> bool {
        [self.a, self.b, self.c, self.d]
            .iter()
            .all(|value| value.is_finite())
    }
}

impl From<[f64; 4]> for Plane {
    fn from([a, b, c, d]: [f64; 4]) -> Self {
        Self { a, b, c, d }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Line3D {
    pub point: Point3D,
    pub direction: Point3D,
}

impl Line3D {
    pub fn at(&self, t: f64) -> Point3D {
        self.point + self.direction.scale(t)
    }
}

fn ensure_points(points: &[Point3D]) -> Result<(), SolveError> {
    if points.iter().all(|p| p.is_finite()) {
        Ok(())
    } else {
        Err(SolveError::parse("point", "coordinates must be finite"))
    }
}

fn point_text(settings: &Settings, name: &str, p: Point3D) -> String {
    format!("{} = {}", name, settings.vector(p.components()))
}

fn delta_text(settings: &Settings, name: &str, to: &str, from: &str, v: Point3D) -> String {
    format!(
        "{} = {} - {} = {}",
        name,
        to,
        from,
        settings.vector(v.components())
    )
}

fn cross_lines(
    settings: &Settings,
    left: (&str, Point3D),
    right: (&str, Point3D),
    trace: &mut StepTrace,
) -> Point3D {
    let n = settings.notation();
    let (l, u) = left;
    let (r, v) = right;
    let w = u.cross(v);
    let t = |value: f64| settings.term(value);
    trace.line(format!("{} {} {}:", l, n.times(), r));
    trace.line(format!(
        "  x: ({} {} {}) - ({} {} {}) = {}",
        t(u.y),
        n.times(),
        t(v.z),
        t(u.z),
        n.times(),
        t(v.y),
        settings.num(w.x)
    ));
    trace.line(format!(
        "  y: ({} {} {}) - ({} {} {}) = {}",
        t(u.z),
        n.times(),
        t(v.x),
        t(u.x),
        n.times(),
        t(v.z),
        settings.num(w.y)
    ));
    trace.line(format!(
        "  z: ({} {} {}) - ({} {} {}) = {}",
        t(u.x),
        n.times(),
        t(v.y),
        t(u.y),
        n.times(),
        t(v.x),
        settings.num(w.z)
    ));
    trace.line(format!(
        "{} {} {} = {}",
        l,
        n.times(),
        r,
        settings.vector(w.components())
    ));
    w
}

fn norm_line(settings: &Settings, name: &str, v: Point3D) -> String {
    let n = settings.notation();
    let squares: Vec<String> = v
        .components()
        .iter()
        .map(|c| n.power(&settings.num(*c), "2"))
        .collect();
    let sum = v.dot(v);
    format!(
        "{} = {} = {} = {}",
        n.abs(name),
        n.sqrt(&squares.join(" + ")),
        n.sqrt(&settings.num(sum)),
        settings.num(sum.sqrt())
    )
}

/// Euclidean distance between two points.
pub fn distance(
    p1: Point3D,
    p2: Point3D,
    settings: &Settings,
) -> Result<Solution<f64>, SolveError> {
    ensure_points(&[p1, p2])?;
    let n = settings.notation();
    let delta = p2 - p1;
    let squared = delta.dot(delta);
    let value = ensure_finite(squared.sqrt(), "distance")?;
    let rounded = settings.round(value);
    debug!(squared, "distance");

    let mut trace = StepTrace::new();
    trace.line(point_text(settings, &n.indexed("P", 1), p1));
    trace.line(point_text(settings, &n.indexed("P", 2), p2));
    trace.line(format!(
        "d = {}",
        n.sqrt(&format!(
            "{} + {} + {}",
            n.power("Δx", "2"),
            n.power("Δy", "2"),
            n.power("Δz", "2")
        ))
    ));
    for (axis, (a, b)) in ["x", "y", "z"]
        .into_iter()
        .zip(p1.components().into_iter().zip(p2.components()))
    {
        trace.line(format!(
            "Δ{} = {} - {} = {}",
            axis,
            settings.num(b),
            settings.term(a),
            settings.num(b - a)
        ));
    }
    let squares: Vec<String> = delta
        .components()
        .iter()
        .map(|c| n.power(&settings.num(*c), "2"))
        .collect();
    trace.line(format!(
        "d = {} = {} = {}",
        n.sqrt(&squares.join(" + ")),
        n.sqrt(&settings.num(squared)),
        settings.num(rounded)
    ));

    trace.begin_verification();
    let back = rounded * rounded;
    trace.line(format!(
        "Check: {} = {}; the sum of squared differences is {}",
        n.power(&settings.num(rounded), "2"),
        settings.num(back),
        settings.num(squared)
    ));
    if settings.tolerance.approx_eq(back, squared) {
        trace.line("The squared distance matches ✓");
    } else {
        trace.line(format!(
            "The values differ by {}; the difference is due to rounding.",
            settings.num((back - squared).abs())
        ));
    }
    Ok(Solution::new(rounded, trace))
}

/// Whether three points lie on a common line.
pub fn collinear(
    p1: Point3D,
    p2: Point3D,
    p3: Point3D,
    settings: &Settings,
) -> Result<Solution<bool>, SolveError> {
    ensure_points(&[p1, p2, p3])?;
    let n = settings.notation();
    let (v1_name, v2_name) = (n.indexed("v", 1), n.indexed("v", 2));
    let (p1_name, p2_name, p3_name) = (n.indexed("P", 1), n.indexed("P", 2), n.indexed("P", 3));
    let v1 = p2 - p1;
    let v2 = p3 - p1;

    let mut trace = StepTrace::new();
    trace.line(point_text(settings, &p1_name, p1));
    trace.line(point_text(settings, &p2_name, p2));
    trace.line(point_text(settings, &p3_name, p3));
    trace.line(delta_text(settings, &v1_name, &p2_name, &p1_name, v1));
    trace.line(delta_text(settings, &v2_name, &p3_name, &p1_name, v2));
    let w = cross_lines(settings, (&v1_name, v1), (&v2_name, v2), &mut trace);
    let magnitude = ensure_finite(w.norm(), "cross product")?;
    let cross_name = format!("{} {} {}", v1_name, n.times(), v2_name);
    trace.line(norm_line(settings, &cross_name, w));

    let scale = v1.norm() * v2.norm();
    let threshold = settings.tolerance.threshold(scale);
    let is_collinear = magnitude < threshold;
    debug!(magnitude, threshold, "collinear");
    if is_collinear {
        trace.line(format!(
            "{} = {} < {}, so the points are collinear.",
            n.abs(&cross_name),
            settings.num(magnitude),
            threshold
        ));
    } else {
        trace.line(format!(
            "{} = {} {} 0, so the points are not collinear.",
            n.abs(&cross_name),
            settings.num(magnitude),
            n.not_equal()
        ));
    }

    trace.begin_verification();
    let area = magnitude / 2.0;
    trace.line(format!(
        "The triangle {}{}{} has area {} / 2 = {}",
        p1_name,
        p2_name,
        p3_name,
        n.abs(&cross_name),
        settings.num(area)
    ));
    if is_collinear {
        match ratio(v1, v2, settings) {
            Some(k) => {
                let residual = (v2 - v1.scale(k)).norm();
                let mark = if settings.tolerance.is_negligible(residual, v2.norm()) {
                    "✓"
                } else {
                    "✗"
                };
                trace.line(format!(
                    "{} = {} {} {}: the vectors are parallel {}",
                    v2_name,
                    settings.num(k),
                    n.dot(),
                    v1_name,
                    mark
                ));
            }
            None => trace.line(
                "Two of the points coincide, so any line through them contains all three.",
            ),
        }
    } else {
        trace.line("A non-zero area means the points span a triangle.");
    }
    Ok(Solution::new(is_collinear, trace))
}

/// `k` with `v2 = k · v1`, taken from the largest component of `v1`.
fn ratio(v1: Point3D, v2: Point3D, settings: &Settings) -> Option<f64> {
    let (index, pivot) = v1
        .components()
        .into_iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.abs().total_cmp(&b.abs()))?;
    if settings.tolerance.is_negligible(pivot, 1.0)
        || settings.tolerance.is_negligible(v2.norm(), 1.0)
    {
        return None;
    }
    Some(v2.components()[index] / pivot)
}

/// Whether four points lie in a common plane.
pub fn coplanar(
    p1: Point3D,
    p2: Point3D,
    p3: Point3D,
    p4: Point3D,
    settings: &Settings,
) -> Result<Solution<bool>, SolveError> {
    ensure_points(&[p1, p2, p3, p4])?;
    let n = settings.notation();
    let names: Vec<String> = (1..=4).map(|i| n.indexed("P", i)).collect();
    let vectors: Vec<String> = (1..=3).map(|i| n.indexed("v", i)).collect();
    let v1 = p2 - p1;
    let v2 = p3 - p1;
    let v3 = p4 - p1;

    let mut trace = StepTrace::new();
    for (name, p) in names.iter().zip([p1, p2, p3, p4]) {
        trace.line(point_text(settings, name, p));
    }
    for (i, v) in [v1, v2, v3].into_iter().enumerate() {
        let to = &names[i + 1];
        trace.line(delta_text(settings, &vectors[i], to, &names[0], v));
    }
    let w = cross_lines(settings, (&vectors[0], v1), (&vectors[1], v2), &mut trace);
    let triple = ensure_finite(w.dot(v3), "triple product")?;
    trace.line(format!(
        "({} {} {}) {} {} = ({} {} {}) + ({} {} {}) + ({} {} {}) = {}",
        vectors[0],
        n.times(),
        vectors[1],
        n.dot(),
        vectors[2],
        settings.term(w.x),
        n.times(),
        settings.term(v3.x),
        settings.term(w.y),
        n.times(),
        settings.term(v3.y),
        settings.term(w.z),
        n.times(),
        settings.term(v3.z),
        settings.num(triple)
    ));

    let scale = v1.norm() * v2.norm() * v3.norm();
    let threshold = settings.tolerance.threshold(scale);
    let is_coplanar = triple.abs() < threshold;
    debug!(triple, threshold, "coplanar");
    if is_coplanar {
        trace.line(format!(
            "The scalar triple product is {} (below {}), so the points are coplanar.",
            settings.num(triple),
            threshold
        ));
    } else {
        trace.line(format!(
            "The scalar triple product is {} {} 0, so the points are not coplanar.",
            settings.num(triple),
            n.not_equal()
        ));
    }

    trace.begin_verification();
    trace.line(format!(
        "The parallelepiped spanned by {}, {}, {} has volume {}",
        vectors[0],
        vectors[1],
        vectors[2],
        settings.num(triple.abs())
    ));
    trace.line(format!(
        "The tetrahedron {} has volume {} / 6 = {}",
        names.concat(),
        settings.num(triple.abs()),
        settings.num(triple.abs() / 6.0)
    ));
    if is_coplanar {
        trace.line("Zero volume means the four points lie in one plane.");
    } else {
        trace.line("A non-zero volume means the points span a solid.");
    }
    Ok(Solution::new(is_coplanar, trace))
}

/// Plane through three non-collinear points.
pub fn plane_from_points(
    p1: Point3D,
    p2: Point3D,
    p3: Point3D,
    settings: &Settings,
) -> Result<Solution<Plane>, SolveError> {
    ensure_points(&[p1, p2, p3])?;
    let v1 = p2 - p1;
    let v2 = p3 - p1;
    let normal = v1.cross(v2);
    if settings
        .tolerance
        .is_negligible(normal.norm(), v1.norm() * v2.norm())
    {
        return Err(SolveError::domain(
            "the points are collinear, so they do not determine a unique plane",
        ));
    }
    let n = settings.notation();
    let (v1_name, v2_name) = (n.indexed("v", 1), n.indexed("v", 2));
    let names: Vec<String> = (1..=3).map(|i| n.indexed("P", i)).collect();
    let d = -normal.dot(p1);
    let raw = Plane {
        a: normal.x,
        b: normal.y,
        c: normal.z,
        d,
    };
    if !raw.normal().is_finite() || !d.is_finite() {
        return Err(SolveError::Numerical("plane".to_string()));
    }
    let plane = Plane {
        a: settings.round(raw.a),
        b: settings.round(raw.b),
        c: settings.round(raw.c),
        d: settings.round(raw.d),
    };

    let mut trace = StepTrace::new();
    for (name, p) in names.iter().zip([p1, p2, p3]) {
        trace.line(point_text(settings, name, p));
    }
    trace.line(delta_text(settings, &v1_name, &names[1], &names[0], v1));
    trace.line(delta_text(settings, &v2_name, &names[2], &names[0], v2));
    trace.line(format!(
        "The normal is n = {} {} {}.",
        v1_name,
        n.times(),
        v2_name
    ));
    cross_lines(settings, (&v1_name, v1), (&v2_name, v2), &mut trace);
    trace.line(format!(
        "d = -(n {} {}) = -({}) = {}",
        n.dot(),
        names[0],
        settings.num(normal.dot(p1)),
        settings.num(d)
    ));
    trace.line(format!("Plane: {}", equation(settings, &plane)));

    trace.begin_verification();
    for (name, p) in names.iter().zip([p1, p2, p3]) {
        let value = raw.evaluate(p);
        let scale = normal.norm() * p.norm() + d.abs();
        let mark = if settings.tolerance.is_negligible(value, scale) {
            "✓"
        } else {
            "✗"
        };
        trace.line(format!(
            "Substitute {}: {} = {} {}",
            name,
            substituted(settings, &raw, p),
            settings.num(value),
            mark
        ));
    }
    Ok(Solution::new(plane, trace))
}

/// `a x + b y + c z + d = 0` with signs folded into the operators.
pub(crate) fn equation(settings: &Settings, plane: &Plane) -> String {
    let mut text = format!("{}x", settings.num(plane.a));
    for (coefficient, symbol) in [(plane.b, "y"), (plane.c, "z"), (plane.d, "")] {
        let rounded = settings.round(coefficient);
        let sign = if rounded < 0.0 { '-' } else { '+' };
        text.push_str(&format!(
            " {} {}{}",
            sign,
            settings.num(rounded.abs()),
            symbol
        ));
    }
    text.push_str(" = 0");
    text
}

fn substituted(settings: &Settings, plane: &Plane, p: Point3D) -> String {
    let n = settings.notation();
    let t = |value: f64| settings.term(value);
    format!(
        "{}{}{} + {}{}{} + {}{}{} + {}",
        settings.num(plane.a),
        n.dot(),
        t(p.x),
        t(plane.b),
        n.dot(),
        t(p.y),
        t(plane.c),
        n.dot(),
        t(p.z),
        t(plane.d)
    )
}

/// Perpendicular distance from `point` to `plane`.
pub fn distance_point_to_plane(
    point: Point3D,
    plane: Plane,
    settings: &Settings,
) -> Result<Solution<f64>, SolveError> {
    ensure_points(&[point])?;
    if !plane.is_finite() {
        return Err(SolveError::parse(
            "plane coefficients",
            "coefficients must be finite",
        ));
    }
    let normal = plane.normal();
    let length = normal.norm();
    if length == 0.0 {
        return Err(SolveError::domain(
            "the plane normal (a, b, c) is zero, so the equation does not describe a plane",
        ));
    }
    let n = settings.notation();
    let numerator = plane.evaluate(point);
    let value = ensure_finite(numerator.abs() / length, "distance")?;
    let rounded = settings.round(value);
    debug!(numerator, length, "point to plane");

    let mut trace = StepTrace::new();
    trace.line(point_text(settings, "P", point));
    trace.line(format!("Plane: {}", equation(settings, &plane)));
    let squares = format!(
        "{} + {} + {}",
        n.power("a", "2"),
        n.power("b", "2"),
        n.power("c", "2")
    );
    trace.line(format!(
        "distance = {} / {}",
        n.abs("ax + by + cz + d"),
        n.sqrt(&squares)
    ));
    trace.line(format!(
        "Numerator: {} = {}",
        n.abs(&substituted(settings, &plane, point)),
        settings.num(numerator.abs())
    ));
    trace.line(norm_line(settings, "n", normal));
    trace.line(format!(
        "distance = {} / {} = {}",
        settings.num(numerator.abs()),
        settings.num(length),
        settings.num(rounded)
    ));

    trace.begin_verification();
    let foot = point - normal.scale(numerator / (length * length));
    let residual = plane.evaluate(foot);
    trace.line(format!(
        "Foot of the perpendicular: P - ({} / {}) {} n = {}",
        settings.num(numerator),
        n.power(&n.abs("n"), "2"),
        n.dot(),
        settings.vector(foot.components())
    ));
    let scale = length * foot.norm() + plane.d.abs();
    if settings.tolerance.is_negligible(residual, scale) {
        trace.line("The foot satisfies the plane equation ✓");
    } else {
        trace.line(format!(
            "The foot leaves a residual of {}; the difference is due to rounding.",
            settings.num(residual)
        ));
    }
    let offset = (point - foot).norm();
    let mark = if settings.tolerance.approx_eq(offset, value) {
        "✓"
    } else {
        "✗"
    };
    trace.line(format!(
        "|P - foot| = {}, the same as the distance {}",
        settings.num(offset),
        mark
    ));
    Ok(Solution::new(rounded, trace))
}

/// Line through two distinct points.
pub fn line_from_points(
    p1: Point3D,
    p2: Point3D,
    settings: &Settings,
) -> Result<Solution<Line3D>, SolveError> {
    ensure_points(&[p1, p2])?;
    let direction = p2 - p1;
    if direction.norm() == 0.0 {
        return Err(SolveError::domain(
            "the two points coincide, so they do not determine a line",
        ));
    }
    let n = settings.notation();
    let (p1_name, p2_name) = (n.indexed("P", 1), n.indexed("P", 2));
    let line = Line3D {
        point: p1,
        direction,
    };
    let rounded = Line3D {
        point: p1.map(|value| settings.round(value)),
        direction: direction.map(|value| settings.round(value)),
    };

    let mut trace = StepTrace::new();
    trace.line(point_text(settings, &p1_name, p1));
    trace.line(point_text(settings, &p2_name, p2));
    trace.line(delta_text(settings, "d", &p2_name, &p1_name, direction));
    trace.line(format!(
        "Line: r(t) = {} + t {} {}",
        settings.vector(p1.components()),
        n.dot(),
        settings.vector(direction.components())
    ));
    let parametric: Vec<String> = ["x", "y", "z"]
        .into_iter()
        .zip(p1.components().into_iter().zip(direction.components()))
        .map(|(axis, (start, step))| {
            let sign = if step < 0.0 { '-' } else { '+' };
            format!(
                "{} = {} {} {}t",
                axis,
                settings.num(start),
                sign,
                settings.num(step.abs())
            )
        })
        .collect();
    trace.line(format!("Parametric form: {}", parametric.join(", ")));

    trace.begin_verification();
    for (t, name, expected) in [(0.0, &p1_name, p1), (1.0, &p2_name, p2)] {
        let reached = line.at(t);
        let gap = (reached - expected).norm();
        let mark = if settings.tolerance.approx_eq(gap, 0.0) {
            "✓"
        } else {
            "✗"
        };
        trace.line(format!(
            "t = {} gives {} = {} {}",
            t,
            settings.vector(reached.components()),
            name,
            mark
        ));
    }
    Ok(Solution::new(rounded, trace))
}

/// Perpendicular distance from `point` to `line`.
pub fn distance_point_to_line(
    point: Point3D,
    line: Line3D,
    settings: &Settings,
) -> Result<Solution<f64>, SolveError> {
    ensure_points(&[point, line.point, line.direction])?;
    let length = line.direction.norm();
    if length == 0.0 {
        return Err(SolveError::domain(
            "the line direction is zero, so it does not describe a line",
        ));
    }
    let n = settings.notation();
    let unit = line.direction.scale(1.0 / length);
    let w = point - line.point;
    let projection = w.dot(unit);
    let perpendicular = w - unit.scale(projection);
    let value = ensure_finite(perpendicular.norm(), "distance")?;
    let rounded = settings.round(value);
    debug!(projection, value, "point to line");

    let mut trace = StepTrace::new();
    trace.line(point_text(settings, "P", point));
    trace.line(point_text(settings, "Q", line.point));
    trace.line(point_text(settings, "d", line.direction));
    trace.line(norm_line(settings, "d", line.direction));
    trace.line(format!(
        "d̂ = d / {} = {}",
        n.abs("d"),
        settings.vector(unit.components())
    ));
    trace.line(delta_text(settings, "w", "P", "Q", w));
    trace.line(format!(
        "Projection onto the line: w {} d̂ = {}",
        n.dot(),
        settings.num(projection)
    ));
    trace.line(format!(
        "Perpendicular part: w - ({}) d̂ = {}",
        settings.num(projection),
        settings.vector(perpendicular.components())
    ));
    trace.line(format!(
        "distance = {} = {}",
        n.abs("w - (w · d̂) d̂"),
        settings.num(rounded)
    ));

    trace.begin_verification();
    let crossed = w.cross(unit);
    let alternative = crossed.norm();
    trace.line(format!(
        "Cross-check: w {} d̂ = {}",
        n.times(),
        settings.vector(crossed.components())
    ));
    let cross_name = format!("w {} d̂", n.times());
    if settings.tolerance.approx_eq(alternative, value) {
        trace.line(format!(
            "{} = {}, which agrees with the projection method ✓",
            n.abs(&cross_name),
            settings.num(alternative)
        ));
    } else {
        trace.line(format!(
            "{} = {} differs from {} by {}; the difference is due to rounding.",
            n.abs(&cross_name),
            settings.num(alternative),
            settings.num(value),
            settings.num((alternative - value).abs())
        ));
    }
    Ok(Solution::new(rounded, trace))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ErrorKind;

    fn settings() -> Settings {
        Settings::default()
    }

    fn p(x: f64, y: f64, z: f64) -> Point3D {
        Point3D::new(x, y, z)
    }

    #[test]
    fn vector_algebra() {
        let u = p(1.0, 0.0, 0.0);
        let v = p(0.0, 1.0, 0.0);
        assert_eq!(u.cross(v), p(0.0, 0.0, 1.0));
        assert_eq!(u.dot(v), 0.0);
        assert_eq!(p(3.0, 4.0, 0.0).norm(), 5.0);
        assert_eq!(p(1.0, 2.0, 3.0) - p(1.0, 1.0, 1.0), p(0.0, 1.0, 2.0));
    }

    #[test]
    fn distance_of_a_3_4_5_triangle() {
        let solution = distance(p(0.0, 0.0, 0.0), p(3.0, 4.0, 0.0), &settings()).expect("solve");
        assert_eq!(solution.value, 5.0);
        let derivation: Vec<&str> = solution.trace.derivation().collect();
        assert!(derivation.contains(&"d = √(3^2 + 4^2 + 0^2) = √(25) = 5"));
        assert!(solution.trace.verification().any(|l| l.ends_with('✓')));
    }

    #[test]
    fn collinear_shows_cross_product_components() {
        let solution = collinear(
            p(0.0, 0.0, 0.0),
            p(1.0, 1.0, 1.0),
            p(2.0, 2.0, 2.0),
            &settings(),
        )
        .expect("solve");
        assert!(solution.value);
        let lines: Vec<&str> = solution.trace.derivation().collect();
        let position = |text: &str| lines.iter().position(|l| l.contains(text));
        let x = position("  x:").expect("x");
        let verdict = position("collinear").expect("verdict");
        assert!(x < verdict);
        let verification: Vec<&str> = solution.trace.verification().collect();
        let parallel = verification
            .iter()
            .find(|l| l.contains("parallel"))
            .expect("parallel");
        assert!(parallel.ends_with('✓'), "{parallel}");
    }

    #[test]
    fn repeated_point_is_collinear() {
        let a = p(1.0, 2.0, 3.0);
        let b = p(-4.0, 0.5, 7.0);
        let solution = collinear(a, a, b, &settings()).expect("solve");
        assert!(solution.value);
    }

    #[test]
    fn triangle_is_not_collinear() {
        let solution = collinear(
            p(0.0, 0.0, 0.0),
            p(1.0, 0.0, 0.0),
            p(0.0, 1.0, 0.0),
            &settings(),
        )
        .expect("solve");
        assert!(!solution.value);
        let verification: Vec<&str> = solution.trace.verification().collect();
        assert!(
            verification
                .iter()
                .any(|l| l.contains("area") && l.ends_with("0.5"))
        );
        assert!(!verification.iter().any(|l| l.ends_with('✓')));
    }

    #[test]
    fn coplanar_square() {
        let solution = coplanar(
            p(0.0, 0.0, 0.0),
            p(1.0, 0.0, 0.0),
            p(0.0, 1.0, 0.0),
            p(1.0, 1.0, 0.0),
            &settings(),
        )
        .expect("solve");
        assert!(solution.value);
    }

    #[test]
    fn unit_tetrahedron_is_not_coplanar() {
        let solution = coplanar(
            p(0.0, 0.0, 0.0),
            p(1.0, 0.0, 0.0),
            p(0.0, 1.0, 0.0),
            p(0.0, 0.0, 1.0),
            &settings(),
        )
        .expect("solve");
        assert!(!solution.value);
        let verification: Vec<&str> = solution.trace.verification().collect();
        assert!(verification.iter().any(|l| l.ends_with("0.166667")));
    }

    #[test]
    fn plane_through_axis_points() {
        let solution = plane_from_points(
            p(1.0, 0.0, 0.0),
            p(0.0, 1.0, 0.0),
            p(0.0, 0.0, 1.0),
            &settings(),
        )
        .expect("solve");
        assert_eq!(
            solution.value,
            Plane {
                a: 1.0,
                b: 1.0,
                c: 1.0,
                d: -1.0
            }
        );
        let derivation: Vec<&str> = solution.trace.derivation().collect();
        assert!(derivation.contains(&"Plane: 1x + 1y + 1z - 1 = 0"));
        let checked = solution.trace.verification().filter(|l| l.ends_with('✓'));
        assert_eq!(checked.count(), 3);
    }

    #[test]
    fn plane_from_collinear_points_is_a_domain_error() {
        let err = plane_from_points(
            p(0.0, 0.0, 0.0),
            p(1.0, 1.0, 1.0),
            p(2.0, 2.0, 2.0),
            &settings(),
        )
        .expect_err("collinear");
        assert_eq!(err.kind(), ErrorKind::Domain);
    }

    #[test]
    fn point_to_plane_distance() {
        let plane = Plane::from([0.0, 0.0, 1.0, -2.0]);
        let solution =
            distance_point_to_plane(p(1.0, 1.0, 5.0), plane, &settings()).expect("solve");
        assert_eq!(solution.value, 3.0);
        let verification: Vec<&str> = solution.trace.verification().collect();
        let satisfied = "The foot satisfies the plane equation ✓";
        assert!(verification.contains(&satisfied));
        assert_eq!(
            verification.last(),
            Some(&"|P - foot| = 3, the same as the distance ✓")
        );

        let flat = Plane::from([0.0, 0.0, 0.0, 1.0]);
        let err =
            distance_point_to_plane(p(0.0, 0.0, 0.0), flat, &settings()).expect_err("zero normal");
        assert_eq!(err.kind(), ErrorKind::Domain);
    }

    #[test]
    fn non_finite_plane_coefficients_are_named() {
        let plane = Plane::from([0.0, f64::NAN, 1.0, -2.0]);
        let err = distance_point_to_plane(p(1.0, 1.0, 5.0), plane, &settings())
            .expect_err("nan coefficient");
        assert_eq!(err.kind(), ErrorKind::Parse);
        let message = err.to_string();
        assert!(message.contains("plane coefficients"), "{message}");
        assert!(!message.contains("point"), "{message}");
    }

    #[test]
    fn line_from_points_uses_difference_as_direction() {
        let solution =
            line_from_points(p(1.0, 2.0, 3.0), p(4.0, 6.0, 3.0), &settings()).expect("solve");
        assert_eq!(solution.value.direction, p(3.0, 4.0, 0.0));
        let derivation: Vec<&str> = solution.trace.derivation().collect();
        let parametric = "Parametric form: x = 1 + 3t, y = 2 + 4t, z = 3 + 0t";
        assert!(derivation.contains(&parametric));
        let err =
            line_from_points(p(1.0, 1.0, 1.0), p(1.0, 1.0, 1.0), &settings()).expect_err("same");
        assert_eq!(err.kind(), ErrorKind::Domain);
    }

    #[test]
    fn returned_line_is_rounded_like_the_trace() {
        let solution =
            line_from_points(p(0.0, 0.0, 0.0), p(1.0 / 3.0, 0.0, 0.0), &settings()).expect("solve");
        assert_eq!(solution.value.point, p(0.0, 0.0, 0.0));
        assert_eq!(solution.value.direction, p(0.333333, 0.0, 0.0));
        assert!(solution.trace.verification().all(|l| l.ends_with('✓')));
    }

    #[test]
    fn point_to_line_agrees_with_cross_product() {
        let line = Line3D {
            point: p(0.0, 0.0, 0.0),
            direction: p(2.0, 0.0, 0.0),
        };
        let solution = distance_point_to_line(p(5.0, 3.0, 4.0), line, &settings()).expect("solve");
        assert_eq!(solution.value, 5.0);
        assert!(solution.trace.verification().any(|l| l.contains("agrees")));
    }
}
