//! Step-by-step math solver.
//!
//! Each subcommand runs one engine and prints its derivation trace followed by
//! the verification section and the result.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use stepwise::core::request::{SolveResponse, render_value};
use stepwise::core::types::{InputField, Operation, Settings};
use stepwise::exit_codes;
use stepwise::io::config::{DEFAULT_CONFIG_FILE, EngineConfig, write_config};
use stepwise::logging;
use stepwise::session::{self, Invocation};
use tracing::info;

#[derive(Parser)]
#[command(
    name = "stepwise",
    version,
    about = "Step-by-step solver for matrices, radicals and 3D geometry"
)]
struct Cli {
    /// Config file (defaults apply when it does not exist).
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Print the full response as JSON instead of text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct Example {
    /// Start from the built-in example; explicit inputs override it.
    #[arg(long)]
    example: bool,
}

#[derive(Args)]
struct MatrixPair {
    /// Left operand, rows separated by `;` (e.g. "1 2; 3 4").
    #[arg(short = 'a', long = "matrix-a", allow_hyphen_values = true)]
    a: Option<String>,
    /// Right operand.
    #[arg(short = 'b', long = "matrix-b", allow_hyphen_values = true)]
    b: Option<String>,
    #[command(flatten)]
    example: Example,
}

#[derive(Args)]
struct Points {
    /// First point as "x y z".
    #[arg(long, allow_hyphen_values = true)]
    p1: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    p2: Option<String>,
    #[command(flatten)]
    example: Example,
}

#[derive(Args)]
struct ThreePoints {
    #[command(flatten)]
    points: Points,
    #[arg(long, allow_hyphen_values = true)]
    p3: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Write a default `stepwise.toml` if missing.
    Init {
        /// Overwrite an existing file.
        #[arg(short, long)]
        force: bool,
    },
    /// Determinant by cofactor expansion.
    Determinant {
        #[arg(short, long, allow_hyphen_values = true)]
        matrix: Option<String>,
        #[command(flatten)]
        example: Example,
    },
    /// A + B.
    Add(MatrixPair),
    /// A - B.
    Subtract(MatrixPair),
    /// k · A.
    ScalarMultiply {
        #[arg(short, long, allow_hyphen_values = true)]
        matrix: Option<String>,
        #[arg(short = 'k', long, allow_hyphen_values = true)]
        scalar: Option<String>,
        #[command(flatten)]
        example: Example,
    },
    /// A × B.
    Multiply(MatrixPair),
    /// base ^ exponent.
    Power {
        #[arg(long, allow_hyphen_values = true)]
        base: Option<String>,
        #[arg(long, allow_hyphen_values = true)]
        exponent: Option<String>,
        #[command(flatten)]
        example: Example,
    },
    /// index-th root of radicand, simplified.
    Root {
        #[arg(long, allow_hyphen_values = true)]
        radicand: Option<String>,
        #[arg(long, allow_hyphen_values = true)]
        index: Option<String>,
        #[command(flatten)]
        example: Example,
    },
    /// Distance between two points.
    Distance(Points),
    /// Whether three points lie on one line.
    Collinear(ThreePoints),
    /// Whether four points lie in one plane.
    Coplanar {
        #[command(flatten)]
        points: ThreePoints,
        #[arg(long, allow_hyphen_values = true)]
        p4: Option<String>,
    },
    /// Plane through three points.
    PlaneFromPoints(ThreePoints),
    /// Distance from a point to the plane "a b c d" (ax + by + cz + d = 0).
    PointToPlane {
        #[arg(long, allow_hyphen_values = true)]
        point: Option<String>,
        #[arg(long, allow_hyphen_values = true)]
        plane: Option<String>,
        #[command(flatten)]
        example: Example,
    },
    /// Line through two points.
    LineFromPoints(Points),
    /// Distance from a point to the line through `line-point` along `direction`.
    PointToLine {
        #[arg(long, allow_hyphen_values = true)]
        point: Option<String>,
        #[arg(long, allow_hyphen_values = true)]
        line_point: Option<String>,
        #[arg(long, allow_hyphen_values = true)]
        direction: Option<String>,
        #[command(flatten)]
        example: Example,
    },
}

impl Command {
    /// The solve invocation for an engine subcommand; `None` for `init`.
    fn into_invocation(self) -> Option<Invocation> {
        use InputField as F;
        let (operation, example, fields) = match self {
            Command::Init { .. } => return None,
            Command::Determinant { matrix, example } => {
                (Operation::Determinant, example, vec![(F::Matrix, matrix)])
            }
            Command::Add(pair) => pair.into_parts(Operation::Add),
            Command::Subtract(pair) => pair.into_parts(Operation::Subtract),
            Command::Multiply(pair) => pair.into_parts(Operation::Multiply),
            Command::ScalarMultiply {
                matrix,
                scalar,
                example,
            } => (
                Operation::ScalarMultiply,
                example,
                vec![(F::Matrix, matrix), (F::Scalar, scalar)],
            ),
            Command::Power {
                base,
                exponent,
                example,
            } => (
                Operation::Power,
                example,
                vec![(F::Base, base), (F::Exponent, exponent)],
            ),
            Command::Root {
                radicand,
                index,
                example,
            } => (
                Operation::Root,
                example,
                vec![(F::Radicand, radicand), (F::Index, index)],
            ),
            Command::Distance(points) => points.into_parts(Operation::Distance),
            Command::LineFromPoints(points) => points.into_parts(Operation::LineFromPoints),
            Command::Collinear(points) => points.into_parts(Operation::Collinear),
            Command::PlaneFromPoints(points) => points.into_parts(Operation::PlaneFromPoints),
            Command::Coplanar { points, p4 } => {
                let (operation, example, mut fields) = points.into_parts(Operation::Coplanar);
                fields.push((F::P4, p4));
                (operation, example, fields)
            }
            Command::PointToPlane {
                point,
                plane,
                example,
            } => (
                Operation::PointToPlane,
                example,
                vec![(F::Point, point), (F::Plane, plane)],
            ),
            Command::PointToLine {
                point,
                line_point,
                direction,
                example,
            } => (
                Operation::PointToLine,
                example,
                vec![
                    (F::Point, point),
                    (F::LinePoint, line_point),
                    (F::Direction, direction),
                ],
            ),
        };
        Some(Invocation {
            operation,
            use_example: example.example,
            inputs: fields
                .into_iter()
                .filter_map(|(field, value)| value.map(|value| (field, value)))
                .collect(),
        })
    }
}

type Parts = (Operation, Example, Vec<(InputField, Option<String>)>);

impl MatrixPair {
    fn into_parts(self, operation: Operation) -> Parts {
        (
            operation,
            self.example,
            vec![(InputField::MatrixA, self.a), (InputField::MatrixB, self.b)],
        )
    }
}

impl Points {
    fn into_parts(self, operation: Operation) -> Parts {
        (
            operation,
            self.example,
            vec![(InputField::P1, self.p1), (InputField::P2, self.p2)],
        )
    }
}

impl ThreePoints {
    fn into_parts(self, operation: Operation) -> Parts {
        let (operation, example, mut fields) = self.points.into_parts(operation);
        fields.push((InputField::P3, self.p3));
        (operation, example, fields)
    }
}

fn main() {
    logging::init();
    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{:#}", err);
            std::process::exit(exit_codes::INVALID);
        }
    }
}

fn run() -> Result<i32> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = if err.use_stderr() {
                exit_codes::INVALID
            } else {
                exit_codes::OK
            };
            err.print().context("print usage")?;
            return Ok(code);
        }
    };
    if let Command::Init { force } = cli.command {
        return cmd_init(&cli.config, force);
    }
    let settings = session::load_settings(&cli.config)?;
    let Some(invocation) = cli.command.into_invocation() else {
        return Ok(exit_codes::OK);
    };
    cmd_solve(&invocation, settings, cli.json)
}

fn cmd_init(path: &Path, force: bool) -> Result<i32> {
    if !force && path.exists() {
        eprintln!(
            "{} already exists; pass --force to overwrite",
            path.display()
        );
        return Ok(exit_codes::OK);
    }
    write_config(path, &EngineConfig::default())?;
    info!(path = %path.display(), "config written");
    println!("{}", path.display());
    Ok(exit_codes::OK)
}

fn cmd_solve(invocation: &Invocation, settings: Settings, json: bool) -> Result<i32> {
    let state = session::run(invocation, settings);
    let response = state.outcome.context("solver produced no outcome")?;
    if json {
        print_json(&response)?;
    } else {
        print_text(invocation.operation, &response, &settings);
    }
    Ok(if response.is_error() {
        exit_codes::SOLVE_FAILED
    } else {
        exit_codes::OK
    })
}

fn print_json(response: &SolveResponse) -> Result<()> {
    let payload = serde_json::to_string_pretty(response).context("serialize response")?;
    println!("{}", payload);
    Ok(())
}

fn print_text(operation: Operation, response: &SolveResponse, settings: &Settings) {
    if let Some(error) = &response.error {
        eprintln!("{} failed ({:?}): {}", operation, error.kind, error.message);
        return;
    }
    print!("{}", session::render_trace(&response.trace));
    if let Some(value) = &response.result {
        println!("\nResult: {}", render_value(value, settings));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_init() {
        let cli = Cli::parse_from(["stepwise", "init"]);
        assert!(matches!(cli.command, Command::Init { force: false }));
    }

    #[test]
    fn parse_init_force() {
        let cli = Cli::parse_from(["stepwise", "init", "--force"]);
        assert!(matches!(cli.command, Command::Init { force: true }));
    }

    #[test]
    fn negative_values_are_not_flags() {
        let cli = Cli::parse_from(["stepwise", "power", "--base", "-8", "--exponent", "-1"]);
        let invocation = cli.command.into_invocation().expect("invocation");
        assert_eq!(invocation.operation, Operation::Power);
        assert_eq!(
            invocation.inputs,
            vec![
                (InputField::Base, "-8".to_string()),
                (InputField::Exponent, "-1".to_string())
            ]
        );
    }

    #[test]
    fn nested_point_flags_collect_in_order() {
        let cli = Cli::parse_from([
            "stepwise", "coplanar", "--p1", "0 0 0", "--p2", "1 0 0", "--p3", "0 1 0", "--p4",
            "1 1 0", "--json",
        ]);
        assert!(cli.json);
        let invocation = cli.command.into_invocation().expect("invocation");
        let fields: Vec<InputField> = invocation.inputs.iter().map(|(f, _)| *f).collect();
        assert_eq!(
            fields,
            vec![InputField::P1, InputField::P2, InputField::P3, InputField::P4]
        );
    }

    #[test]
    fn example_flag_without_inputs() {
        let cli = Cli::parse_from(["stepwise", "plane-from-points", "--example"]);
        let invocation = cli.command.into_invocation().expect("invocation");
        assert!(invocation.use_example);
        assert!(invocation.inputs.is_empty());
    }
}
