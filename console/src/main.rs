use anyhow::Context;
use clap::Parser;
use generator::random::generate_pair;
use log::{debug, info};
use matmulcore::{Dimensions, Matrix, MatrixError};
use session::config::{OutputFormat, SessionConfig};
use session::runner::Runner;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

mod generator;
mod session;

#[derive(Parser)]
#[command(author, version, about = "Multiply two dense integer matrices")]
struct Args {
    /// Load session settings (and optionally both operands) from YAML
    #[arg(long)]
    config: Option<PathBuf>,
    /// Read dimensions and elements from a file instead of stdin
    #[arg(long)]
    input: Option<PathBuf>,
    /// Do not print prompts or the result heading
    #[arg(long, default_value_t = false)]
    no_prompt: bool,
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,
    /// Generate random operands with the given shapes
    #[arg(long, num_args = 4, value_names = ["R1", "C1", "R2", "C2"])]
    random: Option<Vec<usize>>,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long)]
    max_value: Option<i64>,
    /// Append a one-line summary of the run to this file
    #[arg(long)]
    report: Option<PathBuf>,
}

/// How a run ended when it did not hit an unexpected error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunStatus {
    Completed,
    /// Operands were not conformable; the message was already printed.
    Rejected,
}

impl From<RunStatus> for ExitCode {
    fn from(status: RunStatus) -> Self {
        match status {
            RunStatus::Completed => ExitCode::SUCCESS,
            RunStatus::Rejected => ExitCode::FAILURE,
        }
    }
}

fn main() -> anyhow::Result<ExitCode> {
    env_logger::init();
    let args = Args::parse();

    let runner = Runner::new(session_config(&args)?);
    let stdout = io::stdout();
    let mut output = stdout.lock();
    let result = execute(&args, &runner, &mut output);

    let snapshot = runner.snapshot();
    debug!(
        "session finished: multiplied={} mismatched={} overflowed={}",
        snapshot.multiplied, snapshot.mismatched, snapshot.overflowed
    );

    let status = conclude(result, args.report.as_deref(), &mut output)?;
    Ok(status.into())
}

/// Config file (if any) with command-line overrides applied on top.
fn session_config(args: &Args) -> anyhow::Result<SessionConfig> {
    let mut config = if let Some(path) = &args.config {
        SessionConfig::load(path)?
    } else {
        SessionConfig::from_args(!args.no_prompt, args.format.unwrap_or_default())
    };
    if let Some(format) = args.format {
        config.format = format;
    }
    if args.no_prompt || args.input.is_some() {
        config.prompts = false;
    }
    if let Some(seed) = args.seed {
        config.generator.seed = seed;
    }
    if let Some(max_value) = args.max_value {
        config.generator.max_value = max_value;
    }
    Ok(config)
}

/// Writes the report line, prints a mismatch message to `output`, and
/// passes any other error through.
fn conclude<W: Write>(
    result: anyhow::Result<Matrix>,
    report: Option<&Path>,
    output: &mut W,
) -> anyhow::Result<RunStatus> {
    if let Some(path) = report {
        let summary = match &result {
            Ok(product) => format!("status=ok product={}\n", product.dims()),
            Err(err) => format!("status=failed error={:#}\n", err),
        };
        append_report(path, &summary)?;
    }

    match result {
        Ok(_) => Ok(RunStatus::Completed),
        Err(err) if is_dimension_mismatch(&err) => {
            writeln!(output, "{}", err)?;
            Ok(RunStatus::Rejected)
        }
        Err(err) => Err(err),
    }
}

fn execute<W: Write>(args: &Args, runner: &Runner, output: &mut W) -> anyhow::Result<Matrix> {
    if let Some(shape) = &args.random {
        let left = Dimensions::new(shape[0], shape[1])?;
        let right = Dimensions::new(shape[2], shape[3])?;
        let (lhs, rhs) = generate_pair(left, right, &runner.config().generator)?;
        info!("generated first matrix {}:\n{}", left, lhs);
        info!("generated second matrix {}:\n{}", right, rhs);
        return runner.run_pair(&lhs, &rhs, output);
    }

    if let Some((lhs, rhs)) = runner.config().operands() {
        return runner.run_pair(lhs, rhs, output);
    }

    match &args.input {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("opening input {}", path.display()))?;
            runner.run(BufReader::new(file), output)
        }
        None => runner.run(io::stdin().lock(), output),
    }
}

fn is_dimension_mismatch(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<MatrixError>(),
        Some(MatrixError::DimensionMismatch { .. })
    )
}

fn append_report(path: &Path, summary: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening report {}", path.display()))?;
    file.write_all(summary.as_bytes())?;
    Ok(())
}
