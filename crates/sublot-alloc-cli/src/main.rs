// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;
use sublot_alloc_model::prelude::{AllocationSolution, ProblemLoader, ProductFamily};
use sublot_alloc_solver::prelude::{
    AllocationError, Allocator, AllocatorConfig, CandidateScope, time_limit_from_secs,
};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;

const USAGE: &str = "usage: sublot-alloc --instance <file.json> [--config <cfg.json>] \
[--out <result.json>] [--time-limit <secs>] [--family <prefix>] [--all-demand]";

#[derive(Debug, Default)]
struct Args {
    instance: PathBuf,
    config: Option<PathBuf>,
    out: Option<PathBuf>,
    time_limit: Option<f64>,
    family: Option<String>,
    all_demand: bool,
}

#[derive(Debug)]
enum CliError {
    Usage(String),
    Config(String),
    Allocation(AllocationError),
    Output(std::io::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}\n{USAGE}"),
            CliError::Config(msg) => write!(f, "invalid config: {msg}"),
            CliError::Allocation(e) => write!(f, "{e}"),
            CliError::Output(e) => write!(f, "failed to write results: {e}"),
        }
    }
}

impl std::error::Error for CliError {}

impl From<AllocationError> for CliError {
    fn from(e: AllocationError) -> Self {
        CliError::Allocation(e)
    }
}

fn parse_args<I: Iterator<Item = String>>(mut it: I) -> Result<Args, CliError> {
    let mut args = Args::default();
    let mut instance = None;

    while let Some(flag) = it.next() {
        let mut value = |name: &str| {
            it.next()
                .ok_or_else(|| CliError::Usage(format!("missing value for {name}")))
        };
        match flag.as_str() {
            "--instance" => instance = Some(PathBuf::from(value("--instance")?)),
            "--config" => args.config = Some(PathBuf::from(value("--config")?)),
            "--out" => args.out = Some(PathBuf::from(value("--out")?)),
            "--time-limit" => {
                let raw = value("--time-limit")?;
                let secs: f64 = raw
                    .parse()
                    .map_err(|_| CliError::Usage(format!("not a number of seconds: {raw}")))?;
                args.time_limit = Some(secs);
            }
            "--family" => args.family = Some(value("--family")?),
            "--all-demand" => args.all_demand = true,
            "-h" | "--help" => return Err(CliError::Usage(String::new())),
            other => return Err(CliError::Usage(format!("unknown argument: {other}"))),
        }
    }

    args.instance = instance.ok_or_else(|| CliError::Usage("--instance is required".into()))?;
    Ok(args)
}

fn load_config(args: &Args) -> Result<AllocatorConfig, CliError> {
    let mut config = match &args.config {
        Some(path) => {
            let file = File::open(path)
                .map_err(|e| CliError::Config(format!("{}: {e}", path.display())))?;
            serde_json::from_reader(std::io::BufReader::new(file))
                .map_err(|e| CliError::Config(format!("{}: {e}", path.display())))?
        }
        None => AllocatorConfig::default(),
    };

    if let Some(secs) = args.time_limit {
        let limit = time_limit_from_secs(secs).map_err(|e| CliError::Usage(e.to_string()))?;
        config = config.with_time_limit(Some(limit));
    }
    if let Some(prefix) = &args.family {
        config = config.with_product_family(ProductFamily::with_prefix(prefix.clone()));
    }
    if args.all_demand {
        config = config.with_candidate_scope(CandidateScope::AllDemand);
    }
    Ok(config)
}

fn enable_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_span_events(FmtSpan::CLOSE)
        .init();
}

fn log_tables(solution: &AllocationSolution) {
    tracing::info!("Status: {}", solution.status());
    for a in solution.assignments() {
        tracing::info!(
            "Crate {} (container {}, type {}) -> {}",
            a.crate_id.as_str(),
            a.container.as_ref().map(|c| c.as_str()).unwrap_or("-"),
            a.crate_type.as_ref().map(|t| t.as_str()).unwrap_or("-"),
            a.location
        );
    }
    for s in solution.surplus() {
        tracing::info!("Surplus {} at {}: {}", s.part.as_str(), s.location, s.quantity);
    }
    for d in solution.unfulfilled() {
        tracing::info!("Unfulfilled {} at {}: {}", d.part.as_str(), d.location, d.quantity);
    }
    for d in solution.residual_deficit() {
        tracing::info!("Still owed {} at {}: {}", d.part.as_str(), d.location, d.quantity);
    }
    for e in solution.extras() {
        tracing::info!("Extra {} at {}: {}", e.part.as_str(), e.location, e.quantity);
    }
    tracing::info!("Total surplus: {}", solution.total_surplus());
}

#[derive(Serialize)]
struct RunRecord<'a> {
    instance: String,
    start_ts: DateTime<Utc>,
    end_ts: DateTime<Utc>,
    runtime_ms: u128,
    solution: &'a AllocationSolution,
}

fn run(args: &Args) -> Result<(), CliError> {
    let config = load_config(args)?;
    let problem = ProblemLoader::new()
        .from_path(&args.instance)
        .map_err(AllocationError::from)?;

    tracing::info!(
        "Allocating {} with {} crates ({} located, {} free) and {} demand rows",
        args.instance.display(),
        problem.crates().len(),
        problem.crates().located_len(),
        problem.crates().free_len(),
        problem.demand().len()
    );

    let start_ts = Utc::now();
    let t0 = Instant::now();
    let solution = Allocator::new(config).allocate(&problem)?;
    let runtime = t0.elapsed();
    let end_ts = Utc::now();

    log_tables(&solution);
    tracing::info!("Finished in {:?}", runtime);

    let Some(out_path) = &args.out else {
        return Ok(());
    };
    let record = RunRecord {
        instance: args.instance.to_string_lossy().into_owned(),
        start_ts,
        end_ts,
        runtime_ms: runtime.as_millis(),
        solution: &solution,
    };
    let json = serde_json::to_string_pretty(&record)
        .map_err(|e| CliError::Output(std::io::Error::other(e)))?;
    File::create(out_path)
        .and_then(|mut f| f.write_all(json.as_bytes()))
        .map_err(CliError::Output)?;
    tracing::info!("Wrote run record to {}", out_path.display());
    Ok(())
}

fn main() -> ExitCode {
    enable_tracing();

    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::from(2);
        }
    };

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn args(v: &[&str]) -> Result<Args, CliError> {
        parse_args(v.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_parse_full_command_line() {
        let a = args(&[
            "--instance",
            "in.json",
            "--out",
            "out.json",
            "--time-limit",
            "7.5",
            "--family",
            "GL",
            "--all-demand",
        ])
        .unwrap();
        assert_eq!(a.instance, PathBuf::from("in.json"));
        assert_eq!(a.out, Some(PathBuf::from("out.json")));
        assert_eq!(a.time_limit, Some(7.5));
        assert_eq!(a.family.as_deref(), Some("GL"));
        assert!(a.all_demand);

        let c = load_config(&a).unwrap();
        assert_eq!(c.time_limit(), Some(Duration::from_millis(7500)));
        assert_eq!(c.candidate_scope(), CandidateScope::AllDemand);
        assert_eq!(c.product_family().prefix(), Some("GL"));
    }

    #[test]
    fn test_instance_is_required() {
        assert!(matches!(args(&["--all-demand"]), Err(CliError::Usage(_))));
    }

    #[test]
    fn test_bad_arguments_are_usage_errors() {
        assert!(matches!(args(&["--instance"]), Err(CliError::Usage(_))));
        assert!(matches!(
            args(&["--instance", "a", "--time-limit", "soon"]),
            Err(CliError::Usage(_))
        ));
        assert!(matches!(args(&["--frobnicate"]), Err(CliError::Usage(_))));
    }

    #[test]
    fn test_out_of_range_time_limit_is_a_usage_error() {
        for raw in ["1e30", "0", "-3"] {
            let a = args(&["--instance", "a", "--time-limit", raw]).unwrap();
            assert!(matches!(load_config(&a), Err(CliError::Usage(_))), "{raw}");
        }
    }
}
