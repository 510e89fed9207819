//! kbest-bench CLI: time a workload and print its k-best cycle count.
//!
//! ```text
//! kbest-bench -n 1000            # prints the k-best mean cycles
//! kbest-bench -k -n 1000         # prints the checksum only
//! kbest-bench -x 499500 -d 1     # verify checksum, then time with summary
//! ```

use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::{Parser, ValueEnum};
use tracing::level_filters::LevelFilter;

use kbest_bench::output::{format_measurement, to_json, to_json_pretty};
use kbest_bench::preflight::{log_system_warnings, pin_best_effort};
use kbest_bench::workloads::{Fib, Sort, Sum, WorkloadKind};
use kbest_bench::{
    Config, CounterSpec, Session, Workload, DEFAULT_PARAM, EPSILON, K_BEST, MAX_ITERS,
};

/// Time a workload with a cycle counter and report the mean of its k best runs.
#[derive(Parser, Debug)]
#[command(name = "kbest-bench", version, about, long_about = None)]
struct Cli {
    /// Debug level: 0 silent, 1 summary, 2 per-iteration cycle counts
    #[arg(short = 'd', value_name = "D", default_value_t = 0)]
    debug: u8,

    /// Benchmark parameter
    #[arg(short = 'n', value_name = "N", default_value_t = DEFAULT_PARAM, allow_negative_numbers = true)]
    param: i32,

    /// Print the checksum and exit without timing
    #[arg(short = 'k')]
    checksum_only: bool,

    /// Verify checksum = N before timing
    #[arg(short = 'x', value_name = "N", allow_negative_numbers = true)]
    verify: Option<i32>,

    /// Built-in workload to time
    #[arg(short = 'w', long, value_enum, default_value_t = WorkloadKind::Sum)]
    workload: WorkloadKind,

    /// Maximum timed iterations
    #[arg(long, default_value_t = MAX_ITERS)]
    max_iters: usize,

    /// Number of smallest samples retained and averaged
    #[arg(long, default_value_t = K_BEST)]
    k_best: usize,

    /// Convergence tolerance between smallest and largest retained sample
    #[arg(long, default_value_t = EPSILON)]
    epsilon: f64,

    /// Cycle source
    #[arg(long, value_enum, default_value_t = CounterSpec::Auto)]
    counter: CounterSpec,

    /// Logical CPU to pin to before sampling
    #[arg(long, value_name = "CPU", default_value_t = 0)]
    cpu: usize,

    /// Do not pin to a CPU
    #[arg(long)]
    no_pin: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Plain)]
    format: Format,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Bare integer
    Plain,
    /// Colored summary
    Pretty,
    /// Measurement as one line of JSON
    Json,
    /// Measurement as indented JSON
    JsonPretty,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Help, version and bad arguments all print usage and exit 0.
            // Nowhere left to report a failed write of the usage text.
            e.print().ok();
            if !matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
                eprintln!("Run with -h for the full option list.");
            }
            return ExitCode::SUCCESS;
        }
    };

    init_logging(cli.debug);

    let result = match cli.workload {
        WorkloadKind::Sum => run(&cli, Sum),
        WorkloadKind::Sort => run(&cli, Sort::default()),
        WorkloadKind::Fib => run(&cli, Fib),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(debug: u8) {
    let level = match debug {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        _ => LevelFilter::DEBUG,
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .with_level(false)
        .with_ansi(false)
        .init();
}

fn run<W: Workload>(cli: &Cli, workload: W) -> anyhow::Result<()> {
    if !cli.no_pin {
        pin_best_effort(cli.cpu);
    }
    if cli.debug >= 1 {
        log_system_warnings();
    }

    let config = Config::default()
        .param(cli.param)
        .max_iters(cli.max_iters)
        .k_best(cli.k_best)
        .epsilon(cli.epsilon);
    let counter = cli.counter.create()?;
    let mut session = Session::with_counter(workload, config, counter)?;

    session.initialize()?;
    session.warm_up()?;

    if cli.checksum_only {
        println!("{}", session.checksum()?);
        return Ok(());
    }

    if let Some(expected) = cli.verify {
        session.verify_checksum(expected)?;
    }

    let measurement = session.measure()?;
    if !measurement.outcome.is_converged() {
        tracing::info!(
            "No convergence within {} iterations, reporting the mean of {} retained",
            measurement.iterations,
            measurement.retained
        );
    }

    match cli.format {
        Format::Plain => println!("{}", measurement.cycles),
        Format::Pretty => print!("{}", format_measurement(&measurement)),
        Format::Json => println!("{}", to_json(&measurement)?),
        Format::JsonPretty => println!("{}", to_json_pretty(&measurement)?),
    }
    Ok(())
}
