use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use matbench::{config, rng_for, BenchConfig, Benchmark, MonotonicClock, NdarrayGemm};

/// Time matrix products on sparse, dense-row and flat storage
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Order of the square matrices
    #[arg(default_value_t = config::DEFAULT_ORDER)]
    order: usize,

    /// Seed for the random fill (drawn from the OS when absent)
    #[arg(long)]
    seed: Option<u64>,

    /// File the report lines are appended to
    #[arg(long, default_value = "results.txt")]
    report: PathBuf,

    /// File the matrix dump is written to
    #[arg(long, default_value = "matrix.txt")]
    dump: PathBuf,

    /// Largest order for which the sparse backend product runs
    #[arg(long, default_value_t = config::DEFAULT_PRODUCT_CEILING)]
    product_ceiling: usize,

    /// Matrices are dumped only for orders below this
    #[arg(long, default_value_t = config::DEFAULT_DUMP_CEILING)]
    dump_ceiling: usize,

    /// Use the plain banded fill on the dense-row backend
    #[arg(long)]
    no_far_column: bool,
}

impl From<Cli> for BenchConfig {
    fn from(cli: Cli) -> Self {
        Self {
            order: cli.order,
            product_ceiling: cli.product_ceiling,
            dump_ceiling: cli.dump_ceiling,
            seed: cli.seed,
            dense_far_column: !cli.no_far_column,
            report_path: cli.report,
            dump_path: cli.dump,
        }
    }
}

/// Writes every report line to the console and the report file
struct Tee<A, B> {
    console: A,
    file: B,
}

impl<A: Write, B: Write> Write for Tee<A, B> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.console.write_all(buf)?;
        self.file.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.console.flush()?;
        self.file.flush()
    }
}

fn main() -> Result<()> {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .init();

    let config = BenchConfig::from(Cli::parse());
    info!(?config, "starting benchmark");

    let report_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.report_path)
        .with_context(|| format!("opening report file {}", config.report_path.display()))?;
    let mut report = Tee {
        console: io::stdout().lock(),
        file: BufWriter::new(report_file),
    };

    let dump_file = File::create(&config.dump_path)
        .with_context(|| format!("creating dump file {}", config.dump_path.display()))?;
    let mut dump = BufWriter::new(dump_file);

    let mut rng = rng_for(&config);
    let bench = Benchmark::new(&config, NdarrayGemm::new(), MonotonicClock::new());
    let result = bench
        .run(&mut rng, &mut report, &mut dump)
        .context("benchmark run failed")?;

    info!(samples = result.samples.len(), "benchmark complete");
    Ok(())
}
