//! Benchmark driver
//!
//! Builds one banded and one random operand pair per backend and precision,
//! times every product and flat-buffer strategy, writes the report lines and,
//! for small orders, dumps every matrix.

use std::io::{self, Write};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::{BenchConfig, REPORT_SEPARATOR, RUN_SEPARATOR};
use crate::error::MatrixError;
use crate::flat::{FlatMatrix, Gemm, Strategy};
use crate::matrix::{product, DenseRowMatrix, Fill, SparseMatrix, Storage};
use crate::scalar::{Precision, Scalar};
use crate::timing::{timed, Clock, Operation, TimingSample};

/// Errors that abort a benchmark run
#[derive(Debug, Error)]
pub enum BenchError {
    #[error("failed to write benchmark output")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Matrix(#[from] MatrixError),
}

/// Timings collected by one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BenchReport {
    pub samples: Vec<TimingSample>,
}

impl BenchReport {
    /// Looks up the sample of one combination
    ///
    /// `Fill::Banded` and `Fill::BandedFarColumn` are treated as the same fill.
    pub fn sample(
        &self,
        fill: Fill,
        operation: Operation,
        precision: Precision,
    ) -> Option<&TimingSample> {
        self.samples.iter().find(|s| {
            s.fill.label() == fill.label() && s.operation == operation && s.precision == precision
        })
    }
}

/// Random source for a run: seeded when the config asks for it
pub fn rng_for(config: &BenchConfig) -> StdRng {
    match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// One operand pair and, once multiplied, its product
struct Case<M> {
    fill: Fill,
    a: M,
    b: M,
    c: Option<M>,
}

impl<M> Case<M>
where
    M: Storage,
    M::Value: Scalar,
{
    fn build<R: Rng + ?Sized>(fill: Fill, order: usize, rng: &mut R) -> Self {
        let mut a = M::default();
        let mut b = M::default();
        fill.apply(&mut a, order, rng);
        fill.apply(&mut b, order, rng);
        Self { fill, a, b, c: None }
    }

    fn multiply<C: Clock + ?Sized>(&mut self, order: usize, clock: &C) -> TimingSample {
        let (c, elapsed) = timed(clock, || product(&mut self.a, &mut self.b));
        self.c = Some(c);

        TimingSample {
            order,
            fill: self.fill,
            operation: Operation::Product(M::KIND),
            precision: M::Value::PRECISION,
            elapsed,
        }
    }

    fn dump<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        for m in [Some(&self.a), Some(&self.b), self.c.as_ref()]
            .into_iter()
            .flatten()
        {
            m.print(out)?;
            writeln!(out)?;
        }
        Ok(())
    }
}

/// Every operand pair of a run, indexed `[banded, random]`
struct Workload {
    sparse_f64: [Case<SparseMatrix<f64>>; 2],
    sparse_f32: [Case<SparseMatrix<f32>>; 2],
    dense_f64: [Case<DenseRowMatrix<f64>>; 2],
    dense_f32: [Case<DenseRowMatrix<f32>>; 2],
}

impl Workload {
    fn build<R: Rng + ?Sized>(config: &BenchConfig, rng: &mut R) -> Self {
        let m = config.order;
        let dense_banded = if config.dense_far_column {
            Fill::BandedFarColumn
        } else {
            Fill::Banded
        };

        Self {
            sparse_f64: [Case::build(Fill::Banded, m, rng), Case::build(Fill::Random, m, rng)],
            sparse_f32: [Case::build(Fill::Banded, m, rng), Case::build(Fill::Random, m, rng)],
            dense_f64: [Case::build(dense_banded, m, rng), Case::build(Fill::Random, m, rng)],
            dense_f32: [Case::build(dense_banded, m, rng), Case::build(Fill::Random, m, rng)],
        }
    }

    fn dump<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        for i in 0..2 {
            self.sparse_f64[i].dump(out)?;
            self.sparse_f32[i].dump(out)?;
            self.dense_f64[i].dump(out)?;
            self.dense_f32[i].dump(out)?;
        }
        Ok(())
    }
}

/// Runs the full benchmark for one configuration
pub struct Benchmark<'a, G, C> {
    config: &'a BenchConfig,
    gemm: G,
    clock: C,
}

impl<'a, G: Gemm, C: Clock> Benchmark<'a, G, C> {
    pub fn new(config: &'a BenchConfig, gemm: G, clock: C) -> Self {
        Self {
            config,
            gemm,
            clock,
        }
    }

    /// Fills, multiplies and reports
    ///
    /// Report lines go to `report`; matrix dumps go to `dump` when the order
    /// is below the dump ceiling.
    pub fn run<R, W, D>(
        &self,
        rng: &mut R,
        report: &mut W,
        dump: &mut D,
    ) -> Result<BenchReport, BenchError>
    where
        R: Rng + ?Sized,
        W: Write + ?Sized,
        D: Write + ?Sized,
    {
        let m = self.config.order;
        let mut samples = Vec::new();

        info!(order = m, "filling operands");
        let mut work = Workload::build(self.config, rng);

        if self.config.runs_sparse_product() {
            info!(order = m, "sparse backend products");
            for (x, y) in work.sparse_f64.iter_mut().zip(work.sparse_f32.iter_mut()) {
                let pair = [x.multiply(m, &self.clock), y.multiply(m, &self.clock)];
                record(report, &mut samples, &pair)?;
            }
        } else {
            info!(
                order = m,
                ceiling = self.config.product_ceiling,
                "skipping sparse backend products above the ceiling"
            );
        }

        info!(order = m, "dense-row backend products");
        for (x, y) in work.dense_f64.iter_mut().zip(work.dense_f32.iter_mut()) {
            let pair = [x.multiply(m, &self.clock), y.multiply(m, &self.clock)];
            record(report, &mut samples, &pair)?;
        }

        info!(order = m, "flat-buffer strategies");
        for (x, y) in work.dense_f64.iter().zip(work.dense_f32.iter()) {
            let double = self.flat_pass(x)?;
            let single = self.flat_pass(y)?;
            for (d, s) in double.into_iter().zip(single) {
                record(report, &mut samples, &[d, s])?;
            }
        }

        if self.config.dumps_matrices() {
            info!(order = m, "dumping matrices");
            work.dump(dump)?;
            dump.flush()?;
        }

        writeln!(report)?;
        writeln!(report, "{}", RUN_SEPARATOR)?;
        writeln!(report, "{}", RUN_SEPARATOR)?;
        writeln!(report)?;
        report.flush()?;

        Ok(BenchReport { samples })
    }

    /// Runs every strategy on flat copies of one dense-row pair
    fn flat_pass<T: Scalar>(
        &self,
        case: &Case<DenseRowMatrix<T>>,
    ) -> Result<Vec<TimingSample>, MatrixError> {
        let a = FlatMatrix::from_storage(&case.a);
        let b = FlatMatrix::from_storage(&case.b);

        let mut results = Vec::with_capacity(Strategy::ALL.len());
        let mut samples = Vec::with_capacity(Strategy::ALL.len());
        for strategy in Strategy::ALL {
            let mut c = FlatMatrix::zeros(a.nrows(), b.ncols());
            let elapsed = strategy.run(&self.gemm, &a, &b, &mut c, &self.clock)?;
            samples.push(TimingSample {
                order: self.config.order,
                fill: case.fill,
                operation: Operation::Flat(strategy),
                precision: T::PRECISION,
                elapsed,
            });
            results.push((strategy, c));
        }

        if let Some((_, reference)) = results.iter().find(|(s, _)| *s == Strategy::Vendor) {
            for (strategy, c) in &results {
                if !c.approx_eq(reference) {
                    warn!(
                        %strategy,
                        precision = %T::PRECISION,
                        max_abs_diff = ?c.max_abs_diff(reference),
                        "strategy disagrees with gemm"
                    );
                }
            }
        }

        Ok(samples)
    }
}

/// Writes one report line per sample followed by the separator
fn record<W: Write + ?Sized>(
    report: &mut W,
    samples: &mut Vec<TimingSample>,
    pair: &[TimingSample],
) -> io::Result<()> {
    for sample in pair {
        writeln!(report, "{}", sample.report_line())?;
        samples.push(*sample);
    }
    writeln!(report, "{}", REPORT_SEPARATOR)
}
