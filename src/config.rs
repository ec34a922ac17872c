//! Configuration of a benchmark run

use std::path::PathBuf;

/// Matrix order used when none is given
pub const DEFAULT_ORDER: usize = 10;

/// Largest order for which the sparse backend product still runs
pub const DEFAULT_PRODUCT_CEILING: usize = 400;

/// Orders strictly below this dump every matrix to the debug sink
pub const DEFAULT_DUMP_CEILING: usize = 20;

/// Separator written after each double/float pair of report lines
pub const REPORT_SEPARATOR: &str = "************************************************";

/// Line written twice at the end of every run
pub const RUN_SEPARATOR: &str = "---------------------------------------------------";

/// Parameters of one benchmark run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchConfig {
    /// Order `m` of the square matrices
    pub order: usize,

    /// The sparse backend product runs only for `order <= product_ceiling`
    pub product_ceiling: usize,

    /// Matrices are dumped only for `order < dump_ceiling`
    pub dump_ceiling: usize,

    /// Seed of the random fill; `None` draws one from the OS
    pub seed: Option<u64>,

    /// Use the far-column banded fill on the dense-row backend
    pub dense_far_column: bool,

    /// File receiving report lines, opened in append mode
    pub report_path: PathBuf,

    /// File receiving matrix dumps, truncated on every run
    pub dump_path: PathBuf,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            order: DEFAULT_ORDER,
            product_ceiling: DEFAULT_PRODUCT_CEILING,
            dump_ceiling: DEFAULT_DUMP_CEILING,
            seed: None,
            dense_far_column: true,
            report_path: PathBuf::from("results.txt"),
            dump_path: PathBuf::from("matrix.txt"),
        }
    }
}

impl BenchConfig {
    /// Default configuration for the given order
    pub fn for_order(order: usize) -> Self {
        Self {
            order,
            ..Self::default()
        }
    }

    /// Whether the sparse backend product runs at this order
    pub fn runs_sparse_product(&self) -> bool {
        self.order <= self.product_ceiling
    }

    /// Whether matrices are dumped at this order
    pub fn dumps_matrices(&self) -> bool {
        self.order < self.dump_ceiling
    }
}
