//! Size of the Rayon pool behind the horizontal row reductions
//!
//! [`crate::statistics`] reduces every `(outer, nlat * nlon)` row on the
//! global pool, so the binary configures it once at start-up.

use crate::errors::{AeolusError, Result};
use rayon::ThreadPoolBuilder;
use std::fmt;

/// Number of worker threads for the spatial statistics
#[derive(Debug, Clone, Default)]
pub struct ParallelConfig {
    pub num_threads: Option<usize>,
}

impl ParallelConfig {
    /// One worker per CPU core
    pub fn all_cores() -> Self {
        Self {
            num_threads: Some(num_cpus::get()),
        }
    }

    pub fn with_threads(num_threads: usize) -> Self {
        Self {
            num_threads: Some(num_threads),
        }
    }

    /// Configuration for the `--threads` option; `None` uses every core
    ///
    /// # Errors
    ///
    /// Returns an invalid-argument error for zero threads.
    pub fn from_cli(threads: Option<usize>) -> Result<Self> {
        match threads {
            Some(0) => Err(AeolusError::invalid(
                "--threads must be at least 1",
            )),
            Some(n) => Ok(Self::with_threads(n)),
            None => Ok(Self::all_cores()),
        }
    }

    /// Build the global pool, naming its workers `aeolus-<i>`
    ///
    /// # Errors
    ///
    /// Returns a thread pool error if the pool was already initialised or
    /// cannot be built.
    pub fn setup_global_pool(&self) -> Result<()> {
        let Some(num_threads) = self.num_threads else {
            log::debug!("Leaving the Rayon pool at its default size");
            return Ok(());
        };
        ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .thread_name(|i| format!("aeolus-{i}"))
            .build_global()
            .map_err(|e| {
                AeolusError::ThreadPool(format!(
                    "Failed to initialize thread pool with {num_threads} threads: {e}"
                ))
            })?;
        log::info!("Spatial statistics run on {num_threads} threads");
        Ok(())
    }
}

/// Threads in the current pool against the cores of the machine
#[derive(Debug, Clone)]
pub struct ParallelInfo {
    pub current_threads: usize,
    pub available_cores: usize,
}

pub fn get_parallel_info() -> ParallelInfo {
    ParallelInfo {
        current_threads: rayon::current_num_threads(),
        available_cores: num_cpus::get(),
    }
}

impl fmt::Display for ParallelInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} threads on {} CPU cores",
            self.current_threads, self.available_cores
        )
    }
}
