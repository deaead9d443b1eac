//! Block execution for kernels
//!
//! Kernels split a table into row blocks, compute a statistic per block and
//! merge the statistics. With the `parallel` feature the blocks are processed
//! on the rayon pool; otherwise they run in order on the calling thread.
//! Either way the merge happens only after every block succeeded, so a
//! failing block never leaves a half-updated partial result behind.

use crate::error::Result;
use std::ops::Range;

/// Rows per block when a kernel does not choose its own size
pub const DEFAULT_BLOCK_ROWS: usize = 512;

/// Execution strategy for block operations
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExecutionStrategy {
    /// Process blocks sequentially
    Sequential,
    /// Process blocks in parallel
    Parallel,
}

impl ExecutionStrategy {
    /// Strategy compiled into this build
    pub fn current() -> Self {
        if cfg!(feature = "parallel") {
            ExecutionStrategy::Parallel
        } else {
            ExecutionStrategy::Sequential
        }
    }
}

/// Split `n_rows` into consecutive ranges of at most `block_rows`
pub fn row_blocks(n_rows: usize, block_rows: usize) -> Vec<Range<usize>> {
    let block_rows = block_rows.max(1);
    (0..n_rows)
        .step_by(block_rows)
        .map(|start| start..(start + block_rows).min(n_rows))
        .collect()
}

/// Map-reduce over row blocks
#[derive(Clone, Copy, Debug)]
pub struct BlockExecutor {
    block_rows: usize,
}

impl Default for BlockExecutor {
    fn default() -> Self {
        Self::new(DEFAULT_BLOCK_ROWS)
    }
}

impl BlockExecutor {
    pub fn new(block_rows: usize) -> Self {
        Self {
            block_rows: block_rows.max(1),
        }
    }

    pub fn block_rows(&self) -> usize {
        self.block_rows
    }

    /// Apply `map` to every block and fold the outputs with `reduce`
    ///
    /// Returns `Ok(None)` when there are no rows and the first error if any
    /// block fails.
    pub fn map_reduce<R, M, F>(&self, n_rows: usize, map: M, reduce: F) -> Result<Option<R>>
    where
        R: Send,
        M: Fn(Range<usize>) -> Result<R> + Sync + Send,
        F: Fn(R, R) -> R + Sync + Send,
    {
        self.try_map_reduce(n_rows, map, |a, b| Ok(reduce(a, b)))
    }

    /// [`BlockExecutor::map_reduce`] with a fallible `reduce`
    pub fn try_map_reduce<R, M, F>(&self, n_rows: usize, map: M, reduce: F) -> Result<Option<R>>
    where
        R: Send,
        M: Fn(Range<usize>) -> Result<R> + Sync + Send,
        F: Fn(R, R) -> Result<R> + Sync + Send,
    {
        let blocks = row_blocks(n_rows, self.block_rows);

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            let outputs: Vec<R> = blocks.into_par_iter().map(map).collect::<Result<_>>()?;
            let mut outputs = outputs.into_iter();
            let Some(first) = outputs.next() else {
                return Ok(None);
            };
            outputs.try_fold(first, reduce).map(Some)
        }

        #[cfg(not(feature = "parallel"))]
        {
            let mut acc: Option<R> = None;
            for block in blocks {
                let out = map(block)?;
                acc = Some(match acc {
                    Some(prev) => reduce(prev, out)?,
                    None => out,
                });
            }
            Ok(acc)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_row_blocks_cover_range() {
        assert_eq!(row_blocks(0, 4), Vec::<Range<usize>>::new());
        assert_eq!(row_blocks(10, 4), vec![0..4, 4..8, 8..10]);
        assert_eq!(row_blocks(3, 0), vec![0..1, 1..2, 2..3]);
    }

    #[test]
    fn test_map_reduce_sums_rows() {
        let exec = BlockExecutor::new(7);
        let total = exec
            .map_reduce(100, |rows| Ok(rows.sum::<usize>()), |a, b| a + b)
            .unwrap();
        assert_eq!(total, Some(4950));
        assert_eq!(
            exec.map_reduce(0, |rows| Ok(rows.len()), |a, b| a + b).unwrap(),
            None
        );
    }

    #[test]
    fn test_failed_reduce_is_returned() {
        let exec = BlockExecutor::new(10);
        let out = exec.try_map_reduce(
            30,
            |rows| Ok(rows.start),
            |a, b| {
                if b == 20 {
                    Err(Error::size_mismatch(a, b, "block"))
                } else {
                    Ok(a + b)
                }
            },
        );
        assert_eq!(out.unwrap_err().kind(), crate::error::ErrorKind::DimensionMismatch);
    }

    #[test]
    fn test_map_reduce_propagates_errors() {
        let exec = BlockExecutor::new(10);
        let out = exec.map_reduce(
            50,
            |rows| {
                if rows.contains(&25) {
                    Err(Error::Numeric("bad block".into()))
                } else {
                    Ok(rows.len())
                }
            },
            |a, b| a + b,
        );
        assert!(out.is_err());
    }
}
