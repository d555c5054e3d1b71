//! Cut a daily series into weekly train/test blocks.
//!
//! Boundaries are given as row offsets from the end of the series so that a
//! trailing partial week can be excluded:
//!
//! ```text
//! rows[head_offset .. n - train_tail_offset]           -> train
//! rows[n - train_tail_offset .. n - test_tail_offset]  -> test
//! ```

use crate::domain::{Block, DAYS_PER_WEEK, Observation, Series, WindowConfig};
use crate::error::EvalError;

/// Split `series` into train and test blocks.
pub fn split(series: &Series, window: &WindowConfig) -> Result<(Vec<Block>, Vec<Block>), EvalError> {
    if window.horizon != DAYS_PER_WEEK {
        return Err(EvalError::InvalidWindow(format!(
            "horizon {} must equal the block size {DAYS_PER_WEEK}",
            window.horizon
        )));
    }

    check_target(&series.rows, series.target)?;

    let n = series.len();
    if window.test_tail_offset >= window.train_tail_offset {
        return Err(EvalError::InvalidWindow(format!(
            "test tail offset ({}) must be smaller than train tail offset ({})",
            window.test_tail_offset, window.train_tail_offset
        )));
    }
    if window.head_offset + window.train_tail_offset > n {
        return Err(EvalError::InvalidWindow(format!(
            "offsets head={} + train_tail={} exceed series length {n}",
            window.head_offset, window.train_tail_offset
        )));
    }

    let boundary = n - window.train_tail_offset;
    let test_end = n - window.test_tail_offset;

    let train = to_blocks(&series.rows[window.head_offset..boundary], "train")?;
    let test = to_blocks(&series.rows[boundary..test_end], "test")?;

    Ok((train, test))
}

/// Concatenate blocks back into daily rows.
pub fn flatten(blocks: &[Block]) -> Vec<Observation> {
    blocks.iter().flat_map(|b| b.rows().iter().cloned()).collect()
}

/// Every row must carry the `target` field.
pub(crate) fn check_target<'a>(
    rows: impl IntoIterator<Item = &'a Observation>,
    target: usize,
) -> Result<(), EvalError> {
    match rows.into_iter().find(|r| r.values.len() <= target) {
        Some(row) => Err(EvalError::InvalidTarget {
            target,
            width: row.values.len(),
        }),
        None => Ok(()),
    }
}

fn to_blocks(rows: &[Observation], label: &str) -> Result<Vec<Block>, EvalError> {
    if rows.is_empty() {
        return Err(EvalError::InvalidWindow(format!("{label} slice is empty")));
    }
    if rows.len() % DAYS_PER_WEEK != 0 {
        return Err(EvalError::InvalidWindow(format!(
            "{label} slice has {} rows, not a multiple of {DAYS_PER_WEEK}",
            rows.len()
        )));
    }

    rows.chunks(DAYS_PER_WEEK)
        .map(|chunk| Block::new(chunk.to_vec()))
        .collect()
}
