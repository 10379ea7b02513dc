/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

use super::{CMDResult, ToolError};

/// Upper bound on the number of frequencies in a single sweep.
pub const MAX_FREQUENCIES: usize = 1 << 24;

/// The real frequencies `start, start + step, ...` up to and including `stop`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrequencySweep {
    start: f64,
    step: f64,
    len: usize,
}

impl FrequencySweep {
    /// Returns an error unless all values are finite, `step > 0`, `start <= stop` and the
    /// sweep holds at most [`MAX_FREQUENCIES`] frequencies.
    pub fn new(start: f64, stop: f64, step: f64) -> CMDResult<Self> {
        if !(start.is_finite() && stop.is_finite() && step.is_finite()) {
            return Err(ToolError::InvalidArgument(format!(
                "frequency range [{start}, {stop}] with step {step} is not finite"
            )));
        }
        if step <= 0.0 {
            return Err(ToolError::InvalidArgument(format!(
                "frequency step must be positive, got {step}"
            )));
        }
        if start > stop {
            return Err(ToolError::InvalidArgument(format!(
                "frequency range start {start} is past its end {stop}"
            )));
        }

        // A relative slack keeps `stop` in the sweep when `(stop - start) / step` lands a
        // rounding error below an integer.
        let count = ((stop - start) / step * (1.0 + 1e-12) + 1e-9).floor();
        let len = if count < MAX_FREQUENCIES as f64 {
            (count as usize).checked_add(1)
        } else {
            None
        };
        match len {
            Some(len) if len <= MAX_FREQUENCIES => Ok(Self { start, step, len }),
            _ => Err(ToolError::InvalidArgument(format!(
                "frequency range [{start}, {stop}] with step {step} holds more than \
                 {MAX_FREQUENCIES} frequencies"
            ))),
        }
    }

    /// Number of frequencies in the sweep.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always `false`: a valid sweep contains at least `start`.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Return the `i`-th frequency `start + i * step`.
    pub fn at(&self, i: usize) -> f64 {
        self.start + (i as f64) * self.step
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = f64> + '_ {
        (0..self.len()).map(|i| self.at(i))
    }
}

/// Return the indices `i` in `0..count` that process `rank` of `world_size` handles.
///
/// Indices are dealt round-robin, so neighbouring frequencies go to different processes.
pub fn assign_frequencies(count: usize, rank: usize, world_size: usize) -> CMDResult<Vec<usize>> {
    if world_size == 0 || rank >= world_size {
        return Err(ToolError::InvalidArgument(format!(
            "rank {rank} is not in a world of size {world_size}"
        )));
    }
    Ok((rank..count).step_by(world_size).collect())
}
